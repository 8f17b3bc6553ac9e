//! Unit tests for attribute rendering and the offset tables.

use crate::annotation::{AnnotationRef, NodeRef, Resolved};
use crate::attribute::Aggregate;
use crate::predicate::Predicate;

fn word() -> AnnotationRef {
    NodeRef::new("word").into()
}

fn subpath() -> AnnotationRef {
    NodeRef::new("word").subpath("phone").into()
}

fn positional(name: &str) -> AnnotationRef {
    match subpath().property(name) {
        Resolved::Annotation(a) => a,
        Resolved::Attribute(a) => panic!("expected positional, got attribute {}", a.alias()),
    }
}

#[test]
fn token_properties_resolve_on_the_token_alias() {
    assert_eq!(word().attribute("begin").for_cypher(), "node_word.begin");
    insta::assert_snapshot!(word().attribute("mean_f1").for_cypher(), @"node_word.mean_f1");
}

#[test]
fn type_properties_resolve_on_the_type_alias() {
    assert_eq!(
        word().attribute("label").for_cypher(),
        "type_node_word.label"
    );
    assert_eq!(
        word().attribute("transcription").for_cypher(),
        "type_node_word.transcription"
    );
}

#[test]
fn type_and_token_aliases_stay_distinct() {
    assert_ne!(
        word().attribute("label").with_alias(),
        word().attribute("begin").with_alias()
    );
}

#[test]
fn duration_is_synthesized() {
    assert_eq!(
        word().attribute("duration").for_cypher(),
        "node_word.end - node_word.begin"
    );
}

#[test]
fn awkward_property_names_are_escaped() {
    assert_eq!(
        word().attribute("my prop").for_cypher(),
        "node_word.`my prop`"
    );
}

#[test]
fn aliases_chain_reference_and_name() {
    let attr = word().attribute("label");
    assert_eq!(attr.alias(), "node_word_label");
    assert_eq!(attr.output_alias(), "node_word_label");
    let renamed = attr.column_name("word_label");
    assert_eq!(renamed.output_alias(), "word_label");
}

#[test]
fn renaming_does_not_change_identity() {
    let plain = word().attribute("label");
    let renamed = word().attribute("label").column_name("word_label");
    assert_eq!(plain, renamed);
}

#[test]
fn path_aggregates_read_the_collected_type_nodes() {
    assert_eq!(
        subpath().attribute("count").for_cypher(),
        "size(type_node_phone_in_node_word)"
    );
    assert_eq!(
        subpath().attribute("rate").for_cypher(),
        "size(type_node_phone_in_node_word) / (node_word.end - node_word.begin)"
    );
    assert_eq!(
        subpath().attribute("label").for_cypher(),
        "[n IN type_node_phone_in_node_word | n.label]"
    );
}

#[test]
fn path_position_counts_earlier_elements() {
    assert_eq!(
        subpath().attribute("position").for_cypher(),
        "size([x IN node_phone_in_node_word WHERE x.begin < node_phone.begin]) + 1"
    );
}

#[test]
fn unknown_path_properties_fall_through_to_the_collection() {
    assert_eq!(
        subpath().attribute("mean_f1").for_cypher(),
        "[n IN node_phone_in_node_word | n.mean_f1]"
    );
}

#[test]
fn whole_path_boundaries_shift_with_the_anchoring_side() {
    // prefix-anchored: parent at position 0
    assert_eq!(
        subpath().attribute("begin").for_cypher(),
        "node_phone_in_node_word_times[0]"
    );
    assert_eq!(
        subpath().attribute("end").for_cypher(),
        "node_phone_in_node_word_times[-2]"
    );

    // suffix-anchored: parent at a previous position
    let earlier: AnnotationRef = NodeRef::at("word", -1).subpath("phone").into();
    assert_eq!(
        earlier.attribute("begin").for_cypher(),
        "prev_1_node_phone_in_prev_1_node_word_times[1]"
    );
    assert_eq!(
        earlier.attribute("end").for_cypher(),
        "prev_1_node_phone_in_prev_1_node_word_times[-1]"
    );
}

#[test]
fn positional_elements_slice_by_signed_index() {
    assert_eq!(
        positional("initial").attribute("label").for_cypher(),
        "[n IN type_node_phone_in_node_word | n.label][0]"
    );
    assert_eq!(
        positional("final").attribute("label").for_cypher(),
        "[n IN type_node_phone_in_node_word | n.label][-1]"
    );
    assert_eq!(
        positional("penultimate").attribute("label").for_cypher(),
        "[n IN type_node_phone_in_node_word | n.label][-2]"
    );
    assert_eq!(
        positional("antepenultimate").attribute("label").for_cypher(),
        "[n IN type_node_phone_in_node_word | n.label][-3]"
    );
}

#[test]
fn positional_boundaries_use_the_index_offsets() {
    assert_eq!(
        positional("initial").attribute("begin").for_cypher(),
        "node_phone_in_node_word_times[0]"
    );
    assert_eq!(
        positional("initial").attribute("end").for_cypher(),
        "node_phone_in_node_word_times[1]"
    );
    assert_eq!(
        positional("final").attribute("duration").for_cypher(),
        "node_phone_in_node_word_times[-1] - node_phone_in_node_word_times[-2]"
    );
}

#[test]
fn boundary_comparisons_between_references_become_alignment() {
    let utterance: AnnotationRef = NodeRef::new("utterance").into();
    let predicate = word()
        .attribute("begin")
        .eq(utterance.attribute("begin"));
    assert!(matches!(predicate, Predicate::Alignment { negated: false, .. }));

    let negated = word().attribute("end").neq(utterance.attribute("end"));
    assert!(matches!(negated, Predicate::Alignment { negated: true, .. }));
}

#[test]
fn same_reference_boundaries_compare_literally() {
    let predicate = word().attribute("begin").eq(word().attribute("begin"));
    assert!(matches!(predicate, Predicate::Compare { .. }));
}

#[test]
fn mixed_boundaries_compare_literally() {
    let utterance: AnnotationRef = NodeRef::new("utterance").into();
    let predicate = word().attribute("begin").lt(utterance.attribute("end"));
    assert!(matches!(predicate, Predicate::Compare { .. }));
}

#[test]
fn aggregates_pass_the_function_through_verbatim() {
    let agg = Aggregate::of("stdev", word().attribute("duration"));
    assert_eq!(
        agg.for_cypher(),
        "stdev(node_word.end - node_word.begin)"
    );
    assert_eq!(agg.alias(), "node_word_duration_stdev");

    let count = Aggregate::over_all("count");
    assert_eq!(count.for_cypher(), "count(*)");
    assert_eq!(
        count.column_name("n").aliased_for_output(),
        "count(*) AS n"
    );
}
