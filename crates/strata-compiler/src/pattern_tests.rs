//! Unit tests for pattern-clause generation.

use strata_model::{AnnotationRef, Hierarchy, NodeRef};

use crate::pattern;
use crate::query::Query;

fn word() -> AnnotationRef {
    NodeRef::new("word").into()
}

#[test]
fn anchor_gets_is_a_only_when_its_type_node_is_read() {
    let q = Query::new(word()).column(word().attribute("label"));
    let patterns = pattern::generate(&q, &Hierarchy::new());
    assert!(
        patterns
            .mandatory
            .contains("(node_word:word:speech)-[:is_a]->(type_node_word:word_type)")
    );

    let q = Query::new(word()).column(word().attribute("begin"));
    let patterns = pattern::generate(&q, &Hierarchy::new());
    assert!(patterns.mandatory.contains("(node_word:word:speech)"));
    assert!(!patterns.mandatory.iter().any(|c| c.contains(":is_a]")));
}

#[test]
fn unfiltered_displaced_references_stay_optional() {
    let following: AnnotationRef = NodeRef::at("word", 1).into();
    let q = Query::new(word()).column(following.attribute("begin"));
    let patterns = pattern::generate(&q, &Hierarchy::new());
    assert!(
        patterns
            .optional
            .contains("(node_word)-[:precedes]->(foll_1_node_word:word:speech)")
    );
    assert!(patterns.mandatory.contains("(node_word:word:speech)"));
}

#[test]
fn filtered_references_promote_to_mandatory() {
    let following: AnnotationRef = NodeRef::at("word", 1).into();
    let q = Query::new(word())
        .column(following.attribute("begin"))
        .filter(following.attribute("begin").gt(0.5));
    let patterns = pattern::generate(&q, &Hierarchy::new());
    assert!(
        patterns
            .mandatory
            .contains("(node_word)-[:precedes]->(foll_1_node_word:word:speech)")
    );
    assert!(patterns.optional.is_empty());
}

#[test]
fn adjacency_chains_hop_once_per_unit_of_displacement() {
    let two_back: AnnotationRef = NodeRef::at("word", -2).into();
    let q = Query::new(word()).filter(two_back.attribute("begin").gt(0.0));
    let patterns = pattern::generate(&q, &Hierarchy::new());
    assert!(patterns.mandatory.contains(
        "(prev_2_node_word:word:speech)-[:precedes]->(prev_1_node_word:word:speech)-[:precedes]->(node_word)"
    ));
}

#[test]
fn pause_references_chain_through_pause_adjacency() {
    let pause: AnnotationRef = NodeRef::at("word", -1).pause().into();
    let q = Query::new(word()).filter(pause.attribute("duration").gt(0.05));
    let patterns = pattern::generate(&q, &Hierarchy::new());
    assert!(
        patterns
            .mandatory
            .contains("(prev_1_node_pause:word:pause)-[:precedes_pause]->(node_word)")
    );
}

#[test]
fn containment_skips_unreferenced_levels_and_deduplicates() {
    let hierarchy = Hierarchy::new()
        .contain("phone", "syllable")
        .contain("syllable", "word")
        .contain("word", "utterance");
    let phone: AnnotationRef = NodeRef::new("phone").into();
    let q = Query::new(phone.clone())
        .filter(phone.attribute("label").eq("aa"))
        .column(word().attribute("label"))
        .column(word().attribute("begin"));
    let patterns = pattern::generate(&q, &hierarchy);
    let containment: Vec<&str> = patterns
        .mandatory
        .iter()
        .filter(|c| c.contains("contained_by"))
        .map(String::as_str)
        .collect();
    assert_eq!(
        containment,
        vec!["(node_phone)-[:contained_by*1..]->(node_word)"]
    );
}

#[test]
fn bound_aliases_accumulate_in_first_bound_order() {
    let phone: AnnotationRef = NodeRef::new("phone").into();
    let q = Query::new(phone.clone()).filter(phone.attribute("label").eq("aa"));
    let patterns = pattern::generate(&q, &Hierarchy::new());
    let bound: Vec<&str> = patterns.bound.iter().map(String::as_str).collect();
    assert_eq!(bound, vec!["node_phone", "type_node_phone"]);
}
