//! Unit tests for path materialization and carried bindings.

use indoc::indoc;

use strata_model::{AnnotationRef, NodeRef};

use crate::paths::{self, Bindings};
use crate::query::Query;

fn word() -> AnnotationRef {
    NodeRef::new("word").into()
}

#[test]
fn subpath_block_collects_ordered_by_start() {
    let subpath: AnnotationRef = NodeRef::new("word").subpath("phone").into();
    let q = Query::new(word()).column(subpath.attribute("rate").column_name("phones_per_second"));
    let mut bindings: Bindings = Bindings::new();
    bindings.insert("node_word".to_string());

    let blocks = paths::generate(&q, &mut bindings);
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0],
        indoc! {"
            MATCH (type_node_phone_in_node_word:phone_type)<-[:is_a]-(node_phone_in_node_word:phone)-[:contained_by*1..]->(node_word)
            WITH node_word, type_node_phone_in_node_word, node_phone_in_node_word
            ORDER BY node_phone_in_node_word.begin
            WITH node_word, collect(node_phone_in_node_word) AS node_phone_in_node_word, collect(type_node_phone_in_node_word) AS type_node_phone_in_node_word
            WITH node_word, node_phone_in_node_word, type_node_phone_in_node_word, [x IN node_phone_in_node_word | x.begin] + [x IN node_phone_in_node_word[-1..] | x.end] + [node_word.end] AS node_phone_in_node_word_times"
        }
    );
}

#[test]
fn carried_bindings_strictly_grow() {
    let subpath: AnnotationRef = NodeRef::new("word").subpath("phone").into();
    let q = Query::new(word()).column(subpath.attribute("count"));
    let mut bindings: Bindings = Bindings::new();
    bindings.insert("node_word".to_string());

    paths::generate(&q, &mut bindings);
    let carried: Vec<&str> = bindings.iter().map(String::as_str).collect();
    assert_eq!(
        carried,
        vec![
            "node_word",
            "node_phone_in_node_word",
            "type_node_phone_in_node_word",
            "node_phone_in_node_word_times",
        ]
    );
}

#[test]
fn one_block_serves_every_property_of_the_same_path() {
    let subpath: AnnotationRef = NodeRef::new("word").subpath("phone").into();
    let q = Query::new(word())
        .column(subpath.attribute("count"))
        .column(subpath.attribute("rate"))
        .column(subpath.attribute("duration"));
    let mut bindings: Bindings = Bindings::new();
    bindings.insert("node_word".to_string());

    let blocks = paths::generate(&q, &mut bindings);
    assert_eq!(blocks.len(), 1);
}

#[test]
fn pause_span_block_binds_endpoints_and_filters_to_pauses() {
    let span: AnnotationRef = NodeRef::new("word").pause_span().into();
    let q = Query::new(word()).column(span.attribute("count"));
    let mut bindings: Bindings = Bindings::new();
    bindings.insert("node_word".to_string());

    let blocks = paths::generate(&q, &mut bindings);
    assert_eq!(blocks.len(), 1);
    assert_eq!(
        blocks[0],
        indoc! {"
            MATCH path_foll_1_node_pause = (node_word)-[:precedes_pause*0..]->(foll_1_node_word:word:speech)
            WITH node_word, foll_1_node_word, [x IN nodes(path_foll_1_node_pause) WHERE x:pause] AS path_foll_1_node_pause
            WITH node_word, foll_1_node_word, path_foll_1_node_pause, [x IN path_foll_1_node_pause | head([(x)-[:is_a]->(t:pause_type) | t])] AS type_path_foll_1_node_pause
            WITH node_word, foll_1_node_word, path_foll_1_node_pause, type_path_foll_1_node_pause, [x IN path_foll_1_node_pause | x.begin] + [x IN path_foll_1_node_pause[-1..] | x.end] + [foll_1_node_word.end] AS path_foll_1_node_pause_times"
        }
    );
    assert!(bindings.contains("foll_1_node_word"));
}

#[test]
fn suffix_anchored_span_prepends_the_leading_boundary() {
    let span: AnnotationRef = NodeRef::at("word", -1).pause_span().into();
    let q = Query::new(word()).column(span.attribute("duration"));
    let mut bindings: Bindings = Bindings::new();
    bindings.insert("node_word".to_string());

    let blocks = paths::generate(&q, &mut bindings);
    assert!(blocks[0].contains(
        "[prev_1_node_word.begin] + [x IN path_prev_1_node_pause | x.begin] + [x IN path_prev_1_node_pause[-1..] | x.end] AS path_prev_1_node_pause_times"
    ));
    assert!(blocks[0].contains(
        "MATCH path_prev_1_node_pause = (prev_1_node_word:word:speech)-[:precedes_pause*0..]->(node_word)"
    ));
}
