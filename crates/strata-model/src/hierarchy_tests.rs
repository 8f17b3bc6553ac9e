//! Unit tests for containment-hierarchy walks.

use crate::hierarchy::Hierarchy;

fn corpus() -> Hierarchy {
    Hierarchy::new()
        .contain("phone", "syllable")
        .contain("syllable", "word")
        .contain("word", "utterance")
}

#[test]
fn direct_parent() {
    assert_eq!(corpus().parent("phone"), Some("syllable"));
    assert_eq!(corpus().parent("utterance"), None);
}

#[test]
fn walk_reaches_nearest_referenced_ancestor() {
    let h = corpus();
    assert_eq!(
        h.walk_to_ancestor("phone", &["phone", "word"]),
        Some("word")
    );
}

#[test]
fn walk_skips_unreferenced_levels() {
    let h = corpus();
    // syllable and word are absent from the query, so phone resolves to
    // utterance directly
    assert_eq!(
        h.walk_to_ancestor("phone", &["phone", "utterance"]),
        Some("utterance")
    );
}

#[test]
fn walk_runs_out_without_referenced_ancestor() {
    let h = corpus();
    assert_eq!(h.walk_to_ancestor("phone", &["phone"]), None);
    assert_eq!(h.walk_to_ancestor("utterance", &["utterance"]), None);
}
