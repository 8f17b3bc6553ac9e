//! Graph-pattern clause generation.
//!
//! Walks every token-level reference the query touches and produces the
//! MATCH / OPTIONAL MATCH clause sets: one defining clause per level anchor,
//! a temporal-adjacency chain per displaced reference, token-to-type anchor
//! clauses where type properties are read, and hierarchical containment
//! between referenced levels. Clauses accumulate in order-preserving sets,
//! so textually identical clauses collapse to one.

use indexmap::{IndexMap, IndexSet};

use strata_model::{AnnotationRef, Hierarchy, NodeRef};

use crate::query::Query;

pub(crate) struct Patterns {
    pub(crate) mandatory: IndexSet<String>,
    pub(crate) optional: IndexSet<String>,
    /// Aliases bound by the clauses, in first-bound order.
    pub(crate) bound: IndexSet<String>,
}

#[derive(Debug, PartialEq, Eq, Hash)]
enum LevelKey {
    Speech(String),
    Pause(String),
}

pub(crate) fn generate(query: &Query, hierarchy: &Hierarchy) -> Patterns {
    let mut refs: IndexSet<AnnotationRef> = IndexSet::new();
    refs.insert(query.target().base());
    for predicate in &query.filters {
        for annotation in predicate.annotations() {
            refs.insert(annotation);
        }
    }
    for attribute in query.attributes() {
        refs.insert(attribute.base_annotation());
    }

    // references whose type node is actually read; only these get is_a
    // clauses, so tokens lacking a type edge are not spuriously filtered
    let mut type_used: IndexSet<AnnotationRef> = IndexSet::new();
    for attribute in query.attributes() {
        if !attribute.annotation().has_subquery() && attribute.is_type_property() {
            type_used.insert(attribute.annotation().clone());
        }
    }

    let filter_refs = query.filter_annotations();

    let mut levels: IndexMap<LevelKey, Vec<AnnotationRef>> = IndexMap::new();
    for annotation in &refs {
        let key = match annotation {
            AnnotationRef::Node(n) => LevelKey::Speech(n.ty().to_string()),
            AnnotationRef::Pause(p) => LevelKey::Pause(p.host().to_string()),
            _ => continue,
        };
        levels.entry(key).or_default().push(annotation.clone());
    }
    for list in levels.values_mut() {
        list.sort_by_key(AnnotationRef::pos);
    }

    let mut out = Patterns {
        mandatory: IndexSet::new(),
        optional: IndexSet::new(),
        bound: IndexSet::new(),
    };

    for (key, list) in &levels {
        match key {
            LevelKey::Speech(ty) => speech_level(ty, list, &type_used, &filter_refs, &mut out),
            LevelKey::Pause(host) => pause_level(host, list, &type_used, &filter_refs, &mut out),
        }
    }

    containment(&levels, hierarchy, &mut out);
    out
}

fn ref_corpus(annotation: &AnnotationRef) -> Option<&str> {
    match annotation {
        AnnotationRef::Node(n) => n.corpus(),
        AnnotationRef::Pause(p) => p.corpus(),
        _ => None,
    }
}

fn node_at(ty: &str, pos: i32, corpus: Option<&str>) -> NodeRef {
    let node = NodeRef::at(ty, pos);
    match corpus {
        Some(c) => node.scoped(c),
        None => node,
    }
}

/// Defining form on first use of an alias, bare alias afterwards.
fn figure(alias: String, define: String, bound: &mut IndexSet<String>) -> String {
    if bound.insert(alias.clone()) { define } else { alias }
}

fn insert(out: &mut Patterns, mandatory: bool, clause: String) {
    if mandatory {
        out.mandatory.insert(clause);
    } else {
        out.optional.insert(clause);
    }
}

fn speech_level(
    ty: &str,
    list: &[AnnotationRef],
    type_used: &IndexSet<AnnotationRef>,
    filter_refs: &IndexSet<AnnotationRef>,
    out: &mut Patterns,
) {
    let corpus = list.iter().find_map(ref_corpus).map(str::to_string);
    let corpus = corpus.as_deref();
    let anchor = node_at(ty, 0, corpus);
    let anchor_ref = AnnotationRef::Node(anchor.clone());

    // the anchor clause roots the level pattern
    let clause = if type_used.contains(&anchor_ref) {
        format!(
            "({})-[:is_a]->({})",
            figure(anchor.alias(), anchor.define_alias(), &mut out.bound),
            figure(anchor.type_alias(), anchor.define_type_alias(), &mut out.bound),
        )
    } else {
        format!(
            "({})",
            figure(anchor.alias(), anchor.define_alias(), &mut out.bound)
        )
    };
    out.mandatory.insert(clause);

    for annotation in list {
        let pos = annotation.pos();
        if pos == 0 {
            continue;
        }
        let mandatory = filter_refs.contains(annotation);
        let chain = speech_chain(ty, corpus, pos, &mut out.bound);
        insert(out, mandatory, chain);
        if type_used.contains(annotation) {
            let node = node_at(ty, pos, corpus);
            let clause = format!(
                "({})-[:is_a]->({})",
                figure(node.alias(), node.define_alias(), &mut out.bound),
                figure(node.type_alias(), node.define_type_alias(), &mut out.bound),
            );
            insert(out, mandatory, clause);
        }
    }
}

/// One `precedes` edge per unit of displacement, direction by sign.
fn speech_chain(ty: &str, corpus: Option<&str>, pos: i32, bound: &mut IndexSet<String>) -> String {
    let positions: Vec<i32> = if pos < 0 {
        (pos..=0).collect()
    } else {
        (0..=pos).collect()
    };
    let mut chain = String::new();
    for (i, p) in positions.iter().enumerate() {
        if i > 0 {
            chain.push_str("-[:precedes]->");
        }
        let node = node_at(ty, *p, corpus);
        chain.push_str(&format!(
            "({})",
            figure(node.alias(), node.define_alias(), bound)
        ));
    }
    chain
}

fn pause_level(
    host: &str,
    list: &[AnnotationRef],
    type_used: &IndexSet<AnnotationRef>,
    filter_refs: &IndexSet<AnnotationRef>,
    out: &mut Patterns,
) {
    let corpus = list.iter().find_map(ref_corpus).map(str::to_string);
    let corpus = corpus.as_deref();

    for annotation in list {
        let pos = annotation.pos();
        let pause = node_at(host, pos, corpus).pause();
        if pos == 0 {
            let clause = if type_used.contains(annotation) {
                format!(
                    "({})-[:is_a]->({})",
                    figure(pause.alias(), pause.define_alias(), &mut out.bound),
                    figure(pause.type_alias(), pause.define_type_alias(), &mut out.bound),
                )
            } else {
                format!(
                    "({})",
                    figure(pause.alias(), pause.define_alias(), &mut out.bound)
                )
            };
            out.mandatory.insert(clause);
            continue;
        }
        let mandatory = filter_refs.contains(annotation);
        let chain = pause_chain(host, corpus, pos, &mut out.bound);
        insert(out, mandatory, chain);
        if type_used.contains(annotation) {
            let clause = format!(
                "({})-[:is_a]->({})",
                figure(pause.alias(), pause.define_alias(), &mut out.bound),
                figure(pause.type_alias(), pause.define_type_alias(), &mut out.bound),
            );
            insert(out, mandatory, clause);
        }
    }
}

/// Pause references chain to the host level's speech anchor through
/// pause-adjacency edges.
fn pause_chain(host: &str, corpus: Option<&str>, pos: i32, bound: &mut IndexSet<String>) -> String {
    let positions: Vec<i32> = if pos < 0 {
        (pos..=0).collect()
    } else {
        (0..=pos).collect()
    };
    let mut chain = String::new();
    for (i, p) in positions.iter().enumerate() {
        if i > 0 {
            chain.push_str("-[:precedes_pause]->");
        }
        let rendered = if *p == 0 {
            let anchor = node_at(host, 0, corpus);
            figure(anchor.alias(), anchor.define_alias(), bound)
        } else {
            let pause = node_at(host, *p, corpus).pause();
            figure(pause.alias(), pause.define_alias(), bound)
        };
        chain.push_str(&format!("({rendered})"));
    }
    chain
}

/// One containment clause per referenced level and its nearest referenced
/// ancestor, levels not present in the query skipped while climbing.
fn containment(
    levels: &IndexMap<LevelKey, Vec<AnnotationRef>>,
    hierarchy: &Hierarchy,
    out: &mut Patterns,
) {
    let referenced: Vec<&str> = levels
        .keys()
        .filter_map(|key| match key {
            LevelKey::Speech(ty) => Some(ty.as_str()),
            LevelKey::Pause(_) => None,
        })
        .collect();
    let mut sorted = referenced.clone();
    sorted.sort_unstable();
    for ty in sorted {
        if let Some(ancestor) = hierarchy.walk_to_ancestor(ty, &referenced) {
            let clause = format!(
                "({})-[:contained_by*1..]->({})",
                NodeRef::new(ty).alias(),
                NodeRef::new(ancestor).alias()
            );
            out.mandatory.insert(clause);
        }
    }
}
