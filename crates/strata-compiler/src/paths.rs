//! Materialization of collected paths into preparatory subquery blocks.
//!
//! A path-family reference (pause span, contained sub-sequence) needs its
//! whole collection bound before any property of it can be read: the block
//! matches the implied chain, collects it ordered by temporal start under
//! the path alias, and derives the parallel temporal-anchor list. Carried
//! bindings are threaded through every `WITH` explicitly; the set only
//! grows across a compilation.

use indexmap::IndexSet;

use strata_model::{AnnotationRef, NodeRef, PathRef, SubPathRef};

use crate::query::Query;

/// Aliases visible to clauses emitted so far.
pub(crate) type Bindings = IndexSet<String>;

pub(crate) fn with_clause(bindings: &Bindings) -> String {
    format!("WITH {}", join(bindings))
}

fn join(bindings: &Bindings) -> String {
    bindings
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Emit one preparatory block per path-family reference not yet carried.
pub(crate) fn generate(query: &Query, bindings: &mut Bindings) -> Vec<String> {
    let mut blocks = Vec::new();
    for attribute in query.attributes() {
        let annotation = attribute.annotation();
        if !annotation.has_subquery() || bindings.contains(&attribute.with_alias()) {
            continue;
        }
        let block = match annotation {
            AnnotationRef::Path(span) => pause_span_block(span, bindings),
            AnnotationRef::SubPath(subpath) => subpath_block(subpath, bindings),
            AnnotationRef::Positional(positional) => match positional.path() {
                AnnotationRef::Path(span) => pause_span_block(span, bindings),
                AnnotationRef::SubPath(subpath) => subpath_block(subpath, bindings),
                _ => continue,
            },
            _ => continue,
        };
        blocks.push(block);
    }
    blocks
}

/// Defining form on first use of an endpoint, bare alias afterwards.
fn figure(node: &NodeRef, bindings: &mut Bindings) -> String {
    if bindings.insert(node.alias()) {
        node.define_alias()
    } else {
        node.alias()
    }
}

fn subpath_block(subpath: &SubPathRef, bindings: &mut Bindings) -> String {
    let parent = subpath.parent().alias();
    let path = subpath.path_alias();
    let path_type = subpath.path_type_alias();
    let times = subpath.times_alias();
    let sub_ty = subpath.sub().ty();
    let carried = join(bindings);

    // fencepost boundaries plus one extra anchor on the anchored side
    let times_expr = if subpath.prefix_anchored() {
        format!("[x IN {path} | x.begin] + [x IN {path}[-1..] | x.end] + [{parent}.end]")
    } else {
        format!("[{parent}.begin] + [x IN {path} | x.begin] + [x IN {path}[-1..] | x.end]")
    };

    let block = format!(
        "MATCH ({path_type}:{sub_ty}_type)<-[:is_a]-({path}:{sub_ty})-[:contained_by*1..]->({parent})\n\
         WITH {carried}, {path_type}, {path}\n\
         ORDER BY {path}.begin\n\
         WITH {carried}, collect({path}) AS {path}, collect({path_type}) AS {path_type}\n\
         WITH {carried}, {path}, {path_type}, {times_expr} AS {times}"
    );
    bindings.insert(path);
    bindings.insert(path_type);
    bindings.insert(times);
    block
}

fn pause_span_block(span: &PathRef, bindings: &mut Bindings) -> String {
    let (from, to) = span.endpoints();
    let from_rendered = figure(&from, bindings);
    let to_rendered = figure(&to, bindings);
    let carried = join(bindings);
    let path = span.path_alias();
    let path_type = span.path_type_alias();
    let times = span.times_alias();

    let times_expr = if span.prefix_anchored() {
        format!(
            "[x IN {path} | x.begin] + [x IN {path}[-1..] | x.end] + [{}.end]",
            to.alias()
        )
    } else {
        format!(
            "[{}.begin] + [x IN {path} | x.begin] + [x IN {path}[-1..] | x.end]",
            from.alias()
        )
    };

    // chain order along pause adjacency is temporal order
    let block = format!(
        "MATCH {path} = ({from_rendered})-[:precedes_pause*0..]->({to_rendered})\n\
         WITH {carried}, [x IN nodes({path}) WHERE x:pause] AS {path}\n\
         WITH {carried}, {path}, [x IN {path} | head([(x)-[:is_a]->(t:pause_type) | t])] AS {path_type}\n\
         WITH {carried}, {path}, {path_type}, {times_expr} AS {times}"
    );
    bindings.insert(path);
    bindings.insert(path_type);
    bindings.insert(times);
    block
}
