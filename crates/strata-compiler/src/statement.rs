//! Final statement assembly.
//!
//! Exactly one of three mutually exclusive shapes per query: mutation,
//! aggregate projection, or plain projection. Mutation directives take
//! priority over projection directives; the projection is skipped entirely.

use strata_model::Attribute;

use crate::CompileError;
use crate::query::{Direction, Query};

pub(crate) fn generate(query: &Query) -> Result<String, CompileError> {
    if query.has_mutation() {
        return mutation(query);
    }
    if !query.aggregates.is_empty() || !query.group_by.is_empty() {
        return Ok(aggregate_projection(query));
    }
    projection(query)
}

fn mutation(query: &Query) -> Result<String, CompileError> {
    if query.target.has_subquery() {
        return Err(CompileError::PathMutation);
    }
    let alias = query.target.alias();
    if let Some(pause) = query.set_pause {
        return Ok(if pause {
            set_pause(&alias)
        } else {
            unset_pause(&alias)
        });
    }
    let ty = query.target.key().to_string();
    let mut parts = Vec::new();
    if !query.set_labels.is_empty() {
        parts.push(set_labels(&alias, &ty, &query.set_labels));
    }
    if !query.remove_labels.is_empty() {
        if !parts.is_empty() {
            parts.push(format!("WITH {alias}"));
        }
        parts.push(remove_labels(&alias, &query.remove_labels));
    }
    Ok(parts.join("\n"))
}

/// Relabel to pause and rewire adjacency: edge kind encodes pause/speech
/// status and must stay consistent with the node's label.
fn set_pause(alias: &str) -> String {
    format!(
        "SET {alias}:pause\n\
         REMOVE {alias}:speech\n\
         WITH {alias}\n\
         MATCH (prec)-[r1:precedes]->({alias})-[r2:precedes]->(foll)\n\
         CREATE (prec)-[:precedes]->(foll)\n\
         CREATE (prec)-[:precedes_pause]->({alias})-[:precedes_pause]->(foll)\n\
         DELETE r1, r2"
    )
}

/// The reverse toggle: pause-adjacency edges become speech adjacency and
/// the stale bypass edge is dropped.
fn unset_pause(alias: &str) -> String {
    format!(
        "SET {alias}:speech\n\
         REMOVE {alias}:pause\n\
         WITH {alias}\n\
         MATCH (prec)-[r1:precedes_pause]->({alias})-[r2:precedes_pause]->(foll)\n\
         OPTIONAL MATCH (prec)-[r3:precedes]->(foll)\n\
         CREATE (prec)-[:precedes]->({alias})-[:precedes]->(foll)\n\
         DELETE r1, r2, r3"
    )
}

fn label_string(labels: &[String]) -> String {
    format!(":{}", labels.join(":"))
}

fn set_labels(alias: &str, ty: &str, labels: &[String]) -> String {
    let mut lines = vec![
        format!("SET {alias}{}", label_string(labels)),
        format!("WITH {alias}"),
        format!("MATCH (a)-[:r_{ty}]->({alias})-[:r_{ty}]->(b)"),
    ];
    for label in labels {
        lines.push(format!(
            "CREATE (a)-[:r_{label}]->({alias})-[:r_{label}]->(b)"
        ));
    }
    lines.join("\n")
}

fn remove_labels(alias: &str, labels: &[String]) -> String {
    let mut lines = vec![format!("REMOVE {alias}{}", label_string(labels))];
    for label in labels {
        lines.push(format!("WITH {alias}"));
        lines.push(format!(
            "MATCH (a)-[r1:r_{label}]->({alias})-[r2:r_{label}]->(b)"
        ));
        lines.push("DELETE r1, r2".to_string());
    }
    lines.join("\n")
}

fn aggregate_projection(query: &Query) -> String {
    let mut properties: Vec<String> = query
        .group_by
        .iter()
        .map(Attribute::aliased_for_output)
        .collect();
    properties.extend(query.aggregates.iter().map(|a| a.aliased_for_output()));

    // grouped output without explicit ordering sorts by the first key
    let mut order_pairs = query.order_by.clone();
    if order_pairs.is_empty() && !query.group_by.is_empty() {
        order_pairs.push((query.group_by[0].clone(), Direction::Ascending));
    }
    let (additional, order_items) = resolve_order(&order_pairs, &query.group_by);
    properties.extend(
        additional
            .iter()
            .filter(|a| !query.group_by.contains(*a))
            .map(|a| a.aliased_for_output()),
    );

    render_return(properties, order_items)
}

fn projection(query: &Query) -> Result<String, CompileError> {
    let mut properties: Vec<String> = query
        .columns
        .iter()
        .map(Attribute::aliased_for_output)
        .collect();
    let (additional, order_items) = resolve_order(&query.order_by, &[]);
    properties.extend(additional.iter().map(|a| a.aliased_for_output()));
    if properties.is_empty() {
        return Err(CompileError::EmptyProjection);
    }
    Ok(render_return(properties, order_items))
}

/// Sort keys reuse the alias of a matching additional column or group-by
/// entry (reference + name identity); unmatched keys are appended as
/// internal additional columns.
fn resolve_order(
    order_by: &[(Attribute, Direction)],
    group_by: &[Attribute],
) -> (Vec<Attribute>, Vec<String>) {
    let mut additional: Vec<Attribute> = Vec::new();
    let mut items = Vec::new();
    for (attribute, direction) in order_by {
        let alias = if let Some(existing) = additional.iter().find(|c| *c == attribute) {
            existing.output_alias()
        } else if let Some(existing) = group_by.iter().find(|c| *c == attribute) {
            existing.output_alias()
        } else {
            additional.push(attribute.clone());
            attribute.output_alias()
        };
        let mut item = alias;
        if *direction == Direction::Descending {
            item.push_str(" DESC");
        }
        items.push(item);
    }
    (additional, items)
}

fn render_return(properties: Vec<String>, order_items: Vec<String>) -> String {
    let mut text = format!("RETURN {}", properties.join(", "));
    if !order_items.is_empty() {
        text.push_str("\nORDER BY ");
        text.push_str(&order_items.join(", "));
    }
    text
}
