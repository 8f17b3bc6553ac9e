//! Compiler from annotation-graph query descriptors to graph-store text.
//!
//! A [`Query`] describes predicates, output columns, group/aggregate/order
//! directives and mutation directives over typed annotation references;
//! [`compile`] walks every referenced annotation and produces one
//! Cypher-compatible statement plus its parameter map. Fixed clause order:
//!
//! ```text
//! MATCH / WHERE / OPTIONAL MATCH / WITH* / RETURN|SET|REMOVE [ORDER BY]
//! ```
//!
//! The compiler is a pure, synchronous transformation with no shared state
//! across invocations; it never executes queries or holds a connection.

mod params;
mod paths;
mod pattern;
mod query;
mod statement;

#[cfg(test)]
mod pattern_tests;
#[cfg(test)]
mod paths_tests;

use indexmap::IndexMap;

use strata_model::{Hierarchy, Predicate, Value};

pub use query::{Direction, Query};

/// Compiled output: one statement and its literal parameters.
#[derive(Debug, Clone, PartialEq, serde::Serialize)]
pub struct CompiledQuery {
    pub text: String,
    pub parameters: IndexMap<String, Value>,
}

/// Errors surfaced while assembling a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum CompileError {
    /// A plain projection with no columns and no sort keys has nothing to
    /// return.
    #[error("projection requests no output columns")]
    EmptyProjection,
    /// Mutation directives relabel a single token, never a collected path.
    #[error("mutation directives cannot target a collected path reference")]
    PathMutation,
}

/// Compile one query against the corpus hierarchy.
pub fn compile(query: &Query, hierarchy: &Hierarchy) -> Result<CompiledQuery, CompileError> {
    let patterns = pattern::generate(query, hierarchy);
    let mut bindings: paths::Bindings = patterns.bound.clone();

    let (token_predicates, path_predicates): (Vec<&Predicate>, Vec<&Predicate>) =
        query.filters.iter().partition(|p| !p.touches_path());

    let mut sections: Vec<String> = Vec::new();
    sections.push(format!(
        "MATCH {}",
        patterns
            .mandatory
            .iter()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(",\n")
    ));
    if !token_predicates.is_empty() {
        sections.push(format!("WHERE {}", join_predicates(&token_predicates)));
    }
    if !patterns.optional.is_empty() {
        sections.push(format!(
            "OPTIONAL MATCH {}",
            patterns
                .optional
                .iter()
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(",\n")
        ));
    }
    sections.push(paths::with_clause(&bindings));
    sections.extend(paths::generate(query, &mut bindings));
    // predicates over collected paths can only filter once their aliases
    // are bound, after the preparatory blocks
    if !path_predicates.is_empty() {
        sections.push(format!(
            "{}\nWHERE {}",
            paths::with_clause(&bindings),
            join_predicates(&path_predicates)
        ));
    }
    sections.push(statement::generate(query)?);

    Ok(CompiledQuery {
        text: sections.join("\n"),
        parameters: params::generate(query),
    })
}

fn join_predicates(predicates: &[&Predicate]) -> String {
    predicates
        .iter()
        .map(|p| p.for_cypher())
        .collect::<Vec<_>>()
        .join("\nAND ")
}
