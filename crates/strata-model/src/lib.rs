//! Reference model for annotation-graph queries.
//!
//! Typed handles to annotation instances (utterances, words, phones,
//! pauses) at relative positions in a temporally ordered hierarchy, plus
//! the scalar attributes and predicates built over them. Everything here is
//! an immutable, cheaply constructed value object; rendering targets a
//! Cypher-compatible pattern language, and nothing executes queries or
//! holds a store connection.

mod annotation;
mod attribute;
mod escape;
mod hierarchy;
mod predicate;
mod value;

#[cfg(test)]
mod attribute_tests;
#[cfg(test)]
mod hierarchy_tests;

pub use annotation::{AnnotationRef, NodeRef, PathRef, PauseRef, PositionalRef, Resolved, SubPathRef};
pub use attribute::{Aggregate, Attribute, TYPE_PROPERTIES, is_type_property};
pub use escape::escape_key;
pub use hierarchy::Hierarchy;
pub use predicate::{CompareOp, Operand, Predicate, Side};
pub use value::Value;

/// Contract violations in the reference model.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ModelError {
    /// `annotation()` on a reference that is not attached to another
    /// annotation.
    #[error("top-level annotation references have no parent annotation")]
    TopLevelAnnotation,
}
