//! The query descriptor consumed by compilation.

use indexmap::IndexSet;

use strata_model::{Aggregate, AnnotationRef, Attribute, Hierarchy, Predicate};

use crate::{CompileError, CompiledQuery};

/// Sort direction of an order-by key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Ascending,
    Descending,
}

/// Declarative description of one query over the annotation graph:
/// predicates, output columns, group/aggregate/order directives and
/// mutation directives around a target reference.
///
/// Compilation consumes the descriptor read-only; nothing persists between
/// compilations.
#[derive(Debug, Clone)]
pub struct Query {
    pub(crate) target: AnnotationRef,
    pub(crate) filters: Vec<Predicate>,
    pub(crate) columns: Vec<Attribute>,
    pub(crate) group_by: Vec<Attribute>,
    pub(crate) aggregates: Vec<Aggregate>,
    pub(crate) order_by: Vec<(Attribute, Direction)>,
    pub(crate) set_labels: Vec<String>,
    pub(crate) remove_labels: Vec<String>,
    pub(crate) set_pause: Option<bool>,
}

impl Query {
    pub fn new(target: impl Into<AnnotationRef>) -> Self {
        Self {
            target: target.into(),
            filters: Vec::new(),
            columns: Vec::new(),
            group_by: Vec::new(),
            aggregates: Vec::new(),
            order_by: Vec::new(),
            set_labels: Vec::new(),
            remove_labels: Vec::new(),
            set_pause: None,
        }
    }

    pub fn target(&self) -> &AnnotationRef {
        &self.target
    }

    pub fn filter(mut self, predicate: Predicate) -> Self {
        self.filters.push(predicate);
        self
    }

    pub fn column(mut self, attribute: Attribute) -> Self {
        self.columns.push(attribute);
        self
    }

    pub fn group_by(mut self, attribute: Attribute) -> Self {
        self.group_by.push(attribute);
        self
    }

    pub fn aggregate(mut self, aggregate: Aggregate) -> Self {
        self.aggregates.push(aggregate);
        self
    }

    pub fn order_by(mut self, attribute: Attribute, direction: Direction) -> Self {
        self.order_by.push((attribute, direction));
        self
    }

    /// Add a classification label to the matched target tokens.
    pub fn set_label(mut self, label: impl Into<String>) -> Self {
        self.set_labels.push(label.into());
        self
    }

    /// Remove a classification label from the matched target tokens.
    pub fn remove_label(mut self, label: impl Into<String>) -> Self {
        self.remove_labels.push(label.into());
        self
    }

    /// Toggle pause classification of the matched target tokens.
    pub fn set_pause(mut self, pause: bool) -> Self {
        self.set_pause = Some(pause);
        self
    }

    /// Compile against the corpus hierarchy.
    pub fn compile(&self, hierarchy: &Hierarchy) -> Result<CompiledQuery, CompileError> {
        crate::compile(self, hierarchy)
    }

    /// Mutation directives take priority over projection directives.
    pub(crate) fn has_mutation(&self) -> bool {
        self.set_pause.is_some() || !self.set_labels.is_empty() || !self.remove_labels.is_empty()
    }

    /// Every attribute the compiler must account for, in deterministic
    /// order: filter operands, columns, group-by keys, aggregate arguments,
    /// order-by keys.
    pub(crate) fn attributes(&self) -> Vec<&Attribute> {
        let mut out: Vec<&Attribute> = Vec::new();
        for predicate in &self.filters {
            out.extend(predicate.attributes());
        }
        out.extend(self.columns.iter());
        out.extend(self.group_by.iter());
        out.extend(self.aggregates.iter().filter_map(Aggregate::attribute));
        out.extend(self.order_by.iter().map(|(a, _)| a));
        out
    }

    /// Base references participating in at least one predicate; these
    /// promote their pattern clauses from optional to mandatory.
    pub(crate) fn filter_annotations(&self) -> IndexSet<AnnotationRef> {
        let mut set = IndexSet::new();
        for predicate in &self.filters {
            for annotation in predicate.annotations() {
                set.insert(annotation);
            }
        }
        set
    }
}
