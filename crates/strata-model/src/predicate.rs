//! Predicate variants and their text rendering.
//!
//! A predicate renders to boolean clause text and reports the attribute
//! operands and base references it touches; it never consults store state.

use crate::annotation::AnnotationRef;
use crate::attribute::Attribute;
use crate::escape::escape_key;
use crate::value::Value;

/// Comparison operator of a literal or attribute comparison.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Equal,
    NotEqual,
    Gt,
    Gte,
    Lt,
    Lte,
    In,
    Regex,
}

impl CompareOp {
    pub fn sign(self) -> &'static str {
        match self {
            CompareOp::Equal => "=",
            CompareOp::NotEqual => "<>",
            CompareOp::Gt => ">",
            CompareOp::Gte => ">=",
            CompareOp::Lt => "<",
            CompareOp::Lte => "<=",
            CompareOp::In => "IN",
            CompareOp::Regex => "=~",
        }
    }
}

/// Which boundary an alignment predicate compares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Left,
    Right,
}

/// Right-hand side of a comparison: a literal, or another attribute.
#[derive(Debug, Clone, PartialEq)]
pub enum Operand {
    Literal(Value),
    Attribute(Attribute),
}

impl From<Value> for Operand {
    fn from(v: Value) -> Self {
        Operand::Literal(v)
    }
}

impl From<&str> for Operand {
    fn from(s: &str) -> Self {
        Operand::Literal(Value::from(s))
    }
}

impl From<String> for Operand {
    fn from(s: String) -> Self {
        Operand::Literal(Value::from(s))
    }
}

impl From<i64> for Operand {
    fn from(i: i64) -> Self {
        Operand::Literal(Value::from(i))
    }
}

impl From<f64> for Operand {
    fn from(x: f64) -> Self {
        Operand::Literal(Value::from(x))
    }
}

impl From<bool> for Operand {
    fn from(b: bool) -> Self {
        Operand::Literal(Value::from(b))
    }
}

impl From<Attribute> for Operand {
    fn from(a: Attribute) -> Self {
        Operand::Attribute(a)
    }
}

/// One boolean clause of a query.
#[derive(Debug, Clone, PartialEq)]
pub enum Predicate {
    /// `attribute <op> operand`.
    Compare {
        attribute: Attribute,
        op: CompareOp,
        operand: Operand,
    },
    /// A descendant token of `descendant` type carrying a property value
    /// exists beneath `annotation`. An existential graph pattern, not a
    /// substring test.
    Contains {
        annotation: AnnotationRef,
        descendant: String,
        property: String,
        value: Value,
    },
    /// Structural boundary adjacency between two references: no node of the
    /// first reference's type lies strictly between the compared boundaries.
    /// Negated variants assert that such an intervening node exists.
    Alignment {
        first: AnnotationRef,
        second: AnnotationRef,
        side: Side,
        negated: bool,
    },
}

impl Predicate {
    pub(crate) fn compare(attribute: Attribute, op: CompareOp, operand: Operand) -> Self {
        Predicate::Compare {
            attribute,
            op,
            operand,
        }
    }

    pub fn contains(
        annotation: AnnotationRef,
        descendant: impl Into<String>,
        property: impl Into<String>,
        value: impl Into<Value>,
    ) -> Self {
        Predicate::Contains {
            annotation,
            descendant: descendant.into(),
            property: property.into(),
            value: value.into(),
        }
    }

    pub(crate) fn alignment(
        first: AnnotationRef,
        second: AnnotationRef,
        side: Side,
        negated: bool,
    ) -> Self {
        Predicate::Alignment {
            first,
            second,
            side,
            negated,
        }
    }

    /// Rendered boolean text. Literal operands render as parameter
    /// placeholders keyed by the owning attribute's alias.
    pub fn for_cypher(&self) -> String {
        match self {
            Predicate::Compare {
                attribute,
                op,
                operand,
            } => {
                let rhs = match operand {
                    Operand::Literal(_) => format!("${}", attribute.alias()),
                    Operand::Attribute(a) => a.for_cypher(),
                };
                format!("{} {} {}", attribute.for_cypher(), op.sign(), rhs)
            }
            Predicate::Contains {
                annotation,
                descendant,
                property,
                ..
            } => format!(
                "({})<-[:contained_by]-(:{})-[:is_a]->(:{}_type {{{}: ${}}})",
                annotation.alias(),
                descendant,
                descendant,
                escape_key(property),
                contains_param(annotation, descendant, property),
            ),
            Predicate::Alignment {
                first,
                second,
                side,
                negated,
            } => {
                let pattern = match side {
                    Side::Right => format!(
                        "({})-[:precedes]->(:{})-[:contained_by*]->({})",
                        first.alias(),
                        first.key(),
                        second.alias()
                    ),
                    Side::Left => format!(
                        "({})<-[:precedes]-(:{})-[:contained_by*]->({})",
                        first.alias(),
                        first.key(),
                        second.alias()
                    ),
                };
                if *negated {
                    pattern
                } else {
                    format!("not {pattern}")
                }
            }
        }
    }

    /// The parameter this predicate binds, if it embeds a literal.
    pub fn param(&self) -> Option<(String, Value)> {
        match self {
            Predicate::Compare {
                attribute,
                operand: Operand::Literal(value),
                ..
            } => Some((attribute.alias(), value.clone())),
            Predicate::Compare { .. } => None,
            Predicate::Contains {
                annotation,
                descendant,
                property,
                value,
            } => Some((
                contains_param(annotation, descendant, property),
                value.clone(),
            )),
            Predicate::Alignment { .. } => None,
        }
    }

    /// Scalar attribute operands, for with/alias bookkeeping.
    pub fn attributes(&self) -> Vec<&Attribute> {
        match self {
            Predicate::Compare {
                attribute, operand, ..
            } => {
                let mut out = vec![attribute];
                if let Operand::Attribute(a) = operand {
                    out.push(a);
                }
                out
            }
            _ => Vec::new(),
        }
    }

    /// Base annotation references this predicate touches, for pattern
    /// generation.
    pub fn annotations(&self) -> Vec<AnnotationRef> {
        match self {
            Predicate::Compare {
                attribute, operand, ..
            } => {
                let mut out = vec![attribute.base_annotation()];
                if let Operand::Attribute(a) = operand {
                    out.push(a.base_annotation());
                }
                out
            }
            Predicate::Contains { annotation, .. } => vec![annotation.base()],
            Predicate::Alignment { first, second, .. } => vec![first.base(), second.base()],
        }
    }

    /// Whether any operand reads a collected-path property.
    pub fn touches_path(&self) -> bool {
        self.attributes()
            .iter()
            .any(|a| a.annotation().has_subquery())
    }
}

fn contains_param(annotation: &AnnotationRef, descendant: &str, property: &str) -> String {
    format!("{}_{}_{}", annotation.alias(), descendant, property)
}
