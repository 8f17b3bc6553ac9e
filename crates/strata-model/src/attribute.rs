//! Scalar properties of annotation references, and aggregates over them.

use std::hash::{Hash, Hasher};

use indexmap::IndexMap;

use crate::annotation::{AnnotationRef, PositionalRef};
use crate::escape::escape_key;
use crate::predicate::{CompareOp, Operand, Predicate, Side};
use crate::value::Value;

/// Properties stored on the type node rather than the token.
pub const TYPE_PROPERTIES: &[&str] = &["label", "transcription"];

pub fn is_type_property(name: &str) -> bool {
    TYPE_PROPERTIES.contains(&name)
}

/// A named scalar property on an annotation reference.
///
/// `duration` is synthesized as `end - begin` everywhere; on collected paths
/// `count`, `rate`, `position` and the temporal boundaries are functions of
/// the whole collection. Unknown names fall through to a generic accessor
/// with no upfront validation; they surface only when the produced text is
/// executed.
#[derive(Debug, Clone)]
pub struct Attribute {
    annotation: AnnotationRef,
    name: String,
    output_label: Option<String>,
}

impl Attribute {
    pub(crate) fn new(annotation: AnnotationRef, name: &str) -> Self {
        Self {
            annotation,
            name: name.to_string(),
            output_label: None,
        }
    }

    pub fn annotation(&self) -> &AnnotationRef {
        &self.annotation
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn output_label(&self) -> Option<&str> {
        self.output_label.as_deref()
    }

    /// Rename this attribute in the final result set.
    pub fn column_name(mut self, label: impl Into<String>) -> Self {
        self.output_label = Some(label.into());
        self
    }

    pub fn alias(&self) -> String {
        format!("{}_{}", self.annotation.alias(), self.name)
    }

    pub fn output_alias(&self) -> String {
        self.output_label
            .clone()
            .unwrap_or_else(|| self.alias())
    }

    /// Whether this attribute resolves against a type alias. On paths,
    /// `count` and `rate` also bind through the collected type nodes.
    pub fn is_type_property(&self) -> bool {
        match &self.annotation {
            AnnotationRef::Path(_) | AnnotationRef::SubPath(_) => {
                is_type_property(&self.name) || self.name == "count" || self.name == "rate"
            }
            _ => is_type_property(&self.name),
        }
    }

    /// The token-level reference backing this attribute.
    pub fn base_annotation(&self) -> AnnotationRef {
        self.annotation.base()
    }

    /// The binding this attribute needs visible before it can be read.
    pub fn with_alias(&self) -> String {
        match &self.annotation {
            AnnotationRef::Node(_) | AnnotationRef::Pause(_) => {
                if is_type_property(&self.name) {
                    self.annotation.type_alias()
                } else {
                    self.annotation.alias()
                }
            }
            _ => {
                let aliases = match self.annotation.path_aliases() {
                    Some(aliases) => aliases,
                    None => return self.annotation.alias(),
                };
                if self.is_type_property() {
                    aliases.path_type
                } else if matches!(self.name.as_str(), "begin" | "end" | "duration") {
                    aliases.times
                } else {
                    aliases.path
                }
            }
        }
    }

    /// Rendered expression for this attribute.
    pub fn for_cypher(&self) -> String {
        match &self.annotation {
            AnnotationRef::Node(_) | AnnotationRef::Pause(_) => self.token_cypher(),
            AnnotationRef::Path(_) | AnnotationRef::SubPath(_) => self.path_cypher(),
            AnnotationRef::Positional(p) => self.positional_cypher(p),
        }
    }

    pub fn aliased_for_cypher(&self) -> String {
        format!("{} AS {}", self.for_cypher(), self.alias())
    }

    pub fn aliased_for_output(&self) -> String {
        format!("{} AS {}", self.for_cypher(), self.output_alias())
    }

    fn token_cypher(&self) -> String {
        let alias = self.annotation.alias();
        if self.name == "duration" {
            return format!("{alias}.end - {alias}.begin");
        }
        if is_type_property(&self.name) {
            format!("{}.{}", self.annotation.type_alias(), escape_key(&self.name))
        } else {
            format!("{}.{}", alias, escape_key(&self.name))
        }
    }

    fn path_cypher(&self) -> String {
        let Some(aliases) = self.annotation.path_aliases() else {
            return self.token_cypher();
        };
        if is_type_property(&self.name) {
            return format!("[n IN {} | n.{}]", aliases.path_type, escape_key(&self.name));
        }
        match self.name.as_str() {
            "count" => format!("size({})", aliases.path_type),
            "rate" => {
                let base = aliases.base_alias;
                format!("size({}) / ({base}.end - {base}.begin)", aliases.path_type)
            }
            "position" if aliases.sub_alias.is_some() => {
                let sub = aliases.sub_alias.unwrap_or_default();
                format!(
                    "size([x IN {} WHERE x.begin < {sub}.begin]) + 1",
                    aliases.path
                )
            }
            "begin" | "end" | "duration" => {
                // collection boundaries shift by one with the anchoring side
                let (beg, end) = if aliases.prefix_anchored { (0, -2) } else { (1, -1) };
                let times = aliases.times;
                match self.name.as_str() {
                    "begin" => format!("{times}[{beg}]"),
                    "end" => format!("{times}[{end}]"),
                    _ => format!("{times}[{end}] - {times}[{beg}]"),
                }
            }
            _ => format!("[n IN {} | n.{}]", aliases.path, escape_key(&self.name)),
        }
    }

    fn positional_cypher(&self, positional: &PositionalRef) -> String {
        let Some(aliases) = self.annotation.path_aliases() else {
            return self.token_cypher();
        };
        let i = positional.index();
        if is_type_property(&self.name) {
            return format!(
                "[n IN {} | n.{}][{i}]",
                aliases.path_type,
                escape_key(&self.name)
            );
        }
        match self.name.as_str() {
            "begin" | "end" | "duration" => {
                let (beg, end) = if i < 0 { (i - 1, i) } else { (i, i + 1) };
                let times = aliases.times;
                match self.name.as_str() {
                    "begin" => format!("{times}[{beg}]"),
                    "end" => format!("{times}[{end}]"),
                    _ => format!("{times}[{end}] - {times}[{beg}]"),
                }
            }
            _ => format!(
                "[n IN {} | n.{}][{i}]",
                aliases.path,
                escape_key(&self.name)
            ),
        }
    }

    /// Structural boundary comparison applies when both sides are `begin` or
    /// both `end` attributes of *different* token references.
    fn alignment_with(&self, operand: &Operand) -> Option<(AnnotationRef, Side)> {
        let Operand::Attribute(other) = operand else {
            return None;
        };
        if self.annotation == other.annotation {
            return None;
        }
        let tokens = matches!(
            self.annotation,
            AnnotationRef::Node(_) | AnnotationRef::Pause(_)
        ) && matches!(
            other.annotation,
            AnnotationRef::Node(_) | AnnotationRef::Pause(_)
        );
        if !tokens {
            return None;
        }
        match (self.name.as_str(), other.name.as_str()) {
            ("begin", "begin") => Some((other.annotation.clone(), Side::Left)),
            ("end", "end") => Some((other.annotation.clone(), Side::Right)),
            _ => None,
        }
    }

    pub fn eq(self, operand: impl Into<Operand>) -> Predicate {
        let operand = operand.into();
        match self.alignment_with(&operand) {
            Some((second, side)) => Predicate::alignment(self.annotation, second, side, false),
            None => Predicate::compare(self, CompareOp::Equal, operand),
        }
    }

    pub fn neq(self, operand: impl Into<Operand>) -> Predicate {
        let operand = operand.into();
        match self.alignment_with(&operand) {
            Some((second, side)) => Predicate::alignment(self.annotation, second, side, true),
            None => Predicate::compare(self, CompareOp::NotEqual, operand),
        }
    }

    pub fn gt(self, operand: impl Into<Operand>) -> Predicate {
        Predicate::compare(self, CompareOp::Gt, operand.into())
    }

    pub fn gte(self, operand: impl Into<Operand>) -> Predicate {
        Predicate::compare(self, CompareOp::Gte, operand.into())
    }

    pub fn lt(self, operand: impl Into<Operand>) -> Predicate {
        Predicate::compare(self, CompareOp::Lt, operand.into())
    }

    pub fn lte(self, operand: impl Into<Operand>) -> Predicate {
        Predicate::compare(self, CompareOp::Lte, operand.into())
    }

    /// Membership in a literal collection.
    pub fn in_<I, V>(self, values: I) -> Predicate
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let list = Value::List(values.into_iter().map(Into::into).collect());
        Predicate::compare(self, CompareOp::In, Operand::Literal(list))
    }

    /// Membership in the values of a previously compiled query's result
    /// rows: this attribute's property is pulled out of each row first.
    pub fn in_rows(self, rows: &[IndexMap<String, Value>]) -> Predicate {
        let list = Value::List(
            rows.iter()
                .filter_map(|row| row.get(&self.name).cloned())
                .collect(),
        );
        Predicate::compare(self, CompareOp::In, Operand::Literal(list))
    }

    /// Pattern match; the pattern is never validated at compile time.
    pub fn regex(self, pattern: impl Into<String>) -> Predicate {
        Predicate::compare(
            self,
            CompareOp::Regex,
            Operand::Literal(Value::String(pattern.into())),
        )
    }
}

impl PartialEq for Attribute {
    /// Identity is reference plus property name; output renaming does not
    /// discriminate.
    fn eq(&self, other: &Self) -> bool {
        self.annotation == other.annotation && self.name == other.name
    }
}

impl Eq for Attribute {}

impl Hash for Attribute {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.annotation.hash(state);
        self.name.hash(state);
    }
}

/// An aggregate function applied to an attribute (or to whole rows), used
/// only by the group/aggregate statement shape. The function name passes
/// through to the output verbatim.
#[derive(Debug, Clone, PartialEq)]
pub struct Aggregate {
    function: String,
    attribute: Option<Attribute>,
    output_label: Option<String>,
}

impl Aggregate {
    pub fn of(function: impl Into<String>, attribute: Attribute) -> Self {
        Self {
            function: function.into(),
            attribute: Some(attribute),
            output_label: None,
        }
    }

    /// Row-counting aggregate with no attribute argument.
    pub fn over_all(function: impl Into<String>) -> Self {
        Self {
            function: function.into(),
            attribute: None,
            output_label: None,
        }
    }

    pub fn column_name(mut self, label: impl Into<String>) -> Self {
        self.output_label = Some(label.into());
        self
    }

    pub fn attribute(&self) -> Option<&Attribute> {
        self.attribute.as_ref()
    }

    pub fn alias(&self) -> String {
        match &self.attribute {
            Some(a) => format!("{}_{}", a.alias(), self.function),
            None => format!("{}_all", self.function),
        }
    }

    pub fn output_alias(&self) -> String {
        self.output_label.clone().unwrap_or_else(|| self.alias())
    }

    pub fn for_cypher(&self) -> String {
        match &self.attribute {
            Some(a) => format!("{}({})", self.function, a.for_cypher()),
            None => format!("{}(*)", self.function),
        }
    }

    pub fn aliased_for_output(&self) -> String {
        format!("{} AS {}", self.for_cypher(), self.output_alias())
    }
}
