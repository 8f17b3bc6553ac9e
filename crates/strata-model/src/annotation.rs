//! Typed references to annotation instances.
//!
//! A reference identifies one annotation relative to a position-0 anchor:
//! `pos < 0` means "previous by |pos|", `pos > 0` "following by pos". Node
//! and pause references name single tokens. The path family (pause spans,
//! contained sub-sequences, positional elements) names collected sequences,
//! which need a preparatory subquery before any property can be read.
//!
//! Alias derivation is a pure function of `(type, pos, prefix)`: two
//! independently constructed references with equal identity always render
//! the identical alias. Corpus scoping and declared sub-types never
//! discriminate identity.

use std::hash::{Hash, Hasher};

use crate::ModelError;
use crate::attribute::Attribute;
use crate::predicate::{Predicate, Side};

fn pos_prefix(pos: i32) -> String {
    if pos < 0 {
        format!("prev_{}_", -pos)
    } else if pos > 0 {
        format!("foll_{}_", pos)
    } else {
        String::new()
    }
}

fn token_alias(ty: &str, pos: i32) -> String {
    format!("{}node_{}", pos_prefix(pos), ty)
}

fn type_alias(ty: &str, pos: i32) -> String {
    format!("type_{}node_{}", pos_prefix(pos), ty)
}

/// Fixed offset table for positional names on collected paths.
fn positional_index(name: &str) -> Option<i32> {
    match name {
        "initial" => Some(0),
        "final" => Some(-1),
        "penultimate" => Some(-2),
        "antepenultimate" => Some(-3),
        _ => None,
    }
}

/// Reference to an ordinary speech token of a given type.
#[derive(Debug, Clone)]
pub struct NodeRef {
    ty: String,
    pos: i32,
    corpus: Option<String>,
    contains: Vec<String>,
}

impl NodeRef {
    pub fn new(ty: impl Into<String>) -> Self {
        Self::at(ty, 0)
    }

    pub fn at(ty: impl Into<String>, pos: i32) -> Self {
        Self {
            ty: ty.into(),
            pos,
            corpus: None,
            contains: Vec::new(),
        }
    }

    /// Scope defining occurrences to a corpus label.
    pub fn scoped(mut self, corpus: impl Into<String>) -> Self {
        self.corpus = Some(corpus.into());
        self
    }

    /// Declare the sub-types this reference can materialize as contained
    /// sub-sequences.
    pub fn containing<I, S>(mut self, subs: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.contains.extend(subs.into_iter().map(Into::into));
        self
    }

    pub fn ty(&self) -> &str {
        &self.ty
    }

    pub fn pos(&self) -> i32 {
        self.pos
    }

    pub fn corpus(&self) -> Option<&str> {
        self.corpus.as_deref()
    }

    pub fn alias(&self) -> String {
        token_alias(&self.ty, self.pos)
    }

    pub fn type_alias(&self) -> String {
        type_alias(&self.ty, self.pos)
    }

    /// Defining occurrence: alias plus node labels.
    pub fn define_alias(&self) -> String {
        let mut s = format!("{}:{}:speech", self.alias(), self.ty);
        if let Some(corpus) = &self.corpus {
            s.push(':');
            s.push_str(corpus);
        }
        s
    }

    pub fn define_type_alias(&self) -> String {
        format!("{}:{}_type", self.type_alias(), self.ty)
    }

    /// The reference one position earlier. Never mutates in place.
    pub fn previous(&self) -> NodeRef {
        let mut r = self.clone();
        r.pos -= 1;
        r
    }

    /// The reference one position later. Never mutates in place.
    pub fn following(&self) -> NodeRef {
        let mut r = self.clone();
        r.pos += 1;
        r
    }

    /// The silence token at the same relative position.
    pub fn pause(&self) -> PauseRef {
        PauseRef {
            host_ty: self.ty.clone(),
            pos: self.pos,
            corpus: self.corpus.clone(),
        }
    }

    /// The collected pause span on this reference's side of the anchor.
    pub fn pause_span(&self) -> PathRef {
        PathRef {
            host_ty: self.ty.clone(),
            pos: if self.pos == 0 { 1 } else { self.pos },
            corpus: self.corpus.clone(),
        }
    }

    /// The contained sub-sequence of `sub` tokens along this unit's span.
    pub fn subpath(&self, sub: impl Into<String>) -> SubPathRef {
        let mut inner = NodeRef::at(sub, self.pos);
        inner.corpus = self.corpus.clone();
        SubPathRef {
            parent: self.clone(),
            sub: inner,
        }
    }

    /// A plain scalar attribute on this reference, no dispatch.
    pub fn attribute(&self, name: &str) -> Attribute {
        AnnotationRef::from(self.clone()).attribute(name)
    }
}

impl PartialEq for NodeRef {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && self.pos == other.pos
    }
}

impl Eq for NodeRef {}

impl Hash for NodeRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.ty.hash(state);
        self.pos.hash(state);
    }
}

/// Reference to a silence token. Adjacency to the anchor uses the
/// pause-adjacency edge kind rather than ordinary speech adjacency.
#[derive(Debug, Clone)]
pub struct PauseRef {
    host_ty: String,
    pos: i32,
    corpus: Option<String>,
}

impl PauseRef {
    pub fn host(&self) -> &str {
        &self.host_ty
    }

    pub fn pos(&self) -> i32 {
        self.pos
    }

    pub fn corpus(&self) -> Option<&str> {
        self.corpus.as_deref()
    }

    pub fn alias(&self) -> String {
        token_alias("pause", self.pos)
    }

    pub fn type_alias(&self) -> String {
        type_alias("pause", self.pos)
    }

    pub fn define_alias(&self) -> String {
        let mut s = format!("{}:{}:pause", self.alias(), self.host_ty);
        if let Some(corpus) = &self.corpus {
            s.push(':');
            s.push_str(corpus);
        }
        s
    }

    pub fn define_type_alias(&self) -> String {
        format!("{}:{}_type", self.type_alias(), self.host_ty)
    }

    pub fn previous(&self) -> PauseRef {
        let mut r = self.clone();
        r.pos -= 1;
        r
    }

    pub fn following(&self) -> PauseRef {
        let mut r = self.clone();
        r.pos += 1;
        r
    }
}

impl PartialEq for PauseRef {
    fn eq(&self, other: &Self) -> bool {
        self.host_ty == other.host_ty && self.pos == other.pos
    }
}

impl Eq for PauseRef {}

impl Hash for PauseRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host_ty.hash(state);
        self.pos.hash(state);
    }
}

/// Collected pause span between the anchor and its speech neighbour.
///
/// `pos > 0` is the span separating speech positions `pos - 1` and `pos`;
/// `pos < 0` the span separating `pos` and `pos + 1`.
#[derive(Debug, Clone)]
pub struct PathRef {
    host_ty: String,
    pos: i32,
    corpus: Option<String>,
}

impl PathRef {
    pub fn host(&self) -> &str {
        &self.host_ty
    }

    pub fn pos(&self) -> i32 {
        self.pos
    }

    /// Base alias the span's derived aliases build on.
    pub fn alias(&self) -> String {
        token_alias("pause", self.pos)
    }

    pub fn path_alias(&self) -> String {
        format!("path_{}", self.alias())
    }

    pub fn path_type_alias(&self) -> String {
        format!("type_path_{}", self.alias())
    }

    pub fn times_alias(&self) -> String {
        format!("{}_times", self.path_alias())
    }

    /// Whether the span is anchored on the prefix side (`pos >= 0`).
    pub fn prefix_anchored(&self) -> bool {
        self.pos >= 0
    }

    /// Speech endpoints of the pause-adjacency chain, in temporal order.
    pub fn endpoints(&self) -> (NodeRef, NodeRef) {
        let (from_pos, to_pos) = if self.pos > 0 {
            (self.pos - 1, self.pos)
        } else {
            (self.pos, self.pos + 1)
        };
        let mut from = NodeRef::at(&self.host_ty, from_pos);
        from.corpus = self.corpus.clone();
        let mut to = NodeRef::at(&self.host_ty, to_pos);
        to.corpus = self.corpus.clone();
        (from, to)
    }

    /// The position-0 token reference that owns this span.
    pub fn anchor(&self) -> NodeRef {
        let mut anchor = NodeRef::at(&self.host_ty, 0);
        anchor.corpus = self.corpus.clone();
        anchor
    }
}

impl PartialEq for PathRef {
    fn eq(&self, other: &Self) -> bool {
        self.host_ty == other.host_ty && self.pos == other.pos
    }
}

impl Eq for PathRef {}

impl Hash for PathRef {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.host_ty.hash(state);
        self.pos.hash(state);
    }
}

/// Ordered sequence of `sub`-type tokens contained in `parent`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct SubPathRef {
    parent: NodeRef,
    sub: NodeRef,
}

impl SubPathRef {
    pub fn parent(&self) -> &NodeRef {
        &self.parent
    }

    pub fn sub(&self) -> &NodeRef {
        &self.sub
    }

    /// Attribute aliases ride on the sub token's alias.
    pub fn alias(&self) -> String {
        self.sub.alias()
    }

    pub fn path_alias(&self) -> String {
        format!("{}_in_{}", self.sub.alias(), self.parent.alias())
    }

    pub fn path_type_alias(&self) -> String {
        format!("type_{}", self.path_alias())
    }

    pub fn times_alias(&self) -> String {
        format!("{}_times", self.path_alias())
    }

    /// Anchoring side follows the parent unit's position.
    pub fn prefix_anchored(&self) -> bool {
        self.parent.pos() >= 0
    }
}

/// One element of a collected sequence, addressed by signed offset.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct PositionalRef {
    path: Box<AnnotationRef>,
    index: i32,
}

impl PositionalRef {
    pub fn path(&self) -> &AnnotationRef {
        &self.path
    }

    pub fn index(&self) -> i32 {
        self.index
    }
}

/// A typed handle to one annotation instance (or collected sequence of
/// instances) relative to the query's position-0 anchor.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum AnnotationRef {
    Node(NodeRef),
    Pause(PauseRef),
    Path(PathRef),
    SubPath(SubPathRef),
    Positional(PositionalRef),
}

/// Result of name-based property resolution on a reference.
#[derive(Debug, Clone)]
pub enum Resolved {
    Annotation(AnnotationRef),
    Attribute(Attribute),
}

/// Collected-sequence aliases shared by the path family.
pub(crate) struct PathAliases {
    pub(crate) path: String,
    pub(crate) path_type: String,
    pub(crate) times: String,
    pub(crate) prefix_anchored: bool,
    pub(crate) sub_alias: Option<String>,
    pub(crate) base_alias: String,
}

impl AnnotationRef {
    /// Level key this reference belongs to: its type name, or `pause`.
    pub fn key(&self) -> &str {
        match self {
            AnnotationRef::Node(n) => n.ty(),
            AnnotationRef::Pause(_) | AnnotationRef::Path(_) => "pause",
            AnnotationRef::SubPath(s) => s.sub().ty(),
            AnnotationRef::Positional(p) => p.path().key(),
        }
    }

    pub fn pos(&self) -> i32 {
        match self {
            AnnotationRef::Node(n) => n.pos(),
            AnnotationRef::Pause(p) => p.pos(),
            AnnotationRef::Path(p) => p.pos(),
            AnnotationRef::SubPath(s) => s.parent().pos(),
            AnnotationRef::Positional(p) => p.path().pos(),
        }
    }

    pub fn alias(&self) -> String {
        match self {
            AnnotationRef::Node(n) => n.alias(),
            AnnotationRef::Pause(p) => p.alias(),
            AnnotationRef::Path(p) => p.alias(),
            AnnotationRef::SubPath(s) => s.alias(),
            AnnotationRef::Positional(p) => p.path().alias(),
        }
    }

    pub fn type_alias(&self) -> String {
        match self {
            AnnotationRef::Node(n) => n.type_alias(),
            AnnotationRef::Pause(p) => p.type_alias(),
            AnnotationRef::Path(p) => p.path_type_alias(),
            AnnotationRef::SubPath(s) => s.path_type_alias(),
            AnnotationRef::Positional(p) => p.path().type_alias(),
        }
    }

    /// Whether reading a property requires a preparatory subquery.
    pub fn has_subquery(&self) -> bool {
        matches!(
            self,
            AnnotationRef::Path(_) | AnnotationRef::SubPath(_) | AnnotationRef::Positional(_)
        )
    }

    /// The token-level reference backing this one for pattern generation.
    pub fn base(&self) -> AnnotationRef {
        match self {
            AnnotationRef::Node(_) | AnnotationRef::Pause(_) => self.clone(),
            AnnotationRef::Path(p) => AnnotationRef::Node(p.anchor()),
            AnnotationRef::SubPath(s) => AnnotationRef::Node(s.parent().clone()),
            AnnotationRef::Positional(p) => p.path().base(),
        }
    }

    /// The parent reference this one is attached to. Top-level references
    /// (node, pause, pause span) have none; asking is a contract violation.
    pub fn annotation(&self) -> Result<AnnotationRef, ModelError> {
        match self {
            AnnotationRef::SubPath(s) => Ok(AnnotationRef::Node(s.parent().clone())),
            AnnotationRef::Positional(p) => Ok(p.path().clone()),
            _ => Err(ModelError::TopLevelAnnotation),
        }
    }

    /// Resolve a property name against the finite derived-name table before
    /// falling back to a plain scalar attribute.
    pub fn property(&self, name: &str) -> Resolved {
        match self {
            AnnotationRef::Node(node) => match name {
                "previous" => Resolved::Annotation(AnnotationRef::Node(node.previous())),
                "following" => Resolved::Annotation(AnnotationRef::Node(node.following())),
                "pause" => Resolved::Annotation(AnnotationRef::Pause(node.pause())),
                sub if node.contains.iter().any(|c| c == sub) => {
                    Resolved::Annotation(AnnotationRef::SubPath(node.subpath(sub)))
                }
                _ => Resolved::Attribute(self.attribute(name)),
            },
            AnnotationRef::Pause(p) => match name {
                "previous" => Resolved::Annotation(AnnotationRef::Pause(p.previous())),
                "following" => Resolved::Annotation(AnnotationRef::Pause(p.following())),
                _ => Resolved::Attribute(self.attribute(name)),
            },
            AnnotationRef::Path(_) | AnnotationRef::SubPath(_) => match positional_index(name) {
                Some(index) => Resolved::Annotation(AnnotationRef::Positional(PositionalRef {
                    path: Box::new(self.clone()),
                    index,
                })),
                None => Resolved::Attribute(self.attribute(name)),
            },
            AnnotationRef::Positional(_) => Resolved::Attribute(self.attribute(name)),
        }
    }

    /// A plain scalar attribute on this reference, no dispatch.
    pub fn attribute(&self, name: &str) -> Attribute {
        Attribute::new(self.clone(), name)
    }

    /// No node of this reference's type lies between its end and `other`'s
    /// start.
    pub fn right_aligned(&self, other: &AnnotationRef) -> Predicate {
        Predicate::alignment(self.clone(), other.clone(), Side::Right, false)
    }

    /// No node of this reference's type lies between `other`'s start and
    /// this reference's begin.
    pub fn left_aligned(&self, other: &AnnotationRef) -> Predicate {
        Predicate::alignment(self.clone(), other.clone(), Side::Left, false)
    }

    pub(crate) fn path_aliases(&self) -> Option<PathAliases> {
        match self {
            AnnotationRef::Path(p) => Some(PathAliases {
                path: p.path_alias(),
                path_type: p.path_type_alias(),
                times: p.times_alias(),
                prefix_anchored: p.prefix_anchored(),
                sub_alias: None,
                base_alias: p.anchor().alias(),
            }),
            AnnotationRef::SubPath(s) => Some(PathAliases {
                path: s.path_alias(),
                path_type: s.path_type_alias(),
                times: s.times_alias(),
                prefix_anchored: s.prefix_anchored(),
                sub_alias: Some(s.sub().alias()),
                base_alias: s.parent().alias(),
            }),
            AnnotationRef::Positional(p) => p.path().path_aliases(),
            _ => None,
        }
    }
}

impl From<NodeRef> for AnnotationRef {
    fn from(r: NodeRef) -> Self {
        AnnotationRef::Node(r)
    }
}

impl From<PauseRef> for AnnotationRef {
    fn from(r: PauseRef) -> Self {
        AnnotationRef::Pause(r)
    }
}

impl From<PathRef> for AnnotationRef {
    fn from(r: PathRef) -> Self {
        AnnotationRef::Path(r)
    }
}

impl From<SubPathRef> for AnnotationRef {
    fn from(r: SubPathRef) -> Self {
        AnnotationRef::SubPath(r)
    }
}

impl From<PositionalRef> for AnnotationRef {
    fn from(r: PositionalRef) -> Self {
        AnnotationRef::Positional(r)
    }
}
