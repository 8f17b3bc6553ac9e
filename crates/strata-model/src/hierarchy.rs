//! Containment hierarchy of annotation levels.

use indexmap::IndexMap;

/// Child-type to parent-type mapping describing how annotation levels nest
/// (phone inside word inside utterance, for example).
///
/// The hierarchy is owned by the corpus and read-only during compilation;
/// the compiler receives it as an explicit parameter, never as ambient state.
#[derive(Debug, Clone, Default)]
pub struct Hierarchy {
    parents: IndexMap<String, String>,
}

impl Hierarchy {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declare `child` as directly contained by `parent`.
    pub fn contain(mut self, child: impl Into<String>, parent: impl Into<String>) -> Self {
        self.parents.insert(child.into(), parent.into());
        self
    }

    /// The immediate parent level of `ty`, if any.
    pub fn parent(&self, ty: &str) -> Option<&str> {
        self.parents.get(ty).map(String::as_str)
    }

    /// Climb from `child` to the nearest ancestor present in `referenced`,
    /// skipping levels the query does not touch. `None` when the chain runs
    /// out before reaching a referenced level.
    pub fn walk_to_ancestor<'a>(&'a self, child: &str, referenced: &[&str]) -> Option<&'a str> {
        let mut current = self.parent(child)?;
        loop {
            if referenced.contains(&current) {
                return Some(current);
            }
            current = self.parent(current)?;
        }
    }
}
