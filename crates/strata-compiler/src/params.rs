//! Parameter extraction from predicate literals.

use indexmap::IndexMap;

use strata_model::Value;

use crate::query::Query;

/// Literal operands keyed by their owning attribute's alias, so the shape
/// of the compiled text is reusable across different literal values.
/// Attribute-valued and alignment predicates contribute nothing; a later
/// literal on the same attribute overwrites the earlier slot.
pub(crate) fn generate(query: &Query) -> IndexMap<String, Value> {
    let mut params = IndexMap::new();
    for predicate in &query.filters {
        if let Some((key, value)) = predicate.param() {
            params.insert(key, value);
        }
    }
    params
}
