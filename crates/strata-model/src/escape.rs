//! Escaping of property keys for query text.

use std::borrow::Cow;

/// Quote a property key with backticks when it is not a plain identifier.
pub fn escape_key(key: &str) -> Cow<'_, str> {
    let plain = !key.is_empty()
        && !key.starts_with(|c: char| c.is_ascii_digit())
        && key.chars().all(|c| c.is_ascii_alphanumeric() || c == '_');
    if plain {
        Cow::Borrowed(key)
    } else {
        Cow::Owned(format!("`{key}`"))
    }
}
