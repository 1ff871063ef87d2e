//! Flat string-to-string field maps exchanged with the banks.
//!
//! Nested wire elements are expressed with dotted keys (`Extra.ORDERSTATUS`).
//! Insertion order is preserved so encoded requests keep the field order the
//! mapper produced.

use indexmap::IndexMap;

use crate::core::{PosError, Result};

pub type FieldMap = IndexMap<String, String>;

/// Convenience accessors shared by mappers, crypts and gateways
pub trait FieldMapExt {
    /// Value of `key`, treating empty strings as absent
    fn value(&self, key: &str) -> Option<&str>;

    /// Value of `key`, failing with `MissingField` when absent
    fn require(&self, key: &str) -> Result<&str>;

    /// Value of `key`, or an empty string
    fn value_or_empty(&self, key: &str) -> &str;

    /// Case-insensitive lookup, used for hash fields banks send in varying case
    fn value_ignore_case(&self, key: &str) -> Option<&str>;

    /// Insert only when a value is present
    fn insert_opt(&mut self, key: &str, value: Option<impl Into<String>>);
}

impl FieldMapExt for FieldMap {
    fn value(&self, key: &str) -> Option<&str> {
        self.get(key).map(String::as_str).filter(|v| !v.is_empty())
    }

    fn require(&self, key: &str) -> Result<&str> {
        self.value(key).ok_or_else(|| PosError::missing_field(key))
    }

    fn value_or_empty(&self, key: &str) -> &str {
        self.get(key).map(String::as_str).unwrap_or_default()
    }

    fn value_ignore_case(&self, key: &str) -> Option<&str> {
        self.iter()
            .find(|(k, _)| k.eq_ignore_ascii_case(key))
            .map(|(_, v)| v.as_str())
    }

    fn insert_opt(&mut self, key: &str, value: Option<impl Into<String>>) {
        if let Some(value) = value {
            self.insert(key.to_string(), value.into());
        }
    }
}

/// Builds a field map from literal pairs, keeping their order
pub fn field_map<K, V, I>(pairs: I) -> FieldMap
where
    K: Into<String>,
    V: Into<String>,
    I: IntoIterator<Item = (K, V)>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}
