//! Side-channel info map carried by a wire error.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Result of [`Fields::upsert`].
#[derive(Debug, Clone, PartialEq)]
pub enum Upsert {
    /// Key was absent and has been inserted.
    Inserted,
    /// Key was present with the same value; nothing changed.
    Unchanged,
    /// Key was present with a different value, which has been replaced.
    Replaced(Value),
}

/// Symbolic-key metadata map of an AMQP error (`info` field).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Fields(BTreeMap<String, Value>);

impl Fields {
    /// Create an empty map
    pub fn new() -> Self {
        Self::default()
    }

    /// Get a raw value
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.0.get(key)
    }

    /// Get a value if it is a string
    pub fn get_str(&self, key: &str) -> Option<&str> {
        self.0.get(key).and_then(Value::as_str)
    }

    /// Check if a key is present
    pub fn contains_key(&self, key: &str) -> bool {
        self.0.contains_key(key)
    }

    /// Number of entries
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Check if the map is empty
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Insert only when the key is absent. Returns `true` if inserted.
    ///
    /// Values carried from an upstream hop are never overwritten.
    pub fn insert_if_absent(&mut self, key: &str, value: impl Into<Value>) -> bool {
        if self.0.contains_key(key) {
            return false;
        }
        self.0.insert(key.to_string(), value.into());
        true
    }

    /// Insert-or-verify-equal. Never fails on an existing key.
    pub fn upsert(&mut self, key: &str, value: impl Into<Value>) -> Upsert {
        let value = value.into();
        match self.0.get_mut(key) {
            Some(current) if *current == value => Upsert::Unchanged,
            Some(current) => Upsert::Replaced(std::mem::replace(current, value)),
            None => {
                self.0.insert(key.to_string(), value);
                Upsert::Inserted
            }
        }
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for Fields {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        Self(
            iter.into_iter()
                .map(|(k, v)| (k.into(), v.into()))
                .collect(),
        )
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_upsert_is_idempotent() {
        let mut fields = Fields::new();
        assert_eq!(fields.upsert("k", "v"), Upsert::Inserted);
        assert_eq!(fields.upsert("k", "v"), Upsert::Unchanged);
        assert_eq!(fields.len(), 1);
        assert_eq!(fields.get_str("k"), Some("v"));
    }

    #[test]
    fn test_upsert_replaces_differing_value() {
        let mut fields = Fields::new();
        fields.upsert("k", "old");
        assert_eq!(fields.upsert("k", "new"), Upsert::Replaced(json!("old")));
        assert_eq!(fields.get_str("k"), Some("new"));
    }

    #[test]
    fn test_insert_if_absent_keeps_existing() {
        let mut fields = Fields::new();
        assert!(fields.insert_if_absent("trace", "upstream"));
        assert!(!fields.insert_if_absent("trace", "local"));
        assert_eq!(fields.get_str("trace"), Some("upstream"));
    }

    #[test]
    fn test_get_str_ignores_non_strings() {
        let fields: Fields = [("n", json!(42))].into_iter().collect();
        assert!(fields.contains_key("n"));
        assert_eq!(fields.get_str("n"), None);
        assert_eq!(fields.get("n"), Some(&json!(42)));
    }
}
