//! Auxiliary key/value bag.
//!
//! Independent of object resolution: host code can park arbitrary values
//! here and read them back anywhere the container is reachable.

use std::collections::BTreeMap;

use dashmap::DashMap;
use serde_json::Value;
use tracing::trace;

/// Shared string-keyed value store. Last write wins.
///
/// # Examples
/// ```
/// use sijill_container::store::ConfigStore;
///
/// let store = ConfigStore::new();
/// store.set_config("site.name", "example");
/// assert_eq!(store.get_config("site.name").unwrap(), "example");
/// ```
#[derive(Debug, Default)]
pub struct ConfigStore {
    entries: DashMap<String, Value>,
}

impl ConfigStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get_config(&self, key: &str) -> Option<Value> {
        self.entries.get(key).map(|entry| entry.value().clone())
    }

    /// Stores `value` under `key`, returning the value it replaced.
    pub fn set_config(&self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        trace!(key = %key, "Config value set");
        self.entries.insert(key, value.into())
    }

    /// Dumps every entry, ordered by key.
    pub fn config_to_array(&self) -> BTreeMap<String, Value> {
        self.entries
            .iter()
            .map(|entry| (entry.key().clone(), entry.value().clone()))
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn last_write_wins() {
        let store = ConfigStore::new();
        assert_eq!(store.set_config("k", 1), None);
        assert_eq!(store.set_config("k", 2), Some(json!(1)));
        assert_eq!(store.get_config("k"), Some(json!(2)));
    }

    #[test]
    fn missing_key_is_none() {
        assert_eq!(ConfigStore::new().get_config("nope"), None);
    }

    #[test]
    fn dump_is_sorted() {
        let store = ConfigStore::new();
        store.set_config("b", true);
        store.set_config("a", json!({"nested": [1, 2]}));

        let dump = store.config_to_array();
        let keys: Vec<&String> = dump.keys().collect();
        assert_eq!(keys, vec!["a", "b"]);
        assert_eq!(dump["a"]["nested"][1], json!(2));
        assert_eq!(store.len(), 2);
    }
}
