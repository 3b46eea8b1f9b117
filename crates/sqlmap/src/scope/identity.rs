use crate::stmt::Value;

use std::collections::HashMap;

/// Objects already assembled in this request, by result map and group key.
///
/// A later row with the same group key appends its nested elements to the
/// remembered object instead of producing a new one.
#[derive(Debug, Default)]
pub struct IdentityTracker {
    tables: HashMap<String, HashMap<String, Value>>,
}

impl IdentityTracker {
    pub fn new() -> IdentityTracker {
        IdentityTracker::default()
    }

    pub fn get(&self, result_map: &str, key: &str) -> Option<&Value> {
        self.tables.get(result_map)?.get(key)
    }

    /// Remembers `object`. The table for `result_map` is created on first use.
    pub fn insert(&mut self, result_map: &str, key: String, object: Value) {
        self.tables
            .entry(result_map.to_string())
            .or_default()
            .insert(key, object);
    }

    /// Number of remembered objects for `result_map`.
    pub fn len(&self, result_map: &str) -> usize {
        self.tables.get(result_map).map_or(0, HashMap::len)
    }

    pub fn is_empty(&self) -> bool {
        self.tables.values().all(HashMap::is_empty)
    }

    pub fn has_table(&self, result_map: &str) -> bool {
        self.tables.contains_key(result_map)
    }

    pub fn clear(&mut self) {
        self.tables.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tables_are_created_lazily() {
        let mut identity = IdentityTracker::new();
        assert!(!identity.has_table("OrderMap"));
        assert!(identity.is_empty());

        identity.insert("OrderMap", "1-".into(), Value::I32(1));
        assert!(identity.has_table("OrderMap"));
        assert_eq!(identity.get("OrderMap", "1-"), Some(&Value::I32(1)));
        assert_eq!(identity.get("LineMap", "1-"), None);
        assert_eq!(identity.len("OrderMap"), 1);
    }

    #[test]
    fn clear_drops_every_table() {
        let mut identity = IdentityTracker::new();
        identity.insert("OrderMap", "1-".into(), Value::I32(1));
        identity.clear();
        assert!(identity.is_empty());
        assert!(!identity.has_table("OrderMap"));
    }
}
