//! Insertion-ordered string-keyed mapping.

use indexmap::IndexMap;

use super::Value;

/// Object contents: string keys in insertion order, each key at most once.
///
/// Re-inserting an existing key replaces its value in place and keeps its
/// original position; removing a key keeps the order of the rest.
#[derive(Clone, Default)]
pub struct Map {
    entries: IndexMap<String, Value>,
}

impl Map {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            entries: IndexMap::with_capacity(capacity),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(key)
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Inserts `value` under `key`, returning the value it replaced.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) -> Option<Value> {
        self.entries.insert(key.into(), value)
    }

    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(key)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries
            .iter()
            .map(|(key, value)| (key.as_str(), value))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }
}

impl<K: Into<String>> FromIterator<(K, Value)> for Map {
    fn from_iter<I: IntoIterator<Item = (K, Value)>>(iter: I) -> Self {
        Self {
            entries: iter
                .into_iter()
                .map(|(key, value)| (key.into(), value))
                .collect(),
        }
    }
}

impl IntoIterator for Map {
    type Item = (String, Value);
    type IntoIter = indexmap::map::IntoIter<String, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn reinsert_keeps_position() {
        let mut map = Map::new();
        map.insert("a", Value::from(1));
        map.insert("b", Value::from(2));
        let previous = map.insert("a", Value::from(3));

        assert_eq!(previous.and_then(|v| v.as_i64()), Some(1));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(map.get("a").and_then(Value::as_i64), Some(3));
    }

    #[test]
    fn remove_keeps_remaining_order() {
        let mut map: Map = [("a", Value::from(1)), ("b", Value::from(2)), ("c", Value::from(3))]
            .into_iter()
            .collect();
        assert!(map.remove("a").is_some());
        assert!(!map.contains_key("a"));
        assert_eq!(map.keys().collect::<Vec<_>>(), ["b", "c"]);
    }

    #[test]
    fn collecting_duplicate_keys_keeps_first_position_and_last_value() {
        let map: Map = [("a", Value::from(1)), ("b", Value::from(2)), ("a", Value::from(3))]
            .into_iter()
            .collect();
        assert_eq!(map.keys().collect::<Vec<_>>(), ["a", "b"]);
        assert_eq!(map.get("a").and_then(Value::as_i64), Some(3));
    }

    #[test]
    fn wide_objects_keep_every_key_in_order() {
        let map: Map = (0..50_000)
            .map(|id| (format!("entity-{id}"), Value::from(id)))
            .collect();

        assert_eq!(map.len(), 50_000);
        assert_eq!(map.keys().next(), Some("entity-0"));
        assert_eq!(map.keys().last(), Some("entity-49999"));
        assert_eq!(map.get("entity-31337").and_then(Value::as_i64), Some(31_337));
    }
}
