//! Ordered attribute maps with case-insensitive keys.
//!
//! Statement column order follows insertion order. Keys that differ only by
//! case collapse onto one entry; the first spelling and position win and
//! later inserts replace the value.
//!
//! ```rust
//! use quill_query::AttributeMap;
//!
//! let attrs = AttributeMap::new()
//!     .with("Name", "John")
//!     .with("last_name", "Doe")
//!     .with("NAME", "Jack");
//!
//! assert_eq!(attrs.len(), 2);
//! assert_eq!(attrs.keys().collect::<Vec<_>>(), vec!["Name", "last_name"]);
//! assert_eq!(attrs.get("name"), Some(&"Jack".into()));
//! ```

use indexmap::IndexMap;
use smol_str::SmolStr;

use crate::value::Value;

/// An insertion-ordered attribute map whose key lookups ignore case.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AttributeMap {
    entries: IndexMap<SmolStr, (String, Value)>,
}

fn fold(key: &str) -> SmolStr {
    SmolStr::new(key.to_lowercase())
}

impl AttributeMap {
    /// Create an empty map.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insert.
    pub fn with(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(key, value);
        self
    }

    /// Insert a value, returning the previous value for the same folded key.
    pub fn insert(&mut self, key: impl Into<String>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        match self.entries.get_mut(&fold(&key)) {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                self.entries.insert(fold(&key), (key, value));
                None
            }
        }
    }

    /// Look up a value ignoring case.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.entries.get(&fold(key)).map(|(_, v)| v)
    }

    /// Check whether a key is present, ignoring case.
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(&fold(key))
    }

    /// Remove a key, keeping the order of the remaining entries.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        self.entries.shift_remove(&fold(key)).map(|(_, v)| v)
    }

    /// A copy of this map without the given key.
    pub fn without(&self, key: &str) -> Self {
        let mut copy = self.clone();
        copy.remove(key);
        copy
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Check if the map is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Keys in insertion order, with their original spelling.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(|(k, _)| k.as_str())
    }

    /// Values in insertion order.
    pub fn values(&self) -> impl Iterator<Item = &Value> {
        self.entries.values().map(|(_, v)| v)
    }

    /// Entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.values().map(|(k, v)| (k.as_str(), v))
    }
}

impl<K: Into<String>, V: Into<Value>> FromIterator<(K, V)> for AttributeMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (k, v) in iter {
            map.insert(k, v);
        }
        map
    }
}
