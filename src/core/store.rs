//! Ordered string-to-string property store
//!
//! `PropertyStore` wraps an insertion-ordered map and owns the active array
//! delimiter. Prefix grouping, array encoding, delimiter management and
//! persistence are implemented on it in their own modules.

use crate::delimiter::Delimiter;
use crate::error::Result;
use indexmap::IndexMap;
use parking_lot::RwLock;
use std::sync::Arc;
use tracing::debug;

/// A store shared between threads behind one lock for the whole instance
pub type SharedPropertyStore = Arc<RwLock<PropertyStore>>;

/// Ordered property map with a per-instance array delimiter
///
/// # Examples
///
/// ```
/// use extended_properties::PropertyStore;
///
/// let mut props = PropertyStore::new();
/// props.set("connection1.host", "localhost");
/// props.set("connection1.port", "1521");
///
/// assert_eq!(props.get("connection1.port"), Some("1521"));
/// assert_eq!(props.len(), 2);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyStore {
    pub(crate) entries: IndexMap<String, String>,
    pub(crate) delimiter: Delimiter,
}

impl PropertyStore {
    /// Create an empty store using the default `%` delimiter
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty store using a custom delimiter
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `delimiter` is reserved.
    pub fn with_delimiter(delimiter: char) -> Result<Self> {
        Ok(PropertyStore {
            entries: IndexMap::new(),
            delimiter: Delimiter::new(delimiter)?,
        })
    }

    /// Create an empty store sharing this store's delimiter
    pub(crate) fn empty_like(&self) -> Self {
        PropertyStore {
            entries: IndexMap::new(),
            delimiter: self.delimiter,
        }
    }

    /// Get the value stored under `key`
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Store `value` under `key`, returning the previous value
    pub fn set(&mut self, key: impl Into<String>, value: impl Into<String>) -> Option<String> {
        self.entries.insert(key.into(), value.into())
    }

    /// Remove `key`, returning its value
    ///
    /// The relative order of the remaining entries is preserved.
    pub fn remove(&mut self, key: &str) -> Option<String> {
        self.entries.shift_remove(key)
    }

    /// Check whether `key` is stored
    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.contains_key(key)
    }

    /// Number of stored entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Remove every entry. The delimiter is kept.
    pub fn clear(&mut self) {
        debug!("Clearing {} properties", self.entries.len());
        self.entries.clear();
    }

    /// Iterate over keys in insertion order
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Iterate over values in insertion order
    pub fn values(&self) -> impl Iterator<Item = &str> {
        self.entries.values().map(String::as_str)
    }

    /// Iterate over entries in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Snapshot of every key, in insertion order
    pub fn property_names(&self) -> Vec<String> {
        self.entries.keys().cloned().collect()
    }

    /// Borrow the underlying ordered map
    pub fn as_map(&self) -> &IndexMap<String, String> {
        &self.entries
    }

    /// Consume the store, returning the underlying ordered map
    pub fn into_map(self) -> IndexMap<String, String> {
        self.entries
    }

    /// Wrap the store in a single shared lock
    ///
    /// Every operation holds the lock for its full duration, which keeps
    /// multi-entry operations such as [`PropertyStore::set_delimiter`] atomic
    /// for other threads.
    pub fn into_shared(self) -> SharedPropertyStore {
        Arc::new(RwLock::new(self))
    }
}

impl From<IndexMap<String, String>> for PropertyStore {
    fn from(entries: IndexMap<String, String>) -> Self {
        PropertyStore {
            entries,
            delimiter: Delimiter::default(),
        }
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for PropertyStore {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut store = PropertyStore::new();
        store.extend(iter);
        store
    }
}

impl<K: Into<String>, V: Into<String>> Extend<(K, V)> for PropertyStore {
    fn extend<I: IntoIterator<Item = (K, V)>>(&mut self, iter: I) {
        for (key, value) in iter {
            self.entries.insert(key.into(), value.into());
        }
    }
}

impl<'a> IntoIterator for &'a PropertyStore {
    type Item = (&'a String, &'a String);
    type IntoIter = indexmap::map::Iter<'a, String, String>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_returns_previous_value() {
        let mut props = PropertyStore::new();

        assert_eq!(props.set("host", "localhost"), None);
        assert_eq!(
            props.set("host", "10.10.10.1"),
            Some("localhost".to_string())
        );
        assert_eq!(props.get("host"), Some("10.10.10.1"));
    }

    #[test]
    fn test_remove_preserves_order() {
        let mut props: PropertyStore = [("a", "1"), ("b", "2"), ("c", "3")]
            .into_iter()
            .collect();

        assert_eq!(props.remove("b"), Some("2".to_string()));
        assert_eq!(props.remove("missing"), None);

        let keys: Vec<&str> = props.keys().collect();
        assert_eq!(keys, vec!["a", "c"]);
    }

    #[test]
    fn test_with_delimiter_validates() -> Result<()> {
        let props = PropertyStore::with_delimiter(';')?;
        assert_eq!(props.delimiter().as_char(), ';');

        assert!(PropertyStore::with_delimiter('|').is_err());
        Ok(())
    }

    #[test]
    fn test_clear_keeps_delimiter() -> Result<()> {
        let mut props = PropertyStore::with_delimiter('#')?;
        props.set("a", "1");
        props.clear();

        assert!(props.is_empty());
        assert_eq!(props.delimiter().as_char(), '#');
        Ok(())
    }

    #[test]
    fn test_from_map_and_into_map() {
        let mut map = IndexMap::new();
        map.insert("x".to_string(), "1".to_string());
        map.insert("y".to_string(), "2".to_string());

        let props = PropertyStore::from(map.clone());
        assert_eq!(props.as_map(), &map);
        assert_eq!(props.property_names(), vec!["x", "y"]);
        assert_eq!(props.into_map(), map);
    }

    #[test]
    fn test_shared_store_across_threads() {
        let shared = PropertyStore::new().into_shared();

        let handles: Vec<_> = (0..4)
            .map(|i| {
                let store = Arc::clone(&shared);
                std::thread::spawn(move || {
                    store.write().set(format!("worker{}.id", i), i.to_string());
                })
            })
            .collect();

        for handle in handles {
            handle.join().unwrap();
        }

        let store = shared.read();
        assert_eq!(store.len(), 4);
        assert_eq!(store.prefixes().len(), 4);
    }
}
