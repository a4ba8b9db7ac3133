//! Dot-prefix grouping of property keys
//!
//! A key's prefix is everything before its first `.`; keys without a `.` are
//! unprefixed. Matching is done on that literal first segment, never through
//! pattern matching, so prefixes may contain any character.
//!
//! ```text
//! connection1.host=localhost      prefix "connection1"
//! connection1.port=1521           prefix "connection1"
//! connection2.host=10.10.10.1     prefix "connection2"
//! timeout=30                      unprefixed
//! ```

use crate::error::Result;
use crate::store::PropertyStore;
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

/// Group key produced by [`PropertyStore::split_by_prefix`]
///
/// `Unprefixed` sits outside the space of real prefixes, so it cannot collide
/// with any key's first segment, including the empty one of a key like `.a`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum PrefixGroup {
    /// Keys whose first segment equals this prefix
    Prefixed(String),
    /// Keys containing no `.`
    Unprefixed,
}

impl PrefixGroup {
    /// The prefix of this group, `None` for the unprefixed group
    pub fn prefix(&self) -> Option<&str> {
        match self {
            PrefixGroup::Prefixed(prefix) => Some(prefix),
            PrefixGroup::Unprefixed => None,
        }
    }
}

impl std::fmt::Display for PrefixGroup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PrefixGroup::Prefixed(prefix) => write!(f, "{}", prefix),
            PrefixGroup::Unprefixed => write!(f, "<unprefixed>"),
        }
    }
}

/// First dot-segment of `key`, if the key has one
pub fn key_prefix(key: &str) -> Option<&str> {
    key.split_once('.').map(|(prefix, _)| prefix)
}

/// Strip trailing dots from a caller-supplied prefix
///
/// The result may be empty: `""` is the prefix of keys like `.hidden`.
fn normalize_prefix(prefix: &str) -> &str {
    prefix.trim_end_matches('.')
}

impl PropertyStore {
    /// Prepend `prefix` to every stored key
    ///
    /// The prefix is normalized to end with exactly one `.` before it is
    /// joined, so `"db"` and `"db."` behave the same. Values are unchanged.
    /// The empty prefix turns `host` into `.host`.
    ///
    /// # Examples
    ///
    /// ```
    /// use extended_properties::PropertyStore;
    ///
    /// # fn main() -> extended_properties::Result<()> {
    /// let mut props = PropertyStore::new();
    /// props.set("connection1.host", "localhost");
    /// props.add_prefix("db")?;
    ///
    /// assert_eq!(props.get("db.connection1.host"), Some("localhost"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn add_prefix(&mut self, prefix: &str) -> Result<()> {
        let prefix = normalize_prefix(prefix);
        debug!("Adding prefix '{}' to {} keys", prefix, self.entries.len());

        self.entries = std::mem::take(&mut self.entries)
            .into_iter()
            .map(|(key, value)| (format!("{}.{}", prefix, key), value))
            .collect();
        Ok(())
    }

    /// Distinct prefixes in first-seen order
    ///
    /// Unprefixed keys do not contribute.
    pub fn prefixes(&self) -> Vec<String> {
        let prefixes: IndexSet<&str> = self.entries.keys().filter_map(|k| key_prefix(k)).collect();
        prefixes.into_iter().map(str::to_string).collect()
    }

    /// Partition the store into one sub-store per prefix
    ///
    /// Keys keep their prefixes. When `include_unprefixed` is set, one more
    /// group keyed by [`PrefixGroup::Unprefixed`] is appended holding every key
    /// without a `.`; it is present even when no such key exists.
    ///
    /// Sub-stores are independent copies sharing this store's delimiter.
    pub fn split_by_prefix(&self, include_unprefixed: bool) -> IndexMap<PrefixGroup, PropertyStore> {
        let mut groups: IndexMap<PrefixGroup, PropertyStore> = IndexMap::new();
        let mut unprefixed = self.empty_like();

        for (key, value) in &self.entries {
            match key_prefix(key) {
                Some(prefix) => {
                    groups
                        .entry(PrefixGroup::Prefixed(prefix.to_string()))
                        .or_insert_with(|| self.empty_like())
                        .set(key.clone(), value.clone());
                }
                None => {
                    unprefixed.set(key.clone(), value.clone());
                }
            }
        }

        if include_unprefixed {
            groups.insert(PrefixGroup::Unprefixed, unprefixed);
        }

        debug!(
            "Split {} keys into {} groups (unprefixed included: {})",
            self.entries.len(),
            groups.len(),
            include_unprefixed
        );
        groups
    }

    /// New store with the keys under `prefix`, prefix stripped
    ///
    /// A trailing `.` on `prefix` is tolerated. Multi-segment prefixes such as
    /// `"db.primary"` match literally. The empty prefix selects keys starting
    /// with `.`, so every entry of [`PropertyStore::prefixes`] is extractable.
    ///
    /// # Examples
    ///
    /// ```
    /// use extended_properties::PropertyStore;
    ///
    /// # fn main() -> extended_properties::Result<()> {
    /// let mut props = PropertyStore::new();
    /// props.set("connection1.host", "localhost");
    /// props.set("connection1.port", "1521");
    /// props.set("connection2.host", "10.10.10.1");
    ///
    /// let conn = props.extract_prefix("connection1")?;
    /// assert_eq!(conn.get("host"), Some("localhost"));
    /// assert_eq!(conn.get("port"), Some("1521"));
    /// assert_eq!(conn.len(), 2);
    /// # Ok(())
    /// # }
    /// ```
    pub fn extract_prefix(&self, prefix: &str) -> Result<PropertyStore> {
        let prefix = normalize_prefix(prefix);
        let anchor = format!("{}.", prefix);

        let mut extracted = self.empty_like();
        for (key, value) in &self.entries {
            if let Some(rest) = key.strip_prefix(&anchor) {
                extracted.set(rest, value.clone());
            }
        }

        debug!("Extracted {} keys for prefix '{}'", extracted.len(), prefix);
        Ok(extracted)
    }
}
