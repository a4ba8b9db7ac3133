//! # Extended Properties - Prefix-Grouped Property Store
//!
//! `extended-properties` is a flat, ordered string-to-string property store
//! with two additions:
//!
//! - **Prefix grouping**: keys such as `connection1.host` and
//!   `connection1.port` share the prefix `connection1` and can be listed,
//!   split out, extracted as a sub-store or re-prefixed together
//! - **Array values**: a sequence of strings is stored in one value, joined
//!   by a configurable delimiter character that is persisted with the data
//!
//! Stores read and write `.properties` text, XML properties documents, JSON
//! and TOML.
//!
//! ## Quick Start
//!
//! ```rust
//! use extended_properties::{Format, PropertyStore, Result};
//!
//! # fn main() -> Result<()> {
//! let mut props = PropertyStore::new();
//! props.set("connection1.host", "localhost");
//! props.set("connection1.port", "1521");
//! props.set("connection2.host", "10.10.10.1");
//! props.set_array("connection2.replicas", ["r1", "r2"])?;
//!
//! assert_eq!(props.prefixes(), vec!["connection1", "connection2"]);
//!
//! let conn1 = props.extract_prefix("connection1")?;
//! assert_eq!(conn1.get("port"), Some("1521"));
//!
//! // The delimiter travels with the document
//! let text = props.store_to_string(Format::Properties, Some("Connections"))?;
//! let mut loaded = PropertyStore::new();
//! loaded.load_str(&text, Format::Properties)?;
//! assert_eq!(loaded.get_array("connection2.replicas")?, vec!["r1", "r2"]);
//! # Ok(())
//! # }
//! ```
//!
//! ## Builder
//!
//! ```rust,no_run
//! use extended_properties::PropertiesBuilder;
//!
//! # fn main() -> extended_properties::Result<()> {
//! let props = PropertiesBuilder::new()
//!     .delimiter(';')
//!     .source("conf/app.properties")
//!     .entry("app.name", "demo")
//!     .build()?;
//! # Ok(())
//! # }
//! ```

pub mod core;

// Re-export core modules internally so crate:: paths in core still work
#[allow(unused_imports)]
pub(crate) use crate::core::{array, delimiter, error, format, io, merge, prefix, store};

pub use crate::core::{
    delimiter::{Delimiter, DELIMITER_SENTINEL_KEY},
    error::{PropertiesError, Result},
    format::{Format, JsonCodec, PropertiesCodec, PropertyCodec, TomlCodec, XmlCodec},
    prefix::PrefixGroup,
    store::{PropertyStore, SharedPropertyStore},
};

use std::path::PathBuf;
use tracing::info;

/// Builder for property stores
///
/// Assembly order in [`PropertiesBuilder::build`]:
/// 1. an empty store with the configured delimiter (default `%`)
/// 2. the source file, if any; a delimiter persisted in the file replaces
///    the configured one since the file's arrays are encoded with it
/// 3. explicit entries, overwriting loaded keys
/// 4. defaults, filling only keys that are still missing
///
/// # Examples
///
/// ```rust
/// use extended_properties::{PropertiesBuilder, PropertyStore};
///
/// # fn main() -> extended_properties::Result<()> {
/// let defaults: PropertyStore = [("timeout", "30"), ("retries", "3")].into_iter().collect();
///
/// let props = PropertiesBuilder::new()
///     .delimiter('#')
///     .entry("timeout", "60")
///     .defaults(&defaults)
///     .build()?;
///
/// assert_eq!(props.get("timeout"), Some("60"));
/// assert_eq!(props.get("retries"), Some("3"));
/// assert_eq!(props.delimiter().as_char(), '#');
/// # Ok(())
/// # }
/// ```
pub struct PropertiesBuilder {
    delimiter: Option<char>,
    source: Option<PathBuf>,
    entries: Vec<(String, String)>,
    defaults: Option<PropertyStore>,
}

impl PropertiesBuilder {
    /// Create a new PropertiesBuilder with default settings
    pub fn new() -> Self {
        PropertiesBuilder {
            delimiter: None,
            source: None,
            entries: Vec::new(),
            defaults: None,
        }
    }

    /// Set the array delimiter (validated at build time)
    pub fn delimiter(mut self, delimiter: char) -> Self {
        self.delimiter = Some(delimiter);
        self
    }

    /// Load a file at build time; the format comes from its extension
    pub fn source<P: Into<PathBuf>>(mut self, path: P) -> Self {
        self.source = Some(path.into());
        self
    }

    /// Add one entry
    pub fn entry<K: Into<String>, V: Into<String>>(mut self, key: K, value: V) -> Self {
        self.entries.push((key.into(), value.into()));
        self
    }

    /// Add several entries
    pub fn entries<I, K, V>(mut self, entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.entries
            .extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        self
    }

    /// Fallback values for keys nothing else sets
    pub fn defaults(mut self, defaults: &PropertyStore) -> Self {
        self.defaults = Some(defaults.clone());
        self
    }

    /// Build the store
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a reserved delimiter or unknown source
    /// extension, and any error raised while loading the source file.
    pub fn build(self) -> Result<PropertyStore> {
        let mut store = match self.delimiter {
            Some(delimiter) => PropertyStore::with_delimiter(delimiter)?,
            None => PropertyStore::new(),
        };

        if let Some(source) = &self.source {
            store.load_file(source)?;
        }

        store.extend(self.entries);

        if let Some(defaults) = &self.defaults {
            store.merge(defaults, false);
        }

        info!(
            "Built property store with {} entries (delimiter '{}')",
            store.len(),
            store.delimiter()
        );
        Ok(store)
    }
}

impl Default for PropertiesBuilder {
    fn default() -> Self {
        Self::new()
    }
}
