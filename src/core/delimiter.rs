//! Array delimiter validation and lifecycle
//!
//! The delimiter is the single character used to join array elements into one
//! stored value. It travels with persisted data under a reserved key so that a
//! store read back from disk decodes arrays with the character it was written
//! with.

use crate::error::{PropertiesError, Result};
use crate::store::PropertyStore;
use indexmap::IndexMap;
use tracing::{debug, info, warn};

/// Reserved key carrying the active delimiter through a persisted document.
///
/// The numeric tag is a stable identifier: files written with one tag cannot
/// be read back by a reader looking for another, so it must never change.
pub const DELIMITER_SENTINEL_KEY: &str = "ExtendedProperties.delimiter.2015063000000000000";

/// A validated array delimiter
///
/// # Rules
/// - Any single character except the reserved set `( [ { \ ^ - = $ ! | ] } ) ? * + .`
/// - Defaults to `%`
///
/// # Examples
///
/// ```
/// use extended_properties::Delimiter;
///
/// let delim = Delimiter::new('#').unwrap();
/// assert_eq!(delim.as_char(), '#');
///
/// assert!(Delimiter::new('.').is_err());
/// assert_eq!(Delimiter::default().as_char(), '%');
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Delimiter(char);

impl Delimiter {
    /// Characters that may never delimit an array
    pub const RESERVED: [char; 17] = [
        '(', '[', '{', '\\', '^', '-', '=', '$', '!', '|', ']', '}', ')', '?', '*', '+', '.',
    ];

    /// Delimiter assigned to every new store
    pub const DEFAULT: Delimiter = Delimiter('%');

    /// Create a new validated delimiter
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `c` is one of [`Delimiter::RESERVED`].
    pub fn new(c: char) -> Result<Self> {
        if Self::is_reserved(c) {
            return Err(PropertiesError::InvalidArgument(format!(
                "delimiter '{}' is reserved; it cannot be any of: {}",
                c,
                Self::RESERVED.iter().collect::<String>()
            )));
        }
        Ok(Delimiter(c))
    }

    /// Whether `c` belongs to the reserved set
    pub fn is_reserved(c: char) -> bool {
        Self::RESERVED.contains(&c)
    }

    /// Get the delimiter character
    pub fn as_char(&self) -> char {
        self.0
    }
}

impl Default for Delimiter {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl TryFrom<char> for Delimiter {
    type Error = PropertiesError;

    fn try_from(c: char) -> Result<Self> {
        Delimiter::new(c)
    }
}

impl std::fmt::Display for Delimiter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl PropertyStore {
    /// Get the delimiter currently used for array properties
    pub fn delimiter(&self) -> Delimiter {
        self.delimiter
    }

    /// Change the array delimiter, re-encoding every stored value
    ///
    /// The change is all-or-nothing. If any stored value already contains
    /// `delimiter`, nothing is modified and `Ok(false)` is returned. Otherwise
    /// every occurrence of the current delimiter in every value is replaced
    /// with the new one and `Ok(true)` is returned.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if `delimiter` is reserved.
    ///
    /// # Examples
    ///
    /// ```
    /// use extended_properties::PropertyStore;
    ///
    /// # fn main() -> extended_properties::Result<()> {
    /// let mut props = PropertyStore::new();
    /// props.set_array("hosts", ["a", "b"])?;
    ///
    /// assert!(props.set_delimiter('#')?);
    /// assert_eq!(props.get("hosts"), Some("a#b"));
    ///
    /// props.set("note", "x;y");
    /// assert!(!props.set_delimiter(';')?);
    /// assert_eq!(props.get("hosts"), Some("a#b"));
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_delimiter(&mut self, delimiter: char) -> Result<bool> {
        let new = Delimiter::new(delimiter)?;

        // Collision scan must finish before any value is touched
        if let Some(key) = self
            .entries
            .iter()
            .find(|(_, value)| value.contains(new.as_char()))
            .map(|(key, _)| key)
        {
            warn!(
                "Rejected delimiter change '{}' -> '{}': value of '{}' already contains it",
                self.delimiter, new, key
            );
            return Ok(false);
        }

        let old = self.delimiter.as_char();
        let replacement = new.to_string();
        let mut rewritten = 0usize;
        for value in self.entries.values_mut() {
            if value.contains(old) {
                *value = value.replace(old, &replacement);
                rewritten += 1;
            }
        }
        self.delimiter = new;

        info!(
            "Delimiter changed '{}' -> '{}' ({} values re-encoded)",
            old, new, rewritten
        );
        Ok(true)
    }

    /// Build the persisted view of this store
    ///
    /// Returns a copy of the entries with the active delimiter inserted under
    /// [`DELIMITER_SENTINEL_KEY`]. The live store is left untouched, so the
    /// reserved key never shows up in normal iteration.
    pub fn embed_delimiter(&self) -> IndexMap<String, String> {
        let mut persisted = self.entries.clone();
        persisted.insert(
            DELIMITER_SENTINEL_KEY.to_string(),
            self.delimiter.to_string(),
        );
        persisted
    }

    /// Restore the delimiter from freshly loaded entries
    ///
    /// If the reserved key is present, its first character becomes the active
    /// delimiter and the key is removed. Stores without the key keep their
    /// current delimiter.
    ///
    /// # Errors
    ///
    /// Returns `Format` if the reserved value is empty or holds a reserved
    /// character. The reserved key stays in place in that case.
    pub fn extract_delimiter(&mut self) -> Result<()> {
        let Some(raw) = self.entries.get(DELIMITER_SENTINEL_KEY) else {
            return Ok(());
        };

        let c = raw.chars().next().ok_or_else(|| {
            PropertiesError::Format(format!(
                "failed to read \"{}\" value: empty",
                DELIMITER_SENTINEL_KEY
            ))
        })?;
        let delimiter = Delimiter::new(c).map_err(|_| {
            PropertiesError::Format(format!(
                "failed to read \"{}\" value: '{}' is a reserved character",
                DELIMITER_SENTINEL_KEY, c
            ))
        })?;

        self.entries.shift_remove(DELIMITER_SENTINEL_KEY);
        self.delimiter = delimiter;
        debug!("Extracted persisted delimiter '{}'", delimiter);
        Ok(())
    }
}
