//! Array values encoded in a single property
//!
//! Elements are joined with the store's active delimiter. Encoding rejects
//! elements containing the delimiter; decoding splits unconditionally.

use crate::error::{PropertiesError, Result};
use crate::store::PropertyStore;
use tracing::debug;

impl PropertyStore {
    /// Store `values` under `key` as one delimiter-joined value
    ///
    /// Returns the previous value of `key`, if any. An empty sequence is
    /// stored as the empty string, the same value `[""]` encodes to; both
    /// read back as `[""]`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` if any element contains the delimiter. The
    /// store is not modified in that case.
    ///
    /// # Examples
    ///
    /// ```
    /// use extended_properties::PropertyStore;
    ///
    /// # fn main() -> extended_properties::Result<()> {
    /// let mut props = PropertyStore::new();
    /// props.set_array("hosts", ["a", "b", "c"])?;
    ///
    /// assert_eq!(props.get("hosts"), Some("a%b%c"));
    /// assert_eq!(props.get_array("hosts")?, vec!["a", "b", "c"]);
    /// # Ok(())
    /// # }
    /// ```
    pub fn set_array<I, S>(&mut self, key: impl Into<String>, values: I) -> Result<Option<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let delimiter = self.delimiter.as_char();
        let mut joined = String::new();

        for (idx, value) in values.into_iter().enumerate() {
            let value = value.as_ref();
            if value.contains(delimiter) {
                return Err(PropertiesError::InvalidArgument(format!(
                    "array element {} ('{}') contains the delimiter '{}'",
                    idx, value, delimiter
                )));
            }
            if idx > 0 {
                joined.push(delimiter);
            }
            joined.push_str(value);
        }

        let key = key.into();
        debug!("Setting array property {} ({} bytes)", key, joined.len());
        Ok(self.set(key, joined))
    }

    /// Split the value under `key` on the active delimiter
    ///
    /// The value is split verbatim: empty elements between adjacent
    /// delimiters are kept, and an empty value decodes to `[""]`.
    ///
    /// # Errors
    ///
    /// Returns `KeyNotFound` if `key` is not stored.
    pub fn get_array(&self, key: &str) -> Result<Vec<String>> {
        let value = self
            .get(key)
            .ok_or_else(|| PropertiesError::KeyNotFound(key.to_string()))?;

        Ok(value
            .split(self.delimiter.as_char())
            .map(str::to_string)
            .collect())
    }
}
