//! Merging one store into another

use crate::store::PropertyStore;
use tracing::debug;

impl PropertyStore {
    /// Copy the entries of `other` into this store
    ///
    /// Keys missing here are inserted. Keys present in both are replaced only
    /// when `overwrite` is set. Keys present only here are left alone.
    /// Values are copied verbatim; `other`'s delimiter is not applied.
    ///
    /// Returns the number of keys inserted or replaced.
    pub fn merge(&mut self, other: &PropertyStore, overwrite: bool) -> usize {
        let mut applied = 0;
        for (key, value) in &other.entries {
            if overwrite || !self.entries.contains_key(key) {
                self.entries.insert(key.clone(), value.clone());
                applied += 1;
            }
        }

        debug!(
            "Merged {} of {} properties (overwrite: {})",
            applied,
            other.entries.len(),
            overwrite
        );
        applied
    }

    /// Merge `other` into this store, overwriting duplicate keys
    pub fn merge_all(&mut self, other: &PropertyStore) -> usize {
        self.merge(other, true)
    }
}
