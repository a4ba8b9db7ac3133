//! Loading and saving property stores
//!
//! Every read runs [`PropertyStore::extract_delimiter`] right after the codec
//! fills the entries, and every write serializes
//! [`PropertyStore::embed_delimiter`], so the reserved delimiter key only
//! ever exists inside persisted documents.

use crate::error::Result;
use crate::format::Format;
use crate::store::PropertyStore;
use std::fs::{self, File};
use std::io::{BufReader, BufWriter, Read, Write};
use std::path::Path;
use tracing::{debug, info};

impl PropertyStore {
    /// Read entries from `reader` and merge them into this store
    ///
    /// Loaded keys overwrite existing ones. The persisted delimiter, if
    /// present, becomes the active delimiter. Entries that were already in
    /// the store are not re-encoded, so arrays they hold decode with the new
    /// delimiter afterwards; load into an empty store, or call
    /// [`PropertyStore::set_delimiter`] first, when mixing sources. On error
    /// the store is left exactly as it was.
    ///
    /// # Errors
    ///
    /// Returns the codec's error for unreadable input, or `Format` if the
    /// persisted delimiter is empty or reserved.
    pub fn load<R: Read>(&mut self, reader: R, format: Format) -> Result<()> {
        let mut reader = BufReader::new(reader);
        let loaded = format.codec().read(&mut reader)?;
        debug!("Read {} entries as {}", loaded.len(), format);

        let mut staged = self.clone();
        staged.entries.extend(loaded);
        staged.extract_delimiter()?;

        *self = staged;
        Ok(())
    }

    /// Read entries from an in-memory document
    pub fn load_str(&mut self, text: &str, format: Format) -> Result<()> {
        self.load(text.as_bytes(), format)
    }

    /// Write this store, including its delimiter, to `writer`
    ///
    /// `comments` is written as a header where the format has comment syntax.
    pub fn store<W: Write>(&self, writer: W, format: Format, comments: Option<&str>) -> Result<()> {
        let mut writer = BufWriter::new(writer);
        let persisted = self.embed_delimiter();
        format.codec().write(&persisted, comments, &mut writer)?;
        writer.flush()?;
        debug!("Wrote {} entries as {}", persisted.len(), format);
        Ok(())
    }

    /// Serialize this store to a string
    pub fn store_to_string(&self, format: Format, comments: Option<&str>) -> Result<String> {
        let mut out = Vec::new();
        self.store(&mut out, format, comments)?;
        // Every codec emits UTF-8
        Ok(String::from_utf8_lossy(&out).into_owned())
    }

    /// Open a store from a file, picking the format from its extension
    ///
    /// # Examples
    ///
    /// ```rust,no_run
    /// use extended_properties::PropertyStore;
    ///
    /// let props = PropertyStore::open("conf/database.properties")?;
    /// let primary = props.extract_prefix("connection1")?;
    /// # Ok::<(), extended_properties::PropertiesError>(())
    /// ```
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let mut store = PropertyStore::new();
        store.load_file(path)?;
        Ok(store)
    }

    /// Merge the entries of a file into this store
    ///
    /// Same delimiter caveat as [`PropertyStore::load`]: a delimiter persisted
    /// in the file replaces the active one without re-encoding existing
    /// entries.
    pub fn load_file<P: AsRef<Path>>(&mut self, path: P) -> Result<()> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        info!("Loading properties from {:?} as {}", path, format);

        let file = File::open(path)?;
        self.load(file, format)
    }

    /// Save this store to a file, picking the format from its extension
    ///
    /// The document is written to a sibling temporary file first and renamed
    /// over `path`, so readers never observe a half-written file.
    pub fn save_file<P: AsRef<Path>>(&self, path: P, comments: Option<&str>) -> Result<()> {
        let path = path.as_ref();
        let format = Format::from_path(path)?;
        info!(
            "Saving {} properties to {:?} as {}",
            self.entries.len(),
            path,
            format
        );

        let mut tmp_name = path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = Path::new(&tmp_name);

        if let Err(e) = self.write_synced(tmp_path, format, comments) {
            fs::remove_file(tmp_path).ok();
            return Err(e);
        }

        fs::rename(tmp_path, path)?;
        Ok(())
    }

    fn write_synced(&self, path: &Path, format: Format, comments: Option<&str>) -> Result<()> {
        let file = File::create(path)?;
        self.store(&file, format, comments)?;
        file.sync_all()?;
        Ok(())
    }
}
