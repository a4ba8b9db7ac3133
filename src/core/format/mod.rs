//! Persisted representations of a property store
//!
//! Each [`Format`] has a [`PropertyCodec`] that turns a document into an
//! ordered key/value map and back. Codecs know nothing about delimiters; the
//! store embeds and extracts the delimiter around them.

mod properties;
mod structured;
mod xml;

pub use properties::PropertiesCodec;
pub use structured::{JsonCodec, TomlCodec};
pub use xml::XmlCodec;

use crate::error::{PropertiesError, Result};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::io::{BufRead, Write};
use std::path::Path;

/// Reader/writer for one persisted document format
pub trait PropertyCodec {
    /// Parse a document into an ordered map
    fn read(&self, reader: &mut dyn BufRead) -> Result<IndexMap<String, String>>;

    /// Serialize `entries`, with optional free-form `comments` where the
    /// format supports them
    fn write(
        &self,
        entries: &IndexMap<String, String>,
        comments: Option<&str>,
        writer: &mut dyn Write,
    ) -> Result<()>;
}

/// Supported document formats
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Format {
    /// Line-oriented `key=value` text
    Properties,
    /// `<properties>` document with `<entry key="...">` elements
    Xml,
    /// Flat JSON object of strings
    Json,
    /// Flat TOML table of strings
    Toml,
}

impl Format {
    /// Pick a format from a file extension
    ///
    /// # Errors
    ///
    /// Returns `InvalidArgument` for a missing or unknown extension.
    ///
    /// # Examples
    ///
    /// ```
    /// use extended_properties::Format;
    /// use std::path::Path;
    ///
    /// assert_eq!(Format::from_path(Path::new("app.properties")).unwrap(), Format::Properties);
    /// assert_eq!(Format::from_path(Path::new("conf/app.XML")).unwrap(), Format::Xml);
    /// assert!(Format::from_path(Path::new("app.ini")).is_err());
    /// ```
    pub fn from_path(path: &Path) -> Result<Self> {
        let ext = path
            .extension()
            .and_then(|e| e.to_str())
            .map(str::to_ascii_lowercase)
            .ok_or_else(|| {
                PropertiesError::InvalidArgument(format!(
                    "cannot infer format of {:?}: no file extension",
                    path
                ))
            })?;

        match ext.as_str() {
            "properties" => Ok(Format::Properties),
            "xml" => Ok(Format::Xml),
            "json" => Ok(Format::Json),
            "toml" => Ok(Format::Toml),
            other => Err(PropertiesError::InvalidArgument(format!(
                "unsupported properties file extension '{}'",
                other
            ))),
        }
    }

    /// Canonical file extension
    pub fn extension(&self) -> &'static str {
        match self {
            Format::Properties => "properties",
            Format::Xml => "xml",
            Format::Json => "json",
            Format::Toml => "toml",
        }
    }

    /// Codec reading and writing this format
    pub fn codec(&self) -> Box<dyn PropertyCodec> {
        match self {
            Format::Properties => Box::new(PropertiesCodec),
            Format::Xml => Box::new(XmlCodec),
            Format::Json => Box::new(JsonCodec),
            Format::Toml => Box::new(TomlCodec),
        }
    }
}

impl std::fmt::Display for Format {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.extension())
    }
}
