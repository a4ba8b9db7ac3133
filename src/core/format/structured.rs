//! Flat JSON and TOML documents
//!
//! Both formats hold a single table of string values. Dotted keys are kept
//! as quoted keys, never expanded into nested tables.

use super::PropertyCodec;
use crate::error::Result;
use indexmap::IndexMap;
use std::io::{BufRead, Write};
use tracing::debug;

/// Codec for a flat JSON object of strings
#[derive(Debug, Clone, Copy, Default)]
pub struct JsonCodec;

/// Codec for a flat TOML table of strings
#[derive(Debug, Clone, Copy, Default)]
pub struct TomlCodec;

impl PropertyCodec for JsonCodec {
    fn read(&self, reader: &mut dyn BufRead) -> Result<IndexMap<String, String>> {
        Ok(serde_json::from_reader(reader)?)
    }

    fn write(
        &self,
        entries: &IndexMap<String, String>,
        comments: Option<&str>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        if comments.is_some() {
            debug!("JSON has no comment syntax; dropping comments");
        }
        serde_json::to_writer_pretty(&mut *writer, entries)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

impl PropertyCodec for TomlCodec {
    fn read(&self, reader: &mut dyn BufRead) -> Result<IndexMap<String, String>> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        Ok(toml::from_str(&text)?)
    }

    fn write(
        &self,
        entries: &IndexMap<String, String>,
        comments: Option<&str>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        if let Some(comments) = comments {
            for line in comments.lines() {
                writeln!(writer, "# {}", line)?;
            }
        }
        writer.write_all(toml::to_string(entries)?.as_bytes())?;
        writer.flush()?;
        Ok(())
    }
}
