//! XML properties documents
//!
//! ```xml
//! <?xml version="1.0" encoding="UTF-8" standalone="no"?>
//! <!DOCTYPE properties SYSTEM "http://java.sun.com/dtd/properties.dtd">
//! <properties>
//!   <comment>Database settings</comment>
//!   <entry key="connection1.host">localhost</entry>
//! </properties>
//! ```

use super::PropertyCodec;
use crate::error::{PropertiesError, Result};
use indexmap::IndexMap;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::{Reader, Writer};
use std::io::{BufRead, Write};

const ROOT: &str = "properties";
const COMMENT: &str = "comment";
const ENTRY: &str = "entry";
const DOCTYPE: &str = r#"properties SYSTEM "http://java.sun.com/dtd/properties.dtd""#;

/// Codec for XML properties documents
#[derive(Debug, Clone, Copy, Default)]
pub struct XmlCodec;

/// Read the required `key` attribute of an `<entry>`
fn entry_key(element: &BytesStart<'_>) -> Result<String> {
    let attr = element
        .try_get_attribute("key")?
        .ok_or_else(|| PropertiesError::Format("<entry> element without a key attribute".into()))?;
    Ok(attr.unescape_value()?.into_owned())
}

impl PropertyCodec for XmlCodec {
    fn read(&self, reader: &mut dyn BufRead) -> Result<IndexMap<String, String>> {
        let mut xml = Reader::from_reader(reader);
        let mut buf = Vec::new();

        let mut entries = IndexMap::new();
        let mut saw_root = false;
        let mut current_key: Option<String> = None;
        let mut text = String::new();

        loop {
            match xml.read_event_into(&mut buf)? {
                Event::Start(ref e) => match e.name().as_ref() {
                    b"properties" => saw_root = true,
                    b"comment" => {}
                    b"entry" => {
                        current_key = Some(entry_key(e)?);
                        text.clear();
                    }
                    other => {
                        return Err(PropertiesError::Format(format!(
                            "unexpected element <{}>",
                            String::from_utf8_lossy(other)
                        )))
                    }
                },
                Event::Empty(ref e) => match e.name().as_ref() {
                    b"properties" => saw_root = true,
                    b"comment" => {}
                    b"entry" => {
                        entries.insert(entry_key(e)?, String::new());
                    }
                    other => {
                        return Err(PropertiesError::Format(format!(
                            "unexpected element <{}/>",
                            String::from_utf8_lossy(other)
                        )))
                    }
                },
                Event::Text(ref e) => {
                    if current_key.is_some() {
                        text.push_str(&e.unescape()?);
                    }
                }
                Event::CData(ref e) => {
                    if current_key.is_some() {
                        text.push_str(&String::from_utf8_lossy(e));
                    }
                }
                Event::End(ref e) => {
                    if e.name().as_ref() == b"entry" {
                        if let Some(key) = current_key.take() {
                            entries.insert(key, std::mem::take(&mut text));
                        }
                    }
                }
                Event::Eof => break,
                _ => {}
            }
            buf.clear();
        }

        if !saw_root {
            return Err(PropertiesError::Format(
                "document has no <properties> root element".into(),
            ));
        }
        Ok(entries)
    }

    fn write(
        &self,
        entries: &IndexMap<String, String>,
        comments: Option<&str>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        let mut xml = Writer::new_with_indent(writer, b' ', 2);

        xml.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("no"))))?;
        xml.write_event(Event::DocType(BytesText::from_escaped(DOCTYPE)))?;
        xml.write_event(Event::Start(BytesStart::new(ROOT)))?;

        if let Some(comments) = comments {
            xml.write_event(Event::Start(BytesStart::new(COMMENT)))?;
            xml.write_event(Event::Text(BytesText::new(comments)))?;
            xml.write_event(Event::End(BytesEnd::new(COMMENT)))?;
        }

        for (key, value) in entries {
            let entry = BytesStart::new(ENTRY).with_attributes([("key", key.as_str())]);
            xml.write_event(Event::Start(entry))?;
            xml.write_event(Event::Text(BytesText::new(value)))?;
            xml.write_event(Event::End(BytesEnd::new(ENTRY)))?;
        }

        xml.write_event(Event::End(BytesEnd::new(ROOT)))?;
        let writer = xml.into_inner();
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}
