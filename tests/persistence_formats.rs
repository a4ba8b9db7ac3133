//! Persistence tests across every supported format
//!
//! Covers the delimiter sentinel lifecycle through files on disk, documents
//! produced by other writers, and corrupt input.

use extended_properties::{
    Format, PropertiesError, PropertyCodec, PropertyStore, Result, DELIMITER_SENTINEL_KEY,
};
use tempfile::TempDir;

const FORMATS: [Format; 4] = [Format::Properties, Format::Xml, Format::Json, Format::Toml];

fn sample_store() -> Result<PropertyStore> {
    let mut props = PropertyStore::new();
    props.set("connection1.host", "localhost");
    props.set("connection1.port", "1521");
    props.set("connection2.host", "10.10.10.1");
    props.set("motd", "Welcome: read the #rules = be nice!");
    props.set_array("connection1.replicas", ["r1.local", "r2.local", "r3.local"])?;
    Ok(props)
}

#[test]
fn test_file_round_trip_every_format() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();

    for format in FORMATS {
        let path = temp_dir.path().join(format!("settings.{}", format.extension()));

        let mut props = sample_store()?;
        assert!(!props.set_delimiter('#')?);
        assert!(props.set_delimiter(';')?);
        props.save_file(&path, Some("Round trip"))?;

        let loaded = PropertyStore::open(&path)?;

        assert_eq!(loaded, props, "format {}", format);
        assert_eq!(loaded.delimiter().as_char(), ';');
        assert_eq!(
            loaded.get_array("connection1.replicas")?,
            vec!["r1.local", "r2.local", "r3.local"]
        );
        assert!(!loaded.contains_key(DELIMITER_SENTINEL_KEY));
    }

    Ok(())
}

#[test]
fn test_saving_twice_is_stable() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("stable.properties");

    let props = sample_store()?;
    props.save_file(&path, None)?;
    let first = PropertyStore::open(&path)?;

    first.save_file(&path, None)?;
    let second = PropertyStore::open(&path)?;

    assert_eq!(first, second);
    assert_eq!(second.len(), props.len());
    Ok(())
}

#[test]
fn test_store_does_not_leak_sentinel() -> Result<()> {
    let props = sample_store()?;

    for format in FORMATS {
        let mut out = Vec::new();
        props.store(&mut out, format, None)?;

        assert!(String::from_utf8_lossy(&out).contains(DELIMITER_SENTINEL_KEY));
        assert!(!props.contains_key(DELIMITER_SENTINEL_KEY));
        assert!(props.keys().all(|k| k != DELIMITER_SENTINEL_KEY));
    }
    Ok(())
}

#[test]
fn test_read_properties_from_other_writer() -> Result<()> {
    let text = format!(
        "#Mon Jun 29 10:00:00 EDT 2015\n\
         connection1.host=localhost\n\
         connection1.port=1521\n\
         hosts=a#b#c\n\
         {}=\\#\n",
        DELIMITER_SENTINEL_KEY
    );

    let mut props = PropertyStore::new();
    props.load_str(&text, Format::Properties)?;

    assert_eq!(props.len(), 3);
    assert_eq!(props.delimiter().as_char(), '#');
    assert_eq!(props.get_array("hosts")?, vec!["a", "b", "c"]);
    Ok(())
}

#[test]
fn test_properties_file_interop_encodings() -> Result<()> {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("legacy.properties");

    // ISO-8859-1 bytes with an escaped non-BMP character
    std::fs::write(&path, b"name=caf\xe9\nemoji=\\uD83D\\uDE00\n").unwrap();

    let mut props = PropertyStore::open(&path)?;
    assert_eq!(props.get("name"), Some("caf\u{e9}"));
    assert_eq!(props.get("emoji"), Some("\u{1F600}"));

    props.set("city", "M\u{fc}nchen");
    props.save_file(&path, None)?;

    let written = std::fs::read(&path).unwrap();
    assert!(written.is_ascii());
    assert_eq!(PropertyStore::open(&path)?, props);
    Ok(())
}

#[test]
fn test_read_xml_from_other_writer() -> Result<()> {
    let doc = format!(
        r#"<?xml version="1.0" encoding="UTF-8" standalone="no"?>
<!DOCTYPE properties SYSTEM "http://java.sun.com/dtd/properties.dtd">
<properties>
<comment>Connections</comment>
<entry key="hosts">a;b</entry>
<entry key="{}">;</entry>
</properties>
"#,
        DELIMITER_SENTINEL_KEY
    );

    let mut props = PropertyStore::new();
    props.load_str(&doc, Format::Xml)?;

    assert_eq!(props.len(), 1);
    assert_eq!(props.get_array("hosts")?, vec!["a", "b"]);
    Ok(())
}

#[test]
fn test_empty_sentinel_is_format_error_for_every_format() -> Result<()> {
    for format in FORMATS {
        let mut corrupt = PropertyStore::new();
        corrupt.set("a", "1");
        corrupt.set(DELIMITER_SENTINEL_KEY, "");

        // Write the raw entries, bypassing the delimiter embedding
        let mut out = Vec::new();
        format.codec().write(corrupt.as_map(), None, &mut out)?;

        let mut props = PropertyStore::new();
        let result = props.load(out.as_slice(), format);

        assert!(
            matches!(result, Err(PropertiesError::Format(_))),
            "format {} should reject an empty delimiter",
            format
        );
        assert!(props.is_empty());
    }
    Ok(())
}

#[test]
fn test_unreadable_documents() {
    let mut props = PropertyStore::new();

    assert!(matches!(
        props.load_str("{not json", Format::Json),
        Err(PropertiesError::Json(_))
    ));
    assert!(matches!(
        props.load_str("key = [unterminated", Format::Toml),
        Err(PropertiesError::TomlDe(_))
    ));
    assert!(props
        .load_str("<properties><entry key=\"a\">1</properties>", Format::Xml)
        .is_err());
    assert!(matches!(
        props.load_str("a=\\u00G1\n", Format::Properties),
        Err(PropertiesError::Format(_))
    ));
    assert!(props.is_empty());
}
