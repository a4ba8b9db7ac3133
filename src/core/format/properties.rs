//! Line-oriented `key=value` properties text
//!
//! Syntax accepted by the reader:
//! - `#` or `!` as the first non-blank character starts a comment line
//! - key and value are separated by the first unescaped `=`, `:` or blank;
//!   blanks around the separator are skipped
//! - an odd number of trailing backslashes continues the line, and leading
//!   blanks of the continuation are dropped
//! - escapes: `\t \n \r \f \uXXXX`; any other escaped character stands for
//!   itself, and a `\uD8xx\uDCxx` surrogate pair decodes to one character
//!
//! Input is decoded as UTF-8, falling back to ISO-8859-1 when it is not valid
//! UTF-8. The writer emits pure ASCII: characters outside `0x20..=0x7E` are
//! written as `\uXXXX` UTF-16 units, so files stay readable by Latin-1
//! readers and read back to the same entries.

use super::PropertyCodec;
use crate::error::{PropertiesError, Result};
use indexmap::IndexMap;
use std::io::{BufRead, Write};
use std::str::Chars;
use tracing::debug;

/// Codec for `.properties` text
#[derive(Debug, Clone, Copy, Default)]
pub struct PropertiesCodec;

fn is_blank(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\u{000C}')
}

/// Join natural lines into logical lines, dropping comments and blank lines
fn logical_lines(text: &str) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current: Option<String> = None;

    for natural in text.split('\n') {
        let natural = natural.strip_suffix('\r').unwrap_or(natural);
        let trimmed = natural.trim_start_matches(is_blank);

        let mut line = match current.take() {
            Some(mut pending) => {
                pending.push_str(trimmed);
                pending
            }
            None => {
                if trimmed.is_empty() || trimmed.starts_with('#') || trimmed.starts_with('!') {
                    continue;
                }
                trimmed.to_string()
            }
        };

        let trailing = line.chars().rev().take_while(|&c| c == '\\').count();
        if trailing % 2 == 1 {
            line.pop();
            current = Some(line);
        } else {
            lines.push(line);
        }
    }

    // A continuation on the final line ends the entry
    if let Some(pending) = current {
        lines.push(pending);
    }
    lines
}

/// Split a logical line into its raw (still escaped) key and value
fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut has_separator = false;

    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = idx;
                has_separator = true;
                break;
            }
            c if is_blank(c) => {
                key_end = idx;
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let mut rest = &line[key_end..];
    if has_separator {
        rest = &rest[1..];
    } else {
        rest = rest.trim_start_matches(is_blank);
        if let Some(stripped) = rest.strip_prefix(|c: char| c == '=' || c == ':') {
            rest = stripped;
        }
    }
    (key, rest.trim_start_matches(is_blank))
}

/// Decode document bytes, treating anything that is not UTF-8 as ISO-8859-1
fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text,
        Err(e) => {
            debug!("Properties text is not UTF-8, decoding as ISO-8859-1");
            e.into_bytes().into_iter().map(char::from).collect()
        }
    }
}

/// Read the four hex digits of a `\uXXXX` escape
fn hex_unit(chars: &mut Chars<'_>) -> Result<u32> {
    let hex: String = chars.by_ref().take(4).collect();
    let valid = hex.len() == 4 && hex.chars().all(|h| h.is_ascii_hexdigit());
    valid
        .then(|| u32::from_str_radix(&hex, 16).ok())
        .flatten()
        .ok_or_else(|| PropertiesError::Format(format!("malformed \\uxxxx encoding: \\u{}", hex)))
}

/// Consume a `\uDCxx` low surrogate if one follows
fn low_surrogate(chars: &mut Chars<'_>) -> Option<u32> {
    let mut ahead = chars.clone();
    if ahead.next() != Some('\\') || ahead.next() != Some('u') {
        return None;
    }
    let unit = hex_unit(&mut ahead).ok().filter(|u| (0xDC00..=0xDFFF).contains(u))?;
    *chars = ahead;
    Some(unit)
}

/// Resolve backslash escapes
fn unescape(raw: &str) -> Result<String> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\u{000C}'),
            Some('u') => {
                let mut code = hex_unit(&mut chars)?;
                if (0xD800..=0xDBFF).contains(&code) {
                    if let Some(low) = low_surrogate(&mut chars) {
                        code = 0x10000 + ((code - 0xD800) << 10) + (low - 0xDC00);
                    }
                }
                // Lone surrogate halves have no char; keep them visible
                out.push(char::from_u32(code).unwrap_or(char::REPLACEMENT_CHARACTER));
            }
            Some(other) => out.push(other),
            None => {}
        }
    }
    Ok(out)
}

/// Append `c` as one or two `\uXXXX` UTF-16 units
fn push_unicode_escape(out: &mut String, c: char) {
    let mut units = [0u16; 2];
    for unit in c.encode_utf16(&mut units).iter() {
        out.push_str(&format!("\\u{:04X}", unit));
    }
}

/// Escape a key or value so the reader recovers it exactly
fn escape(text: &str, is_key: bool) -> String {
    let mut out = String::with_capacity(text.len());

    for (idx, c) in text.chars().enumerate() {
        match c {
            ' ' if idx == 0 || is_key => out.push_str("\\ "),
            '\t' => out.push_str("\\t"),
            '\n' => out.push_str("\\n"),
            '\r' => out.push_str("\\r"),
            '\u{000C}' => out.push_str("\\f"),
            '\\' => out.push_str("\\\\"),
            '=' | ':' | '#' | '!' => {
                out.push('\\');
                out.push(c);
            }
            c if c < ' ' || c > '~' => push_unicode_escape(&mut out, c),
            c => out.push(c),
        }
    }
    out
}

/// Write `comments` as `#` lines, one per line of input
fn write_comments(comments: &str, writer: &mut dyn Write) -> std::io::Result<()> {
    for line in comments.lines() {
        let mut escaped = String::with_capacity(line.len());
        for c in line.chars() {
            match c {
                ' '..='~' | '\t' => escaped.push(c),
                c => push_unicode_escape(&mut escaped, c),
            }
        }
        writeln!(writer, "#{}", escaped)?;
    }
    Ok(())
}

impl PropertyCodec for PropertiesCodec {
    fn read(&self, reader: &mut dyn BufRead) -> Result<IndexMap<String, String>> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes)?;
        let text = decode_text(bytes);

        let mut entries = IndexMap::new();
        for line in logical_lines(&text) {
            let (key, value) = split_entry(&line);
            entries.insert(unescape(key)?, unescape(value)?);
        }
        Ok(entries)
    }

    fn write(
        &self,
        entries: &IndexMap<String, String>,
        comments: Option<&str>,
        writer: &mut dyn Write,
    ) -> Result<()> {
        if let Some(comments) = comments {
            write_comments(comments, writer)?;
        }
        writeln!(
            writer,
            "#{}",
            chrono::Utc::now().format("%a %b %d %H:%M:%S UTC %Y")
        )?;

        for (key, value) in entries {
            writeln!(writer, "{}={}", escape(key, true), escape(value, false))?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(text: &str) -> Result<IndexMap<String, String>> {
        PropertiesCodec.read(&mut text.as_bytes())
    }

    fn write(entries: &IndexMap<String, String>, comments: Option<&str>) -> Result<String> {
        let mut out = Vec::new();
        PropertiesCodec.write(entries, comments, &mut out)?;
        Ok(String::from_utf8(out).unwrap())
    }

    #[test]
    fn test_separators() -> Result<()> {
        let entries = parse("a=1\nb:2\nc 3\nd = 4\ne\t:\t5\nf\n")?;

        assert_eq!(entries["a"], "1");
        assert_eq!(entries["b"], "2");
        assert_eq!(entries["c"], "3");
        assert_eq!(entries["d"], "4");
        assert_eq!(entries["e"], "5");
        assert_eq!(entries["f"], "");
        Ok(())
    }

    #[test]
    fn test_comments_and_blank_lines() -> Result<()> {
        let entries = parse("# header\n\n   ! bang comment\n  key = value\r\n")?;

        assert_eq!(entries.len(), 1);
        assert_eq!(entries["key"], "value");
        Ok(())
    }

    #[test]
    fn test_value_keeps_separators_and_trailing_space() -> Result<()> {
        let entries = parse("url=jdbc:oracle://host:1521=x \n")?;
        assert_eq!(entries["url"], "jdbc:oracle://host:1521=x ");
        Ok(())
    }

    #[test]
    fn test_line_continuation() -> Result<()> {
        let entries = parse("fruits=apple, \\\n        banana, \\\n   pear\nnext=1\n")?;

        assert_eq!(entries["fruits"], "apple, banana, pear");
        assert_eq!(entries["next"], "1");
        Ok(())
    }

    #[test]
    fn test_even_backslashes_do_not_continue() -> Result<()> {
        let entries = parse("path=C:\\\\\nnext=1\n")?;

        assert_eq!(entries["path"], "C:\\");
        assert_eq!(entries["next"], "1");
        Ok(())
    }

    #[test]
    fn test_escapes() -> Result<()> {
        let entries = parse("key\\ with\\=odd\\:chars=tab\\tnl\\nu\\u00e9\\q\n")?;

        assert_eq!(entries["key with=odd:chars"], "tab\tnl\nuéq");
        Ok(())
    }

    #[test]
    fn test_malformed_unicode_escape() {
        let result = parse("a=\\u12\n");
        assert!(matches!(result, Err(PropertiesError::Format(_))));

        let result = parse("a=\\uZZZZ\n");
        assert!(matches!(result, Err(PropertiesError::Format(_))));
    }

    #[test]
    fn test_surrogate_pair_escape() -> Result<()> {
        let entries = parse("emoji=\\uD83D\\uDE00\nmixed=a\\ud83d\\ude00b\n")?;

        assert_eq!(entries["emoji"], "\u{1F600}");
        assert_eq!(entries["mixed"], "a\u{1F600}b");
        Ok(())
    }

    #[test]
    fn test_lone_surrogate_is_replaced() -> Result<()> {
        let entries = parse("high=\\uD83Dx\nlow=\\uDE00\nhigh_then_bmp=\\uD83D\\u0041\n")?;

        assert_eq!(entries["high"], "\u{FFFD}x");
        assert_eq!(entries["low"], "\u{FFFD}");
        assert_eq!(entries["high_then_bmp"], "\u{FFFD}A");
        Ok(())
    }

    #[test]
    fn test_latin1_input() -> Result<()> {
        let entries = PropertiesCodec.read(&mut &b"name=caf\xe9\ncity=M\xfcnchen\n"[..])?;

        assert_eq!(entries["name"], "caf\u{e9}");
        assert_eq!(entries["city"], "M\u{fc}nchen");
        Ok(())
    }

    #[test]
    fn test_utf8_input_is_preferred() -> Result<()> {
        let entries = parse("name=caf\u{e9}\n")?;
        assert_eq!(entries["name"], "caf\u{e9}");
        Ok(())
    }

    #[test]
    fn test_writer_emits_ascii_escapes() -> Result<()> {
        let mut entries = IndexMap::new();
        entries.insert("caf\u{e9}".to_string(), "\u{1F600}\u{7F}".to_string());

        let text = write(&entries, Some("Caf\u{e9} settings"))?;

        assert!(text.is_ascii());
        assert!(text.starts_with("#Caf\\u00E9 settings\n"));
        assert!(text.contains("caf\\u00E9=\\uD83D\\uDE00\\u007F"));
        assert_eq!(parse(&text)?, entries);
        Ok(())
    }

    #[test]
    fn test_duplicate_keys_last_wins() -> Result<()> {
        let entries = parse("a=1\nb=2\na=3\n")?;

        assert_eq!(entries.len(), 2);
        assert_eq!(entries["a"], "3");
        Ok(())
    }

    #[test]
    fn test_write_escapes_and_reads_back() -> Result<()> {
        let mut entries = IndexMap::new();
        entries.insert("plain".to_string(), "value".to_string());
        entries.insert("key with spaces".to_string(), " leading".to_string());
        entries.insert("#not-a-comment".to_string(), "a=b:c".to_string());
        entries.insert("multi".to_string(), "line1\nline2\\end".to_string());
        entries.insert("unicode".to_string(), "héllo\u{0001}".to_string());
        entries.insert("empty".to_string(), String::new());

        let text = write(&entries, None)?;
        let parsed = parse(&text)?;

        assert_eq!(parsed, entries);
        let keys: Vec<&String> = parsed.keys().collect();
        let expected: Vec<&String> = entries.keys().collect();
        assert_eq!(keys, expected);
        Ok(())
    }

    #[test]
    fn test_write_comments_and_timestamp() -> Result<()> {
        let mut entries = IndexMap::new();
        entries.insert("a".to_string(), "1".to_string());

        let text = write(&entries, Some("Database settings\nsecond line"))?;
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines[0], "#Database settings");
        assert_eq!(lines[1], "#second line");
        assert!(lines[2].starts_with('#'));
        assert!(lines[2].contains("UTC"));
        assert_eq!(lines[3], "a=1");
        Ok(())
    }
}
