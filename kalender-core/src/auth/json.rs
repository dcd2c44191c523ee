//! Canonical JSON encoding used for token payloads and their hashes.
//!
//! The remote service hashes the compact encoding with object keys in
//! insertion order, `/` escaped as `\/` and every non-ASCII character
//! written as lowercase `\uXXXX` UTF-16 escapes. Control characters below
//! 0x20 use serde_json's short escapes or `\u00xx`; DEL is written raw.

use std::io;

use serde::Serialize;
use serde_json::Value;
use serde_json::ser::{Formatter, Serializer};

/// Compact formatter that escapes the way the remote encoder does.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
    fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        let mut start = 0;
        for (i, c) in fragment.char_indices() {
            if c != '/' && c.is_ascii() {
                continue;
            }
            writer.write_all(fragment[start..i].as_bytes())?;
            if c == '/' {
                writer.write_all(b"\\/")?;
            } else {
                let mut units = [0u16; 2];
                for unit in c.encode_utf16(&mut units) {
                    write!(writer, "\\u{:04x}", unit)?;
                }
            }
            start = i + c.len_utf8();
        }
        writer.write_all(fragment[start..].as_bytes())
    }
}

pub fn to_canonical_bytes(value: &Value) -> serde_json::Result<Vec<u8>> {
    let mut out = Vec::new();
    let mut serializer = Serializer::with_formatter(&mut out, CanonicalFormatter);
    value.serialize(&mut serializer)?;
    Ok(out)
}

pub fn to_canonical_string(value: &Value) -> String {
    // A `Value` always has string keys and the output is pure ASCII, so
    // neither step can fail.
    to_canonical_bytes(value)
        .ok()
        .and_then(|bytes| String::from_utf8(bytes).ok())
        .unwrap_or_default()
}
