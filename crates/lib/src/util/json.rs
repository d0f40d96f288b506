//! Canonical JSON encoding.
//!
//! Entry hashes and metadata files must be byte-identical to the ones written
//! by earlier versions of the tool, which produce objects of the form
//! `{"a": "1", "b": "2"}`: `", "` between items, `": "` between key and value,
//! and every non-ASCII character escaped as `\uXXXX` (UTF-16 surrogate pairs
//! above the BMP). Key order comes from the serialized type, so callers pass
//! `BTreeMap`s to get keys sorted by code point.

use std::io;

use serde::Serialize;
use serde_json::ser::Formatter;

/// A `serde_json` formatter producing the canonical spacing and escaping.
#[derive(Debug, Default, Clone, Copy)]
pub struct CanonicalFormatter;

impl Formatter for CanonicalFormatter {
  fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
  where
    W: ?Sized + io::Write,
  {
    if first { Ok(()) } else { writer.write_all(b", ") }
  }

  fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
  where
    W: ?Sized + io::Write,
  {
    if first { Ok(()) } else { writer.write_all(b", ") }
  }

  fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
  where
    W: ?Sized + io::Write,
  {
    writer.write_all(b": ")
  }

  fn write_string_fragment<W>(&mut self, writer: &mut W, fragment: &str) -> io::Result<()>
  where
    W: ?Sized + io::Write,
  {
    let bytes = fragment.as_bytes();
    let mut start = 0;

    for (i, ch) in fragment.char_indices() {
      // DEL is printable to serde_json but not to the canonical form
      if ch.is_ascii() && ch != '\x7f' {
        continue;
      }
      writer.write_all(&bytes[start..i])?;
      let mut units = [0u16; 2];
      for unit in ch.encode_utf16(&mut units) {
        write!(writer, "\\u{:04x}", unit)?;
      }
      start = i + ch.len_utf8();
    }

    writer.write_all(&bytes[start..])
  }
}

/// Serialize `value` to canonical JSON bytes.
pub fn to_canonical_vec<T>(value: &T) -> Result<Vec<u8>, serde_json::Error>
where
  T: ?Sized + Serialize,
{
  let mut out = Vec::with_capacity(128);
  let mut serializer = serde_json::Serializer::with_formatter(&mut out, CanonicalFormatter);
  value.serialize(&mut serializer)?;
  Ok(out)
}
