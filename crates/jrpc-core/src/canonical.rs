//! Canonical text rendering.
//!
//! Messages are rendered with `", "` between items and `": "` after keys,
//! e.g. `{"jsonrpc": "2.0", "method": "go", "id": 1}`. Field order comes from
//! the serialized type, so the same value always yields the same bytes.

use serde::Serialize;
use serde_json::ser::Formatter;
use std::io;

use crate::Result;

/// Formatter emitting single spaces after separators
#[derive(Debug, Clone, Copy, Default)]
pub struct SpacedFormatter;

impl Formatter for SpacedFormatter {
    fn begin_array_value<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_key<W>(&mut self, writer: &mut W, first: bool) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        if first {
            Ok(())
        } else {
            writer.write_all(b", ")
        }
    }

    fn begin_object_value<W>(&mut self, writer: &mut W) -> io::Result<()>
    where
        W: ?Sized + io::Write,
    {
        writer.write_all(b": ")
    }
}

/// Render any serializable value in canonical form.
pub fn to_string<T>(value: &T) -> Result<String>
where
    T: ?Sized + Serialize,
{
    let mut buf = Vec::with_capacity(128);
    let mut ser = serde_json::Serializer::with_formatter(&mut buf, SpacedFormatter);
    value.serialize(&mut ser)?;
    // serde_json only ever writes valid UTF-8
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_spacing() {
        let value = json!({"a": [1, 2, {"b": null}], "c": "x"});
        assert_eq!(
            to_string(&value).unwrap(),
            r#"{"a": [1, 2, {"b": null}], "c": "x"}"#
        );
    }

    #[test]
    fn test_empty_containers() {
        assert_eq!(to_string(&json!([])).unwrap(), "[]");
        assert_eq!(to_string(&json!({})).unwrap(), "{}");
    }

    #[test]
    fn test_strings_are_escaped() {
        let value = json!({"s": "a, b: \"c\""});
        let text = to_string(&value).unwrap();
        assert_eq!(text, r#"{"s": "a, b: \"c\""}"#);
        let back: serde_json::Value = serde_json::from_str(&text).unwrap();
        assert_eq!(back, value);
    }
}
