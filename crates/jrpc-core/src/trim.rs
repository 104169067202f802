//! Shortening of long values for log output. Never applied to wire payloads.

use serde_json::Value;

use crate::canonical;

/// Strings and arrays longer than this are shortened.
pub const LONGEST: usize = 30;
/// Items kept from each end of a shortened string or array.
pub const KEEP: usize = LONGEST / 3;

const MARKER: &str = "...";

/// Shorten a string to its first and last [`KEEP`] characters.
pub fn trim_string(s: &str) -> String {
    let len = s.chars().count();
    if len <= LONGEST {
        return s.to_string();
    }
    let head: String = s.chars().take(KEEP).collect();
    let tail: String = s.chars().skip(len - KEEP).collect();
    format!("{}{}{}", head, MARKER, tail)
}

/// Recursively shorten long strings and arrays inside a value.
pub fn trim_value(value: &Value) -> Value {
    match value {
        Value::String(s) => Value::String(trim_string(s)),
        Value::Array(items) if items.len() > LONGEST => {
            let mut trimmed: Vec<Value> = items[..KEEP].iter().map(trim_value).collect();
            trimmed.push(Value::String(MARKER.to_string()));
            trimmed.extend(items[items.len() - KEEP..].iter().map(trim_value));
            Value::Array(trimmed)
        }
        Value::Array(items) => Value::Array(items.iter().map(trim_value).collect()),
        Value::Object(obj) => Value::Object(
            obj.iter()
                .map(|(k, v)| (k.clone(), trim_value(v)))
                .collect(),
        ),
        other => other.clone(),
    }
}

/// Shorten a logged message. JSON text is trimmed value by value and
/// re-rendered; anything else is trimmed as a plain string.
pub fn trim_message(message: &str) -> String {
    // parse into an order-preserving shape so keys come back as they were sent
    match serde_json::from_str::<Ordered>(message) {
        Ok(parsed) => canonical::to_string(&parsed.trimmed())
            .unwrap_or_else(|_| trim_string(message)),
        Err(_) => trim_string(message),
    }
}

/// JSON value that remembers object key order, so re-rendering a trimmed
/// message keeps the `jsonrpc, method, params, id` layout.
#[derive(Debug, Clone)]
enum Ordered {
    Scalar(Value),
    Array(Vec<Ordered>),
    Object(Vec<(String, Ordered)>),
}

impl Ordered {
    fn trimmed(self) -> Ordered {
        match self {
            Ordered::Scalar(v) => Ordered::Scalar(trim_value(&v)),
            Ordered::Array(items) if items.len() > LONGEST => {
                let len = items.len();
                let mut out = Vec::with_capacity(2 * KEEP + 1);
                for (i, item) in items.into_iter().enumerate() {
                    if i < KEEP || i >= len - KEEP {
                        out.push(item.trimmed());
                    } else if i == KEEP {
                        out.push(Ordered::Scalar(Value::String(MARKER.to_string())));
                    }
                }
                Ordered::Array(out)
            }
            Ordered::Array(items) => Ordered::Array(items.into_iter().map(Ordered::trimmed).collect()),
            Ordered::Object(entries) => Ordered::Object(
                entries
                    .into_iter()
                    .map(|(k, v)| (k, v.trimmed()))
                    .collect(),
            ),
        }
    }
}

impl serde::Serialize for Ordered {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::{SerializeMap, SerializeSeq};
        match self {
            Ordered::Scalar(v) => v.serialize(serializer),
            Ordered::Array(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Ordered::Object(entries) => {
                let mut map = serializer.serialize_map(Some(entries.len()))?;
                for (k, v) in entries {
                    map.serialize_entry(k, v)?;
                }
                map.end()
            }
        }
    }
}

impl<'de> serde::Deserialize<'de> for Ordered {
    fn deserialize<D: serde::Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        use serde::de::{MapAccess, SeqAccess, Visitor};
        use std::fmt;

        struct OrderedVisitor;

        impl<'de> Visitor<'de> for OrderedVisitor {
            type Value = Ordered;

            fn expecting(&self, f: &mut fmt::Formatter) -> fmt::Result {
                f.write_str("any JSON value")
            }

            fn visit_bool<E: serde::de::Error>(self, v: bool) -> Result<Ordered, E> {
                Ok(Ordered::Scalar(Value::Bool(v)))
            }

            fn visit_i64<E: serde::de::Error>(self, v: i64) -> Result<Ordered, E> {
                Ok(Ordered::Scalar(Value::from(v)))
            }

            fn visit_u64<E: serde::de::Error>(self, v: u64) -> Result<Ordered, E> {
                Ok(Ordered::Scalar(Value::from(v)))
            }

            fn visit_f64<E: serde::de::Error>(self, v: f64) -> Result<Ordered, E> {
                Ok(Ordered::Scalar(Value::from(v)))
            }

            fn visit_str<E: serde::de::Error>(self, v: &str) -> Result<Ordered, E> {
                Ok(Ordered::Scalar(Value::String(v.to_string())))
            }

            fn visit_string<E: serde::de::Error>(self, v: String) -> Result<Ordered, E> {
                Ok(Ordered::Scalar(Value::String(v)))
            }

            fn visit_unit<E: serde::de::Error>(self) -> Result<Ordered, E> {
                Ok(Ordered::Scalar(Value::Null))
            }

            fn visit_none<E: serde::de::Error>(self) -> Result<Ordered, E> {
                Ok(Ordered::Scalar(Value::Null))
            }

            fn visit_seq<A: SeqAccess<'de>>(self, mut seq: A) -> Result<Ordered, A::Error> {
                let mut items = Vec::new();
                while let Some(item) = seq.next_element()? {
                    items.push(item);
                }
                Ok(Ordered::Array(items))
            }

            fn visit_map<A: MapAccess<'de>>(self, mut map: A) -> Result<Ordered, A::Error> {
                let mut entries = Vec::new();
                while let Some((k, v)) = map.next_entry::<String, Ordered>()? {
                    entries.push((k, v));
                }
                Ok(Ordered::Object(entries))
            }
        }

        deserializer.deserialize_any(OrderedVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_short_string_untouched() {
        assert_eq!(trim_string("blah"), "blah");
        assert_eq!(trim_string(&"x".repeat(30)), "x".repeat(30));
    }

    #[test]
    fn test_long_string() {
        assert_eq!(trim_string(&"blah".repeat(100)), "blahblahbl...ahblahblah");
    }

    #[test]
    fn test_multibyte_string() {
        let s = "é".repeat(40);
        assert_eq!(trim_string(&s), format!("{}...{}", "é".repeat(10), "é".repeat(10)));
    }

    #[test]
    fn test_long_array() {
        let value = json!((0..40).collect::<Vec<_>>());
        let trimmed = trim_value(&value);
        let items = trimmed.as_array().unwrap();
        assert_eq!(items.len(), 21);
        assert_eq!(items[0], json!(0));
        assert_eq!(items[10], json!("..."));
        assert_eq!(items[20], json!(39));
    }

    #[test]
    fn test_trim_message_keeps_key_order() {
        let message = format!(
            r#"{{"jsonrpc": "2.0", "method": "foo", "params": {{"blah": "{}"}}, "id": 1}}"#,
            "blah".repeat(100)
        );
        assert_eq!(
            trim_message(&message),
            r#"{"jsonrpc": "2.0", "method": "foo", "params": {"blah": "blahblahbl...ahblahblah"}, "id": 1}"#
        );
    }

    #[test]
    fn test_trim_message_nested_arrays() {
        let message = format!(r#"[{{"result": [{}], "id": 1}}]"#, "1, ".repeat(39) + "1");
        let trimmed = trim_message(&message);
        let parsed: Value = serde_json::from_str(&trimmed).unwrap();
        assert_eq!(parsed[0]["result"].as_array().unwrap().len(), 21);
    }

    #[test]
    fn test_trim_message_not_json() {
        let message = "z".repeat(50);
        assert_eq!(trim_message(&message), format!("{}...{}", "z".repeat(10), "z".repeat(10)));
    }
}
