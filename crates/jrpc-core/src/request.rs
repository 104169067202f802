//! Request construction

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::canonical;
use crate::id::{IdGenerator, RequestId};
use crate::{Error, Result, JSON_RPC_VERSION};

/// Call arguments: positional values plus named values.
///
/// Named values are kept in the order given; the request builder sorts them
/// by key. A repeated key keeps its last value.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Args {
    positional: Vec<Value>,
    keyword: Vec<(String, Value)>,
}

impl Args {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a positional argument
    pub fn arg(mut self, value: impl Into<Value>) -> Self {
        self.positional.push(value.into());
        self
    }

    /// Append a named argument
    pub fn kwarg(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.keyword.push((key.into(), value.into()));
        self
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn keyword(&self) -> &[(String, Value)] {
        &self.keyword
    }

    pub fn is_empty(&self) -> bool {
        self.positional.is_empty() && self.keyword.is_empty()
    }

    /// Resolve into the `params` member of a request.
    pub fn into_params(self) -> Option<Value> {
        let Args {
            mut positional,
            keyword,
        } = self;

        let keyword = if keyword.is_empty() {
            None
        } else {
            let mut sorted = keyword;
            // stable, so the last duplicate wins on insert below
            sorted.sort_by(|a, b| a.0.cmp(&b.0));
            let mut map = Map::new();
            for (key, value) in sorted {
                map.insert(key, value);
            }
            Some(Value::Object(map))
        };

        match (positional.len(), keyword) {
            (0, None) => None,
            (0, Some(named)) => Some(named),
            (1, None) if positional[0].is_array() || positional[0].is_object() => {
                positional.pop()
            }
            (_, None) => Some(Value::Array(positional)),
            (_, Some(named)) => {
                positional.push(named);
                Some(Value::Array(positional))
            }
        }
    }
}

impl From<Vec<Value>> for Args {
    fn from(positional: Vec<Value>) -> Self {
        Self {
            positional,
            keyword: Vec::new(),
        }
    }
}

/// A single value is one positional argument; an array or object is
/// therefore passed through as pre-built params.
impl From<Value> for Args {
    fn from(value: Value) -> Self {
        Self::new().arg(value)
    }
}

impl From<()> for Args {
    fn from(_: ()) -> Self {
        Self::new()
    }
}

/// JSON-RPC 2.0 Request. A request without an id is a notification.
///
/// Field order here is the serialized key order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Request {
    jsonrpc: String,
    pub method: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub params: Option<Value>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<RequestId>,
}

impl Request {
    /// Build a request, drawing an id from `ids` only when a response is expected.
    pub fn build(
        method: &str,
        args: Args,
        expect_response: bool,
        ids: &dyn IdGenerator,
    ) -> Result<Self> {
        validate_method(method)?;
        let id = if expect_response {
            Some(ids.next_id())
        } else {
            None
        };
        Ok(Self::assemble(method, args, id))
    }

    /// Build a request carrying a caller-chosen id.
    pub fn with_id(method: &str, args: Args, id: impl Into<RequestId>) -> Result<Self> {
        validate_method(method)?;
        Ok(Self::assemble(method, args, Some(id.into())))
    }

    /// Build a notification (no id, no response expected).
    pub fn notification(method: &str, args: Args) -> Result<Self> {
        validate_method(method)?;
        Ok(Self::assemble(method, args, None))
    }

    fn assemble(method: &str, args: Args, id: Option<RequestId>) -> Self {
        Self {
            jsonrpc: JSON_RPC_VERSION.to_string(),
            method: method.to_string(),
            params: args.into_params(),
            id,
        }
    }

    pub fn jsonrpc(&self) -> &str {
        &self.jsonrpc
    }

    pub fn is_notification(&self) -> bool {
        self.id.is_none()
    }

    /// Canonical text of this request, as sent on the wire.
    pub fn to_canonical_string(&self) -> Result<String> {
        canonical::to_string(self)
    }
}

/// Canonical text of a batch of requests.
pub fn batch_to_canonical_string(requests: &[Request]) -> Result<String> {
    canonical::to_string(requests)
}

fn validate_method(method: &str) -> Result<()> {
    if method.trim().is_empty() {
        return Err(Error::InvalidArguments(
            "Method name cannot be empty".to_string(),
        ));
    }
    Ok(())
}
