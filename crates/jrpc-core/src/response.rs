//! Response parsing and validation

use serde_json::{Map, Value};
use std::collections::HashSet;

use crate::error::RpcError;
use crate::id::RequestId;
use crate::{Error, Result, JSON_RPC_VERSION};

/// Why a response carries no result
#[derive(thiserror::Error, Debug, Clone, PartialEq)]
pub enum ResponseError {
    /// The server reported an error object
    #[error(transparent)]
    Rpc(#[from] RpcError),

    /// The entry is not a valid JSON-RPC 2.0 response. Only batch entries
    /// end up here; an invalid single response fails [`parse`] outright.
    #[error("Invalid response: {0}")]
    Invalid(String),
}

impl ResponseError {
    pub fn as_rpc(&self) -> Option<&RpcError> {
        match self {
            Self::Rpc(err) => Some(err),
            Self::Invalid(_) => None,
        }
    }
}

impl From<ResponseError> for Error {
    fn from(err: ResponseError) -> Self {
        match err {
            ResponseError::Rpc(err) => Error::Rpc(err),
            ResponseError::Invalid(reason) => Error::InvalidResponse(reason),
        }
    }
}

/// One JSON-RPC 2.0 response
#[derive(Debug, Clone, PartialEq)]
pub struct Response {
    /// Id echoed by the server; `Null` when an invalid entry had no usable id.
    pub id: RequestId,
    pub outcome: std::result::Result<Value, ResponseError>,
}

impl Response {
    pub fn is_success(&self) -> bool {
        self.outcome.is_ok()
    }

    /// Convert into the result value, surfacing a server error as
    /// [`Error::Rpc`] and an invalid entry as [`Error::InvalidResponse`].
    pub fn into_result(self) -> Result<Value> {
        self.outcome.map_err(Error::from)
    }
}

/// A parsed response message: either one response or a batch
#[derive(Debug, Clone, PartialEq)]
pub enum ResponseBody {
    Single(Response),
    Batch(Vec<Response>),
}

impl ResponseBody {
    pub fn is_batch(&self) -> bool {
        matches!(self, Self::Batch(_))
    }

    /// Flatten into a list of responses, in received order.
    pub fn into_vec(self) -> Vec<Response> {
        match self {
            Self::Single(response) => vec![response],
            Self::Batch(responses) => responses,
        }
    }
}

/// Parse raw response text into a single response or a batch.
pub fn parse(raw: &str) -> Result<ResponseBody> {
    let value: Value = serde_json::from_str(raw)?;
    match value {
        Value::Array(items) => parse_batch(items).map(ResponseBody::Batch),
        other => parse_single(other).map(ResponseBody::Single),
    }
}

/// Validate a single (non-batch) response and extract its result.
pub fn validate(raw: &str) -> Result<Value> {
    match parse(raw)? {
        ResponseBody::Single(response) => response.into_result(),
        ResponseBody::Batch(_) => Err(Error::InvalidResponse(
            "Expected a single response, received a batch".to_string(),
        )),
    }
}

fn parse_batch(items: Vec<Value>) -> Result<Vec<Response>> {
    if items.is_empty() {
        return Err(Error::InvalidResponse("Empty batch".to_string()));
    }

    let mut seen = HashSet::new();
    let mut responses = Vec::with_capacity(items.len());
    for (index, item) in items.into_iter().enumerate() {
        let id = entry_id(&item);
        let response = match parse_single(item) {
            Ok(response) => response,
            Err(Error::InvalidResponse(reason)) => Response {
                id,
                outcome: Err(ResponseError::Invalid(format!(
                    "Batch entry {}: {}",
                    index, reason
                ))),
            },
            Err(other) => return Err(other),
        };

        if !response.id.is_null() && !seen.insert(response.id.clone()) {
            return Err(Error::InvalidResponse(format!(
                "Batch contains more than one response for id {}",
                response.id
            )));
        }
        responses.push(response);
    }
    Ok(responses)
}

/// Best-effort id of a batch entry, used when the entry itself is invalid.
fn entry_id(item: &Value) -> RequestId {
    item.get("id")
        .cloned()
        .and_then(|id| parse_id(id).ok())
        .unwrap_or(RequestId::Null)
}

fn parse_single(value: Value) -> Result<Response> {
    let mut obj = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(Error::InvalidResponse(format!(
                "Expected an object, got {}",
                kind_of(&other)
            )))
        }
    };

    match obj.get("jsonrpc") {
        Some(Value::String(v)) if v == JSON_RPC_VERSION => {}
        Some(other) => {
            return Err(Error::InvalidResponse(format!(
                "Unsupported jsonrpc version {}",
                other
            )))
        }
        None => return Err(Error::InvalidResponse("Missing jsonrpc member".to_string())),
    }

    let id = match obj.remove("id") {
        Some(value) => parse_id(value)?,
        None => return Err(Error::InvalidResponse("Missing id member".to_string())),
    };

    let outcome = match (obj.remove("result"), obj.remove("error")) {
        (Some(_), Some(_)) => {
            return Err(Error::InvalidResponse(
                "Response contains both result and error".to_string(),
            ))
        }
        (None, None) => {
            return Err(Error::InvalidResponse(
                "Response contains neither result nor error".to_string(),
            ))
        }
        (Some(result), None) => {
            if id.is_null() {
                return Err(Error::InvalidResponse(
                    "Success response must not have a null id".to_string(),
                ));
            }
            Ok(result)
        }
        (None, Some(error)) => Err(ResponseError::Rpc(parse_error_object(error)?)),
    };

    Ok(Response { id, outcome })
}

fn parse_id(value: Value) -> Result<RequestId> {
    match value {
        Value::Null => Ok(RequestId::Null),
        Value::String(s) => Ok(RequestId::String(s)),
        Value::Number(n) => n.as_i64().map(RequestId::Number).ok_or_else(|| {
            Error::InvalidResponse(format!("Id must be an integer, got {}", n))
        }),
        other => Err(Error::InvalidResponse(format!(
            "Id must be a string, number or null, got {}",
            kind_of(&other)
        ))),
    }
}

fn parse_error_object(value: Value) -> Result<RpcError> {
    let mut obj: Map<String, Value> = match value {
        Value::Object(obj) => obj,
        other => {
            return Err(Error::InvalidResponse(format!(
                "Error member must be an object, got {}",
                kind_of(&other)
            )))
        }
    };

    let code = obj
        .get("code")
        .and_then(Value::as_i64)
        .ok_or_else(|| Error::InvalidResponse("Error code must be an integer".to_string()))?;

    let message = match obj.remove("message") {
        Some(Value::String(message)) => message,
        _ => {
            return Err(Error::InvalidResponse(
                "Error message must be a string".to_string(),
            ))
        }
    };

    Ok(RpcError {
        code,
        message,
        data: obj.remove("data"),
    })
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn invalid(raw: &str) -> bool {
        matches!(validate(raw), Err(Error::InvalidResponse(_)))
    }

    #[test]
    fn test_success() {
        assert_eq!(
            validate(r#"{"jsonrpc":"2.0","result":5,"id":1}"#).unwrap(),
            json!(5)
        );
    }

    #[test]
    fn test_null_result() {
        assert_eq!(
            validate(r#"{"jsonrpc":"2.0","result":null,"id":"x"}"#).unwrap(),
            Value::Null
        );
    }

    #[test]
    fn test_error_response() {
        let err = validate(
            r#"{"jsonrpc":"2.0","error":{"code":-32601,"message":"Method not found"},"id":null}"#,
        )
        .unwrap_err();
        let rpc = err.as_rpc().expect("rpc error");
        assert_eq!(rpc.code, RpcError::METHOD_NOT_FOUND);
        assert_eq!(rpc.message, "Method not found");
        assert!(rpc.data.is_none());
    }

    #[test]
    fn test_error_with_data() {
        let body = parse(r#"{"jsonrpc":"2.0","error":{"code":1,"message":"m","data":[1]},"id":3}"#)
            .unwrap();
        match body {
            ResponseBody::Single(response) => {
                assert_eq!(response.id, RequestId::Number(3));
                let err = response.outcome.unwrap_err();
                assert_eq!(err.as_rpc().and_then(|e| e.data.clone()), Some(json!([1])));
            }
            other => panic!("unexpected body: {other:?}"),
        }
    }

    #[test]
    fn test_not_json() {
        assert!(matches!(validate("{not json"), Err(Error::Parse(_))));
        assert!(matches!(validate(""), Err(Error::Parse(_))));
    }

    #[test]
    fn test_wrong_version() {
        assert!(invalid(r#"{"jsonrpc":"1.0","result":5,"id":1}"#));
        assert!(invalid(r#"{"jsonrpc":2.0,"result":5,"id":1}"#));
        assert!(invalid(r#"{"result":5,"id":1}"#));
    }

    #[test]
    fn test_both_or_neither() {
        assert!(invalid(
            r#"{"jsonrpc":"2.0","result":5,"error":{"code":1,"message":"m"},"id":1}"#
        ));
        assert!(invalid(r#"{"jsonrpc":"2.0","id":1}"#));
    }

    #[test]
    fn test_id_rules() {
        assert!(invalid(r#"{"jsonrpc":"2.0","result":5}"#));
        assert!(invalid(r#"{"jsonrpc":"2.0","result":5,"id":null}"#));
        assert!(invalid(r#"{"jsonrpc":"2.0","result":5,"id":[1]}"#));
        assert!(invalid(r#"{"jsonrpc":"2.0","result":5,"id":1.5}"#));
    }

    #[test]
    fn test_malformed_error_object() {
        assert!(invalid(r#"{"jsonrpc":"2.0","error":"bad","id":1}"#));
        assert!(invalid(
            r#"{"jsonrpc":"2.0","error":{"code":"x","message":"m"},"id":1}"#
        ));
        assert!(invalid(r#"{"jsonrpc":"2.0","error":{"code":1},"id":1}"#));
        assert!(invalid(
            r#"{"jsonrpc":"2.0","error":{"code":1.5,"message":"m"},"id":1}"#
        ));
    }

    #[test]
    fn test_non_object() {
        assert!(invalid("5"));
        assert!(invalid("\"ok\""));
    }

    #[test]
    fn test_batch_mixed() {
        let body = parse(
            r#"[{"jsonrpc":"2.0","result":7,"id":1},
                {"jsonrpc":"2.0","error":{"code":-32602,"message":"Invalid params"},"id":2}]"#,
        )
        .unwrap();
        assert!(body.is_batch());

        let responses = body.into_vec();
        assert_eq!(responses.len(), 2);
        assert_eq!(responses[0].id, RequestId::Number(1));
        assert_eq!(responses[0].outcome, Ok(json!(7)));
        assert_eq!(responses[1].id, RequestId::Number(2));
        assert_eq!(
            responses[1].outcome.as_ref().unwrap_err().as_rpc().map(|e| e.code),
            Some(RpcError::INVALID_PARAMS)
        );
    }

    #[test]
    fn test_batch_duplicate_ids() {
        let err = parse(
            r#"[{"jsonrpc":"2.0","result":1,"id":1},{"jsonrpc":"2.0","result":2,"id":1}]"#,
        )
        .unwrap_err();
        assert!(matches!(err, Error::InvalidResponse(_)));
    }

    #[test]
    fn test_batch_null_ids_may_repeat() {
        let raw = r#"[{"jsonrpc":"2.0","error":{"code":-32600,"message":"a"},"id":null},
                      {"jsonrpc":"2.0","error":{"code":-32600,"message":"b"},"id":null}]"#;
        assert_eq!(parse(raw).unwrap().into_vec().len(), 2);
    }

    #[test]
    fn test_batch_invalid_entry_keeps_the_rest() {
        let responses = parse(
            r#"[{"jsonrpc":"2.0","result":1,"id":1},{"jsonrpc":"2.0","id":2},"junk"]"#,
        )
        .unwrap()
        .into_vec();
        assert_eq!(responses.len(), 3);

        assert_eq!(responses[0].id, RequestId::Number(1));
        assert_eq!(responses[0].outcome, Ok(json!(1)));

        assert_eq!(responses[1].id, RequestId::Number(2));
        match &responses[1].outcome {
            Err(ResponseError::Invalid(reason)) => assert!(reason.starts_with("Batch entry 1")),
            other => panic!("unexpected: {other:?}"),
        }

        assert_eq!(responses[2].id, RequestId::Null);
        assert!(matches!(
            responses[2].clone().into_result(),
            Err(Error::InvalidResponse(_))
        ));
    }

    #[test]
    fn test_batch_invalid_entries_still_count_for_duplicates() {
        let raw = r#"[{"jsonrpc":"2.0","result":1,"id":1},{"jsonrpc":"1.0","result":2,"id":1}]"#;
        assert!(matches!(parse(raw), Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_empty_batch() {
        assert!(matches!(parse("[]"), Err(Error::InvalidResponse(_))));
    }

    #[test]
    fn test_validate_rejects_batch() {
        assert!(invalid(r#"[{"jsonrpc":"2.0","result":1,"id":1}]"#));
    }
}
