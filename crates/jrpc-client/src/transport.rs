//! Transport seam between the protocol core and the network
//!
//! A transport moves one serialized message to the server and, when a
//! response is expected, hands back the raw reply text. It fails only for
//! problems outside the JSON-RPC envelope (connection refused, timeouts,
//! broken framing); a well-formed JSON-RPC error reply is a successful send.

use async_trait::async_trait;
use jrpc_core::Result;
use serde_json::{Map, Value};
use std::collections::BTreeMap;

/// Per-call options handed to a transport
#[derive(Debug, Clone, Copy)]
pub struct SendOptions<'a> {
    /// False for notifications; transports may skip reading a reply.
    pub expect_response: bool,
    /// Extra headers for transports that carry them. Override transport defaults.
    pub headers: &'a BTreeMap<String, String>,
}

/// Transport-level status of a reply, for transports that have one (HTTP)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub code: u16,
    /// Reason phrase. The HTTP transports report the standard phrase for
    /// `code` (empty for unregistered codes), not the text the server sent.
    pub reason: String,
}

impl Status {
    pub fn new(code: u16, reason: impl Into<String>) -> Self {
        Self {
            code,
            reason: reason.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.code)
    }
}

/// Raw reply received from a transport
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    pub text: String,
    pub status: Option<Status>,
}

impl Reply {
    /// A reply from a transport without status information
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            status: None,
        }
    }

    pub fn with_status(text: impl Into<String>, status: Status) -> Self {
        Self {
            text: text.into(),
            status: Some(status),
        }
    }

    /// Metadata passed to log sinks alongside the reply text.
    pub fn log_extra(&self) -> Map<String, Value> {
        let mut extra = Map::new();
        if let Some(status) = &self.status {
            extra.insert("http_code".to_string(), Value::from(status.code));
            extra.insert("http_reason".to_string(), Value::from(status.reason.clone()));
        }
        extra
    }
}

/// Blocking transport
pub trait Transport {
    fn send_message(&self, message: &str, options: &SendOptions<'_>) -> Result<Option<Reply>>;
}

/// Any function of the right shape is a transport.
impl<F> Transport for F
where
    F: Fn(&str, &SendOptions<'_>) -> Result<Option<Reply>>,
{
    fn send_message(&self, message: &str, options: &SendOptions<'_>) -> Result<Option<Reply>> {
        self(message, options)
    }
}

/// Non-blocking transport; only `send_message` suspends
#[async_trait]
pub trait AsyncTransport: Send + Sync {
    async fn send_message(
        &self,
        message: &str,
        options: &SendOptions<'_>,
    ) -> Result<Option<Reply>>;
}
