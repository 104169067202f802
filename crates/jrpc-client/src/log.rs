//! Request and response log sinks

use serde_json::{Map, Value};

pub type LogExtra = Map<String, Value>;

/// Receives every outgoing message and every raw reply.
///
/// Both hooks default to doing nothing, so a sink may implement just one.
pub trait LogSink: Send + Sync {
    fn request_log(&self, _message: &str, _extra: &LogExtra) {}

    fn response_log(&self, _message: &str, _extra: &LogExtra) {}
}

/// Default sink: `tracing` events at INFO on the
/// `jrpc_client::request` and `jrpc_client::response` targets.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl LogSink for TracingSink {
    fn request_log(&self, message: &str, _extra: &LogExtra) {
        tracing::info!(target: "jrpc_client::request", "--> {}", message);
    }

    fn response_log(&self, message: &str, extra: &LogExtra) {
        match (extra.get("http_code"), extra.get("http_reason")) {
            (Some(code), Some(reason)) => tracing::info!(
                target: "jrpc_client::response",
                "<-- {} ({} {})",
                message,
                code,
                reason.as_str().unwrap_or_default()
            ),
            _ => tracing::info!(target: "jrpc_client::response", "<-- {}", message),
        }
    }
}

/// Sink that drops everything
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSink;

impl LogSink for NoopSink {}
