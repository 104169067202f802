//! Client options

use jrpc_core::id::Decimal;
use jrpc_core::IdGenerator;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use crate::log::{LogSink, TracingSink};

/// Options owned by a client.
///
/// Changing them between calls (through `options_mut`) is allowed; sharing a
/// client across threads while doing so is the caller's business.
#[derive(Clone)]
pub struct ClientOptions {
    /// Source of request ids. Defaults to sequential integers from 1.
    pub id_generator: Arc<dyn IdGenerator>,
    /// Shorten long values in logged messages (never on the wire).
    pub trim_log_values: bool,
    /// Headers passed to the transport on every call.
    pub headers: BTreeMap<String, String>,
    /// Where outgoing messages and replies are logged. `None` logs nothing.
    pub log_sink: Option<Arc<dyn LogSink>>,
}

impl ClientOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id_generator(mut self, id_generator: impl IdGenerator + 'static) -> Self {
        self.id_generator = Arc::new(id_generator);
        self
    }

    pub fn trim_log_values(mut self, trim: bool) -> Self {
        self.trim_log_values = trim;
        self
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn log_sink(mut self, sink: impl LogSink + 'static) -> Self {
        self.log_sink = Some(Arc::new(sink));
        self
    }

    pub fn without_logging(mut self) -> Self {
        self.log_sink = None;
        self
    }
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            id_generator: Arc::new(Decimal::new()),
            trim_log_values: false,
            headers: BTreeMap::new(),
            log_sink: Some(Arc::new(TracingSink)),
        }
    }
}

impl fmt::Debug for ClientOptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ClientOptions")
            .field("trim_log_values", &self.trim_log_values)
            .field("headers", &self.headers)
            .field("logging", &self.log_sink.is_some())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use jrpc_core::id::Hexadecimal;
    use jrpc_core::RequestId;

    #[test]
    fn test_defaults() {
        let options = ClientOptions::default();
        assert!(!options.trim_log_values);
        assert!(options.headers.is_empty());
        assert!(options.log_sink.is_some());
        assert_eq!(options.id_generator.next_id(), RequestId::Number(1));
    }

    #[test]
    fn test_builder() {
        let options = ClientOptions::new()
            .id_generator(Hexadecimal::starting_at(10))
            .trim_log_values(true)
            .header("X-Trace", "abc")
            .without_logging();

        assert!(options.trim_log_values);
        assert_eq!(options.headers["X-Trace"], "abc");
        assert!(options.log_sink.is_none());
        assert_eq!(options.id_generator.next_id(), RequestId::from("a"));
    }
}
