//! Blocking client

use jrpc_core::{Args, Request, Response, Result};
use serde_json::Value;

use crate::client_core::ClientCore;
use crate::options::ClientOptions;
use crate::transport::Transport;

/// JSON-RPC client over a blocking [`Transport`]
#[derive(Debug)]
pub struct Client<T> {
    transport: T,
    core: ClientCore,
}

impl<T: Transport> Client<T> {
    /// Create a client with default options
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ClientOptions::default())
    }

    pub fn with_options(transport: T, options: ClientOptions) -> Self {
        Self {
            transport,
            core: ClientCore::new(options),
        }
    }

    /// Call `method` and wait for its result
    pub fn request(&self, method: &str, args: impl Into<Args>) -> Result<Value> {
        let request = self.core.build(method, args.into(), true)?;
        self.send_request(&request)
    }

    /// Call `method` without expecting a response
    pub fn notify(&self, method: &str, args: impl Into<Args>) -> Result<()> {
        let request = self.core.build(method, args.into(), false)?;
        self.send_notification(&request)
    }

    /// Send a pre-built request. Returns `None` for notifications.
    pub fn send(&self, request: &Request) -> Result<Option<Value>> {
        if request.is_notification() {
            self.send_notification(request)?;
            Ok(None)
        } else {
            self.send_request(request).map(Some)
        }
    }

    /// Send several requests as one batch message.
    ///
    /// Responses come back in the order the server sent them; match them to
    /// requests by id.
    pub fn send_batch(&self, requests: &[Request]) -> Result<Vec<Response>> {
        let message = self.core.outgoing_batch(requests)?;
        let expect_response = requests.iter().any(|r| !r.is_notification());
        let reply = self
            .transport
            .send_message(&message, &self.core.send_options(expect_response))?;
        self.core.finish_batch(requests, reply)
    }

    fn send_request(&self, request: &Request) -> Result<Value> {
        let message = self.core.outgoing(request)?;
        let reply = self
            .transport
            .send_message(&message, &self.core.send_options(true))?;
        self.core.finish_request(request, reply)
    }

    fn send_notification(&self, request: &Request) -> Result<()> {
        let message = self.core.outgoing(request)?;
        let reply = self
            .transport
            .send_message(&message, &self.core.send_options(false))?;
        self.core.finish_notification(reply)
    }

    pub fn options(&self) -> &ClientOptions {
        &self.core.options
    }

    pub fn options_mut(&mut self) -> &mut ClientOptions {
        &mut self.core.options
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn into_transport(self) -> T {
        self.transport
    }
}
