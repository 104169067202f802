//! Async client

use jrpc_core::{Args, Request, Response, Result};
use serde_json::Value;

use crate::client_core::ClientCore;
use crate::options::ClientOptions;
use crate::transport::AsyncTransport;

/// JSON-RPC client over an [`AsyncTransport`].
///
/// Building, serializing and validating run synchronously; only the
/// transport's `send_message` is awaited.
#[derive(Debug)]
pub struct AsyncClient<T> {
    transport: T,
    core: ClientCore,
}

impl<T: AsyncTransport> AsyncClient<T> {
    pub fn new(transport: T) -> Self {
        Self::with_options(transport, ClientOptions::default())
    }

    pub fn with_options(transport: T, options: ClientOptions) -> Self {
        Self {
            transport,
            core: ClientCore::new(options),
        }
    }

    /// Call `method` and await its result
    pub async fn request(&self, method: &str, args: impl Into<Args>) -> Result<Value> {
        let request = self.core.build(method, args.into(), true)?;
        self.send_request(&request).await
    }

    /// Call `method` without expecting a response
    pub async fn notify(&self, method: &str, args: impl Into<Args>) -> Result<()> {
        let request = self.core.build(method, args.into(), false)?;
        self.send_notification(&request).await
    }

    /// Send a pre-built request. Returns `None` for notifications.
    pub async fn send(&self, request: &Request) -> Result<Option<Value>> {
        if request.is_notification() {
            self.send_notification(request).await?;
            Ok(None)
        } else {
            self.send_request(request).await.map(Some)
        }
    }

    /// Send several requests as one batch message.
    pub async fn send_batch(&self, requests: &[Request]) -> Result<Vec<Response>> {
        let message = self.core.outgoing_batch(requests)?;
        let expect_response = requests.iter().any(|r| !r.is_notification());
        let reply = self
            .transport
            .send_message(&message, &self.core.send_options(expect_response))
            .await?;
        self.core.finish_batch(requests, reply)
    }

    async fn send_request(&self, request: &Request) -> Result<Value> {
        let message = self.core.outgoing(request)?;
        let reply = self
            .transport
            .send_message(&message, &self.core.send_options(true))
            .await?;
        self.core.finish_request(request, reply)
    }

    async fn send_notification(&self, request: &Request) -> Result<()> {
        let message = self.core.outgoing(request)?;
        let reply = self
            .transport
            .send_message(&message, &self.core.send_options(false))
            .await?;
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
