//! HTTP transports
//!
//! Messages are POSTed to a single endpoint. Headers are layered: the
//! defaults below, then headers configured on the transport, then per-call
//! headers from the client options; later layers win.

use async_trait::async_trait;
use jrpc_core::{Args, Error, Result};
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use serde_json::Value;
use std::collections::BTreeMap;
use std::time::Duration;

use crate::client::Client;
use crate::options::ClientOptions;
use crate::transport::{AsyncTransport, Reply, SendOptions, Status, Transport};

pub const DEFAULT_HEADERS: [(&str, &str); 2] = [
    ("Content-Type", "application/json"),
    ("Accept", "application/json"),
];

/// HTTP basic credentials
#[derive(Clone)]
pub struct BasicAuth {
    username: String,
    password: String,
}

impl BasicAuth {
    pub fn new(username: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            username: username.into(),
            password: password.into(),
        }
    }

    pub fn to_header_value(&self) -> String {
        use base64::Engine;
        let credentials = format!("{}:{}", self.username, self.password);
        format!(
            "Basic {}",
            base64::engine::general_purpose::STANDARD.encode(credentials)
        )
    }
}

impl std::fmt::Debug for BasicAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BasicAuth")
            .field("username", &self.username)
            .finish_non_exhaustive()
    }
}

/// Builder shared by the blocking and async HTTP transports
#[derive(Debug, Clone)]
pub struct HttpTransportBuilder {
    endpoint: String,
    headers: BTreeMap<String, String>,
    auth: Option<BasicAuth>,
    timeout: Option<Duration>,
}

impl HttpTransportBuilder {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
            headers: BTreeMap::new(),
            auth: None,
            timeout: None,
        }
    }

    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.insert(name.into(), value.into());
        self
    }

    pub fn basic_auth(mut self, username: impl Into<String>, password: impl Into<String>) -> Self {
        self.auth = Some(BasicAuth::new(username, password));
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build a blocking transport. Must not be called from inside an async runtime.
    pub fn build(self) -> Result<HttpTransport> {
        let headers = self.header_map()?;
        let mut builder = reqwest::blocking::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::transport)?;
        Ok(HttpTransport {
            endpoint: self.endpoint,
            headers,
            client,
        })
    }

    pub fn build_async(self) -> Result<AsyncHttpTransport> {
        let headers = self.header_map()?;
        let mut builder = reqwest::Client::builder();
        if let Some(timeout) = self.timeout {
            builder = builder.timeout(timeout);
        }
        let client = builder.build().map_err(Error::transport)?;
        Ok(AsyncHttpTransport {
            endpoint: self.endpoint,
            headers,
            client,
        })
    }

    fn header_map(&self) -> Result<HeaderMap> {
        if self.endpoint.trim().is_empty() {
            return Err(Error::Config("HTTP endpoint cannot be empty".to_string()));
        }

        let mut map = HeaderMap::new();
        let defaults = DEFAULT_HEADERS
            .iter()
            .map(|(name, value)| (name.to_string(), value.to_string()));
        for (name, value) in defaults.chain(self.headers.clone()) {
            let (name, value) = parse_header(&name, &value).map_err(Error::Config)?;
            map.insert(name, value);
        }
        if let Some(auth) = &self.auth {
            let value = HeaderValue::from_str(&auth.to_header_value())
                .map_err(|e| Error::Config(format!("Invalid credentials: {}", e)))?;
            map.insert(reqwest::header::AUTHORIZATION, value);
        }
        Ok(map)
    }
}

fn parse_header(name: &str, value: &str) -> std::result::Result<(HeaderName, HeaderValue), String> {
    let name = HeaderName::from_bytes(name.as_bytes())
        .map_err(|e| format!("Invalid header name '{}': {}", name, e))?;
    let value = HeaderValue::from_str(value)
        .map_err(|e| format!("Invalid value for header '{}': {}", name, e))?;
    Ok((name, value))
}

/// Transport headers overlaid with the per-call headers.
fn merged_headers(base: &HeaderMap, options: &SendOptions<'_>) -> Result<HeaderMap> {
    let mut headers = base.clone();
    for (name, value) in options.headers {
        let (name, value) = parse_header(name, value).map_err(Error::InvalidArguments)?;
        headers.insert(name, value);
    }
    Ok(headers)
}

/// reqwest does not surface the server's reason phrase, so the canonical one stands in.
fn status_of(code: reqwest::StatusCode) -> Status {
    Status::new(code.as_u16(), code.canonical_reason().unwrap_or_default())
}

/// Blocking HTTP transport
#[derive(Debug, Clone)]
pub struct HttpTransport {
    endpoint: String,
    headers: HeaderMap,
    client: reqwest::blocking::Client,
}

impl HttpTransport {
    /// Transport with default headers and no timeout
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        Self::builder(endpoint).build()
    }

    pub fn builder(endpoint: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Headers that a call with `options` would carry.
    pub fn headers_for(&self, options: &SendOptions<'_>) -> Result<HeaderMap> {
        merged_headers(&self.headers, options)
    }
}

impl Transport for HttpTransport {
    fn send_message(&self, message: &str, options: &SendOptions<'_>) -> Result<Option<Reply>> {
        let headers = self.headers_for(options)?;
        tracing::debug!(endpoint = %self.endpoint, bytes = message.len(), "POST");

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .body(message.to_string())
            .send()
            .map_err(Error::transport)?;

        let status = status_of(response.status());
        let text = response.text().map_err(Error::transport)?;
        Ok(Some(Reply::with_status(text, status)))
    }
}

/// Async HTTP transport
#[derive(Debug, Clone)]
pub struct AsyncHttpTransport {
    endpoint: String,
    headers: HeaderMap,
    client: reqwest::Client,
}

impl AsyncHttpTransport {
    pub fn new(endpoint: impl Into<String>) -> Result<Self> {
        HttpTransportBuilder::new(endpoint).build_async()
    }

    pub fn builder(endpoint: impl Into<String>) -> HttpTransportBuilder {
        HttpTransportBuilder::new(endpoint)
    }

    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    pub fn headers_for(&self, options: &SendOptions<'_>) -> Result<HeaderMap> {
        merged_headers(&self.headers, options)
    }
}

#[async_trait]
impl AsyncTransport for AsyncHttpTransport {
    async fn send_message(
        &self,
        message: &str,
        options: &SendOptions<'_>,
    ) -> Result<Option<Reply>> {
        let headers = self.headers_for(options)?;
        tracing::debug!(endpoint = %self.endpoint, bytes = message.len(), "POST");

        let response = self
            .client
            .post(&self.endpoint)
            .headers(headers)
            .body(message.to_string())
            .send()
            .await
            .map_err(Error::transport)?;

        let status = status_of(response.status());
        let text = response.text().await.map_err(Error::transport)?;
        Ok(Some(Reply::with_status(text, status)))
    }
}

/// One-shot request over a fresh blocking HTTP client.
pub fn request(endpoint: &str, method: &str, args: impl Into<Args>) -> Result<Value> {
    request_with_options(endpoint, method, args, ClientOptions::default())
}

/// One-shot request with explicit client options (id generator, log
/// trimming, headers, log sink).
pub fn request_with_options(
    endpoint: &str,
    method: &str,
    args: impl Into<Args>,
    options: ClientOptions,
) -> Result<Value> {
    Client::with_options(HttpTransport::new(endpoint)?, options).request(method, args)
}

/// One-shot notification over a fresh blocking HTTP client.
pub fn notify(endpoint: &str, method: &str, args: impl Into<Args>) -> Result<()> {
    notify_with_options(endpoint, method, args, ClientOptions::default())
}

pub fn notify_with_options(
    endpoint: &str,
    method: &str,
    args: impl Into<Args>,
    options: ClientOptions,
) -> Result<()> {
    Client::with_options(HttpTransport::new(endpoint)?, options).notify(method, args)
}
