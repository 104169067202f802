//! jrpc client library
//!
//! Sends JSON-RPC 2.0 requests and notifications over a pluggable transport.
//! [`Client`] drives a blocking [`Transport`], [`AsyncClient`] an
//! [`AsyncTransport`]; both share the same build, serialize and validate
//! steps from `jrpc-core`.
//!
//! ```no_run
//! use jrpc_client::{Args, Client, HttpTransport};
//!
//! # fn main() -> jrpc_client::Result<()> {
//! let client = Client::new(HttpTransport::new("http://localhost:5000/")?);
//! let sum = client.request("add", Args::new().arg(2).arg(3))?;
//! client.notify("log", Args::new().kwarg("message", "hello"))?;
//! # let _ = sum;
//! # Ok(())
//! # }
//! ```

pub mod async_client;
pub mod client;
pub mod config;
mod client_core;
pub mod http;
pub mod log;
pub mod options;
pub mod socket;
pub mod transport;

pub use async_client::AsyncClient;
pub use client::Client;
pub use config::{ClientConfig, IdGeneratorKind};
pub use http::{AsyncHttpTransport, HttpTransport};
pub use log::{LogExtra, LogSink, NoopSink, TracingSink};
pub use options::ClientOptions;
pub use socket::SocketTransport;
pub use transport::{AsyncTransport, Reply, SendOptions, Status, Transport};

pub use jrpc_core::{
    id, Args, Error, IdGenerator, Request, RequestId, Response, ResponseBody, ResponseError, Result,
    RpcError,
};
