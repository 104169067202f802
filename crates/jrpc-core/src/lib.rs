//! jrpc core
//!
//! Transport-independent JSON-RPC 2.0 protocol pieces: request ids, request
//! construction, canonical serialization and response validation.

pub mod canonical;
pub mod error;
pub mod id;
pub mod request;
pub mod response;
pub mod trim;

pub use error::{Error, Result, RpcError};
pub use id::{IdGenerator, RequestId};
pub use request::{Args, Request};
pub use response::{Response, ResponseBody, ResponseError};

/// Protocol version carried by every message
pub const JSON_RPC_VERSION: &str = "2.0";
