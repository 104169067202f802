//! Request ids and the generators that produce them

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU64, Ordering};

/// Request ID (can be string, number, or null)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(untagged)]
pub enum RequestId {
    Number(i64),
    String(String),
    Null,
}

impl RequestId {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }
}

impl fmt::Display for RequestId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Number(n) => write!(f, "{}", n),
            Self::String(s) => write!(f, "{:?}", s),
            Self::Null => f.write_str("null"),
        }
    }
}

impl From<i64> for RequestId {
    fn from(n: i64) -> Self {
        Self::Number(n)
    }
}

impl From<&str> for RequestId {
    fn from(s: &str) -> Self {
        Self::String(s.to_string())
    }
}

impl From<String> for RequestId {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

/// Source of ids for requests that expect a response.
///
/// Generators are shared by every call made through a client, so advancing
/// one must be safe from several threads at once.
pub trait IdGenerator: Send + Sync {
    fn next_id(&self) -> RequestId;
}

impl<F> IdGenerator for F
where
    F: Fn() -> RequestId + Send + Sync,
{
    fn next_id(&self) -> RequestId {
        self()
    }
}

/// Sequential integer ids: 1, 2, 3, ...
#[derive(Debug)]
pub struct Decimal {
    next: AtomicI64,
}

impl Decimal {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(start: i64) -> Self {
        Self {
            next: AtomicI64::new(start),
        }
    }
}

impl Default for Decimal {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for Decimal {
    fn next_id(&self) -> RequestId {
        RequestId::Number(self.next.fetch_add(1, Ordering::SeqCst))
    }
}

/// Sequential ids rendered as lowercase hex strings: "1", ..., "9", "a", "b", ...
#[derive(Debug)]
pub struct Hexadecimal {
    next: AtomicU64,
}

impl Hexadecimal {
    pub fn new() -> Self {
        Self::starting_at(1)
    }

    pub fn starting_at(start: u64) -> Self {
        Self {
            next: AtomicU64::new(start),
        }
    }
}

impl Default for Hexadecimal {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for Hexadecimal {
    fn next_id(&self) -> RequestId {
        let n = self.next.fetch_add(1, Ordering::SeqCst);
        RequestId::String(format!("{:x}", n))
    }
}

const RANDOM_CHARS: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Short random strings over `[a-z0-9]`. Collisions are not checked.
#[derive(Debug, Clone)]
pub struct Random {
    length: usize,
}

impl Random {
    pub const DEFAULT_LENGTH: usize = 8;

    pub fn new() -> Self {
        Self::with_length(Self::DEFAULT_LENGTH)
    }

    pub fn with_length(length: usize) -> Self {
        Self { length }
    }
}

impl Default for Random {
    fn default() -> Self {
        Self::new()
    }
}

impl IdGenerator for Random {
    fn next_id(&self) -> RequestId {
        let mut rng = rand::rng();
        let id: String = (0..self.length)
            .map(|_| RANDOM_CHARS[rng.random_range(0..RANDOM_CHARS.len())] as char)
            .collect();
        RequestId::String(id)
    }
}

/// UUID v4 strings
#[derive(Debug, Clone, Copy, Default)]
pub struct UuidV4;

impl IdGenerator for UuidV4 {
    fn next_id(&self) -> RequestId {
        RequestId::String(uuid::Uuid::new_v4().to_string())
    }
}
