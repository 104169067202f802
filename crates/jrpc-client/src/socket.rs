//! Delimited stream transport
//!
//! Each message is written followed by a delimiter byte; a reply is read
//! up to the next delimiter. Works over any connected byte stream (Unix
//! socket, TCP). The stream is owned by the transport; one exchange runs at
//! a time so replies cannot interleave.

use async_trait::async_trait;
use futures::{SinkExt, StreamExt};
use jrpc_core::{Error, Result};
use std::io;
use std::path::Path;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::net::{TcpStream, ToSocketAddrs, UnixStream};
use tokio::sync::Mutex;
use tokio_util::codec::{AnyDelimiterCodec, Framed};

use crate::transport::{AsyncTransport, Reply, SendOptions};

pub const DEFAULT_DELIMITER: u8 = b'\n';

/// Upper bound on one reply; longer replies fail instead of buffering forever.
pub const MAX_REPLY_BYTES: usize = 16 * 1024 * 1024;

pub struct SocketTransport<S> {
    conn: Mutex<Connection<S>>,
}

struct Connection<S> {
    framed: Framed<S, AnyDelimiterCodec>,
    /// Replies owed by the peer to exchanges that were dropped before reading them
    unread: usize,
}

impl<S> Connection<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn read_frame(&mut self) -> Result<String> {
        match self.framed.next().await {
            Some(Ok(frame)) => String::from_utf8(frame.to_vec()).map_err(Error::transport),
            Some(Err(e)) => Err(Error::transport(e)),
            None => Err(Error::transport(io::Error::new(
                io::ErrorKind::UnexpectedEof,
                "connection closed before a reply was received",
            ))),
        }
    }

    async fn discard_unread(&mut self) -> Result<()> {
        while self.unread > 0 {
            let stale = self.read_frame().await?;
            self.unread -= 1;
            tracing::debug!(bytes = stale.len(), "discarded reply to an abandoned request");
        }
        Ok(())
    }
}

impl<S> SocketTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    pub fn new(stream: S) -> Self {
        Self::with_delimiter(stream, DEFAULT_DELIMITER)
    }

    pub fn with_delimiter(stream: S, delimiter: u8) -> Self {
        let codec =
            AnyDelimiterCodec::new_with_max_length(vec![delimiter], vec![delimiter], MAX_REPLY_BYTES);
        Self {
            conn: Mutex::new(Connection {
                framed: Framed::new(stream, codec),
                unread: 0,
            }),
        }
    }

    /// Give back the underlying stream
    pub fn into_inner(self) -> S {
        self.conn.into_inner().framed.into_inner()
    }
}

impl SocketTransport<UnixStream> {
    pub async fn connect_unix(path: impl AsRef<Path>) -> Result<Self> {
        let stream = UnixStream::connect(path).await.map_err(Error::transport)?;
        Ok(Self::new(stream))
    }
}

impl SocketTransport<TcpStream> {
    pub async fn connect_tcp(addr: impl ToSocketAddrs) -> Result<Self> {
        let stream = TcpStream::connect(addr).await.map_err(Error::transport)?;
        Ok(Self::new(stream))
    }
}

#[async_trait]
impl<S> AsyncTransport for SocketTransport<S>
where
    S: AsyncRead + AsyncWrite + Unpin + Send,
{
    async fn send_message(
        &self,
        message: &str,
        options: &SendOptions<'_>,
    ) -> Result<Option<Reply>> {
        let mut conn = self.conn.lock().await;
        conn.discard_unread().await?;

        // Once `feed` returns the frame is buffered and will reach the peer
        // with the next flush, so a reply is owed from here on.
        conn.framed.feed(message).await.map_err(Error::transport)?;
        if options.expect_response {
            conn.unread += 1;
        }
        SinkExt::<&str>::flush(&mut conn.framed)
            .await
            .map_err(Error::transport)?;
        tracing::debug!(bytes = message.len(), "message written");

        if !options.expect_response {
            return Ok(None);
        }

        let text = conn.read_frame().await?;
        conn.unread -= 1;
        Ok(Some(Reply::text(text)))
    }
}

impl<S> std::fmt::Debug for SocketTransport<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SocketTransport").finish_non_exhaustive()
    }
}
