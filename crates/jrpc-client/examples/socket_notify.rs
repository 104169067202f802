//! Talk to a newline-delimited JSON-RPC server on a Unix socket.
//!
//! Usage: `cargo run --example socket_notify -- /tmp/server.sock`

use anyhow::Result;
use jrpc_client::{Args, AsyncClient, ClientOptions, SocketTransport};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter("jrpc_client=debug")
        .init();

    let socket = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/jrpc.sock".to_string());

    let transport = SocketTransport::connect_unix(&socket).await?;
    let client = AsyncClient::with_options(transport, ClientOptions::new().trim_log_values(true));

    client
        .notify("log", Args::new().kwarg("level", "info").kwarg("message", "hello"))
        .await?;

    match client.request("status", ()).await {
        Ok(status) => tracing::info!("Server status: {}", status),
        Err(e) => match e.as_rpc() {
            Some(rpc) => tracing::warn!("Server rejected status: {}", rpc),
            None => return Err(e.into()),
        },
    }

    Ok(())
}
