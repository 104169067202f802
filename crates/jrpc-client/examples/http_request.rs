//! Call a method on an HTTP JSON-RPC server.
//!
//! Usage: `cargo run --example http_request -- [config.json] [method] [args...]`
//!
//! Positional args are parsed as JSON where possible, otherwise sent as
//! strings. Set `RUST_LOG=jrpc_client=info` to see the exchanged messages.

use anyhow::Result;
use jrpc_client::{Args, Client, ClientConfig};
use serde_json::Value;

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            std::env::var("RUST_LOG").unwrap_or_else(|_| "jrpc_client=info".to_string()),
        )
        .init();

    let mut argv = std::env::args().skip(1);
    let config_path = argv.next().unwrap_or_else(|| "jrpc.json".to_string());
    let method = argv.next().unwrap_or_else(|| "ping".to_string());

    let args = argv.fold(Args::new(), |args, raw| {
        let value = serde_json::from_str(&raw).unwrap_or(Value::String(raw));
        args.arg(value)
    });

    let config = ClientConfig::load(&config_path)?;
    tracing::info!("Endpoint: {}", config.endpoint);

    let client = Client::with_options(config.http_transport()?, config.to_options());
    let result = client.request(&method, args)?;
    println!("{}", serde_json::to_string_pretty(&result)?);

    Ok(())
}
