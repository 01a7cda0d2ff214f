/// Ledger Mock Server
///
/// A lightweight in-memory stand-in for the fullnode transaction API.
/// Designed for local development and integration testing.

use anyhow::{Context, Result};
use std::env;
use std::sync::Arc;

use ledger_mock::{run_server, LedgerStore};

#[derive(Debug)]
struct Config {
    server_host: String,
    server_port: u16,
}

impl Config {
    fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();

        let server_host = env::var("SERVER_HOST").unwrap_or_else(|_| "0.0.0.0".to_string());

        let server_port = env::var("SERVER_PORT")
            .unwrap_or_else(|_| "8080".to_string())
            .parse()
            .context("Invalid SERVER_PORT")?;

        Ok(Self {
            server_host,
            server_port,
        })
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    log::info!("Starting Ledger Mock Server...");

    let config = Config::from_env().context("Failed to load configuration")?;
    log::info!(
        "Server will listen on {}:{}",
        config.server_host,
        config.server_port
    );

    let store = Arc::new(LedgerStore::new());

    run_server(store, config.server_host, config.server_port)
        .await
        .context("Server error")?;

    Ok(())
}
