/// Axum HTTP server setup and routing

use axum::{
    routing::{get, post},
    Router,
};
use std::net::SocketAddr;
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::handlers::*;
use crate::store::LedgerStore;

pub fn create_router(store: Arc<LedgerStore>) -> Router {
    // Wallet frontends call the fullnode cross-origin
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    Router::new()
        .route("/health", get(health_check))
        // Fullnode transaction lookup
        .route("/v1/transactions/by_hash/:hash", get(get_transaction_by_hash))
        // Mock control endpoints
        .route("/v1/mock/transactions", post(seed_transaction))
        .route("/v1/mock/transactions/:hash/commit", post(commit_transaction))
        .with_state(store)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}

pub async fn run_server(store: Arc<LedgerStore>, host: String, port: u16) -> anyhow::Result<()> {
    let app = create_router(store);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    log::info!("🚀 Ledger mock server listening on http://{}", addr);
    log::info!("🔎 Lookup endpoint: GET /v1/transactions/by_hash/:hash");
    log::info!("🔨 Commit endpoint: POST /v1/mock/transactions/:hash/commit");

    axum::serve(listener, app).await?;

    Ok(())
}

/// Serve on an ephemeral localhost port in the background
///
/// Returns the bound address; the server lives until the runtime shuts down.
pub async fn spawn_local(store: Arc<LedgerStore>) -> anyhow::Result<SocketAddr> {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;
    let app = create_router(store);

    tokio::spawn(async move {
        if let Err(e) = axum::serve(listener, app).await {
            log::error!("❌ Ledger mock server error: {}", e);
        }
    });

    log::debug!("Ledger mock spawned on http://{}", addr);
    Ok(addr)
}
