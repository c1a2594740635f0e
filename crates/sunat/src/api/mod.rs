//! HTTP collaborator: thin JSON shaping over discovery and processing.
//!
//! Core work is synchronous and runs on the blocking pool.

pub mod errors;
pub mod handlers;
pub mod router;

pub use errors::ApiError;
pub use router::{create_router, AppState};

use anyhow::{Context, Result};
use tracing::info;

/// Bind `addr` and serve until Ctrl-C.
pub async fn serve(addr: &str, state: AppState) -> Result<()> {
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    info!(addr, "HTTP API listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("HTTP server error")?;
    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::warn!("Failed to listen for shutdown signal: {}", err);
    }
    info!("Shutdown signal received");
}
