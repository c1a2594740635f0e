use axum::{
    routing::{get, post},
    Router,
};
use std::path::PathBuf;
use std::sync::Arc;
use sunat_scout::Scanner;

use super::handlers::{find_handler, health_handler, process_handler};

/// Application state container
pub struct AppState {
    pub scanner: Scanner,
    /// Where `process_<ts>.txt` reports go
    pub log_dir: PathBuf,
}

/// Create router with all routes
pub fn create_router(state: AppState) -> Router {
    let state = Arc::new(state);

    Router::new()
        .route("/health", get(health_handler))
        .route("/find", post(find_handler))
        .route("/process", post(process_handler))
        .with_state(state)
}
