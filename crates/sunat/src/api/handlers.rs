use axum::{extract::State, http::StatusCode, response::Json};
use serde::{Deserialize, Serialize};
use serde_json::json;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use sunat_scout::{DocumentRecord, ProcessRequest, ProcessSummary, ScanWarning};
use tracing::info;

use super::errors::ApiError;
use super::router::AppState;

#[derive(Debug, Deserialize)]
pub struct FindRequest {
    pub path: PathBuf,
}

#[derive(Debug, Serialize)]
pub struct FindResponse {
    pub search_path: PathBuf,
    pub files_found: usize,
    pub files: Vec<DocumentRecord>,
    pub warnings: Vec<ScanWarning>,
}

#[derive(Debug, Deserialize)]
pub struct ProcessBody {
    pub search_path: PathBuf,
    pub output_dir: PathBuf,
    #[serde(default)]
    pub delete_originals: bool,
}

fn is_absolute_dir(path: &Path) -> bool {
    path.is_absolute() && path.is_dir()
}

/// GET /health
pub async fn health_handler() -> (StatusCode, Json<serde_json::Value>) {
    (
        StatusCode::OK,
        Json(json!({
            "status": "ok",
            "service": "sunat",
            "version": env!("CARGO_PKG_VERSION"),
        })),
    )
}

/// POST /find
pub async fn find_handler(
    State(state): State<Arc<AppState>>,
    Json(request): Json<FindRequest>,
) -> Result<Json<FindResponse>, ApiError> {
    if !is_absolute_dir(&request.path) {
        return Err(ApiError::bad_request(format!(
            "Invalid or non-existent path: {}",
            request.path.display()
        )));
    }
    info!(path = %request.path.display(), "find request");

    let scanner = state.scanner.clone();
    let root = request.path.clone();
    let discovery = tokio::task::spawn_blocking(move || scanner.discover(&root)).await??;

    Ok(Json(FindResponse {
        search_path: request.path,
        files_found: discovery.records.len(),
        files: discovery.records,
        warnings: discovery.warnings,
    }))
}

/// POST /process
pub async fn process_handler(
    State(state): State<Arc<AppState>>,
    Json(body): Json<ProcessBody>,
) -> Result<Json<ProcessSummary>, ApiError> {
    if !is_absolute_dir(&body.search_path) {
        return Err(ApiError::bad_request(format!(
            "Invalid or non-existent search path: {}",
            body.search_path.display()
        )));
    }
    if !is_absolute_dir(&body.output_dir) {
        return Err(ApiError::bad_request(format!(
            "Output directory must be an absolute and existing path: {}",
            body.output_dir.display()
        )));
    }
    info!(
        search_path = %body.search_path.display(),
        output_dir = %body.output_dir.display(),
        delete_originals = body.delete_originals,
        "process request"
    );

    let request = ProcessRequest {
        search_path: body.search_path,
        output_dir: body.output_dir,
        delete_originals: body.delete_originals,
        log_dir: state.log_dir.clone(),
    };
    let scanner = state.scanner.clone();
    let summary =
        tokio::task::spawn_blocking(move || sunat_scout::process(&scanner, &request)).await??;
    Ok(Json(summary))
}
