//! PDF upload and ingestion.

use std::io::Write;
use std::sync::Arc;

use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::routing::post;
use axum::{Json, Router};
use lectern_core::Error;
use lectern_ingest::{IngestSummary, Ingester, RecursiveSplitter};
use serde_json::{json, Value};
use tracing::info;

use crate::error::ApiError;
use crate::state::AppState;

pub fn routes() -> Router<Arc<AppState>> {
    Router::new().route("/uploadfile", post(upload_file))
}

/// POST /uploadfile — ingest the PDF in multipart field `file`.
async fn upload_file(
    State(state): State<Arc<AppState>>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Value>, ApiError> {
    let mut multipart = multipart.map_err(|e| ApiError::bad_request(e.body_text()))?;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::bad_request(format!("Invalid multipart body: {}", e)))?
    {
        if field.name() != Some("file") {
            continue;
        }

        let display_name = field
            .file_name()
            .map(|name| name.to_string())
            .unwrap_or_else(|| "upload.pdf".to_string());
        let bytes = field
            .bytes()
            .await
            .map_err(|e| ApiError::bad_request(format!("Failed to read upload: {}", e)))?;

        let task_state = state.clone();
        let summary = tokio::task::spawn_blocking(move || {
            ingest_upload(&task_state, &bytes, &display_name)
        })
        .await
        .map_err(|e| Error::Ingest(format!("ingestion task failed: {}", e)))??;

        info!(
            "Upload {} stored as {} segments",
            summary.filename,
            summary.segment_ids.len()
        );
        return Ok(Json(json!({ "message": "Files uploaded successfully" })));
    }

    Err(ApiError::bad_request("Missing multipart field 'file'"))
}

/// Spool the upload to a temporary `.pdf` and ingest it. The file is removed
/// when the spool is dropped, on success and on failure.
fn ingest_upload(
    state: &AppState,
    bytes: &[u8],
    display_name: &str,
) -> lectern_core::Result<IngestSummary> {
    let mut spool = tempfile::Builder::new()
        .prefix("lectern-upload-")
        .suffix(".pdf")
        .tempfile()?;
    spool.write_all(bytes)?;
    spool.flush()?;

    let splitter = RecursiveSplitter::new(state.config.chunk_size, state.config.chunk_overlap);
    Ingester::new(&state.store, state.embedder.as_ref())
        .with_splitter(splitter)
        .ingest_file(spool.path(), display_name)
}
