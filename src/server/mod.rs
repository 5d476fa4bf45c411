//! HTTP upload endpoint
//!
//! | Method | Path                             | Body                          |
//! |--------|----------------------------------|-------------------------------|
//! | POST   | `/excel/qr-to-firebase-and-api`  | multipart, workbook in `file` |
//! | GET    | `/health`                        | -                             |
//!
//! The upload answers with the batch result as JSON. Uploads are processed one at a
//! time so pacing bounds the downstream call rate for the whole process.

use crate::config::ServerConfig;
use crate::core::pipeline::BatchOrchestrator;
use crate::domain::{QrBatchError, Result};
use crate::log_error_with_context;
use axum::extract::{DefaultBodyLimit, Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::sync::Mutex;

pub const UPLOAD_PATH: &str = "/excel/qr-to-firebase-and-api";
pub const UPLOAD_FIELD: &str = "file";

#[derive(Clone)]
struct AppState {
    orchestrator: Arc<BatchOrchestrator>,
    batch_lock: Arc<Mutex<()>>,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
}

fn error_response(status: StatusCode, message: impl Into<String>) -> Response {
    (
        status,
        Json(ErrorResponse {
            error: message.into(),
        }),
    )
        .into_response()
}

/// HTTP status for an error that aborted a batch
pub fn status_for(err: &QrBatchError) -> StatusCode {
    match err {
        QrBatchError::Schema(_) | QrBatchError::Workbook(_) => StatusCode::UNPROCESSABLE_ENTITY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

/// Builds the router
pub fn router(orchestrator: Arc<BatchOrchestrator>, max_upload_mb: usize) -> Router {
    let state = AppState {
        orchestrator,
        batch_lock: Arc::new(Mutex::new(())),
    };

    Router::new()
        .route(UPLOAD_PATH, post(handle_upload))
        .route("/health", get(|| async { "ok" }))
        .layer(DefaultBodyLimit::max(max_upload_mb * 1024 * 1024))
        .with_state(state)
}

/// Binds and serves until Ctrl-C
///
/// # Errors
///
/// [`QrBatchError::Configuration`] for a bad bind address, [`QrBatchError::Io`] if
/// the listener fails.
pub async fn serve(config: &ServerConfig, orchestrator: Arc<BatchOrchestrator>) -> Result<()> {
    let addr: SocketAddr = config.bind.parse().map_err(|e| {
        QrBatchError::Configuration(format!("server.bind '{}' is invalid: {e}", config.bind))
    })?;
    let listener = tokio::net::TcpListener::bind(addr).await?;

    tracing::info!(addr = %addr, "Server listening");

    axum::serve(listener, router(orchestrator, config.max_upload_mb))
        .with_graceful_shutdown(async {
            if tokio::signal::ctrl_c().await.is_ok() {
                tracing::info!("Shutdown signal received");
            }
        })
        .await?;

    Ok(())
}

async fn handle_upload(State(state): State<AppState>, mut multipart: Multipart) -> Response {
    let mut upload: Option<Vec<u8>> = None;

    loop {
        match multipart.next_field().await {
            Ok(Some(field)) => {
                if field.name() != Some(UPLOAD_FIELD) {
                    continue;
                }
                match field.bytes().await {
                    Ok(bytes) => upload = Some(bytes.to_vec()),
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read upload bytes");
                        return error_response(StatusCode::BAD_REQUEST, "Failed to read file data.");
                    }
                }
            }
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Malformed multipart body");
                return error_response(StatusCode::BAD_REQUEST, format!("Malformed multipart body: {e}"));
            }
        }
    }

    let bytes = match upload {
        Some(bytes) if !bytes.is_empty() => bytes,
        _ => {
            return error_response(
                StatusCode::BAD_REQUEST,
                "Upload an Excel workbook (.xlsx) in the \"file\" field.",
            )
        }
    };

    tracing::info!(size = bytes.len(), "Workbook received");

    let _batch = state.batch_lock.lock().await;
    match state.orchestrator.process(&bytes).await {
        Ok(batch) => (StatusCode::OK, Json(batch)).into_response(),
        Err(e) => {
            log_error_with_context!(&e, "Batch rejected");
            error_response(status_for(&e), e.to_string())
        }
    }
}
