//! Unified server error type.
//!
//! Every handler returns `Result<T, ServerError>`, which implements
//! [`axum::response::IntoResponse`] so errors are automatically converted
//! to a JSON-body HTTP response with an appropriate status code.
//!
//! **Security note:** Internal errors (pipeline, database) are logged with
//! full detail but only a short message is returned to the caller so that
//! upstream response bodies, file paths, or SQL never leak to clients.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reelforge_core::PipelineError;
use serde_json::json;
use thiserror::Error;
use tracing::error;

/// All errors that can occur in the reelforge-server request lifecycle.
#[derive(Debug, Error)]
pub enum ServerError {
    /// Propagated from the reel generation pipeline.
    #[error("pipeline error: {0}")]
    Pipeline(#[from] PipelineError),

    /// Propagated from the SQLite (or other) store.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// The caller referenced a resource that does not exist.
    #[error("not found: {0}")]
    NotFound(String),

    /// The caller sent an invalid or malformed request.
    #[error("bad request: {0}")]
    BadRequest(String),

    /// The requested operation needs a strategy that is not configured.
    #[error("unavailable: {0}")]
    Unavailable(String),

    /// An unclassified internal server error.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let (status, client_message) = match &self {
            // Client-facing errors: expose the message directly.
            ServerError::NotFound(m) => (StatusCode::NOT_FOUND, m.clone()),
            ServerError::BadRequest(m) => (StatusCode::BAD_REQUEST, m.clone()),
            ServerError::Unavailable(m) => (StatusCode::SERVICE_UNAVAILABLE, m.clone()),

            // Pipeline errors: log the full detail, return a message that
            // tells the caller what to do next without exposing upstream
            // response bodies.
            ServerError::Pipeline(e) => {
                error!(error = %e, "pipeline error");
                pipeline_response(e)
            }
            ServerError::Database(e) => {
                error!(error = %e, "database error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
            ServerError::Internal(m) => {
                error!(message = %m, "internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "internal server error".to_owned(),
                )
            }
        };
        (status, Json(json!({ "error": client_message }))).into_response()
    }
}

/// Status code and client message per pipeline failure.
///
/// Render failure and render timeout carry distinguishable messages so
/// the UI can prompt the user to resubmit.
fn pipeline_response(e: &PipelineError) -> (StatusCode, String) {
    match e {
        PipelineError::InvalidInput(m) => (StatusCode::BAD_REQUEST, m.clone()),
        PipelineError::ImageNotFound { subject } => (
            StatusCode::NOT_FOUND,
            format!("No image found for '{subject}'."),
        ),
        PipelineError::RenderFailed { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Video rendering failed. Please try again.".to_owned(),
        ),
        PipelineError::RenderTimeout { .. } => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Video rendering timed out. Please try again.".to_owned(),
        ),
        PipelineError::UpstreamTimeout(_) => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "An upstream service timed out. Please try again.".to_owned(),
        ),
        _ => (
            StatusCode::INTERNAL_SERVER_ERROR,
            "Reel generation failed.".to_owned(),
        ),
    }
}

impl From<anyhow::Error> for ServerError {
    fn from(e: anyhow::Error) -> Self {
        // Log the full error chain before discarding it so diagnostic
        // detail is preserved in the server logs even though clients only
        // see a generic message.
        error!(error = ?e, "converting anyhow error to ServerError::Internal");
        ServerError::Internal(e.to_string())
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let (status, _) =
            pipeline_response(&PipelineError::InvalidInput("subject empty".to_owned()));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[test]
    fn image_not_found_maps_to_not_found_with_subject() {
        let (status, msg) = pipeline_response(&PipelineError::ImageNotFound {
            subject: "Nobody".to_owned(),
        });
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert!(msg.contains("Nobody"));
    }

    #[test]
    fn render_failure_and_timeout_are_distinguishable() {
        let (_, failed) = pipeline_response(&PipelineError::RenderFailed {
            render_id: "r".to_owned(),
        });
        let (_, timed_out) = pipeline_response(&PipelineError::RenderTimeout {
            render_id: "r".to_owned(),
            max_attempts: 60,
        });
        assert_ne!(failed, timed_out);
    }

    #[test]
    fn internal_errors_hide_detail() {
        let (status, msg) =
            pipeline_response(&PipelineError::Storage("bucket auth header rejected".to_owned()));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert!(!msg.contains("auth header"));
    }
}
