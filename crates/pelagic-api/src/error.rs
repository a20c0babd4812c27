//! Error types for the habitat API layer.
//!
//! [`ApiError`] unifies all failure modes into a single enum that can be
//! converted into an Axum HTTP response via its
//! [`IntoResponse`](axum::response::IntoResponse) implementation. The
//! response body is always `{"error": ..., "status": ...}` so the
//! dashboard has one error shape to handle.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

/// Errors that can occur in the habitat API layer.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// A prediction was requested but the required field is not loaded.
    #[error("no data: {0}")]
    NoData(String),

    /// The requested resource was not found.
    #[error("not found: {0}")]
    NotFound(String),

    /// An invalid request parameter was provided.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A serialization or deserialization error.
    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// An internal error occurred.
    #[error("internal error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, message) = match &self {
            Self::NoData(msg) | Self::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg.clone()),
            Self::NotFound(msg) => (StatusCode::NOT_FOUND, msg.clone()),
            Self::Serialization(e) => {
                (StatusCode::INTERNAL_SERVER_ERROR, format!("JSON error: {e}"))
            }
            Self::Internal(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg.clone()),
        };

        let body = serde_json::json!({
            "error": message,
            "status": status.as_u16(),
        });

        (status, axum::Json(body)).into_response()
    }
}
