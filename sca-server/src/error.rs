//! Error types for sca-server
//!
//! Every failure a webhook caller can trigger maps to HTTP 400 with a
//! `{"error": "<message>"}` body. Backend messages are passed through as-is.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use sca_common::api::ErrorResponse;
use thiserror::Error;

use crate::services::forwarder::ForwardError;
use crate::services::storage::StorageError;

/// API error type
#[derive(Debug, Error)]
pub enum ApiError {
    /// Invalid request (400)
    #[error("{0}")]
    BadRequest(String),

    /// The downstream consultation call failed; details are logged, not returned
    #[error("Failed to process consultation")]
    Downstream(#[source] ForwardError),

    /// Database query or insert failure
    #[error("{0}")]
    Database(#[from] sqlx::Error),

    /// Blob storage failure
    #[error(transparent)]
    Storage(#[from] StorageError),

    /// Internal server error (500)
    #[error("Internal server error: {0}")]
    Internal(String),
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match self {
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            _ => StatusCode::BAD_REQUEST,
        };

        let body = Json(ErrorResponse {
            error: self.to_string(),
        });

        (status, body).into_response()
    }
}

/// Result type for API handlers
pub type ApiResult<T> = Result<T, ApiError>;
