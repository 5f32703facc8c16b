//! Endpoint Error Types
//!
//! Errors of the sheet endpoint and their conversion to HTTP responses.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::Serialize;
use std::path::PathBuf;
use thiserror::Error;

/// Sheet endpoint errors
#[derive(Error, Debug)]
pub enum EndpointError {
    /// Sheet file missing or not valid CSV
    #[error("Failed to read sheet {path:?}: {error}")]
    Sheet { path: PathBuf, error: String },

    /// Blocking reader task failed
    #[error("Internal error: {0}")]
    Internal(String),

    /// IO error (binding the listener)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error response body
#[derive(Serialize)]
pub struct ErrorResponse {
    pub error: ErrorBody,
}

/// Error details
#[derive(Serialize)]
pub struct ErrorBody {
    pub code: String,
    pub message: String,
}

impl IntoResponse for EndpointError {
    fn into_response(self) -> Response {
        let code = match &self {
            EndpointError::Sheet { .. } => "SHEET_ERROR",
            EndpointError::Internal(_) => "INTERNAL_ERROR",
            EndpointError::Io(_) => "IO_ERROR",
        };

        tracing::error!(error_code = %code, error_message = %self, "Endpoint error occurred");

        let body = ErrorResponse {
            error: ErrorBody {
                code: code.to_string(),
                message: self.to_string(),
            },
        };

        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}

/// Result type for endpoint operations
pub type EndpointResult<T> = Result<T, EndpointError>;
