//! Error types for the dashboard backend
//!
//! Provides unified error handling using thiserror.

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// == Dashboard Error Enum ==
/// Unified error type for the dashboard backend.
#[derive(Error, Debug)]
pub enum DashboardError {
    /// Requested resource does not exist
    #[error("Not found: {0}")]
    NotFound(String),

    /// Invalid request data
    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    /// A compressed envelope could not be decoded
    #[error("Decompression failed: {0}")]
    Decompression(String),

    /// Payload could not be (de)serialized
    #[error("Serialization failed: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem access failed (data files, bundle sources)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The bundle entry document could not be produced
    #[error("Bundle failed: {0}")]
    Bundle(String),

    /// Internal server error
    #[error("Internal error: {0}")]
    Internal(String),
}

// == IntoResponse Implementation ==
impl IntoResponse for DashboardError {
    fn into_response(self) -> Response {
        let status = match &self {
            DashboardError::NotFound(_) => StatusCode::NOT_FOUND,
            DashboardError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            DashboardError::Decompression(_)
            | DashboardError::Serialization(_)
            | DashboardError::Io(_)
            | DashboardError::Bundle(_)
            | DashboardError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        };

        let body = Json(json!({
            "error": self.to_string()
        }));

        (status, body).into_response()
    }
}

// == Result Type Alias ==
/// Convenience Result type for the dashboard backend.
pub type Result<T> = std::result::Result<T, DashboardError>;
