//! API error types.

use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use myvoice_coach::CoachError;
use myvoice_registry::RegistryError;
use serde::Serialize;

/// API error response.
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    /// Error code for programmatic handling.
    pub code: String,
    /// Human-readable error message.
    pub message: String,
}

/// API error type.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("unauthorized: {0}")]
    Unauthorized(String),

    #[error("not found: {0}")]
    NotFound(String),

    #[error("upstream error ({status}): {detail}")]
    Upstream { status: u16, detail: String },

    #[error("internal error: {0}")]
    Internal(String),

    #[error("storage error: {0}")]
    Storage(#[from] myvoice_storage::StorageError),

    #[error("registry error: {0}")]
    Registry(#[from] RegistryError),

    #[error("coach error: {0}")]
    Coach(#[from] CoachError),
}

impl ApiError {
    /// Get the error code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            Self::BadRequest(_) => "bad_request",
            Self::Unauthorized(_) => "unauthorized",
            Self::NotFound(_) => "not_found",
            Self::Upstream { .. } => "upstream_error",
            Self::Internal(_) => "internal_error",
            Self::Storage(e) => match e {
                myvoice_storage::StorageError::NotFound(_) => "not_found",
                _ => "storage_error",
            },
            Self::Registry(e) => match e {
                RegistryError::NotFound(_) => "not_found",
                RegistryError::MissingChunk { .. } => "missing_chunk",
                RegistryError::InvalidChunkIndex { .. }
                | RegistryError::InvalidChunkTotal(_)
                | RegistryError::ChunkTooLarge { .. } => "bad_request",
                RegistryError::Storage(_) | RegistryError::Serialization(_) => "registry_error",
            },
            Self::Coach(e) => match e {
                CoachError::TooFewDemos { .. } => "bad_request",
                CoachError::Upstream { .. } => "upstream_error",
                CoachError::MissingApiKey | CoachError::Http(_) => "coach_error",
            },
        }
    }

    /// Get the HTTP status code for this error.
    pub fn status_code(&self) -> StatusCode {
        match self {
            Self::BadRequest(_) => StatusCode::BAD_REQUEST,
            Self::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            Self::NotFound(_) => StatusCode::NOT_FOUND,
            Self::Upstream { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
            Self::Storage(e) => match e {
                myvoice_storage::StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                _ => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Registry(e) => match e {
                RegistryError::NotFound(_) => StatusCode::NOT_FOUND,
                // Reassembly failures name the offending chunk in the
                // message; the upload flow treats them as client errors.
                RegistryError::MissingChunk { .. }
                | RegistryError::InvalidChunkIndex { .. }
                | RegistryError::InvalidChunkTotal(_)
                | RegistryError::ChunkTooLarge { .. } => StatusCode::BAD_REQUEST,
                RegistryError::Storage(inner) => match inner {
                    myvoice_storage::StorageError::NotFound(_) => StatusCode::NOT_FOUND,
                    _ => StatusCode::INTERNAL_SERVER_ERROR,
                },
                RegistryError::Serialization(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
            Self::Coach(e) => match e {
                CoachError::TooFewDemos { .. } => StatusCode::BAD_REQUEST,
                CoachError::Upstream { .. }
                | CoachError::MissingApiKey
                | CoachError::Http(_) => StatusCode::INTERNAL_SERVER_ERROR,
            },
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorResponse {
            code: self.code().to_string(),
            message: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Result type for API handlers.
pub type ApiResult<T> = std::result::Result<T, ApiError>;
