//! Bridge error types.

use thiserror::Error;

/// Errors from completion-API calls.
#[derive(Debug, Error)]
pub enum CoachError {
    #[error("no API key configured for the completion API")]
    MissingApiKey,

    #[error("at least {required} demos are required for a voice report, got {actual}")]
    TooFewDemos { required: usize, actual: usize },

    #[error("completion API error ({status}): {detail}")]
    Upstream { status: u16, detail: String },

    #[error("completion API request failed: {0}")]
    Http(#[from] reqwest::Error),
}

/// Result type for bridge operations.
pub type CoachResult<T> = std::result::Result<T, CoachError>;
