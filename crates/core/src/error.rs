//! Error types for the core domain.

use thiserror::Error;

/// Core domain error type.
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid demo id: {0}")]
    InvalidDemoId(String),

    #[error("invalid cover source: {0} (expected \"uploaded\" or \"random\")")]
    InvalidCoverSource(String),
}

/// Result type alias for core operations.
pub type Result<T> = std::result::Result<T, Error>;
