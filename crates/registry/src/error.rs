//! Registry error types.

use myvoice_core::DemoId;
use thiserror::Error;

/// Errors from catalog and upload-reassembly operations.
#[derive(Debug, Error)]
pub enum RegistryError {
    #[error("demo not found: {0}")]
    NotFound(DemoId),

    #[error("missing chunk {index} of {total}")]
    MissingChunk { index: u32, total: u32 },

    #[error("chunk index {index} out of range for total {total}")]
    InvalidChunkIndex { index: u32, total: u32 },

    #[error("chunk count must be at least 1, got {0}")]
    InvalidChunkTotal(u32),

    #[error("chunk size {size} exceeds maximum {max}")]
    ChunkTooLarge { size: usize, max: u64 },

    #[error("storage error: {0}")]
    Storage(#[from] myvoice_storage::StorageError),

    #[error("catalog serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Result type for registry operations.
pub type RegistryResult<T> = std::result::Result<T, RegistryError>;
