//! Chunked-upload reassembly.
//!
//! Chunks arrive tagged with their index and total count and are parked
//! under temporary keys; completion stitches them back together in index
//! order and finalizes the audio blob. Arrival order is not assumed even
//! though the documented client uploads sequentially.
//!
//! Temp chunks of an upload that is never completed stay behind — there is
//! no sweep job. `DemoRegistry::delete` clears them for deleted demos;
//! anything else is an accepted limitation of the design.

use crate::error::{RegistryError, RegistryResult};
use crate::keys;
use bytes::Bytes;
use myvoice_core::DemoId;
use myvoice_storage::{ObjectStore, StorageError};
use std::sync::Arc;

/// Store-backed chunk buffer and reassembler.
pub struct ChunkAssembler {
    storage: Arc<dyn ObjectStore>,
    max_chunk_size: u64,
}

impl ChunkAssembler {
    /// Create an assembler over the given object store.
    pub fn new(storage: Arc<dyn ObjectStore>, max_chunk_size: u64) -> Self {
        Self {
            storage,
            max_chunk_size,
        }
    }

    /// Park one chunk under its temporary key.
    ///
    /// `index` must satisfy `0 <= index < total`; chunks may arrive in any
    /// order. Re-sending an index overwrites the previous bytes.
    pub async fn put_chunk(
        &self,
        id: DemoId,
        index: u32,
        total: u32,
        bytes: Bytes,
    ) -> RegistryResult<()> {
        if total == 0 {
            return Err(RegistryError::InvalidChunkTotal(total));
        }
        if index >= total {
            return Err(RegistryError::InvalidChunkIndex { index, total });
        }
        if bytes.len() as u64 > self.max_chunk_size {
            return Err(RegistryError::ChunkTooLarge {
                size: bytes.len(),
                max: self.max_chunk_size,
            });
        }

        self.storage.put(&keys::chunk_key(id, index), bytes).await?;
        tracing::debug!(demo_id = %id, index, total, "Chunk stored");
        Ok(())
    }

    /// Reassemble all chunks into the final audio blob.
    ///
    /// Fails fast with the first missing index before writing anything. On
    /// success the concatenation is stored under the demo's audio key and
    /// every temp chunk is deleted best-effort — a failed temp delete logs a
    /// warning but does not fail the completed upload. Returns the final
    /// blob size in bytes.
    pub async fn complete(&self, id: DemoId, total: u32) -> RegistryResult<u64> {
        if total == 0 {
            return Err(RegistryError::InvalidChunkTotal(total));
        }

        let mut chunks: Vec<Bytes> = Vec::with_capacity(total as usize);
        for index in 0..total {
            match self.storage.get(&keys::chunk_key(id, index)).await {
                Ok(bytes) => chunks.push(bytes),
                Err(StorageError::NotFound(_)) => {
                    return Err(RegistryError::MissingChunk { index, total });
                }
                Err(e) => return Err(e.into()),
            }
        }

        let size: usize = chunks.iter().map(|c| c.len()).sum();
        let mut assembled = Vec::with_capacity(size);
        for chunk in &chunks {
            assembled.extend_from_slice(chunk);
        }

        self.storage
            .put(&keys::audio_key(id), Bytes::from(assembled))
            .await?;

        self.purge(id).await;

        tracing::info!(demo_id = %id, total, size, "Upload reassembled");
        Ok(size as u64)
    }

    /// Best-effort removal of all temp chunks for an upload.
    pub async fn purge(&self, id: DemoId) {
        let prefix = keys::chunk_prefix(id);
        match self.storage.list(&prefix).await {
            Ok(chunk_keys) => {
                for key in chunk_keys {
                    if let Err(e) = self.storage.delete(&key).await {
                        tracing::warn!(demo_id = %id, key = %key, error = %e, "Failed to delete temp chunk");
                    }
                }
            }
            Err(e) => {
                tracing::warn!(demo_id = %id, error = %e, "Failed to list temp chunks");
            }
        }
    }
}
