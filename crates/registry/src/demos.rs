//! The demo catalog.
//!
//! The catalog is one JSON document in the object store, newest record
//! first. Every mutation reads the whole document, rewrites it, and persists
//! it back; there is no per-record locking, so concurrent writers race and
//! the last persist wins. Acceptable for a single-owner application.

use crate::error::{RegistryError, RegistryResult};
use crate::keys;
use bytes::Bytes;
use myvoice_core::{DemoId, DemoPatch, DemoRecord, NewDemo};
use myvoice_storage::{ObjectStore, StorageError};
use std::sync::Arc;
use time::OffsetDateTime;

/// Store-backed demo catalog.
pub struct DemoRegistry {
    storage: Arc<dyn ObjectStore>,
}

impl DemoRegistry {
    /// Create a registry over the given object store.
    pub fn new(storage: Arc<dyn ObjectStore>) -> Self {
        Self { storage }
    }

    /// Load the full catalog. A missing document reads as the empty list.
    pub async fn load(&self) -> RegistryResult<Vec<DemoRecord>> {
        match self.storage.get(keys::REGISTRY_KEY).await {
            Ok(bytes) => Ok(serde_json::from_slice(&bytes)?),
            Err(StorageError::NotFound(_)) => Ok(Vec::new()),
            Err(e) => Err(e.into()),
        }
    }

    /// Persist the full catalog document.
    async fn persist(&self, demos: &[DemoRecord]) -> RegistryResult<()> {
        let bytes = serde_json::to_vec(demos)?;
        self.storage.put(keys::REGISTRY_KEY, Bytes::from(bytes)).await?;
        Ok(())
    }

    /// All records in stored order (newest first). Records carry metadata
    /// only; binary payloads are never part of the document.
    pub async fn list(&self) -> RegistryResult<Vec<DemoRecord>> {
        self.load().await
    }

    /// Look up one record by exact id.
    pub async fn get(&self, id: DemoId) -> RegistryResult<DemoRecord> {
        self.load()
            .await?
            .into_iter()
            .find(|d| d.id == id)
            .ok_or(RegistryError::NotFound(id))
    }

    /// Insert a new record at the front of the catalog.
    ///
    /// The id is derived from the current instant and bumped until unique,
    /// since two inserts can land in the same millisecond.
    pub async fn insert(&self, new: NewDemo) -> RegistryResult<DemoRecord> {
        let mut demos = self.load().await?;

        let mut id = DemoId::now();
        while demos.iter().any(|d| d.id == id) {
            id = id.next();
        }

        let record = DemoRecord {
            id,
            name: new.name,
            audio_file: new.audio_file,
            cover_url: new.cover_url,
            cover_type: new.cover_type,
            upload_date: OffsetDateTime::now_utc(),
            audio_content_type: None,
            cover_content_type: new.cover_content_type,
        };

        demos.insert(0, record.clone());
        self.persist(&demos).await?;

        tracing::info!(demo_id = %record.id, name = %record.name, "Demo inserted");
        Ok(record)
    }

    /// Merge a patch into an existing record and persist.
    pub async fn update(&self, id: DemoId, patch: DemoPatch) -> RegistryResult<DemoRecord> {
        let mut demos = self.load().await?;
        let record = demos
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        patch.apply(record);
        let updated = record.clone();
        self.persist(&demos).await?;

        tracing::info!(demo_id = %id, "Demo updated");
        Ok(updated)
    }

    /// Record the audio content type once the chunked upload has completed,
    /// clearing the record's mid-upload state.
    pub async fn mark_audio_stored(
        &self,
        id: DemoId,
        content_type: &str,
    ) -> RegistryResult<DemoRecord> {
        let mut demos = self.load().await?;
        let record = demos
            .iter_mut()
            .find(|d| d.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        record.audio_content_type = Some(content_type.to_string());
        let updated = record.clone();
        self.persist(&demos).await?;
        Ok(updated)
    }

    /// Remove a record, persist the catalog, then release the associated
    /// blobs.
    ///
    /// The catalog write and the blob deletes are separate non-transactional
    /// calls: a blob delete that fails after the catalog persisted leaves an
    /// unreferenced blob behind. That is logged and tolerated rather than
    /// surfaced, so the catalog entry never resurrects.
    pub async fn delete(&self, id: DemoId) -> RegistryResult<DemoRecord> {
        let mut demos = self.load().await?;
        let position = demos
            .iter()
            .position(|d| d.id == id)
            .ok_or(RegistryError::NotFound(id))?;

        let removed = demos.remove(position);
        self.persist(&demos).await?;

        for key in [keys::audio_key(id), keys::cover_key(id)] {
            match self.storage.delete(&key).await {
                Ok(()) => {}
                Err(StorageError::NotFound(_)) => {}
                Err(e) => {
                    tracing::warn!(demo_id = %id, key = %key, error = %e, "Failed to release blob");
                }
            }
        }

        // Also clear any leftover temp chunks from an abandoned upload.
        match self.storage.list(&keys::chunk_prefix(id)).await {
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

        tracing::info!(demo_id = %id, "Demo deleted");
        Ok(removed)
    }
}
