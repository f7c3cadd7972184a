//! Object key layout.
//!
//! All keys are relative to the storage root:
//! - `registry/demos.json` — the whole catalog document
//! - `demos/{id}/audio` — finalized audio blob
//! - `demos/{id}/cover` — uploaded cover blob
//! - `uploads/{id}/chunks/{index}` — temporary upload chunks

use myvoice_core::DemoId;

/// Key of the catalog document.
pub const REGISTRY_KEY: &str = "registry/demos.json";

/// Key of a demo's finalized audio blob.
pub fn audio_key(id: DemoId) -> String {
    format!("demos/{id}/audio")
}

/// Key of a demo's uploaded cover blob.
pub fn cover_key(id: DemoId) -> String {
    format!("demos/{id}/cover")
}

/// Key of one temporary upload chunk.
pub fn chunk_key(id: DemoId, index: u32) -> String {
    format!("uploads/{id}/chunks/{index}")
}

/// Prefix covering all temporary chunks of one upload.
pub fn chunk_prefix(id: DemoId) -> String {
    format!("uploads/{id}")
}
