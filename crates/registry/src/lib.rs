//! Demo catalog and chunked-upload reassembly for MyVoice Studio.
//!
//! This crate provides the two store-backed components:
//! - `DemoRegistry`: the ordered demo catalog, persisted as one JSON
//!   document in the object store and rewritten whole on every mutation
//! - `ChunkAssembler`: temporary chunk storage and fail-fast reassembly of
//!   chunked audio uploads

pub mod chunks;
pub mod demos;
pub mod error;
pub mod keys;

pub use chunks::ChunkAssembler;
pub use demos::DemoRegistry;
pub use error::{RegistryError, RegistryResult};
