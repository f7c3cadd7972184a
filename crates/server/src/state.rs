//! Application state shared across handlers.

use myvoice_coach::VoiceCoach;
use myvoice_core::config::AppConfig;
use myvoice_registry::{ChunkAssembler, DemoRegistry};
use myvoice_storage::ObjectStore;
use std::sync::Arc;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Object storage backend.
    pub storage: Arc<dyn ObjectStore>,
    /// Demo catalog.
    pub registry: Arc<DemoRegistry>,
    /// Chunked-upload reassembler.
    pub chunks: Arc<ChunkAssembler>,
    /// Completion-API bridge.
    pub coach: Arc<VoiceCoach>,
}

impl AppState {
    /// Create application state over a storage backend.
    pub fn new(config: AppConfig, storage: Arc<dyn ObjectStore>) -> Self {
        let registry = Arc::new(DemoRegistry::new(storage.clone()));
        let chunks = Arc::new(ChunkAssembler::new(
            storage.clone(),
            config.server.max_chunk_size,
        ));
        let coach = Arc::new(VoiceCoach::from_config(&config.coach));

        Self {
            config: Arc::new(config),
            storage,
            registry,
            chunks,
            coach,
        }
    }
}
