//! Route configuration.

use crate::handlers;
use crate::state::AppState;
use axum::Router;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use tower_http::trace::TraceLayer;

/// Create the application router.
pub fn create_router(state: AppState) -> Router {
    let max_body = state.config.server.max_body_size as usize;

    Router::new()
        // Health check (intentionally unauthenticated)
        .route("/api/health", get(handlers::health_check))
        // Catalog CRUD
        .route(
            "/api/demos",
            get(handlers::list_demos)
                .post(handlers::create_demo)
                .put(handlers::update_demo)
                .delete(handlers::delete_demo),
        )
        // Chunked upload flow
        .route("/api/upload-demo-init", post(handlers::upload_demo_init))
        .route("/api/upload-audio-chunk", post(handlers::upload_audio_chunk))
        .route(
            "/api/upload-audio-complete",
            post(handlers::upload_audio_complete),
        )
        // Multipart edit (name/cover replacement)
        .route("/api/update-demo", post(handlers::update_demo_form))
        // Binary serving
        .route("/api/demo-audio", get(handlers::demo_audio))
        // Completion-API bridge
        .route("/api/analyze", post(handlers::analyze))
        .route("/api/voice-report", post(handlers::voice_report))
        // Bodies are sized for base64 audio payloads and multipart chunks.
        .layer(DefaultBodyLimit::max(max_body))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
