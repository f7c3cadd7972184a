//! Binary serving for demo audio and cover art.

use crate::error::{ApiError, ApiResult};
use crate::handlers::common::parse_demo_id;
use crate::state::AppState;
use axum::body::Body;
use axum::extract::{Query, State};
use axum::http::header::{CACHE_CONTROL, CONTENT_TYPE};
use axum::response::Response;
use myvoice_core::CoverSource;
use myvoice_registry::keys;
use serde::Deserialize;

/// Query parameters for media requests.
#[derive(Debug, Deserialize)]
pub struct MediaParams {
    pub id: String,
    /// `audio` (default) or `cover`.
    #[serde(rename = "type", default)]
    pub kind: Option<String>,
}

/// GET /api/demo-audio?id=&type= - Stream a demo's audio or cover blob.
///
/// Blobs are immutable per id, so responses carry a long-lived
/// Cache-Control header. Cover requests against demos with external
/// (random) covers 404: the client uses the record's coverUrl directly.
#[tracing::instrument(skip(state))]
pub async fn demo_audio(
    State(state): State<AppState>,
    Query(params): Query<MediaParams>,
) -> ApiResult<Response> {
    let id = parse_demo_id(&params.id)?;
    let record = state.registry.get(id).await?;

    let (key, content_type) = match params.kind.as_deref().unwrap_or("audio") {
        "audio" => (
            keys::audio_key(id),
            record
                .audio_content_type
                .unwrap_or_else(|| "audio/mpeg".to_string()),
        ),
        "cover" => {
            if record.cover_type != CoverSource::Uploaded {
                return Err(ApiError::NotFound(format!(
                    "demo {id} has no uploaded cover"
                )));
            }
            (
                keys::cover_key(id),
                record
                    .cover_content_type
                    .unwrap_or_else(|| "image/jpeg".to_string()),
            )
        }
        other => {
            return Err(ApiError::BadRequest(format!(
                "unknown media type: {other} (expected audio or cover)"
            )));
        }
    };

    let stream = state.storage.get_stream(&key).await?;
    let cache_control = format!(
        "public, max-age={}, immutable",
        state.config.server.media_max_age_secs
    );

    Response::builder()
        .header(CONTENT_TYPE, content_type)
        .header(CACHE_CONTROL, cache_control)
        .body(Body::from_stream(stream))
        .map_err(|e| ApiError::Internal(format!("failed to build media response: {e}")))
}
