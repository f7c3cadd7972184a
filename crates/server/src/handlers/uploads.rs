//! Chunked upload handlers.
//!
//! The client flow is init -> N chunks -> complete. Chunks are parked under
//! temporary keys and stitched together at completion; the registry record
//! created by init stays mid-upload (no audio content type) until the
//! complete call finalizes the blob.

use crate::auth::require_owner;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{DemoResponse, IdParam};
use crate::handlers::demos::read_text_field;
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, State};
use axum::http::{HeaderMap, StatusCode};
use myvoice_core::{CoverSource, NewDemo};
use myvoice_registry::keys;
use serde::{Deserialize, Serialize};

/// Fallback content type for finalized audio.
const DEFAULT_AUDIO_CONTENT_TYPE: &str = "audio/mpeg";

/// POST /api/upload-demo-init - Create the catalog record for an upload.
///
/// Multipart fields: `name`, `audioFile` (original filename), and either an
/// uploaded `cover` image or an external `coverUrl`, with `coverType`
/// tagging the choice. Returns the new mid-upload record; the audio itself
/// follows in chunks.
#[tracing::instrument(skip(state, headers, multipart))]
pub async fn upload_demo_init(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<(StatusCode, Json<DemoResponse>)> {
    require_owner(&headers, &state.config.owner)?;

    let mut name = None;
    let mut audio_file = None;
    let mut cover_url = None;
    let mut cover_type = None;
    let mut cover_bytes = None;
    let mut cover_content_type = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        // Owned copy: the field name borrows the field we consume below.
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("name") => name = Some(read_text_field(field, "name").await?),
            Some("audioFile") => audio_file = Some(read_text_field(field, "audioFile").await?),
            Some("coverUrl") => cover_url = Some(read_text_field(field, "coverUrl").await?),
            Some("coverType") => cover_type = Some(read_text_field(field, "coverType").await?),
            Some("cover") => {
                cover_content_type = field.content_type().map(|s| s.to_string());
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read cover: {e}")))?;
                cover_bytes = Some(bytes);
            }
            _ => {}
        }
    }

    let name = name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("name is required".to_string()))?
        .to_string();
    let audio_file = audio_file
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("audioFile is required".to_string()))?
        .to_string();

    let has_cover_upload = cover_bytes.is_some();
    let cover_type = match cover_type.as_deref() {
        Some(s) => s
            .parse::<CoverSource>()
            .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        None if has_cover_upload => CoverSource::Uploaded,
        None => CoverSource::Random,
    };

    let record = state
        .registry
        .insert(NewDemo {
            name,
            audio_file,
            cover_url: if cover_type == CoverSource::Uploaded {
                None
            } else {
                cover_url
            },
            cover_type,
            cover_content_type: if has_cover_upload {
                Some(cover_content_type.unwrap_or_else(|| "image/jpeg".to_string()))
            } else {
                None
            },
        })
        .await?;

    if let Some(bytes) = cover_bytes {
        state.storage.put(&keys::cover_key(record.id), bytes).await?;
    }

    tracing::info!(demo_id = %record.id, "Upload initialized");
    Ok((StatusCode::CREATED, Json(DemoResponse { demo: record })))
}

/// Chunk acknowledgement.
#[derive(Debug, Serialize)]
pub struct ChunkResponse {
    pub ok: bool,
    pub index: u32,
}

/// POST /api/upload-audio-chunk - Park one audio chunk.
///
/// Multipart fields: `id`, `index`, `total`, `contentType`, `chunk`. The
/// documented client sends chunks sequentially, but nothing here relies on
/// arrival order.
#[tracing::instrument(skip(state, headers, multipart))]
pub async fn upload_audio_chunk(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<Json<ChunkResponse>> {
    require_owner(&headers, &state.config.owner)?;

    let mut id = None;
    let mut index = None;
    let mut total = None;
    let mut chunk = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("invalid multipart body: {e}")))?
    {
        let field_name = field.name().map(|s| s.to_string());
        match field_name.as_deref() {
            Some("id") => id = Some(read_text_field(field, "id").await?),
            Some("index") => index = Some(read_text_field(field, "index").await?),
            Some("total") => total = Some(read_text_field(field, "total").await?),
            // The per-chunk content type is advisory; the complete call
            // carries the authoritative one.
            Some("contentType") => {
                let _ = read_text_field(field, "contentType").await?;
            }
            Some("chunk") => {
                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("failed to read chunk: {e}")))?;
                chunk = Some(bytes);
            }
            _ => {}
        }
    }

    let id = require_field(id, "id")?
        .parse::<myvoice_core::DemoId>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))?;
    let index = parse_u32(&require_field(index, "index")?, "index")?;
    let total = parse_u32(&require_field(total, "total")?, "total")?;
    let chunk = chunk.ok_or_else(|| ApiError::BadRequest("chunk is required".to_string()))?;

    // Unknown ids 404 before any temp write.
    state.registry.get(id).await?;

    state.chunks.put_chunk(id, index, total, chunk).await?;
    Ok(Json(ChunkResponse { ok: true, index }))
}

/// Complete request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompleteRequest {
    pub id: IdParam,
    pub total: u32,
    #[serde(default)]
    pub content_type: Option<String>,
}

/// POST /api/upload-audio-complete - Reassemble and finalize the audio.
///
/// Fails with the first missing chunk index and writes nothing in that
/// case; on success the temp chunks are purged and the record's audio
/// content type is set.
#[tracing::instrument(skip(state, headers, body))]
pub async fn upload_audio_complete(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CompleteRequest>,
) -> ApiResult<Json<DemoResponse>> {
    require_owner(&headers, &state.config.owner)?;

    let id = body.id.resolve()?;
    state.registry.get(id).await?;

    let size = state.chunks.complete(id, body.total).await?;

    let content_type = body
        .content_type
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or(DEFAULT_AUDIO_CONTENT_TYPE);
    let record = state.registry.mark_audio_stored(id, content_type).await?;

    tracing::info!(demo_id = %id, size, "Upload finalized");
    Ok(Json(DemoResponse { demo: record }))
}

fn require_field(value: Option<String>, name: &str) -> ApiResult<String> {
    value.ok_or_else(|| ApiError::BadRequest(format!("{name} is required")))
}

fn parse_u32(value: &str, name: &str) -> ApiResult<u32> {
    value
        .trim()
        .parse::<u32>()
        .map_err(|_| ApiError::BadRequest(format!("{name} must be a non-negative integer")))
}
