//! Catalog CRUD handlers.

use crate::auth::require_owner;
use crate::error::{ApiError, ApiResult};
use crate::handlers::common::{DemoResponse, IdParam, parse_demo_id};
use crate::state::AppState;
use axum::Json;
use axum::extract::{Multipart, Query, State};
use axum::http::{HeaderMap, StatusCode};
use myvoice_core::{CoverSource, DemoPatch, DemoRecord, NewDemo};
use myvoice_registry::keys;
use serde::{Deserialize, Serialize};

/// Listing response. Records carry metadata only; binary payloads are
/// served separately by id.
#[derive(Debug, Serialize)]
pub struct DemosResponse {
    pub demos: Vec<DemoRecord>,
}

/// GET /api/demos - List the catalog, newest first.
#[tracing::instrument(skip(state))]
pub async fn list_demos(State(state): State<AppState>) -> ApiResult<Json<DemosResponse>> {
    let demos = state.registry.list().await?;
    Ok(Json(DemosResponse { demos }))
}

/// Create request body.
#[derive(Debug, Deserialize)]
pub struct CreateRequest {
    pub demo: CreateDemoBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateDemoBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub audio_file: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub cover_type: Option<String>,
}

/// POST /api/demos - Insert a catalog record directly.
///
/// Auth runs before validation: the client's login probe posts a throwaway
/// record and distinguishes 401 (bad password) from 400 (bad record).
#[tracing::instrument(skip(state, headers, body))]
pub async fn create_demo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<CreateRequest>,
) -> ApiResult<(StatusCode, Json<DemoResponse>)> {
    require_owner(&headers, &state.config.owner)?;

    let name = body
        .demo
        .name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("name is required".to_string()))?
        .to_string();
    let audio_file = body
        .demo
        .audio_file
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("audioFile is required".to_string()))?
        .to_string();

    let cover_type = parse_cover_type(body.demo.cover_type.as_deref())?;

    let record = state
        .registry
        .insert(NewDemo {
            name,
            audio_file,
            cover_url: body.demo.cover_url,
            cover_type: cover_type.unwrap_or(CoverSource::Random),
            cover_content_type: None,
        })
        .await?;

    Ok((StatusCode::CREATED, Json(DemoResponse { demo: record })))
}

/// Update request body.
#[derive(Debug, Deserialize)]
pub struct UpdateRequest {
    pub id: IdParam,
    pub updates: UpdateBody,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateBody {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub cover_url: Option<String>,
    #[serde(default)]
    pub cover_type: Option<String>,
}

/// PUT /api/demos - Patch a record's metadata.
#[tracing::instrument(skip(state, headers, body))]
pub async fn update_demo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(body): Json<UpdateRequest>,
) -> ApiResult<Json<DemoResponse>> {
    require_owner(&headers, &state.config.owner)?;

    let id = body.id.resolve()?;
    let patch = DemoPatch {
        name: normalize_name(body.updates.name)?,
        cover_url: body.updates.cover_url.map(Some),
        cover_type: parse_cover_type(body.updates.cover_type.as_deref())?,
        cover_content_type: None,
    };

    let record = state.registry.update(id, patch).await?;
    Ok(Json(DemoResponse { demo: record }))
}

/// Delete query parameters.
#[derive(Debug, Deserialize)]
pub struct DeleteParams {
    pub id: String,
}

/// DELETE /api/demos?id= - Remove a record and release its blobs.
#[tracing::instrument(skip(state, headers))]
pub async fn delete_demo(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<DeleteParams>,
) -> ApiResult<Json<DemoResponse>> {
    require_owner(&headers, &state.config.owner)?;

    let id = parse_demo_id(&params.id)?;
    let record = state.registry.delete(id).await?;
    Ok(Json(DemoResponse { demo: record }))
}

/// POST /api/update-demo - Multipart edit: rename and/or replace the cover.
///
/// A `cover` file part replaces the stored cover blob and clears any
/// external cover URL; a `coverUrl` part switches back to an external
/// image. A previously stored cover blob stays behind in the latter case
/// and is released when the demo is deleted.
#[tracing::instrument(skip(state, headers, multipart))]
pub async fn update_demo_form(
    State(state): State<AppState>,
    headers: HeaderMap,
    mut multipart: Multipart,
) -> ApiResult<Json<DemoResponse>> {
    require_owner(&headers, &state.config.owner)?;

    let mut id = None;
    let mut name = None;
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
            Some("id") => id = Some(read_text_field(field, "id").await?),
            Some("name") => name = Some(read_text_field(field, "name").await?),
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

    let id = parse_demo_id(
        id.as_deref()
            .ok_or_else(|| ApiError::BadRequest("id is required".to_string()))?,
    )?;

    // Look up first so an unknown id 404s before any blob write.
    state.registry.get(id).await?;

    let mut patch = DemoPatch {
        name: normalize_name(name)?,
        ..DemoPatch::default()
    };

    if let Some(bytes) = cover_bytes {
        state.storage.put(&keys::cover_key(id), bytes).await?;
        patch.cover_type = Some(CoverSource::Uploaded);
        patch.cover_url = Some(None);
        patch.cover_content_type = Some(Some(
            cover_content_type.unwrap_or_else(|| "image/jpeg".to_string()),
        ));
    } else if let Some(url) = cover_url {
        patch.cover_type = Some(parse_cover_type(cover_type.as_deref())?.unwrap_or(CoverSource::Random));
        patch.cover_url = Some(Some(url));
        patch.cover_content_type = Some(None);
    } else if let Some(kind) = cover_type {
        patch.cover_type = Some(
            kind.parse::<CoverSource>()
                .map_err(|e| ApiError::BadRequest(e.to_string()))?,
        );
    }

    let record = state.registry.update(id, patch).await?;
    Ok(Json(DemoResponse { demo: record }))
}

/// Read a text multipart field.
pub(crate) async fn read_text_field(
    field: axum::extract::multipart::Field<'_>,
    name: &str,
) -> ApiResult<String> {
    field
        .text()
        .await
        .map_err(|e| ApiError::BadRequest(format!("failed to read field {name}: {e}")))
}

fn parse_cover_type(value: Option<&str>) -> ApiResult<Option<CoverSource>> {
    match value {
        Some(s) => s
            .parse::<CoverSource>()
            .map(Some)
            .map_err(|e| ApiError::BadRequest(e.to_string())),
        None => Ok(None),
    }
}

fn normalize_name(name: Option<String>) -> ApiResult<Option<String>> {
    match name {
        Some(raw) => {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                return Err(ApiError::BadRequest("name cannot be blank".to_string()));
            }
            Ok(Some(trimmed.to_string()))
        }
        None => Ok(None),
    }
}
