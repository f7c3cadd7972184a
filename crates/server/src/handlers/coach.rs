//! Vocal analysis and voice report handlers.

use crate::error::{ApiError, ApiResult};
use crate::state::AppState;
use axum::Json;
use axum::extract::State;
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use myvoice_coach::VoiceReport;
use myvoice_core::MIN_REPORT_DEMOS;
use serde::{Deserialize, Serialize};

/// Analyze request body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnalyzeRequest {
    #[serde(default)]
    pub song_name: Option<String>,
    /// Base64-encoded audio, embedded inline for audio-capable models.
    #[serde(default)]
    pub audio_data: Option<String>,
}

/// Analyze response body.
#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    pub analysis: String,
}

/// POST /api/analyze - Produce a vocal analysis for one song.
///
/// Unauthenticated, as in the original app: the analysis text leaks nothing
/// the public listing doesn't already show.
#[tracing::instrument(skip(state, body))]
pub async fn analyze(
    State(state): State<AppState>,
    Json(body): Json<AnalyzeRequest>,
) -> ApiResult<Json<AnalyzeResponse>> {
    let song_name = body
        .song_name
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("songName is required".to_string()))?;

    if let Some(audio) = body.audio_data.as_deref()
        && BASE64.decode(audio).is_err()
    {
        return Err(ApiError::BadRequest(
            "audioData is not valid base64".to_string(),
        ));
    }

    let analysis = state
        .coach
        .analyze(song_name, body.audio_data.as_deref())
        .await?;

    Ok(Json(AnalyzeResponse { analysis }))
}

/// Voice report request body.
#[derive(Debug, Deserialize)]
pub struct ReportRequest {
    #[serde(default)]
    pub demos: Vec<ReportDemo>,
}

#[derive(Debug, Deserialize)]
pub struct ReportDemo {
    #[serde(default)]
    pub name: Option<String>,
}

/// POST /api/voice-report - Produce the aggregate voice report.
///
/// The minimum-demos check runs here, before any outbound call; a parse
/// failure upstream still returns a well-formed (degraded) report.
#[tracing::instrument(skip(state, body))]
pub async fn voice_report(
    State(state): State<AppState>,
    Json(body): Json<ReportRequest>,
) -> ApiResult<Json<VoiceReport>> {
    if body.demos.len() < MIN_REPORT_DEMOS {
        return Err(ApiError::BadRequest(format!(
            "at least {MIN_REPORT_DEMOS} demos are required for a voice report"
        )));
    }

    let names: Vec<String> = body
        .demos
        .into_iter()
        .map(|d| d.name.unwrap_or_default())
        .collect();

    let report = state.coach.report(&names).await?;
    Ok(Json(report))
}
