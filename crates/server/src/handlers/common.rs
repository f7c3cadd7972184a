//! Shared handler plumbing and the health endpoint.

use crate::error::{ApiError, ApiResult};
use axum::Json;
use myvoice_core::{DemoId, DemoRecord};
use serde::{Deserialize, Serialize};

/// Demo id as it appears on the wire: the web client sends it sometimes as
/// a JSON number and sometimes as a string. Both normalize to [`DemoId`].
#[derive(Clone, Debug, Deserialize)]
#[serde(untagged)]
pub enum IdParam {
    Number(i64),
    Text(String),
}

impl IdParam {
    /// Normalize to the canonical id type.
    pub fn resolve(&self) -> ApiResult<DemoId> {
        match self {
            Self::Number(millis) => Ok(DemoId::from_millis(*millis)),
            Self::Text(s) => s
                .parse::<DemoId>()
                .map_err(|e| ApiError::BadRequest(e.to_string())),
        }
    }
}

/// Parse a required string field into a demo id.
pub fn parse_demo_id(value: &str) -> ApiResult<DemoId> {
    value
        .parse::<DemoId>()
        .map_err(|e| ApiError::BadRequest(e.to_string()))
}

/// Response wrapper for endpoints returning one record.
#[derive(Debug, Serialize)]
pub struct DemoResponse {
    pub demo: DemoRecord,
}

/// GET /api/health - Liveness probe.
pub async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({ "status": "ok" }))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_param_accepts_number_and_string() {
        let n: IdParam = serde_json::from_str("1714564800123").unwrap();
        let s: IdParam = serde_json::from_str("\"1714564800123\"").unwrap();
        assert_eq!(n.resolve().unwrap(), s.resolve().unwrap());
    }

    #[test]
    fn id_param_rejects_garbage() {
        let bad: IdParam = serde_json::from_str("\"not-an-id\"").unwrap();
        assert!(bad.resolve().is_err());
    }
}
