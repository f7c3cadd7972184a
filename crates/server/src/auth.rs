//! Owner authorization.
//!
//! Every mutating catalog and upload operation is gated by a shared secret
//! carried in the `X-Owner-Password` header. This is a static bearer-secret
//! check, not a session scheme; the configured value falls back to a fixed
//! default for out-of-the-box demo use.

use crate::error::{ApiError, ApiResult};
use axum::http::HeaderMap;
use myvoice_core::config::OwnerConfig;
use sha2::{Digest, Sha256};

/// Header carrying the owner's shared secret.
pub const OWNER_PASSWORD_HEADER: &str = "x-owner-password";

/// Require a matching owner password on the request.
///
/// Comparison happens on SHA-256 digests so the check doesn't leak length
/// or prefix information through early exit.
pub fn require_owner(headers: &HeaderMap, config: &OwnerConfig) -> ApiResult<()> {
    let supplied = headers
        .get(OWNER_PASSWORD_HEADER)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(|| ApiError::Unauthorized("missing X-Owner-Password header".to_string()))?;

    if digest(supplied) == digest(&config.password) {
        Ok(())
    } else {
        Err(ApiError::Unauthorized(
            "owner password mismatch".to_string(),
        ))
    }
}

fn digest(value: &str) -> [u8; 32] {
    Sha256::digest(value.as_bytes()).into()
}
