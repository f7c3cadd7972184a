//! Configuration types shared across crates.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Built-in owner password used when none is configured.
///
/// A deliberate convenience for running the demo app out of the box; `main`
/// logs a warning whenever this value is in effect.
pub const DEFAULT_OWNER_PASSWORD: &str = "myvoice-owner";

/// Server configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address (e.g., "0.0.0.0:8787").
    #[serde(default = "default_bind")]
    pub bind: String,
    /// Maximum accepted upload chunk size in bytes.
    #[serde(default = "default_max_chunk_size")]
    pub max_chunk_size: u64,
    /// Maximum request body size in bytes (JSON and multipart). Sized for
    /// base64-encoded audio in analysis requests.
    #[serde(default = "default_max_body_size")]
    pub max_body_size: u64,
    /// Cache-Control max-age for served audio/cover binaries, in seconds.
    #[serde(default = "default_media_max_age_secs")]
    pub media_max_age_secs: u64,
}

fn default_bind() -> String {
    "127.0.0.1:8787".to_string()
}

fn default_max_chunk_size() -> u64 {
    crate::MAX_CHUNK_SIZE
}

fn default_max_body_size() -> u64 {
    32 * 1024 * 1024
}

fn default_media_max_age_secs() -> u64 {
    31536000 // one year; blobs are immutable per id
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            max_chunk_size: default_max_chunk_size(),
            max_body_size: default_max_body_size(),
            media_max_age_secs: default_media_max_age_secs(),
        }
    }
}

/// Owner authorization configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct OwnerConfig {
    /// Shared secret compared against the X-Owner-Password header.
    #[serde(default = "default_owner_password")]
    pub password: String,
}

fn default_owner_password() -> String {
    DEFAULT_OWNER_PASSWORD.to_string()
}

impl Default for OwnerConfig {
    fn default() -> Self {
        Self {
            password: default_owner_password(),
        }
    }
}

impl OwnerConfig {
    /// Whether the built-in default password is still in effect.
    pub fn uses_default_password(&self) -> bool {
        self.password == DEFAULT_OWNER_PASSWORD
    }
}

/// Storage backend configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum StorageConfig {
    /// Local filesystem storage.
    Filesystem {
        /// Root directory for storage.
        path: PathBuf,
    },
    /// S3-compatible storage.
    S3 {
        /// Bucket name.
        bucket: String,
        /// Optional endpoint URL (for MinIO, etc.).
        endpoint: Option<String>,
        /// AWS region.
        region: Option<String>,
        /// Optional key prefix.
        prefix: Option<String>,
        /// AWS access key ID. Falls back to the ambient credential chain
        /// when unset. Prefer env vars or IAM roles over config files.
        access_key_id: Option<String>,
        /// AWS secret access key.
        secret_access_key: Option<String>,
        /// Force path-style URLs (`endpoint/bucket/key`). Required for MinIO
        /// and some S3-compatible services.
        #[serde(default)]
        force_path_style: bool,
    },
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::Filesystem {
            path: PathBuf::from("./data/storage"),
        }
    }
}

impl StorageConfig {
    /// Validate storage configuration invariants.
    pub fn validate(&self) -> Result<(), String> {
        match self {
            StorageConfig::S3 {
                access_key_id,
                secret_access_key,
                ..
            } => match (access_key_id.as_ref(), secret_access_key.as_ref()) {
                (Some(_), Some(_)) | (None, None) => Ok(()),
                _ => Err(
                    "s3 config requires both access_key_id and secret_access_key when either is set"
                        .to_string(),
                ),
            },
            _ => Ok(()),
        }
    }
}

/// Completion-API bridge configuration.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct CoachConfig {
    /// API key for the completions endpoint. Required for analysis and
    /// report calls; typically supplied via MYVOICE_COACH__API_KEY.
    #[serde(default)]
    pub api_key: Option<String>,
    /// Base URL of the completions API.
    #[serde(default = "default_api_base")]
    pub api_base: String,
    /// Text-only model used when no audio accompanies a request.
    #[serde(default = "default_model")]
    pub model: String,
    /// Audio-capable model used when inline audio is supplied.
    #[serde(default = "default_audio_model")]
    pub audio_model: String,
    /// Request timeout in seconds.
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
}

fn default_api_base() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o".to_string()
}

fn default_audio_model() -> String {
    "gpt-4o-audio-preview".to_string()
}

fn default_request_timeout_secs() -> u64 {
    120
}

impl Default for CoachConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_base: default_api_base(),
            model: default_model(),
            audio_model: default_audio_model(),
            request_timeout_secs: default_request_timeout_secs(),
        }
    }
}

impl CoachConfig {
    /// Request timeout as a Duration.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Complete application configuration.
#[derive(Clone, Debug, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration.
    #[serde(default)]
    pub server: ServerConfig,
    /// Storage backend configuration.
    #[serde(default)]
    pub storage: StorageConfig,
    /// Owner authorization configuration.
    #[serde(default)]
    pub owner: OwnerConfig,
    /// Completion-API bridge configuration.
    #[serde(default)]
    pub coach: CoachConfig,
}

impl AppConfig {
    /// Create a test configuration with sensible defaults.
    ///
    /// **For testing only.** Uses filesystem storage and a fixed owner
    /// password.
    pub fn for_testing() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            owner: OwnerConfig {
                password: "test-owner-password".to_string(),
            },
            coach: CoachConfig {
                api_key: Some("test-api-key".to_string()),
                ..CoachConfig::default()
            },
        }
    }
}
