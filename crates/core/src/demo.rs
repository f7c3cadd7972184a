//! Demo catalog records and identifiers.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use time::OffsetDateTime;

/// Canonical demo identifier.
///
/// Holds the creation instant in Unix milliseconds, so freshly inserted
/// records sort newest-first by id. The registry collision-checks new ids
/// against the catalog and bumps by one until unique, since two inserts can
/// land in the same clock tick. One type everywhere; endpoints parse string
/// parameters through [`DemoId::from_str`] instead of comparing raw text.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DemoId(i64);

impl DemoId {
    /// Build an id from an instant, truncated to millisecond precision.
    pub fn from_instant(at: OffsetDateTime) -> Self {
        Self((at.unix_timestamp_nanos() / 1_000_000) as i64)
    }

    /// Build an id for the current instant.
    pub fn now() -> Self {
        Self::from_instant(OffsetDateTime::now_utc())
    }

    /// Construct from a raw millisecond value.
    pub fn from_millis(millis: i64) -> Self {
        Self(millis)
    }

    /// The next id in sequence (collision bump).
    pub fn next(self) -> Self {
        Self(self.0 + 1)
    }

    /// Raw millisecond value.
    pub fn as_i64(self) -> i64 {
        self.0
    }
}

impl fmt::Display for DemoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for DemoId {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        s.trim()
            .parse::<i64>()
            .map(Self)
            .map_err(|_| Error::InvalidDemoId(s.to_string()))
    }
}

/// Where a demo's cover art comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CoverSource {
    /// Cover image uploaded by the owner, stored as a blob under the demo id.
    Uploaded,
    /// External stock image referenced by URL.
    Random,
}

impl FromStr for CoverSource {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "uploaded" => Ok(Self::Uploaded),
            "random" => Ok(Self::Random),
            other => Err(Error::InvalidCoverSource(other.to_string())),
        }
    }
}

/// One catalog entry. Binary payloads live in the object store and are
/// referenced by id; records carry metadata only.
///
/// Wire format is camelCase to match the web client.
#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DemoRecord {
    pub id: DemoId,
    pub name: String,
    /// Original filename of the uploaded audio.
    pub audio_file: String,
    /// External cover URL for random covers.
    pub cover_url: Option<String>,
    pub cover_type: CoverSource,
    #[serde(with = "time::serde::rfc3339")]
    pub upload_date: OffsetDateTime,
    /// Content type of the stored audio blob. `None` while the chunked
    /// upload is still in flight; set by upload completion.
    #[serde(default)]
    pub audio_content_type: Option<String>,
    /// Content type of an uploaded cover blob.
    #[serde(default)]
    pub cover_content_type: Option<String>,
}

impl DemoRecord {
    /// Whether the audio blob has been finalized for this record.
    pub fn audio_stored(&self) -> bool {
        self.audio_content_type.is_some()
    }
}

/// Input for creating a catalog entry. The registry assigns the id and
/// upload date.
#[derive(Clone, Debug)]
pub struct NewDemo {
    pub name: String,
    pub audio_file: String,
    pub cover_url: Option<String>,
    pub cover_type: CoverSource,
    pub cover_content_type: Option<String>,
}

/// Field-wise patch for an existing record. `None` leaves a field untouched;
/// the double options distinguish "don't touch" from "clear".
#[derive(Clone, Debug, Default)]
pub struct DemoPatch {
    pub name: Option<String>,
    pub cover_url: Option<Option<String>>,
    pub cover_type: Option<CoverSource>,
    pub cover_content_type: Option<Option<String>>,
}

impl DemoPatch {
    /// Apply the present fields onto a record.
    pub fn apply(&self, record: &mut DemoRecord) {
        if let Some(name) = &self.name {
            record.name = name.clone();
        }
        if let Some(cover_url) = &self.cover_url {
            record.cover_url = cover_url.clone();
        }
        if let Some(cover_type) = self.cover_type {
            record.cover_type = cover_type;
        }
        if let Some(cover_content_type) = &self.cover_content_type {
            record.cover_content_type = cover_content_type.clone();
        }
    }
}
