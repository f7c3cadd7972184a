//! Core domain types and shared logic for MyVoice Studio.
//!
//! This crate defines the canonical data model used across all other crates:
//! - Demo identifiers and catalog records
//! - Cover art source tagging
//! - Application configuration
//! - Shared size limits

pub mod config;
pub mod demo;
pub mod error;

pub use demo::{CoverSource, DemoId, DemoPatch, DemoRecord, NewDemo};
pub use error::{Error, Result};

/// Default upload chunk size: 2 MiB (matches the web client's slicing).
pub const DEFAULT_CHUNK_SIZE: u64 = 2 * 1024 * 1024;

/// Maximum accepted chunk size: 8 MiB.
pub const MAX_CHUNK_SIZE: u64 = 8 * 1024 * 1024;

/// Minimum number of demos required for a voice report.
pub const MIN_REPORT_DEMOS: usize = 3;
