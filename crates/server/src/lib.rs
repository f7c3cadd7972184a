//! HTTP API server for MyVoice Studio.
//!
//! This crate provides the HTTP surface:
//! - Demo catalog CRUD
//! - Chunked audio upload (init, chunk, complete)
//! - Audio/cover binary serving
//! - Vocal analysis and voice report proxying
//! - Owner authorization via shared-secret header

pub mod auth;
pub mod error;
pub mod handlers;
pub mod routes;
pub mod state;

pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::AppState;
