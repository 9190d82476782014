//! # beacon-api
//!
//! HTTP layer for Beacon built on Axum: the authenticated pull API
//! (list, unread count, mark read, delete), the SSE stream endpoint, and
//! the unauthenticated health check.

pub mod dto;
pub mod extractors;
pub mod handlers;
pub mod router;
pub mod state;

pub use router::build_router;
pub use state::AppState;
