//! Response bodies for the pull API.

use serde::Serialize;

use beacon_entity::Notification;

/// GET /notifications response.
#[derive(Debug, Serialize)]
pub struct ListResponse {
    /// The page of notifications, newest first.
    pub data: Vec<Notification>,
    /// Effective page size.
    pub limit: i64,
    /// Effective row offset.
    pub offset: i64,
}

/// GET /notifications/unread-count response.
#[derive(Debug, Serialize)]
pub struct CountResponse {
    /// Number of unread notifications.
    pub count: i64,
}

/// POST /notifications/read-all response.
#[derive(Debug, Serialize)]
pub struct MarkedResponse {
    /// Number of rows marked read.
    pub marked: i64,
}

/// GET /health response.
#[derive(Debug, Serialize)]
pub struct HealthResponse {
    /// Service liveness indicator.
    pub status: &'static str,
    /// Number of connected SSE listeners.
    pub sse_clients: usize,
}
