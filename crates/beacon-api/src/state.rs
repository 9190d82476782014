//! Application state shared across all handlers.

use std::sync::Arc;

use beacon_core::config::AppConfig;
use beacon_hub::PushHub;
use beacon_service::NotificationService;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Clone)]
pub struct AppState {
    /// Application configuration.
    pub config: Arc<AppConfig>,
    /// Query-side notification service.
    pub notifications: Arc<NotificationService>,
    /// Push hub for SSE sessions.
    pub hub: Arc<PushHub>,
}

impl AppState {
    /// Assemble the state from its parts.
    pub fn new(
        config: Arc<AppConfig>,
        notifications: Arc<NotificationService>,
        hub: Arc<PushHub>,
    ) -> Self {
        Self {
            config,
            notifications,
            hub,
        }
    }
}
