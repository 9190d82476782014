//! Notification retention configuration.

use serde::Deserialize;

/// Retention window for persisted notifications.
#[derive(Debug, Clone, Deserialize)]
pub struct RetentionConfig {
    /// Rows older than this many days are purged.
    pub days: u32,
}
