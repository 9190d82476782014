//! Notification entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::category::NotificationCategory;

/// A persisted per-recipient notification row.
///
/// `(tenant_key, user_id)` is always concrete — fan-out resolution happens
/// before a row is written, never after. `(source_event_id, tenant_key,
/// user_id)`, when the event id is present, is unique and carries the
/// idempotency guarantee.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Notification {
    /// Unique notification identifier.
    pub id: Uuid,
    /// Tenant the recipient belongs to.
    pub tenant_key: String,
    /// The recipient user.
    pub user_id: String,
    /// Origin domain of the notification. Serialised as `type`.
    #[serde(rename = "type")]
    #[sqlx(try_from = "String")]
    pub category: NotificationCategory,
    /// Short title text.
    pub title: String,
    /// Long body text. Empty by default.
    pub body: String,
    /// Opaque structured data from the source event.
    pub metadata: serde_json::Value,
    /// Whether the recipient has read this notification.
    pub is_read: bool,
    /// When the notification was read. Present iff `is_read` is true.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read_at: Option<DateTime<Utc>>,
    /// When the notification was created (assigned by the database).
    pub created_at: DateTime<Utc>,
    /// Idempotency key derived from the source event.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_event_id: Option<String>,
}

/// Query parameters for listing notifications.
#[derive(Debug, Clone)]
pub struct NotificationFilter {
    /// Tenant of the caller.
    pub tenant_key: String,
    /// User id of the caller.
    pub user_id: String,
    /// Optional read-state filter.
    pub is_read: Option<bool>,
    /// Optional category filter.
    pub category: Option<NotificationCategory>,
    /// Page size. Clamped to [1, 100] by the service layer.
    pub limit: i64,
    /// Row offset, >= 0.
    pub offset: i64,
}
