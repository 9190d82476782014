//! Pre- and post-fan-out DTOs.
//!
//! Broker decoders produce a [`FanoutRequest`] with an abstract target scope;
//! the fan-out service resolves the scope to concrete users and hands the
//! store one [`CreateNotificationInput`] per recipient.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::notification::category::NotificationCategory;

/// Error returned when parsing an unknown scope name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown target scope: {0}")]
pub struct ParseScopeError(String);

/// Who should receive a notification, before fan-out resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TargetScope {
    /// A single user id.
    User,
    /// All active users within one tenant.
    Tenant,
    /// All active users across every tenant.
    Platform,
    /// All users holding a role within one tenant.
    Role,
}

impl TargetScope {
    /// The wire representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Tenant => "TENANT",
            Self::Platform => "PLATFORM",
            Self::Role => "ROLE",
        }
    }
}

impl fmt::Display for TargetScope {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TargetScope {
    type Err = ParseScopeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "USER" => Ok(Self::User),
            "TENANT" => Ok(Self::Tenant),
            "PLATFORM" => Ok(Self::Platform),
            "ROLE" => Ok(Self::Role),
            other => Err(ParseScopeError(other.to_string())),
        }
    }
}

/// The pre-fan-out request produced by broker decoders.
#[derive(Debug, Clone)]
pub struct FanoutRequest {
    /// Resolution strategy for the target.
    pub scope: TargetScope,
    /// userID (USER), tenantKey (TENANT), or roleName (ROLE).
    /// Empty for PLATFORM scope.
    pub target_id: String,
    /// Tenant of the originating event.
    pub tenant_key: String,
    /// Notification category.
    pub category: NotificationCategory,
    /// Title text.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Opaque structured data.
    pub metadata: serde_json::Value,
    /// Idempotency key of the source event.
    pub source_event_id: String,
    /// The user who performed the action. Added to the recipient set when
    /// resolution does not already include them.
    pub origin_user_id: Option<String>,
}

/// The post-fan-out DTO — always carries a concrete `(tenant_key, user_id)`.
#[derive(Debug, Clone)]
pub struct CreateNotificationInput {
    /// Concrete tenant key.
    pub tenant_key: String,
    /// Concrete recipient user id.
    pub user_id: String,
    /// Notification category.
    pub category: NotificationCategory,
    /// Title text.
    pub title: String,
    /// Body text.
    pub body: String,
    /// Opaque structured data.
    pub metadata: serde_json::Value,
    /// Idempotency key. `None` disables deduplication for this row.
    pub source_event_id: Option<String>,
}
