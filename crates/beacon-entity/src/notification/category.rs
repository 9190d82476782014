//! Notification category — the origin domain of a notification.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Error returned when parsing an unknown category name.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown notification category: {0}")]
pub struct ParseCategoryError(String);

/// The origin domain of a notification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationCategory {
    /// Platform-level events (tenant lifecycle, announcements).
    System,
    /// Business-process events (tasks, approvals).
    Workflow,
    /// CRM events (leads, deals).
    Crm,
    /// Identity and access events (logins, password changes).
    Iam,
    /// Free-form notifications from the command topic.
    Custom,
}

impl NotificationCategory {
    /// The wire/database representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::System => "SYSTEM",
            Self::Workflow => "WORKFLOW",
            Self::Crm => "CRM",
            Self::Iam => "IAM",
            Self::Custom => "CUSTOM",
        }
    }
}

impl fmt::Display for NotificationCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for NotificationCategory {
    type Err = ParseCategoryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "SYSTEM" => Ok(Self::System),
            "WORKFLOW" => Ok(Self::Workflow),
            "CRM" => Ok(Self::Crm),
            "IAM" => Ok(Self::Iam),
            "CUSTOM" => Ok(Self::Custom),
            other => Err(ParseCategoryError(other.to_string())),
        }
    }
}

impl TryFrom<String> for NotificationCategory {
    type Error = ParseCategoryError;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}
