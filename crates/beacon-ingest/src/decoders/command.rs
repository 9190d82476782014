//! Decoder for the `notification-commands` topic.
//!
//! Commands bypass `eventType` routing: the whole record is the command and
//! `commandId` is the idempotency key. Unknown `type` falls back to CUSTOM;
//! an unknown scope falls back to USER when a target id is present and is
//! otherwise skipped.

use serde::Deserialize;

use beacon_entity::fanout::{FanoutRequest, TargetScope};
use beacon_entity::NotificationCategory;

use crate::registry::RegistryBuilder;

const TOPIC: &str = "notification-commands";

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder.register_direct(TOPIC, decode_command)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct Command {
    #[serde(default)]
    command_id: String,
    #[serde(default)]
    tenant_key: String,
    #[serde(default)]
    target_scope: String,
    #[serde(default)]
    target_id: String,
    #[serde(default, rename = "type")]
    category: String,
    #[serde(default)]
    title: String,
    #[serde(default)]
    body: String,
    #[serde(default)]
    metadata: Option<serde_json::Value>,
}

fn decode_command(data: &[u8]) -> Option<FanoutRequest> {
    let command: Command = serde_json::from_slice(data).ok()?;

    let category = command
        .category
        .parse()
        .unwrap_or(NotificationCategory::Custom);

    let scope = match command.target_scope.parse::<TargetScope>() {
        Ok(scope) => scope,
        Err(_) if !command.target_id.is_empty() => TargetScope::User,
        Err(_) => return None,
    };

    Some(FanoutRequest {
        scope,
        target_id: command.target_id,
        tenant_key: command.tenant_key,
        category,
        title: command.title,
        body: command.body,
        metadata: command.metadata.unwrap_or_else(|| serde_json::json!({})),
        source_event_id: command.command_id,
        origin_user_id: None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_with_known_scope_and_type() {
        let data = serde_json::json!({
            "commandId": "c1",
            "tenantKey": "acme",
            "targetScope": "TENANT",
            "targetId": "acme",
            "type": "SYSTEM",
            "title": "Maintenance",
            "body": "Scheduled downtime tonight.",
            "metadata": {"window": "22:00"}
        });

        let request = decode_command(data.to_string().as_bytes()).unwrap();
        assert_eq!(request.scope, TargetScope::Tenant);
        assert_eq!(request.category, NotificationCategory::System);
        assert_eq!(request.source_event_id, "c1");
        assert_eq!(request.metadata["window"], "22:00");
    }

    #[test]
    fn test_unknown_type_falls_back_to_custom() {
        let data = serde_json::json!({
            "commandId": "c2",
            "tenantKey": "acme",
            "targetScope": "USER",
            "targetId": "U1",
            "type": "SOMETHING_ELSE",
            "title": "Hello"
        });

        let request = decode_command(data.to_string().as_bytes()).unwrap();
        assert_eq!(request.category, NotificationCategory::Custom);
    }

    #[test]
    fn test_unknown_scope_with_target_falls_back_to_user() {
        let data = serde_json::json!({
            "commandId": "c3",
            "tenantKey": "acme",
            "targetScope": "TEAM",
            "targetId": "U1",
            "type": "CUSTOM",
            "title": "Hello"
        });

        let request = decode_command(data.to_string().as_bytes()).unwrap();
        assert_eq!(request.scope, TargetScope::User);
        assert_eq!(request.target_id, "U1");
    }

    #[test]
    fn test_unknown_scope_without_target_is_skipped() {
        let data = serde_json::json!({
            "commandId": "c4",
            "tenantKey": "acme",
            "targetScope": "TEAM",
            "type": "CUSTOM",
            "title": "Hello"
        });

        assert!(decode_command(data.to_string().as_bytes()).is_none());
    }

    #[test]
    fn test_missing_metadata_becomes_empty_object() {
        let data = serde_json::json!({
            "commandId": "c5",
            "tenantKey": "acme",
            "targetScope": "PLATFORM",
            "title": "Hello"
        });

        let request = decode_command(data.to_string().as_bytes()).unwrap();
        assert_eq!(request.metadata, serde_json::json!({}));
    }
}
