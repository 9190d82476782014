//! Decoders for the `tenant-events` topic.
//!
//! Every tenant lifecycle event fans out to the `PLATFORM_ADMIN` role in the
//! administrative realm, with the acting user carried as origin so they see
//! the outcome of their own action.

use serde::Deserialize;

use beacon_entity::fanout::{FanoutRequest, TargetScope};
use beacon_entity::NotificationCategory;

use crate::messages;
use crate::registry::RegistryBuilder;

const TOPIC: &str = "tenant-events";
const ADMIN_ROLE: &str = "PLATFORM_ADMIN";
const ADMIN_TENANT: &str = "master";

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register(TOPIC, "TENANT_CREATED", decode_tenant_created)
        .register(TOPIC, "TENANT_UPDATED", decode_tenant_updated)
        .register(TOPIC, "TENANT_STATUS_UPDATED", decode_tenant_status_updated)
        .register(TOPIC, "TENANT_DELETED", decode_tenant_deleted)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct TenantEnvelope {
    #[serde(default)]
    event_type: String,
    #[serde(default)]
    event_id: String,
    #[serde(default)]
    tenant_key: String,
    #[serde(default)]
    display_name: String,
    #[serde(default)]
    db_type: String,
    #[serde(default)]
    status: String,
    #[serde(default)]
    created_by: String,
}

impl TenantEnvelope {
    fn display_name(&self) -> &str {
        if self.display_name.is_empty() {
            &self.tenant_key
        } else {
            &self.display_name
        }
    }
}

fn to_request(envelope: TenantEnvelope, title: String, body: String) -> FanoutRequest {
    FanoutRequest {
        scope: TargetScope::Role,
        target_id: ADMIN_ROLE.to_string(),
        tenant_key: ADMIN_TENANT.to_string(),
        category: NotificationCategory::System,
        title,
        body,
        metadata: serde_json::json!({
            "eventType": envelope.event_type,
            "tenantKey": envelope.tenant_key,
        }),
        source_event_id: envelope.event_id,
        origin_user_id: if envelope.created_by.is_empty() {
            None
        } else {
            Some(envelope.created_by)
        },
    }
}

fn decode_tenant_created(data: &[u8]) -> Option<FanoutRequest> {
    let envelope: TenantEnvelope = serde_json::from_slice(data).ok()?;
    let (title, body) = messages::tenant_created(envelope.display_name(), &envelope.db_type);
    Some(to_request(envelope, title, body))
}

fn decode_tenant_updated(data: &[u8]) -> Option<FanoutRequest> {
    let envelope: TenantEnvelope = serde_json::from_slice(data).ok()?;
    let (title, body) = messages::tenant_updated(envelope.display_name());
    Some(to_request(envelope, title, body))
}

fn decode_tenant_status_updated(data: &[u8]) -> Option<FanoutRequest> {
    let envelope: TenantEnvelope = serde_json::from_slice(data).ok()?;
    let (title, body) = messages::tenant_status_updated(&envelope.tenant_key, &envelope.status);
    Some(to_request(envelope, title, body))
}

fn decode_tenant_deleted(data: &[u8]) -> Option<FanoutRequest> {
    let envelope: TenantEnvelope = serde_json::from_slice(data).ok()?;
    let (title, body) = messages::tenant_deleted(&envelope.tenant_key);
    Some(to_request(envelope, title, body))
}
