//! Decoders for the `crm-events` topic.

use serde::Deserialize;

use beacon_entity::fanout::{FanoutRequest, TargetScope};
use beacon_entity::NotificationCategory;

use crate::messages;
use crate::registry::RegistryBuilder;

const TOPIC: &str = "crm-events";

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register(TOPIC, "LEAD_STATUS_CHANGED", decode_lead_status_changed)
        .register(TOPIC, "DEAL_UPDATED", decode_deal_updated)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrmEnvelope {
    #[serde(default)]
    event_id: String,
    #[serde(default)]
    tenant_key: String,
    #[serde(default)]
    payload: CrmPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct CrmPayload {
    #[serde(default)]
    entity_id: String,
    #[serde(default)]
    entity_name: String,
    #[serde(default)]
    owner_id: String,
}

/// Events without an owner have no recipient and are skipped.
fn parse(data: &[u8]) -> Option<CrmEnvelope> {
    let envelope: CrmEnvelope = serde_json::from_slice(data).ok()?;
    if envelope.payload.owner_id.is_empty() {
        return None;
    }
    Some(envelope)
}

fn to_request(envelope: CrmEnvelope, title: String, body: String) -> FanoutRequest {
    FanoutRequest {
        scope: TargetScope::User,
        target_id: envelope.payload.owner_id,
        tenant_key: envelope.tenant_key,
        category: NotificationCategory::Crm,
        title,
        body,
        metadata: serde_json::json!({"entityId": envelope.payload.entity_id}),
        source_event_id: envelope.event_id,
        origin_user_id: None,
    }
}

fn decode_lead_status_changed(data: &[u8]) -> Option<FanoutRequest> {
    let envelope = parse(data)?;
    let (title, body) = messages::lead_status_changed(&envelope.payload.entity_name);
    Some(to_request(envelope, title, body))
}

fn decode_deal_updated(data: &[u8]) -> Option<FanoutRequest> {
    let envelope = parse(data)?;
    let (title, body) = messages::deal_updated(&envelope.payload.entity_name);
    Some(to_request(envelope, title, body))
}
