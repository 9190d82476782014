//! Decoders for the `bpm-events` topic.

use serde::Deserialize;

use beacon_entity::fanout::{FanoutRequest, TargetScope};
use beacon_entity::NotificationCategory;

use crate::messages;
use crate::registry::RegistryBuilder;

const TOPIC: &str = "bpm-events";

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register(TOPIC, "TASK_ASSIGNED", decode_task_assigned)
        .register(TOPIC, "TASK_COMPLETED", decode_task_completed)
        .register(TOPIC, "APPROVAL_REQUIRED", decode_approval_required)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BpmEnvelope {
    #[serde(default)]
    event_id: String,
    #[serde(default)]
    tenant_key: String,
    #[serde(default)]
    payload: BpmPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct BpmPayload {
    #[serde(default)]
    task_id: String,
    #[serde(default)]
    task_name: String,
    #[serde(default)]
    assignee_id: String,
    #[serde(default)]
    process_name: String,
}

/// Events without an assignee have no recipient and are skipped.
fn parse(data: &[u8]) -> Option<BpmEnvelope> {
    let envelope: BpmEnvelope = serde_json::from_slice(data).ok()?;
    if envelope.payload.assignee_id.is_empty() {
        return None;
    }
    Some(envelope)
}

fn to_request(envelope: BpmEnvelope, title: String, body: String) -> FanoutRequest {
    FanoutRequest {
        scope: TargetScope::User,
        target_id: envelope.payload.assignee_id,
        tenant_key: envelope.tenant_key,
        category: NotificationCategory::Workflow,
        title,
        body,
        metadata: serde_json::json!({
            "taskId": envelope.payload.task_id,
            "processName": envelope.payload.process_name,
        }),
        source_event_id: envelope.event_id,
        origin_user_id: None,
    }
}

fn decode_task_assigned(data: &[u8]) -> Option<FanoutRequest> {
    let envelope = parse(data)?;
    let (title, body) =
        messages::task_assigned(&envelope.payload.task_name, &envelope.payload.process_name);
    Some(to_request(envelope, title, body))
}

fn decode_task_completed(data: &[u8]) -> Option<FanoutRequest> {
    let envelope = parse(data)?;
    let (title, body) = messages::task_completed(&envelope.payload.task_name);
    Some(to_request(envelope, title, body))
}

fn decode_approval_required(data: &[u8]) -> Option<FanoutRequest> {
    let envelope = parse(data)?;
    let (title, body) =
        messages::approval_required(&envelope.payload.task_name, &envelope.payload.process_name);
    Some(to_request(envelope, title, body))
}
