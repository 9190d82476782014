//! Decoders for the `iam-events` topic.

use serde::Deserialize;

use beacon_entity::fanout::{FanoutRequest, TargetScope};
use beacon_entity::NotificationCategory;

use crate::messages;
use crate::registry::RegistryBuilder;

const TOPIC: &str = "iam-events";

pub(crate) fn register(builder: RegistryBuilder) -> RegistryBuilder {
    builder
        .register(TOPIC, "LOGIN_NEW_DEVICE", decode_login_new_device)
        .register(TOPIC, "PASSWORD_CHANGED", decode_password_changed)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IamEnvelope {
    #[serde(default)]
    event_id: String,
    #[serde(default)]
    tenant_key: String,
    #[serde(default)]
    payload: IamPayload,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct IamPayload {
    #[serde(default)]
    user_id: String,
    #[serde(default)]
    ip: String,
    #[serde(default)]
    detail: String,
}

fn to_request(envelope: IamEnvelope, title: String, body: String) -> FanoutRequest {
    FanoutRequest {
        scope: TargetScope::User,
        target_id: envelope.payload.user_id,
        tenant_key: envelope.tenant_key,
        category: NotificationCategory::Iam,
        title,
        body,
        metadata: serde_json::json!({
            "ip": envelope.payload.ip,
            "detail": envelope.payload.detail,
        }),
        source_event_id: envelope.event_id,
        origin_user_id: None,
    }
}

fn decode_login_new_device(data: &[u8]) -> Option<FanoutRequest> {
    let envelope: IamEnvelope = serde_json::from_slice(data).ok()?;
    let (title, body) = messages::login_new_device(&envelope.payload.ip);
    Some(to_request(envelope, title, body))
}

fn decode_password_changed(data: &[u8]) -> Option<FanoutRequest> {
    let envelope: IamEnvelope = serde_json::from_slice(data).ok()?;
    let (title, body) = messages::password_changed();
    Some(to_request(envelope, title, body))
}
