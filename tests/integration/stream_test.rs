//! SSE stream tests: handshake, headers, and live delivery.

use axum::body::Body;
use chrono::Utc;
use http::{Request, StatusCode};
use http_body_util::BodyExt;
use uuid::Uuid;

use beacon_entity::{Notification, NotificationCategory};

use crate::helpers::{TestApp, mint_token};

fn stream_request(user_id: &str, tenant_key: &str) -> Request<Body> {
    Request::get("/api/notification/v1/notifications/stream")
        .header("authorization", format!("Bearer {}", mint_token(user_id)))
        .header("x-tenant-key", tenant_key)
        .body(Body::empty())
        .unwrap()
}

async fn next_frame(body: &mut Body) -> String {
    let frame = body
        .frame()
        .await
        .expect("stream should yield a frame")
        .expect("frame should be readable");
    let data = frame.into_data().expect("frame should carry data");
    String::from_utf8(data.to_vec()).expect("frame should be UTF-8")
}

#[tokio::test]
async fn test_stream_sends_connected_handshake_with_sse_headers() {
    let app = TestApp::new();

    let response = app.request(stream_request("U1", "acme")).await;
    assert_eq!(response.status(), StatusCode::OK);

    let headers = response.headers();
    assert!(headers["content-type"]
        .to_str()
        .unwrap()
        .starts_with("text/event-stream"));
    assert_eq!(headers["cache-control"], "no-cache");
    assert_eq!(headers["x-accel-buffering"], "no");

    let mut body = response.into_body();
    let handshake = next_frame(&mut body).await;
    assert!(handshake.contains("event: connected"));
    assert!(handshake.contains(r#"{"status":"ok"}"#));

    // The session is registered for as long as the body is alive.
    assert_eq!(app.hub.connected_count(), 1);
    drop(body);
}

#[tokio::test]
async fn test_stream_receives_broadcast_notifications() {
    let app = TestApp::new();

    let response = app.request(stream_request("U1", "acme")).await;
    let mut body = response.into_body();
    let _handshake = next_frame(&mut body).await;

    let notification = Notification {
        id: Uuid::new_v4(),
        tenant_key: "acme".to_string(),
        user_id: "U1".to_string(),
        category: NotificationCategory::Workflow,
        title: "New task: Review PR".to_string(),
        body: String::new(),
        metadata: serde_json::json!({}),
        is_read: false,
        read_at: None,
        created_at: Utc::now(),
        source_event_id: Some("e1".to_string()),
    };
    assert_eq!(app.hub.broadcast("acme", "U1", &notification), 1);

    let frame = next_frame(&mut body).await;
    assert!(frame.contains("event: notification"));
    assert!(frame.contains(&notification.id.to_string()));

    // Pushes for other users never reach this session.
    assert_eq!(app.hub.broadcast("acme", "U2", &notification), 0);
}

#[tokio::test]
async fn test_stream_requires_authentication() {
    let app = TestApp::new();

    let response = app
        .request(
            Request::get("/api/notification/v1/notifications/stream")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    assert_eq!(app.hub.connected_count(), 0);
}
