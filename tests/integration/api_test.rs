//! Pull API tests: authentication, listing, read state, deletion.

use axum::body::Body;
use chrono::{Duration, Utc};
use http::{Request, StatusCode};

use beacon_entity::NotificationCategory;

use crate::helpers::{TestApp, body_json, mint_token_for_realm};

#[tokio::test]
async fn test_health_is_unauthenticated() {
    let app = TestApp::new();

    let response = app
        .request(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["status"], "ok");
    assert_eq!(body["sse_clients"], 0);
}

#[tokio::test]
async fn test_list_requires_bearer_token() {
    let app = TestApp::new();

    let response = app
        .request(
            Request::get("/api/notification/v1/notifications")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_invalid_token_is_rejected() {
    let app = TestApp::new();

    let response = app
        .request(
            Request::get("/api/notification/v1/notifications")
                .header("authorization", "Bearer garbage")
                .header("x-tenant-key", "acme")
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_list_returns_own_rows_newest_first() {
    let app = TestApp::new();
    let now = Utc::now();

    let older = app.seed(
        "acme",
        "U1",
        NotificationCategory::Workflow,
        "older",
        false,
        now - Duration::minutes(10),
    );
    let newer = app.seed(
        "acme",
        "U1",
        NotificationCategory::System,
        "newer",
        false,
        now,
    );
    // Rows of other users and tenants must never leak.
    app.seed("acme", "U2", NotificationCategory::System, "foreign user", false, now);
    app.seed("beta", "U1", NotificationCategory::System, "foreign tenant", false, now);

    let response = app
        .authed("GET", "/api/notification/v1/notifications", "U1", "acme")
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 2);
    assert_eq!(data[0]["id"], newer.id.to_string());
    assert_eq!(data[1]["id"], older.id.to_string());
    assert_eq!(data[0]["type"], "SYSTEM");
}

#[tokio::test]
async fn test_list_filters_by_category_and_read_state() {
    let app = TestApp::new();
    let now = Utc::now();

    app.seed("acme", "U1", NotificationCategory::Workflow, "wf unread", false, now);
    app.seed("acme", "U1", NotificationCategory::Crm, "crm unread", false, now);
    app.seed("acme", "U1", NotificationCategory::Workflow, "wf read", true, now);

    let response = app
        .authed(
            "GET",
            "/api/notification/v1/notifications?type=WORKFLOW&is_read=false",
            "U1",
            "acme",
        )
        .await;
    let body = body_json(response).await;

    let data = body["data"].as_array().unwrap();
    assert_eq!(data.len(), 1);
    assert_eq!(data[0]["title"], "wf unread");
}

#[tokio::test]
async fn test_list_clamps_out_of_range_limit() {
    let app = TestApp::new();

    let response = app
        .authed(
            "GET",
            "/api/notification/v1/notifications?limit=500&offset=-3",
            "U1",
            "acme",
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["limit"], 20);
    assert_eq!(body["offset"], 0);
}

#[tokio::test]
async fn test_unread_count() {
    let app = TestApp::new();
    let now = Utc::now();

    app.seed("acme", "U1", NotificationCategory::System, "a", false, now);
    app.seed("acme", "U1", NotificationCategory::System, "b", false, now);
    app.seed("acme", "U1", NotificationCategory::System, "c", true, now);

    let response = app
        .authed(
            "GET",
            "/api/notification/v1/notifications/unread-count",
            "U1",
            "acme",
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["count"], 2);
}

#[tokio::test]
async fn test_mark_read_is_not_repeatable() {
    let app = TestApp::new();
    let row = app.seed(
        "acme",
        "U1",
        NotificationCategory::System,
        "a",
        false,
        Utc::now(),
    );
    let path = format!("/api/notification/v1/notifications/{}/read", row.id);

    let response = app.authed("PATCH", &path, "U1", "acme").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    {
        let rows = app.store.rows.lock();
        assert!(rows[0].is_read);
        assert!(rows[0].read_at.is_some());
    }

    // Already read → same failure as absent.
    let response = app.authed("PATCH", &path, "U1", "acme").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_mark_read_never_touches_foreign_rows() {
    let app = TestApp::new();
    let row = app.seed(
        "acme",
        "U2",
        NotificationCategory::System,
        "not yours",
        false,
        Utc::now(),
    );
    let path = format!("/api/notification/v1/notifications/{}/read", row.id);

    let response = app.authed("PATCH", &path, "U1", "acme").await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert!(!app.store.rows.lock()[0].is_read);
}

#[tokio::test]
async fn test_read_all_reports_count() {
    let app = TestApp::new();
    let now = Utc::now();

    app.seed("acme", "U1", NotificationCategory::System, "a", false, now);
    app.seed("acme", "U1", NotificationCategory::System, "b", false, now);
    app.seed("acme", "U1", NotificationCategory::System, "c", true, now);

    let response = app
        .authed(
            "POST",
            "/api/notification/v1/notifications/read-all",
            "U1",
            "acme",
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["marked"], 2);

    // Idempotent at the API level: nothing left to mark.
    let response = app
        .authed(
            "POST",
            "/api/notification/v1/notifications/read-all",
            "U1",
            "acme",
        )
        .await;
    let body = body_json(response).await;
    assert_eq!(body["marked"], 0);
}

#[tokio::test]
async fn test_delete_own_row() {
    let app = TestApp::new();
    let row = app.seed(
        "acme",
        "U1",
        NotificationCategory::System,
        "a",
        false,
        Utc::now(),
    );
    let path = format!("/api/notification/v1/notifications/{}", row.id);

    let response = app.authed("DELETE", &path, "U1", "acme").await;
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    assert!(app.store.rows.lock().is_empty());

    let response = app.authed("DELETE", &path, "U1", "acme").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_delete_foreign_row_is_not_found() {
    let app = TestApp::new();
    let row = app.seed(
        "beta",
        "U1",
        NotificationCategory::System,
        "other tenant",
        false,
        Utc::now(),
    );
    let path = format!("/api/notification/v1/notifications/{}", row.id);

    let response = app.authed("DELETE", &path, "U1", "acme").await;
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
    assert_eq!(app.store.rows.lock().len(), 1);
}

#[tokio::test]
async fn test_tenant_falls_back_to_issuer_realm() {
    let app = TestApp::new();
    app.seed(
        "acme",
        "U1",
        NotificationCategory::System,
        "a",
        false,
        Utc::now(),
    );

    // No X-Tenant-Key header; the realm in the token issuer wins.
    let response = app
        .request(
            Request::get("/api/notification/v1/notifications")
                .header(
                    "authorization",
                    format!("Bearer {}", mint_token_for_realm("U1", "acme")),
                )
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::OK);

    let body = body_json(response).await;
    assert_eq!(body["data"].as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_missing_tenant_everywhere_is_bad_request() {
    let app = TestApp::new();

    // Issuer without a realm path and no header → 400.
    let response = app
        .request(
            Request::get("/api/notification/v1/notifications")
                .header("authorization", format!("Bearer {}", no_realm_token()))
                .body(Body::empty())
                .unwrap(),
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

fn no_realm_token() -> String {
    use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};

    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        iss: String,
        exp: i64,
    }

    encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: "U1".to_string(),
            iss: "http://keycloak:8080".to_string(),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        },
        &EncodingKey::from_secret(b"integration-test-key"),
    )
    .unwrap()
}

#[tokio::test]
async fn test_unknown_category_filter_is_bad_request() {
    let app = TestApp::new();

    let response = app
        .authed(
            "GET",
            "/api/notification/v1/notifications?type=BANANA",
            "U1",
            "acme",
        )
        .await;
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reflects_connected_listeners() {
    let app = TestApp::new();
    let (tx, _rx) = tokio::sync::mpsc::channel(8);
    let _handle = app.hub.register("acme", "U1", tx);

    let response = app
        .request(Request::get("/health").body(Body::empty()).unwrap())
        .await;
    let body = body_json(response).await;
    assert_eq!(body["sse_clients"], 1);
}
