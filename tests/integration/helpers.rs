//! Shared test helpers for integration tests.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::body::Body;
use chrono::{DateTime, Duration, Utc};
use http::{Request, Response};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use parking_lot::Mutex;
use serde_json::Value;
use tower::ServiceExt;
use uuid::Uuid;

use beacon_api::{AppState, build_router};
use beacon_core::config::AppConfig;
use beacon_core::error::AppError;
use beacon_entity::fanout::CreateNotificationInput;
use beacon_entity::notification::model::{Notification, NotificationFilter};
use beacon_entity::{NotificationCategory, NotificationStore};
use beacon_hub::PushHub;
use beacon_service::NotificationService;

/// In-memory `NotificationStore` with the same contracts as the PostgreSQL
/// repository, letting the full router run without a database.
#[derive(Default)]
pub struct InMemoryStore {
    pub rows: Mutex<Vec<Notification>>,
    seen: Mutex<HashSet<(String, String, String)>>,
}

impl InMemoryStore {
    fn insert_row(&self, input: CreateNotificationInput) -> Option<Notification> {
        if let Some(event_id) = &input.source_event_id {
            let key = (
                event_id.clone(),
                input.tenant_key.clone(),
                input.user_id.clone(),
            );
            if !self.seen.lock().insert(key) {
                return None;
            }
        }

        let row = Notification {
            id: Uuid::new_v4(),
            tenant_key: input.tenant_key,
            user_id: input.user_id,
            category: input.category,
            title: input.title,
            body: input.body,
            metadata: input.metadata,
            is_read: false,
            read_at: None,
            created_at: Utc::now(),
            source_event_id: input.source_event_id,
        };
        self.rows.lock().push(row.clone());
        Some(row)
    }
}

#[async_trait]
impl NotificationStore for InMemoryStore {
    async fn create(
        &self,
        input: CreateNotificationInput,
    ) -> Result<Option<Notification>, AppError> {
        Ok(self.insert_row(input))
    }

    async fn batch_create(
        &self,
        inputs: Vec<CreateNotificationInput>,
    ) -> Result<Vec<Notification>, AppError> {
        Ok(inputs
            .into_iter()
            .filter_map(|input| self.insert_row(input))
            .collect())
    }

    async fn list(&self, filter: NotificationFilter) -> Result<Vec<Notification>, AppError> {
        let rows = self.rows.lock();
        let mut matching: Vec<Notification> = rows
            .iter()
            .filter(|n| n.tenant_key == filter.tenant_key && n.user_id == filter.user_id)
            .filter(|n| filter.is_read.map_or(true, |r| n.is_read == r))
            .filter(|n| filter.category.map_or(true, |c| n.category == c))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));

        Ok(matching
            .into_iter()
            .skip(filter.offset.max(0) as usize)
            .take(filter.limit.max(0) as usize)
            .collect())
    }

    async fn get_by_id(&self, id: Uuid) -> Result<Option<Notification>, AppError> {
        Ok(self.rows.lock().iter().find(|n| n.id == id).cloned())
    }

    async fn mark_read(
        &self,
        id: Uuid,
        tenant_key: &str,
        user_id: &str,
    ) -> Result<(), AppError> {
        let mut rows = self.rows.lock();
        let row = rows.iter_mut().find(|n| {
            n.id == id && n.tenant_key == tenant_key && n.user_id == user_id && !n.is_read
        });
        match row {
            Some(row) => {
                row.is_read = true;
                row.read_at = Some(Utc::now());
                Ok(())
            }
            None => Err(AppError::not_found("notification not found or already read")),
        }
    }

    async fn mark_all_read(&self, tenant_key: &str, user_id: &str) -> Result<i64, AppError> {
        let mut rows = self.rows.lock();
        let mut marked = 0;
        for row in rows.iter_mut() {
            if row.tenant_key == tenant_key && row.user_id == user_id && !row.is_read {
                row.is_read = true;
                row.read_at = Some(Utc::now());
                marked += 1;
            }
        }
        Ok(marked)
    }

    async fn delete(&self, id: Uuid, tenant_key: &str, user_id: &str) -> Result<(), AppError> {
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|n| !(n.id == id && n.tenant_key == tenant_key && n.user_id == user_id));
        if rows.len() == before {
            return Err(AppError::not_found("notification not found"));
        }
        Ok(())
    }

    async fn count_unread(&self, tenant_key: &str, user_id: &str) -> Result<i64, AppError> {
        Ok(self
            .rows
            .lock()
            .iter()
            .filter(|n| n.tenant_key == tenant_key && n.user_id == user_id && !n.is_read)
            .count() as i64)
    }

    async fn purge_older_than(&self, days: u32) -> Result<i64, AppError> {
        let cutoff = Utc::now() - Duration::days(i64::from(days));
        let mut rows = self.rows.lock();
        let before = rows.len();
        rows.retain(|n| n.created_at >= cutoff);
        Ok((before - rows.len()) as i64)
    }
}

/// Test application context.
pub struct TestApp {
    /// The Axum router for making test requests.
    pub router: Router,
    /// Store backing the router, for seeding and direct assertions.
    pub store: Arc<InMemoryStore>,
    /// Push hub backing the stream endpoint.
    pub hub: Arc<PushHub>,
}

impl TestApp {
    /// Create a new test application.
    pub fn new() -> Self {
        let config = AppConfig::load().expect("default config should load");
        let store = Arc::new(InMemoryStore::default());
        let hub = Arc::new(PushHub::new());
        let notifications = Arc::new(NotificationService::new(
            Arc::clone(&store) as Arc<dyn NotificationStore>
        ));

        let state = AppState::new(Arc::new(config), notifications, Arc::clone(&hub));

        Self {
            router: build_router(state),
            store,
            hub,
        }
    }

    /// Seed one row with an explicit creation time; returns it.
    pub fn seed(
        &self,
        tenant_key: &str,
        user_id: &str,
        category: NotificationCategory,
        title: &str,
        is_read: bool,
        created_at: DateTime<Utc>,
    ) -> Notification {
        let row = Notification {
            id: Uuid::new_v4(),
            tenant_key: tenant_key.to_string(),
            user_id: user_id.to_string(),
            category,
            title: title.to_string(),
            body: String::new(),
            metadata: serde_json::json!({}),
            is_read,
            read_at: is_read.then(Utc::now),
            created_at,
            source_event_id: None,
        };
        self.store.rows.lock().push(row.clone());
        row
    }

    /// Send a request through the router.
    pub async fn request(&self, request: Request<Body>) -> Response<Body> {
        self.router
            .clone()
            .oneshot(request)
            .await
            .expect("router should produce a response")
    }

    /// Send an authenticated request with the standard headers.
    pub async fn authed(
        &self,
        method: &str,
        path: &str,
        user_id: &str,
        tenant_key: &str,
    ) -> Response<Body> {
        let request = Request::builder()
            .method(method)
            .uri(path)
            .header("authorization", format!("Bearer {}", mint_token(user_id)))
            .header("x-tenant-key", tenant_key)
            .body(Body::empty())
            .unwrap();
        self.request(request).await
    }
}

/// Mint a structurally valid provider-style token. The extractor checks
/// structure and expiry only, so the signing key is irrelevant.
pub fn mint_token(sub: &str) -> String {
    mint_token_for_realm(sub, "acme")
}

/// Mint a token whose issuer carries the given realm.
pub fn mint_token_for_realm(sub: &str, realm: &str) -> String {
    #[derive(serde::Serialize)]
    struct Claims {
        sub: String,
        iss: String,
        exp: i64,
    }

    encode(
        &Header::new(Algorithm::HS256),
        &Claims {
            sub: sub.to_string(),
            iss: format!("http://keycloak:8080/realms/{realm}"),
            exp: (Utc::now() + Duration::hours(1)).timestamp(),
        },
        &EncodingKey::from_secret(b"integration-test-key"),
    )
    .expect("token minting should succeed")
}

/// Read a response body as JSON.
pub async fn body_json(response: Response<Body>) -> Value {
    let bytes = http_body_util::BodyExt::collect(response.into_body())
        .await
        .expect("body should be readable")
        .to_bytes();
    serde_json::from_slice(&bytes).expect("body should be JSON")
}
