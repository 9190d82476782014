//! Query-side notification service backing the pull API.

use std::sync::Arc;

use uuid::Uuid;

use beacon_core::error::{AppError, ErrorKind};
use beacon_core::result::AppResult;
use beacon_entity::notification::model::{Notification, NotificationFilter};
use beacon_entity::notification::store::NotificationStore;

/// Default page size when the caller sends none or an out-of-range value.
const DEFAULT_LIMIT: i64 = 20;
/// Hard cap on page size.
const MAX_LIMIT: i64 = 100;

/// Read/update operations over a user's own notifications.
pub struct NotificationService {
    store: Arc<dyn NotificationStore>,
}

impl NotificationService {
    /// Create a new notification service.
    pub fn new(store: Arc<dyn NotificationStore>) -> Self {
        Self { store }
    }

    /// Paginated notifications for a user, newest first. Out-of-range limits
    /// fall back to the default; negative offsets are treated as zero.
    pub async fn list(&self, mut filter: NotificationFilter) -> AppResult<Vec<Notification>> {
        if filter.limit <= 0 || filter.limit > MAX_LIMIT {
            filter.limit = DEFAULT_LIMIT;
        }
        if filter.offset < 0 {
            filter.offset = 0;
        }
        self.store.list(filter).await
    }

    /// Unread badge count for a user.
    pub async fn count_unread(&self, tenant_key: &str, user_id: &str) -> AppResult<i64> {
        self.store.count_unread(tenant_key, user_id).await
    }

    /// Mark a single notification as read. An absent, foreign, or
    /// already-read row is a caller error.
    pub async fn mark_read(&self, id: Uuid, tenant_key: &str, user_id: &str) -> AppResult<()> {
        self.store
            .mark_read(id, tenant_key, user_id)
            .await
            .map_err(|e| match e.kind {
                ErrorKind::NotFound => AppError::bad_request(e.message),
                _ => e,
            })
    }

    /// Mark every unread notification for a user as read; returns the count.
    pub async fn mark_all_read(&self, tenant_key: &str, user_id: &str) -> AppResult<i64> {
        self.store.mark_all_read(tenant_key, user_id).await
    }

    /// Delete a notification belonging to the requesting user.
    pub async fn delete(&self, id: Uuid, tenant_key: &str, user_id: &str) -> AppResult<()> {
        self.store.delete(id, tenant_key, user_id).await
    }
}
