//! Persistence port for notifications.

use async_trait::async_trait;
use uuid::Uuid;

use beacon_core::result::AppResult;

use crate::fanout::CreateNotificationInput;

use super::model::{Notification, NotificationFilter};

/// Persistence port for notification rows. Implemented by the PostgreSQL
/// repository in `beacon-database`; in-memory implementations are used by
/// tests.
///
/// Insert operations deduplicate on `(source_event_id, tenant_key, user_id)`:
/// a conflicting row is silently dropped and simply absent from the returned
/// set. Duplicates are an expected outcome of at-least-once broker delivery,
/// never an error.
#[async_trait]
pub trait NotificationStore: Send + Sync {
    /// Insert a single row. Returns `None` when the row was suppressed by
    /// the idempotency index.
    async fn create(&self, input: CreateNotificationInput) -> AppResult<Option<Notification>>;

    /// Insert many rows; returns only the rows actually inserted, in
    /// unspecified order. Empty input yields empty output.
    async fn batch_create(
        &self,
        inputs: Vec<CreateNotificationInput>,
    ) -> AppResult<Vec<Notification>>;

    /// Rows matching the filter, newest first.
    async fn list(&self, filter: NotificationFilter) -> AppResult<Vec<Notification>>;

    /// Single-row lookup by primary key. Not scoped to tenant/user; the
    /// caller must authorise.
    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Notification>>;

    /// Mark one unread row as read. Errors when the row is absent, owned by
    /// someone else, or already read.
    async fn mark_read(&self, id: Uuid, tenant_key: &str, user_id: &str) -> AppResult<()>;

    /// Mark every unread row for the user as read; returns the count updated.
    async fn mark_all_read(&self, tenant_key: &str, user_id: &str) -> AppResult<i64>;

    /// Delete one row owned by the user. Errors when nothing matched.
    async fn delete(&self, id: Uuid, tenant_key: &str, user_id: &str) -> AppResult<()>;

    /// Number of unread rows for the user.
    async fn count_unread(&self, tenant_key: &str, user_id: &str) -> AppResult<i64>;

    /// Delete rows older than the given number of days; returns the count.
    async fn purge_older_than(&self, days: u32) -> AppResult<i64>;
}
