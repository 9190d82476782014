//! Notification repository implementation.
//!
//! Insert paths carry `ON CONFLICT ... DO NOTHING` against the partial
//! unique index on `(source_event_id, tenant_key, user_id)`; that index is
//! the sole idempotency mechanism, so a duplicate source event surfaces as
//! an absent row in the `RETURNING` set rather than as an error.

use async_trait::async_trait;
use chrono::{Duration, Utc};
use sqlx::{PgPool, Postgres, QueryBuilder};
use uuid::Uuid;

use beacon_core::error::{AppError, ErrorKind};
use beacon_core::result::AppResult;
use beacon_entity::fanout::CreateNotificationInput;
use beacon_entity::notification::model::{Notification, NotificationFilter};
use beacon_entity::notification::store::NotificationStore;

/// Rows per INSERT statement on the batch path. Keeps each statement well
/// under the PostgreSQL bind-parameter limit.
const BATCH_CHUNK_SIZE: usize = 500;

const INSERT_COLUMNS: &str =
    "INSERT INTO notifications (tenant_key, user_id, category, title, body, metadata, source_event_id) ";

const ON_CONFLICT_RETURNING: &str = " ON CONFLICT (source_event_id, tenant_key, user_id) \
     WHERE source_event_id IS NOT NULL DO NOTHING RETURNING *";

/// PostgreSQL implementation of the `NotificationStore` port.
#[derive(Debug, Clone)]
pub struct NotificationRepository {
    pool: PgPool,
}

impl NotificationRepository {
    /// Create a new notification repository.
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NotificationStore for NotificationRepository {
    async fn create(&self, input: CreateNotificationInput) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>(
            "INSERT INTO notifications (tenant_key, user_id, category, title, body, metadata, source_event_id) \
             VALUES ($1, $2, $3, $4, $5, $6, $7) \
             ON CONFLICT (source_event_id, tenant_key, user_id) \
             WHERE source_event_id IS NOT NULL DO NOTHING \
             RETURNING *",
        )
        .bind(&input.tenant_key)
        .bind(&input.user_id)
        .bind(input.category.as_str())
        .bind(&input.title)
        .bind(&input.body)
        .bind(&input.metadata)
        .bind(&input.source_event_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to insert notification", e)
        })
    }

    async fn batch_create(
        &self,
        inputs: Vec<CreateNotificationInput>,
    ) -> AppResult<Vec<Notification>> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }

        let mut inserted = Vec::with_capacity(inputs.len());

        for chunk in inputs.chunks(BATCH_CHUNK_SIZE) {
            let mut builder = QueryBuilder::<Postgres>::new(INSERT_COLUMNS);
            builder.push_values(chunk, |mut row, input| {
                row.push_bind(&input.tenant_key)
                    .push_bind(&input.user_id)
                    .push_bind(input.category.as_str())
                    .push_bind(&input.title)
                    .push_bind(&input.body)
                    .push_bind(&input.metadata)
                    .push_bind(&input.source_event_id);
            });
            builder.push(ON_CONFLICT_RETURNING);

            let rows = builder
                .build_query_as::<Notification>()
                .fetch_all(&self.pool)
                .await
                .map_err(|e| {
                    AppError::with_source(
                        ErrorKind::Database,
                        "Failed to batch insert notifications",
                        e,
                    )
                })?;

            inserted.extend(rows);
        }

        Ok(inserted)
    }

    async fn list(&self, filter: NotificationFilter) -> AppResult<Vec<Notification>> {
        let mut builder =
            QueryBuilder::<Postgres>::new("SELECT * FROM notifications WHERE tenant_key = ");
        builder.push_bind(&filter.tenant_key);
        builder.push(" AND user_id = ");
        builder.push_bind(&filter.user_id);

        if let Some(is_read) = filter.is_read {
            builder.push(" AND is_read = ");
            builder.push_bind(is_read);
        }
        if let Some(category) = filter.category {
            builder.push(" AND category = ");
            builder.push_bind(category.as_str());
        }

        builder.push(" ORDER BY created_at DESC LIMIT ");
        builder.push_bind(filter.limit);
        builder.push(" OFFSET ");
        builder.push_bind(filter.offset);

        builder
            .build_query_as::<Notification>()
            .fetch_all(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to list notifications", e)
            })
    }

    async fn get_by_id(&self, id: Uuid) -> AppResult<Option<Notification>> {
        sqlx::query_as::<_, Notification>("SELECT * FROM notifications WHERE id = $1")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to fetch notification", e)
            })
    }

    async fn mark_read(&self, id: Uuid, tenant_key: &str, user_id: &str) -> AppResult<()> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE id = $1 AND tenant_key = $2 AND user_id = $3 AND is_read = FALSE",
        )
        .bind(id)
        .bind(tenant_key)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark notification read", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("notification not found or already read"));
        }
        Ok(())
    }

    async fn mark_all_read(&self, tenant_key: &str, user_id: &str) -> AppResult<i64> {
        let result = sqlx::query(
            "UPDATE notifications SET is_read = TRUE, read_at = NOW() \
             WHERE tenant_key = $1 AND user_id = $2 AND is_read = FALSE",
        )
        .bind(tenant_key)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to mark all notifications read", e)
        })?;

        Ok(result.rows_affected() as i64)
    }

    async fn delete(&self, id: Uuid, tenant_key: &str, user_id: &str) -> AppResult<()> {
        let result = sqlx::query(
            "DELETE FROM notifications WHERE id = $1 AND tenant_key = $2 AND user_id = $3",
        )
        .bind(id)
        .bind(tenant_key)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to delete notification", e)
        })?;

        if result.rows_affected() == 0 {
            return Err(AppError::not_found("notification not found"));
        }
        Ok(())
    }

    async fn count_unread(&self, tenant_key: &str, user_id: &str) -> AppResult<i64> {
        sqlx::query_scalar::<_, i64>(
            "SELECT COUNT(*) FROM notifications \
             WHERE tenant_key = $1 AND user_id = $2 AND is_read = FALSE",
        )
        .bind(tenant_key)
        .bind(user_id)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            AppError::with_source(ErrorKind::Database, "Failed to count unread notifications", e)
        })
    }

    async fn purge_older_than(&self, days: u32) -> AppResult<i64> {
        let cutoff = Utc::now() - Duration::days(i64::from(days));

        let result = sqlx::query("DELETE FROM notifications WHERE created_at < $1")
            .bind(cutoff)
            .execute(&self.pool)
            .await
            .map_err(|e| {
                AppError::with_source(ErrorKind::Database, "Failed to purge notifications", e)
            })?;

        Ok(result.rows_affected() as i64)
    }
}
