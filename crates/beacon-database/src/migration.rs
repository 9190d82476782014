//! Schema migrations for the notifications table.

use sqlx::PgPool;
use sqlx::migrate::Migrator;
use tracing::info;

use beacon_core::error::{AppError, ErrorKind};

/// Migrations embedded at compile time from the workspace `migrations/`
/// directory.
static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the notification schema up to date. The partial unique index that
/// carries the idempotency guarantee is created here, so fan-out must not
/// start before this has run.
pub async fn run_migrations(pool: &PgPool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Schema migration failed: {e}"),
            e,
        )
    })?;

    info!(
        known_migrations = MIGRATOR.iter().count(),
        "Notification schema is up to date"
    );
    Ok(())
}
