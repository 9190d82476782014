//! PostgreSQL connection pool construction.

use std::time::Duration;

use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use beacon_core::config::DatabaseConfig;
use beacon_core::error::{AppError, ErrorKind};

/// Build the shared connection pool and verify connectivity with a ping.
///
/// Every task in the process (consumer loop, HTTP handlers, purge) shares
/// this pool; its `max_connections` bound is what ultimately backpressures
/// the fan-out path when the database is slow.
pub async fn create_pool(config: &DatabaseConfig) -> Result<PgPool, AppError> {
    // Credentials stay out of the log line; only the endpoint is recorded.
    info!(
        host = %config.host,
        port = config.port,
        database = %config.name,
        max_connections = config.max_connections,
        "Connecting to PostgreSQL"
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.max_connections)
        .acquire_timeout(Duration::from_secs(config.connect_timeout_seconds))
        .connect(&config.url())
        .await
        .map_err(|e| {
            AppError::with_source(
                ErrorKind::Database,
                format!(
                    "Failed to connect to {}:{}/{}",
                    config.host, config.port, config.name
                ),
                e,
            )
        })?;

    ping(&pool).await?;

    info!("PostgreSQL connection established");
    Ok(pool)
}

/// Round-trip a trivial query, proving the pool can actually serve work.
pub async fn ping(pool: &PgPool) -> Result<(), AppError> {
    sqlx::query("SELECT 1")
        .execute(pool)
        .await
        .map(|_| ())
        .map_err(|e| AppError::with_source(ErrorKind::Database, "Database ping failed", e))
}
