//! Beacon notification service — process entry point.
//!
//! Wires the pipeline together: PostgreSQL store, identity resolver, push
//! hub, fan-out service, Kafka consumer, retention task, and the HTTP API,
//! with signal-driven graceful shutdown.

use std::sync::Arc;
use std::time::Duration;

use tokio::net::TcpListener;
use tokio::sync::watch;
use tracing_subscriber::{EnvFilter, fmt};

use beacon_api::{AppState, build_router};
use beacon_core::config::AppConfig;
use beacon_core::error::AppError;
use beacon_database::repositories::notification::NotificationRepository;
use beacon_entity::NotificationStore;
use beacon_hub::PushHub;
use beacon_identity::{IdentityResolver, KeycloakResolver};
use beacon_ingest::BrokerConsumer;
use beacon_service::{FanoutService, NotificationService, RetentionTask};

/// How long open HTTP connections get to drain on shutdown.
const SHUTDOWN_GRACE: Duration = Duration::from_secs(10);

#[tokio::main]
async fn main() {
    let config = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main server run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!(
        env = %config.server.env,
        port = config.server.port,
        "Starting beacon-server"
    );

    // ── Database ─────────────────────────────────────────────────
    let pool = beacon_database::create_pool(&config.database).await?;
    beacon_database::migration::run_migrations(&pool).await?;

    let store: Arc<dyn NotificationStore> = Arc::new(NotificationRepository::new(pool));

    // ── Resolver, hub, services ──────────────────────────────────
    let resolver: Arc<dyn IdentityResolver> = Arc::new(KeycloakResolver::new(&config.identity)?);
    let hub = Arc::new(PushHub::new());
    let fanout = Arc::new(FanoutService::new(
        Arc::clone(&store),
        resolver,
        Arc::clone(&hub),
    ));
    let notifications = Arc::new(NotificationService::new(Arc::clone(&store)));

    // ── Background tasks ─────────────────────────────────────────
    let (shutdown_tx, shutdown_rx) = watch::channel(false);

    let registry = Arc::new(beacon_ingest::default_registry());
    let consumer = BrokerConsumer::new(&config.broker, registry, fanout)?;
    let consumer_cancel = shutdown_rx.clone();
    tokio::spawn(async move {
        consumer.run(consumer_cancel).await;
    });
    tracing::info!(topics = ?config.broker.topics, "Kafka consumer task started");

    let retention = RetentionTask::new(Arc::clone(&store), config.retention.days);
    let retention_cancel = shutdown_rx.clone();
    tokio::spawn(async move {
        retention.run(retention_cancel).await;
    });

    // ── HTTP server ──────────────────────────────────────────────
    let port = config.server.port;
    let state = AppState::new(Arc::new(config), notifications, hub);
    let router = build_router(state);

    let listener = TcpListener::bind(("0.0.0.0", port))
        .await
        .map_err(|e| AppError::internal(format!("Failed to bind port {port}: {e}")))?;
    tracing::info!(port, "HTTP server listening");

    let mut server_cancel = shutdown_rx.clone();
    let server = tokio::spawn(async move {
        axum::serve(listener, router)
            .with_graceful_shutdown(async move {
                let _ = server_cancel.changed().await;
            })
            .await
    });

    // ── Graceful shutdown ────────────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutting down gracefully...");
    let _ = shutdown_tx.send(true);

    match tokio::time::timeout(SHUTDOWN_GRACE, server).await {
        Ok(Ok(Ok(()))) => {}
        Ok(Ok(Err(e))) => tracing::error!("HTTP server shutdown error: {e}"),
        Ok(Err(e)) => tracing::error!("HTTP server task panicked: {e}"),
        Err(_) => tracing::warn!("HTTP drain timed out, exiting"),
    }

    tracing::info!("beacon-server stopped");
    Ok(())
}

/// Completes on SIGINT or SIGTERM.
async fn shutdown_signal() {
    let ctrl_c = async {
        let _ = tokio::signal::ctrl_c().await;
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(_) => std::future::pending::<()>().await,
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
