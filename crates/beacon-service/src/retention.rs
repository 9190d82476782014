//! Periodic purge of notifications past the retention window.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tracing::{error, info};

use beacon_entity::notification::store::NotificationStore;

/// Interval between purge runs.
const PURGE_INTERVAL: Duration = Duration::from_secs(24 * 60 * 60);

/// Deletes rows older than the retention window once a day.
pub struct RetentionTask {
    store: Arc<dyn NotificationStore>,
    days: u32,
}

impl RetentionTask {
    /// Create a retention task with the configured window.
    pub fn new(store: Arc<dyn NotificationStore>, days: u32) -> Self {
        Self { store, days }
    }

    /// Run until the cancel signal flips to true. The first purge fires one
    /// interval after startup, not immediately.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        let mut ticker = tokio::time::interval(PURGE_INTERVAL);
        // interval() fires instantly on its first tick; consume it so the
        // purge cadence starts one full period from now.
        ticker.tick().await;

        info!(retention_days = self.days, "Retention task started");

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.purge_once().await;
                }
            }
        }

        info!("Retention task stopped");
    }

    /// One purge pass. Failures are logged and never fatal.
    pub async fn purge_once(&self) {
        match self.store.purge_older_than(self.days).await {
            Ok(deleted) => {
                info!(deleted, older_than_days = self.days, "Notification purge completed");
            }
            Err(e) => {
                error!(error = %e, "Notification purge failed");
            }
        }
    }
}
