//! Kafka consumer loop: poll a batch → dispatch each record → commit once.
//!
//! Offsets are committed after every batch regardless of per-record
//! outcomes. Persisted rows are the commitment; the idempotency index
//! absorbs the replays this at-least-once stance produces on restart.

use std::sync::Arc;
use std::time::Duration;

use rdkafka::config::ClientConfig;
use rdkafka::consumer::{CommitMode, Consumer, StreamConsumer};
use rdkafka::message::{BorrowedMessage, Message};
use tokio::sync::watch;
use tracing::{debug, error, info};

use beacon_core::config::BrokerConfig;
use beacon_core::error::AppError;
use beacon_core::result::AppResult;
use beacon_service::FanoutService;

use crate::registry::HandlerRegistry;

/// Upper bound on records dispatched between two commits.
const MAX_BATCH_SIZE: usize = 100;

/// How long to keep draining already-fetched records into the current batch
/// once the first record has arrived.
const BATCH_DRAIN_WAIT: Duration = Duration::from_millis(100);

/// Long-running consumer-group member feeding the fan-out service.
pub struct BrokerConsumer {
    consumer: StreamConsumer,
    registry: Arc<HandlerRegistry>,
    fanout: Arc<FanoutService>,
}

impl BrokerConsumer {
    /// Create a consumer subscribed to the configured topics. Auto-commit is
    /// disabled; commits are explicit, per batch, after processing.
    pub fn new(
        config: &BrokerConfig,
        registry: Arc<HandlerRegistry>,
        fanout: Arc<FanoutService>,
    ) -> AppResult<Self> {
        let consumer: StreamConsumer = ClientConfig::new()
            .set("bootstrap.servers", config.brokers.join(","))
            .set("group.id", &config.group_id)
            .set("enable.auto.commit", "false")
            .set("auto.offset.reset", "earliest")
            .create()
            .map_err(|e| {
                AppError::external_service(format!("Failed to create Kafka consumer: {e}"))
            })?;

        let topics: Vec<&str> = config.topics.iter().map(String::as_str).collect();
        consumer.subscribe(&topics).map_err(|e| {
            AppError::external_service(format!("Failed to subscribe to topics: {e}"))
        })?;

        Ok(Self {
            consumer,
            registry,
            fanout,
        })
    }

    /// Poll and process batches until the cancel signal flips to true.
    pub async fn run(&self, mut cancel: watch::Receiver<bool>) {
        info!("Kafka consumer started");

        loop {
            tokio::select! {
                _ = cancel.changed() => {
                    if *cancel.borrow() {
                        break;
                    }
                }
                batch = self.next_batch() => {
                    if batch.is_empty() {
                        continue;
                    }

                    debug!(records = batch.len(), "Processing record batch");
                    for message in &batch {
                        self.process(message).await;
                    }

                    // One commit per batch, covering every consumed record
                    // whether or not its fan-out succeeded.
                    if let Err(e) = self.consumer.commit_consumer_state(CommitMode::Async) {
                        error!(error = %e, "Kafka commit error");
                    }
                }
            }
        }

        info!("Kafka consumer stopped");
    }

    /// Fetch one batch of records across the subscribed topics: block for
    /// the first record, then drain whatever else arrives within the drain
    /// window, up to the batch cap.
    async fn next_batch(&self) -> Vec<BorrowedMessage<'_>> {
        let mut batch = Vec::new();

        match self.consumer.recv().await {
            Ok(message) => batch.push(message),
            Err(e) => {
                error!(error = %e, "Kafka fetch error");
                return batch;
            }
        }

        while batch.len() < MAX_BATCH_SIZE {
            match tokio::time::timeout(BATCH_DRAIN_WAIT, self.consumer.recv()).await {
                Ok(Ok(message)) => batch.push(message),
                Ok(Err(e)) => {
                    error!(error = %e, "Kafka fetch error");
                    break;
                }
                // Nothing else buffered; ship what we have.
                Err(_) => break,
            }
        }

        batch
    }

    /// Decode one record (direct dispatch first, then typed) and hand the
    /// result to fan-out. Skips and fan-out failures produce no state change
    /// beyond the batch's committed offset.
    async fn process(&self, message: &BorrowedMessage<'_>) {
        let topic = message.topic();

        let Some(payload) = message.payload() else {
            debug!(topic, "Record without payload, skipping");
            return;
        };

        debug!(topic, partition = message.partition(), offset = message.offset(), "Processing record");

        let Some(request) = self.registry.decode(topic, payload) else {
            debug!(topic, "No handler matched, skipping");
            return;
        };

        let scope = request.scope;
        let target_id = request.target_id.clone();
        let source_event_id = request.source_event_id.clone();

        if let Err(e) = self.fanout.fanout(request).await {
            error!(
                error = %e,
                topic,
                scope = %scope,
                target_id = %target_id,
                source_event_id = %source_event_id,
                "Failed to fan out broker event"
            );
        }
    }
}
