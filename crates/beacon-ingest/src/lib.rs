//! # beacon-ingest
//!
//! The ingestion side of Beacon: a frozen registry mapping
//! `(topic, eventType)` to decoders, the per-topic decoders themselves, and
//! the Kafka consumer loop that drives fan-out.

pub mod consumer;
pub mod decoders;
pub mod messages;
pub mod registry;

pub use consumer::BrokerConsumer;
pub use registry::{HandlerRegistry, RegistryBuilder};

/// The registry with every decoder recognised at launch.
pub fn default_registry() -> HandlerRegistry {
    decoders::register_defaults(RegistryBuilder::new()).build()
}
