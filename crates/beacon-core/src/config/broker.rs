//! Message broker consumer configuration.

use serde::Deserialize;

/// Kafka consumer configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct BrokerConfig {
    /// Seed broker addresses.
    pub brokers: Vec<String>,
    /// Consumer group id.
    pub group_id: String,
    /// Topics to subscribe to.
    pub topics: Vec<String>,
}
