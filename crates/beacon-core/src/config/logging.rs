//! Logging configuration.

use serde::Deserialize;

/// Logging and tracing output configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    /// Default log level filter when `RUST_LOG` is unset.
    pub level: String,
    /// Output format: "json" or "pretty".
    pub format: String,
}
