//! HTTP server configuration.

use serde::Deserialize;

/// HTTP listener configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    /// Port the HTTP server binds to.
    pub port: u16,
    /// Deployment environment name ("development", "production", ...).
    pub env: String,
}

impl ServerConfig {
    /// Returns true when running in a production environment.
    pub fn is_production(&self) -> bool {
        self.env == "production"
    }
}
