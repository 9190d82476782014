//! Identity provider configuration.

use serde::Deserialize;

/// Identity provider (Keycloak) admin API configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct IdentityConfig {
    /// Base URL of the identity provider.
    pub base_url: String,
    /// Realm used to obtain admin access tokens (usually "master").
    pub admin_realm: String,
    /// Client id for the client-credentials grant.
    pub client_id: String,
    /// Client secret for the client-credentials grant. No default.
    pub client_secret: String,
    /// TTL for resolver cache entries, in seconds.
    pub cache_ttl_seconds: u64,
    /// Timeout for provider HTTP calls, in seconds.
    pub request_timeout_seconds: u64,
}
