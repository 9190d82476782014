//! Keycloak admin-API implementation of [`IdentityResolver`].
//!
//! Each tenant maps 1:1 to a Keycloak realm. Admin tokens are obtained via
//! the client-credentials grant against the administrative realm and fetched
//! per call; the answer cache in front of the provider keeps fan-out from
//! hammering it.

use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use serde::Deserialize;
use tracing::{debug, warn};

use beacon_core::config::IdentityConfig;
use beacon_core::error::AppError;
use beacon_core::result::AppResult;

use crate::cache::TtlCache;
use crate::resolver::IdentityResolver;

/// Minimal representation of a provider user.
#[derive(Debug, Clone, Deserialize)]
struct ProviderUser {
    id: String,
    enabled: bool,
}

/// Minimal representation of a provider realm.
#[derive(Debug, Clone, Deserialize)]
struct ProviderRealm {
    realm: String,
    enabled: bool,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
}

/// Resolves scopes by calling the Keycloak Admin REST API.
pub struct KeycloakResolver {
    base_url: String,
    admin_realm: String,
    client_id: String,
    client_secret: String,
    http: reqwest::Client,
    user_cache: TtlCache<Vec<String>>,
    platform_cache: TtlCache<HashMap<String, Vec<String>>>,
}

impl KeycloakResolver {
    /// Create a resolver from identity-provider configuration.
    pub fn new(config: &IdentityConfig) -> AppResult<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_seconds))
            .build()
            .map_err(|e| {
                AppError::configuration(format!("Failed to build identity HTTP client: {e}"))
            })?;

        let ttl = Duration::from_secs(config.cache_ttl_seconds);

        Ok(Self {
            base_url: config.base_url.trim_end_matches('/').to_string(),
            admin_realm: config.admin_realm.clone(),
            client_id: config.client_id.clone(),
            client_secret: config.client_secret.clone(),
            http,
            user_cache: TtlCache::new(ttl),
            platform_cache: TtlCache::new(ttl),
        })
    }

    /// Fetch a short-lived admin access token via client credentials.
    async fn admin_token(&self) -> AppResult<String> {
        let url = format!(
            "{}/realms/{}/protocol/openid-connect/token",
            self.base_url, self.admin_realm
        );

        let response = self
            .http
            .post(&url)
            .form(&[
                ("grant_type", "client_credentials"),
                ("client_id", self.client_id.as_str()),
                ("client_secret", self.client_secret.as_str()),
            ])
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("identity token request: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "identity token request: status {}",
                response.status()
            )));
        }

        let token: TokenResponse = response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("identity token decode: {e}")))?;

        if token.access_token.is_empty() {
            return Err(AppError::external_service(
                "identity provider returned empty access token",
            ));
        }

        Ok(token.access_token)
    }

    /// Fetch all users of a realm (first page, provider-side cap 1000).
    async fn list_users(&self, realm: &str) -> AppResult<Vec<ProviderUser>> {
        let token = self.admin_token().await?;
        let url = format!(
            "{}/admin/realms/{}/users?enabled=true&max=1000",
            self.base_url, realm
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("list users({realm}): {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "list users({realm}): status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("list users({realm}) decode: {e}")))
    }

    /// Fetch all realms known to the provider.
    async fn list_realms(&self) -> AppResult<Vec<ProviderRealm>> {
        let token = self.admin_token().await?;
        let url = format!("{}/admin/realms", self.base_url);

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("list realms: {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "list realms: status {}",
                response.status()
            )));
        }

        response
            .json()
            .await
            .map_err(|e| AppError::external_service(format!("list realms decode: {e}")))
    }
}

fn enabled_ids(users: Vec<ProviderUser>) -> Vec<String> {
    users
        .into_iter()
        .filter(|u| u.enabled)
        .map(|u| u.id)
        .collect()
}

#[async_trait]
impl IdentityResolver for KeycloakResolver {
    async fn users_by_tenant(&self, tenant_key: &str) -> AppResult<Vec<String>> {
        let cache_key = format!("tenant:{tenant_key}");
        if let Some(cached) = self.user_cache.get(&cache_key) {
            return Ok(cached);
        }

        let ids = enabled_ids(self.list_users(tenant_key).await?);
        self.user_cache.insert(cache_key, ids.clone());
        Ok(ids)
    }

    async fn users_by_role(&self, tenant_key: &str, role_name: &str) -> AppResult<Vec<String>> {
        let cache_key = format!("role:{tenant_key}:{role_name}");
        if let Some(cached) = self.user_cache.get(&cache_key) {
            return Ok(cached);
        }

        let token = self.admin_token().await?;
        let url = format!(
            "{}/admin/realms/{}/roles/{}/users",
            self.base_url, tenant_key, role_name
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&token)
            .send()
            .await
            .map_err(|e| AppError::external_service(format!("role users({role_name}): {e}")))?;

        if !response.status().is_success() {
            return Err(AppError::external_service(format!(
                "role users({role_name}): status {}",
                response.status()
            )));
        }

        let users: Vec<ProviderUser> = response.json().await.map_err(|e| {
            AppError::external_service(format!("role users({role_name}) decode: {e}"))
        })?;

        let ids = enabled_ids(users);
        self.user_cache.insert(cache_key, ids.clone());
        Ok(ids)
    }

    async fn all_active_users(&self) -> AppResult<HashMap<String, Vec<String>>> {
        if let Some(cached) = self.platform_cache.get("platform") {
            return Ok(cached);
        }

        // Failure to enumerate realms is fatal to the call; a failure inside
        // one realm only costs that realm.
        let realms = self.list_realms().await?;

        let mut result = HashMap::new();
        for realm in realms {
            if !realm.enabled || realm.realm == self.admin_realm {
                continue;
            }
            match self.list_users(&realm.realm).await {
                Ok(users) => {
                    let ids = enabled_ids(users);
                    if !ids.is_empty() {
                        result.insert(realm.realm, ids);
                    }
                }
                Err(e) => {
                    warn!(realm = %realm.realm, error = %e, "Skipping realm during platform fan-out");
                }
            }
        }

        debug!(tenants = result.len(), "Resolved platform-wide user set");
        self.platform_cache.insert("platform", result.clone());
        Ok(result)
    }
}
