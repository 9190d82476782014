//! Scope-resolution port.

use std::collections::HashMap;

use async_trait::async_trait;

use beacon_core::result::AppResult;

/// Resolves a target scope to concrete user ids.
///
/// "Active" means the identity provider flagged the account enabled at
/// resolution time; disabled users are elided from every answer.
#[async_trait]
pub trait IdentityResolver: Send + Sync {
    /// All active user ids in the given tenant realm.
    async fn users_by_tenant(&self, tenant_key: &str) -> AppResult<Vec<String>>;

    /// Active user ids that hold `role_name` within a tenant realm.
    async fn users_by_role(&self, tenant_key: &str, role_name: &str) -> AppResult<Vec<String>>;

    /// Active users grouped by tenant across all tenants except the
    /// administrative realm. Used for PLATFORM-scope fan-out.
    async fn all_active_users(&self) -> AppResult<HashMap<String, Vec<String>>>;
}
