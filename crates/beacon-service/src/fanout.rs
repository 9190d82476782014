//! Fan-out on write: resolve a target scope to concrete recipients, insert
//! one row per recipient, and push the newly written rows to live listeners.

use std::collections::HashMap;
use std::sync::Arc;

use tracing::{debug, info, warn};

use beacon_core::result::AppResult;
use beacon_entity::fanout::{CreateNotificationInput, FanoutRequest, TargetScope};
use beacon_entity::notification::store::NotificationStore;
use beacon_hub::PushHub;
use beacon_identity::IdentityResolver;

/// Tenant that receives origin-user rows when the originating event carries
/// no tenant of its own (platform administrators live in the admin realm).
const ADMIN_TENANT: &str = "master";

/// Orchestrates the fan-out pipeline: resolve → insert → push.
pub struct FanoutService {
    store: Arc<dyn NotificationStore>,
    resolver: Arc<dyn IdentityResolver>,
    hub: Arc<PushHub>,
}

impl FanoutService {
    /// Create a new fan-out service.
    pub fn new(
        store: Arc<dyn NotificationStore>,
        resolver: Arc<dyn IdentityResolver>,
        hub: Arc<PushHub>,
    ) -> Self {
        Self {
            store,
            resolver,
            hub,
        }
    }

    /// Process one fan-out request end to end.
    ///
    /// Rows suppressed by the idempotency index are absent from the store's
    /// answer and are therefore never pushed. An empty resolution (a role
    /// with no members) is a normal outcome, not an error.
    pub async fn fanout(&self, request: FanoutRequest) -> AppResult<()> {
        let targets = self.resolve_targets(&request).await?;

        // An empty event id would make unrelated rows collide in the
        // idempotency index; store NULL instead.
        let source_event_id = if request.source_event_id.is_empty() {
            None
        } else {
            Some(request.source_event_id.clone())
        };

        let mut batch = Vec::new();
        for (tenant_key, user_ids) in targets {
            for user_id in user_ids {
                batch.push(CreateNotificationInput {
                    tenant_key: tenant_key.clone(),
                    user_id,
                    category: request.category,
                    title: request.title.clone(),
                    body: request.body.clone(),
                    metadata: request.metadata.clone(),
                    source_event_id: source_event_id.clone(),
                });
            }
        }

        if batch.is_empty() {
            warn!(
                scope = %request.scope,
                target_id = %request.target_id,
                "Fan-out resolved to zero users, skipping"
            );
            return Ok(());
        }

        let batch_size = batch.len();
        let inserted = self.store.batch_create(batch).await?;

        for notification in &inserted {
            self.hub
                .broadcast(&notification.tenant_key, &notification.user_id, notification);
        }

        info!(
            scope = %request.scope,
            target_id = %request.target_id,
            source_event_id = %request.source_event_id,
            batch_size,
            inserted = inserted.len(),
            "Fan-out notifications created and pushed"
        );

        Ok(())
    }

    /// Resolve the request's scope to a `tenant → users` map and make sure
    /// the origin user is part of the answer.
    async fn resolve_targets(
        &self,
        request: &FanoutRequest,
    ) -> AppResult<HashMap<String, Vec<String>>> {
        let mut result = HashMap::new();

        match request.scope {
            TargetScope::User => {
                // Direct single-user delivery, no provider call.
                result.insert(request.tenant_key.clone(), vec![request.target_id.clone()]);
            }
            TargetScope::Tenant => {
                let user_ids = self.resolver.users_by_tenant(&request.tenant_key).await?;
                result.insert(request.tenant_key.clone(), user_ids);
            }
            TargetScope::Role => {
                let user_ids = self
                    .resolver
                    .users_by_role(&request.tenant_key, &request.target_id)
                    .await?;
                result.insert(request.tenant_key.clone(), user_ids);
            }
            TargetScope::Platform => {
                result = self.resolver.all_active_users().await?;
            }
        }

        if let Some(origin) = request.origin_user_id.as_deref().filter(|o| !o.is_empty()) {
            let already_included = result.values().any(|ids| ids.iter().any(|id| id == origin));
            if !already_included {
                debug!(user = %origin, "Adding origin user to fan-out targets");
                let tenant = if request.tenant_key.is_empty() {
                    ADMIN_TENANT.to_string()
                } else {
                    request.tenant_key.clone()
                };
                result.entry(tenant).or_default().push(origin.to_string());
            }
        }

        Ok(result)
    }
}
