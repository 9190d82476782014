//! Push hub — `tenant → user → listeners` index under a readers-writer lock.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;
use tokio::sync::mpsc;
use tracing::{debug, error, warn};

use beacon_entity::Notification;

/// Buffered capacity of each listener's outbound channel. A listener whose
/// buffer is full misses the push and recovers on its next pull.
pub const LISTENER_BUFFER: usize = 32;

struct Listener {
    id: u64,
    sender: mpsc::Sender<String>,
}

/// Identifies one registered listener. Held by the push session, which must
/// call [`PushHub::unregister`] with it on exit.
#[derive(Debug, Clone)]
pub struct ListenerHandle {
    /// Tenant of the listening user.
    pub tenant_key: String,
    /// The listening user.
    pub user_id: String,
    id: u64,
}

/// In-process broadcast index for live push sessions.
///
/// `broadcast` takes the read lock, `register`/`unregister` the write lock.
/// Sends are non-blocking: the fan-out path never waits on a slow consumer.
pub struct PushHub {
    next_id: AtomicU64,
    listeners: RwLock<HashMap<String, HashMap<String, Vec<Listener>>>>,
}

impl PushHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            listeners: RwLock::new(HashMap::new()),
        }
    }

    /// Register a listener for `(tenant, user)`. Multiple sessions per user
    /// are permitted (the same user in two browser tabs).
    pub fn register(
        &self,
        tenant_key: &str,
        user_id: &str,
        sender: mpsc::Sender<String>,
    ) -> ListenerHandle {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);

        let mut listeners = self.listeners.write();
        listeners
            .entry(tenant_key.to_string())
            .or_default()
            .entry(user_id.to_string())
            .or_default()
            .push(Listener { id, sender });

        debug!(tenant = %tenant_key, user = %user_id, "Push listener registered");

        ListenerHandle {
            tenant_key: tenant_key.to_string(),
            user_id: user_id.to_string(),
            id,
        }
    }

    /// Remove a listener by identity. Idempotent.
    pub fn unregister(&self, handle: &ListenerHandle) {
        let mut listeners = self.listeners.write();

        let Some(users) = listeners.get_mut(&handle.tenant_key) else {
            return;
        };
        let Some(sessions) = users.get_mut(&handle.user_id) else {
            return;
        };

        sessions.retain(|l| l.id != handle.id);
        if sessions.is_empty() {
            users.remove(&handle.user_id);
        }
        if users.is_empty() {
            listeners.remove(&handle.tenant_key);
        }

        debug!(tenant = %handle.tenant_key, user = %handle.user_id, "Push listener unregistered");
    }

    /// Send a notification to every listener registered for `(tenant, user)`.
    ///
    /// The payload is serialised once; each listener gets a non-blocking send
    /// and a full buffer is skipped with a warning. Returns the number of
    /// listeners the payload was handed to.
    pub fn broadcast(&self, tenant_key: &str, user_id: &str, notification: &Notification) -> usize {
        let listeners = self.listeners.read();

        let Some(sessions) = listeners
            .get(tenant_key)
            .and_then(|users| users.get(user_id))
        else {
            return 0;
        };
        if sessions.is_empty() {
            return 0;
        }

        let payload = match serde_json::to_string(notification) {
            Ok(p) => p,
            Err(e) => {
                error!(error = %e, "Failed to serialise notification for push");
                return 0;
            }
        };

        let mut delivered = 0;
        for listener in sessions {
            match listener.sender.try_send(payload.clone()) {
                Ok(()) => delivered += 1,
                Err(mpsc::error::TrySendError::Full(_)) => {
                    warn!(tenant = %tenant_key, user = %user_id, "Push buffer full, skipping listener");
                }
                Err(mpsc::error::TrySendError::Closed(_)) => {
                    // Session is tearing down; unregister will prune it.
                    debug!(tenant = %tenant_key, user = %user_id, "Push channel closed, skipping listener");
                }
            }
        }

        delivered
    }

    /// Total number of registered listeners.
    pub fn connected_count(&self) -> usize {
        self.listeners
            .read()
            .values()
            .flat_map(|users| users.values())
            .map(|sessions| sessions.len())
            .sum()
    }
}

impl Default for PushHub {
    fn default() -> Self {
        Self::new()
    }
}
