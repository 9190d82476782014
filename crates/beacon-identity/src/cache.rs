//! TTL cache for resolver answers.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use parking_lot::RwLock;

struct CacheEntry<T> {
    value: T,
    expires_at: Instant,
}

/// A keyed cache whose entries expire after a fixed TTL.
///
/// Reads take the read lock; only a miss-fill takes the write lock. Expired
/// entries are replaced on the next fill rather than evicted eagerly.
pub struct TtlCache<T> {
    ttl: Duration,
    entries: RwLock<HashMap<String, CacheEntry<T>>>,
}

impl<T: Clone> TtlCache<T> {
    /// Create a cache with the given entry TTL.
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: RwLock::new(HashMap::new()),
        }
    }

    /// Returns the cached value for `key` if present and not expired.
    pub fn get(&self, key: &str) -> Option<T> {
        let entries = self.entries.read();
        let entry = entries.get(key)?;
        if Instant::now() >= entry.expires_at {
            return None;
        }
        Some(entry.value.clone())
    }

    /// Stores `value` under `key` with the configured TTL.
    pub fn insert(&self, key: impl Into<String>, value: T) {
        let entry = CacheEntry {
            value,
            expires_at: Instant::now() + self.ttl,
        };
        self.entries.write().insert(key.into(), entry);
    }
}
