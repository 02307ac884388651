use std::collections::HashMap;

use chrono::{DateTime, Duration, Utc};
use tokio::sync::RwLock;

#[derive(Clone, Debug)]
struct CacheEntry<V> {
    value: V,
    expires_at: DateTime<Utc>,
}

/// Process-wide keyed cache with per-entry expiry. Entries are purged lazily:
/// a `get` past the expiry removes the entry, and `sweep_expired` clears every
/// stale entry in one pass. There is no size bound and no eviction besides TTL.
///
/// Writes are last-write-wins. Concurrent misses for the same key may both
/// resolve and both write; the second write overwrites the first.
pub struct TtlCache<V> {
    entries: RwLock<HashMap<String, CacheEntry<V>>>,
    default_ttl: Duration,
}

impl<V: Clone> TtlCache<V> {
    pub fn new(default_ttl: Duration) -> Self {
        Self {
            entries: RwLock::new(HashMap::new()),
            default_ttl,
        }
    }

    /// Returns the live value for `key`, removing the entry instead when its
    /// expiry has passed.
    pub async fn get(&self, key: &str) -> Option<V> {
        let now = Utc::now();
        let mut entries = self.entries.write().await;

        if let Some(entry) = entries.get(key) {
            if now < entry.expires_at {
                return Some(entry.value.clone());
            }
            entries.remove(key);
        }

        None
    }

    pub async fn set(&self, key: &str, value: V) {
        self.set_with_ttl(key, value, self.default_ttl).await;
    }

    pub async fn set_with_ttl(&self, key: &str, value: V, ttl: Duration) {
        let entry = CacheEntry {
            value,
            expires_at: Utc::now() + ttl,
        };
        self.entries.write().await.insert(key.to_string(), entry);
    }

    pub async fn invalidate(&self, key: &str) {
        self.entries.write().await.remove(key);
    }

    /// Removes every entry whose expiry is at or before `now`. Called
    /// opportunistically before reads rather than on a background timer.
    pub async fn sweep_expired(&self, now: DateTime<Utc>) {
        self.entries
            .write()
            .await
            .retain(|_, entry| entry.expires_at > now);
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.entries.read().await.is_empty()
    }
}
