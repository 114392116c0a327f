use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::cache::CacheStore;
use crate::helpers::time::now_i64;

#[derive(Debug, Clone)]
struct Entry {
    value: String,
    expires_at: i64, // UNIX timestamp
}

impl Entry {
    fn is_live(&self) -> bool {
        now_i64() < self.expires_at
    }
}

/// Process-local cache; clones share the same map.
#[derive(Debug, Clone, Default)]
pub struct InMemoryCache {
    inner: Arc<RwLock<HashMap<String, Entry>>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn len(&self) -> usize {
        self.inner.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

/// Drops expired entries, returns how many were removed.
fn purge_expired(map: &mut HashMap<String, Entry>) -> usize {
    let before = map.len();
    map.retain(|_, entry| entry.is_live());
    let removed = before - map.len();
    if removed > 0 {
        debug!("purged {} expired cache entries", removed);
    }
    removed
}

impl CacheStore for InMemoryCache {
    async fn has(&self, key: &str) -> bool {
        self.get(key).await.is_some()
    }

    async fn get(&self, key: &str) -> Option<String> {
        let map = self.inner.read().await;
        map.get(key)
            .filter(|entry| entry.is_live())
            .map(|entry| entry.value.clone())
    }

    async fn set(&self, key: &str, value: String, ttl_seconds: u64) {
        let expires_at = now_i64().saturating_add(ttl_seconds.min(i64::MAX as u64) as i64);
        let mut map = self.inner.write().await;
        purge_expired(&mut map);
        map.insert(key.to_owned(), Entry { value, expires_at });
    }

    async fn delete(&self, key: &str) {
        let mut map = self.inner.write().await;
        map.remove(key);
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[tokio::test]
    async fn set_get_delete() {
        let cache = InMemoryCache::new();
        assert!(!cache.has("k").await);

        cache.set("k", "v".to_owned(), 60).await;
        assert!(cache.has("k").await);
        assert_eq!(cache.get("k").await.as_deref(), Some("v"));

        cache.delete("k").await;
        assert_eq!(cache.get("k").await, None);
    }

    #[tokio::test]
    async fn zero_ttl_entry_reads_as_absent() {
        let cache = InMemoryCache::new();
        cache.set("k", "v".to_owned(), 0).await;
        assert!(!cache.has("k").await);
    }

    #[tokio::test]
    async fn set_drops_expired_entries() {
        let cache = InMemoryCache::new();
        cache.set("stale", "v".to_owned(), 0).await;
        assert_eq!(cache.len().await, 1);

        cache.set("fresh", "v".to_owned(), 60).await;
        assert_eq!(cache.len().await, 1);
        assert_eq!(cache.get("fresh").await.as_deref(), Some("v"));
    }

    #[tokio::test]
    async fn clones_share_entries() {
        let cache = InMemoryCache::new();
        let other = cache.clone();
        cache.set("k", "v".to_owned(), 60).await;
        assert_eq!(other.get("k").await.as_deref(), Some("v"));
    }
}
