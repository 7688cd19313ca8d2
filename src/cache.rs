//! Optional read-through cache for query responses.
//!
//! Entries expire after a fixed TTL and are never invalidated by writes, so a
//! cached response can lag the store by up to the TTL.

use std::future::Future;
use std::sync::{Mutex, MutexGuard};
use std::time::{Duration, Instant};

use hashbrown::HashMap;
use tracing::debug;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    expires_at: Instant,
}

impl<V> CacheEntry<V> {
    fn is_expired(&self, now: Instant) -> bool {
        now >= self.expires_at
    }
}

/// TTL cache keyed by a normalized query string
pub struct QueryCache<V> {
    name: &'static str,
    ttl: Duration,
    max_entries: usize,
    entries: Mutex<HashMap<String, CacheEntry<V>>>,
}

impl<V: Clone> QueryCache<V> {
    pub fn new(name: &'static str, ttl: Duration, max_entries: usize) -> Self {
        Self {
            name,
            ttl,
            max_entries: max_entries.max(1),
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> MutexGuard<'_, HashMap<String, CacheEntry<V>>> {
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Live value for the key, if any
    pub fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        let mut entries = self.lock();
        let live = entries
            .get(key)
            .filter(|entry| !entry.is_expired(now))
            .map(|entry| entry.value.clone());

        if live.is_some() {
            debug!("{} cache hit: {}", self.name, key);
        } else {
            entries.remove(key);
        }
        live
    }

    pub fn insert(&self, key: impl Into<String>, value: V) {
        let now = Instant::now();
        let key = key.into();
        let mut entries = self.lock();

        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            entries.retain(|_, e| !e.is_expired(now));
        }
        if entries.len() >= self.max_entries && !entries.contains_key(&key) {
            let oldest = entries
                .iter()
                .min_by_key(|(_, e)| e.expires_at)
                .map(|(k, _)| k.clone());
            if let Some(oldest) = oldest {
                entries.remove(&oldest);
            }
        }

        entries.insert(
            key,
            CacheEntry {
                value,
                expires_at: now + self.ttl,
            },
        );
    }

    /// Cached value for the key, or the result of `compute` stored under it.
    ///
    /// Errors are returned without being cached.
    pub async fn get_or_try_insert_with<F, Fut, E>(&self, key: &str, compute: F) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key) {
            return Ok(value);
        }
        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Entries currently held, expired ones included
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.lock().clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_and_insert() {
        let cache = QueryCache::new("test", Duration::from_secs(60), 10);
        assert!(cache.get("a").is_none());
        cache.insert("a", 1);
        assert_eq!(cache.get("a"), Some(1));
        cache.insert("a", 2);
        assert_eq!(cache.get("a"), Some(2));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn test_entries_expire() {
        let cache = QueryCache::new("test", Duration::ZERO, 10);
        cache.insert("a", 1);
        assert!(cache.get("a").is_none());
        assert!(cache.is_empty());
    }

    #[test]
    fn test_bounded_size_evicts_soonest_to_expire() {
        let cache = QueryCache::new("test", Duration::from_secs(60), 2);
        cache.insert("a", 1);
        std::thread::sleep(Duration::from_millis(2));
        cache.insert("b", 2);
        cache.insert("c", 3);
        assert_eq!(cache.len(), 2);
        assert!(cache.get("a").is_none());
        assert_eq!(cache.get("b"), Some(2));
        assert_eq!(cache.get("c"), Some(3));
    }

    #[tokio::test]
    async fn test_read_through() {
        let cache = QueryCache::new("test", Duration::from_secs(60), 10);
        let first: Result<u32, String> = cache.get_or_try_insert_with("k", || async { Ok(7) }).await;
        assert_eq!(first, Ok(7));

        let second: Result<u32, String> = cache
            .get_or_try_insert_with("k", || async { Err("not cached".to_string()) })
            .await;
        assert_eq!(second, Ok(7));

        let failed: Result<u32, String> = cache
            .get_or_try_insert_with("other", || async { Err("boom".to_string()) })
            .await;
        assert!(failed.is_err());
        assert!(cache.get("other").is_none());

        cache.clear();
        assert!(cache.is_empty());
    }
}
