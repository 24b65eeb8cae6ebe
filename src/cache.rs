//! Process-local, time-bounded memoization.
//!
//! Entries expire a fixed time after insertion. Nothing is persisted and
//! nothing is invalidated early.

use std::collections::HashMap;
use std::future::Future;
use std::hash::Hash;
use std::sync::{Mutex, PoisonError};
use std::time::Duration;
use tokio::time::Instant;
use tracing::debug;

struct CacheEntry<V> {
    inserted_at: Instant,
    value: V,
}

/// A map whose entries expire `ttl` after they were stored.
pub struct TtlCache<K, V> {
    ttl: Duration,
    entries: Mutex<HashMap<K, CacheEntry<V>>>,
}

impl<K, V> TtlCache<K, V>
where
    K: Eq + Hash + Clone,
    V: Clone,
{
    pub fn new(ttl: Duration) -> Self {
        Self {
            ttl,
            entries: Mutex::new(HashMap::new()),
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    /// Get a live entry, dropping it if it has expired.
    pub fn get(&self, key: &K) -> Option<V> {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);

        match entries.get(key) {
            Some(entry) if entry.inserted_at.elapsed() < self.ttl => Some(entry.value.clone()),
            Some(_) => {
                entries.remove(key);
                None
            }
            None => None,
        }
    }

    pub fn insert(&self, key: K, value: V) {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        entries.insert(
            key,
            CacheEntry {
                inserted_at: Instant::now(),
                value,
            },
        );
    }

    /// Return the cached value for `key`, or compute and store it.
    ///
    /// Only successful results are stored. The lock is not held while
    /// `compute` runs, so two concurrent misses may both compute.
    pub async fn get_or_try_insert_with<F, Fut, E>(
        &self,
        key: K,
        compute: F,
    ) -> std::result::Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = std::result::Result<V, E>>,
    {
        if let Some(value) = self.get(&key) {
            debug!("Cache hit");
            return Ok(value);
        }

        let value = compute().await?;
        self.insert(key, value.clone());
        Ok(value)
    }

    /// Remove all expired entries.
    pub fn purge_expired(&self) -> usize {
        let mut entries = self.entries.lock().unwrap_or_else(PoisonError::into_inner);
        let before = entries.len();
        entries.retain(|_, entry| entry.inserted_at.elapsed() < self.ttl);
        before - entries.len()
    }

    /// Number of stored entries, expired or not.
    pub fn len(&self) -> usize {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn clear(&self) {
        self.entries
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};

    async fn lookup(
        cache: &TtlCache<(String, String), String>,
        calls: &AtomicUsize,
        url: &str,
    ) -> std::result::Result<String, String> {
        cache
            .get_or_try_insert_with((url.to_string(), "en".to_string()), || async {
                let n = calls.fetch_add(1, Ordering::SeqCst) + 1;
                Ok(format!("transcript v{}", n))
            })
            .await
    }

    #[tokio::test(start_paused = true)]
    async fn test_hit_within_ttl() {
        let cache = TtlCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);

        let first = lookup(&cache, &calls, "https://youtu.be/abc").await.unwrap();
        tokio::time::advance(Duration::from_secs(3599)).await;
        let second = lookup(&cache, &calls, "https://youtu.be/abc").await.unwrap();

        assert_eq!(first, second);
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_recompute_after_expiry() {
        let cache = TtlCache::new(Duration::from_secs(3600));
        let calls = AtomicUsize::new(0);

        let first = lookup(&cache, &calls, "https://youtu.be/abc").await.unwrap();
        tokio::time::advance(Duration::from_secs(3601)).await;
        let second = lookup(&cache, &calls, "https://youtu.be/abc").await.unwrap();

        assert_eq!(first, "transcript v1");
        assert_eq!(second, "transcript v2");
        assert_eq!(calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_distinct_keys_are_separate() {
        let cache = TtlCache::new(Duration::from_secs(60));
        let calls = AtomicUsize::new(0);

        lookup(&cache, &calls, "https://youtu.be/abc").await.unwrap();
        lookup(&cache, &calls, "https://youtu.be/xyz").await.unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 2);
        assert_eq!(cache.len(), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_failures_are_not_cached() {
        let cache: TtlCache<&str, u32> = TtlCache::new(Duration::from_secs(60));

        let failed: std::result::Result<u32, &str> = cache
            .get_or_try_insert_with("key", || async { Err("upstream down") })
            .await;
        assert!(failed.is_err());
        assert!(cache.is_empty());

        let ok: std::result::Result<u32, &str> = cache
            .get_or_try_insert_with("key", || async { Ok(42) })
            .await;
        assert_eq!(ok, Ok(42));
        assert_eq!(cache.get(&"key"), Some(42));
    }

    #[tokio::test(start_paused = true)]
    async fn test_purge_expired() {
        let cache = TtlCache::new(Duration::from_secs(10));
        cache.insert("old", 1);
        tokio::time::advance(Duration::from_secs(6)).await;
        cache.insert("new", 2);
        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(cache.purge_expired(), 1);
        assert_eq!(cache.get(&"new"), Some(2));
        assert_eq!(cache.get(&"old"), None);
    }
}
