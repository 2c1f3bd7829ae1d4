//! In-memory, time-bounded memoization of upstream calls.

use std::collections::HashMap;
use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use tokio::sync::Mutex;

#[derive(Debug, Clone)]
struct CacheEntry<V> {
    value: V,
    fetched_at: Instant,
    ttl: Duration,
}

impl<V> CacheEntry<V> {
    fn is_fresh(&self, now: Instant) -> bool {
        now.saturating_duration_since(self.fetched_at) < self.ttl
    }
}

#[derive(Debug)]
struct CacheInner<V> {
    map: HashMap<String, CacheEntry<V>>,
    /// One lock per key with a fetch in progress.
    key_locks: HashMap<String, Arc<Mutex<()>>>,
}

impl<V: Clone> CacheInner<V> {
    fn new() -> Self {
        Self {
            map: HashMap::new(),
            key_locks: HashMap::new(),
        }
    }

    fn get(&self, key: &str) -> Option<V> {
        let now = Instant::now();
        self.map
            .get(key)
            .filter(|entry| entry.is_fresh(now))
            .map(|entry| entry.value.clone())
    }

    fn put(&mut self, key: String, value: V, ttl: Duration) {
        // A zero TTL disables storage for this key.
        if ttl.is_zero() {
            self.map.remove(&key);
            return;
        }

        self.map.insert(
            key,
            CacheEntry {
                value,
                fetched_at: Instant::now(),
                ttl,
            },
        );
    }

    fn prune_idle_key_locks(&mut self) {
        self.key_locks.retain(|_, lock| Arc::strong_count(lock) > 1);
    }
}

/// Thread-safe keyed cache with per-entry time-to-live.
///
/// Cloning yields another handle to the same entries. The entry map is only
/// locked for lookups and writes. Fetches are serialized per key, so
/// concurrent callers never fetch the same key twice, while a slow fetch for
/// one key leaves every other key available.
#[derive(Debug)]
pub struct CacheStore<V> {
    inner: Arc<Mutex<CacheInner<V>>>,
}

impl<V> Clone for CacheStore<V> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<V: Clone> Default for CacheStore<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V: Clone> CacheStore<V> {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(Mutex::new(CacheInner::new())),
        }
    }

    /// Return the fresh entry for `key`, or run `fetch`, store its output
    /// under `key` for `ttl` and return it.
    pub async fn get_or_fetch<F, Fut>(&self, key: &str, ttl: Duration, fetch: F) -> V
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = V>,
    {
        let result = self
            .get_or_try_fetch(key, ttl, || async move { Ok::<V, Infallible>(fetch().await) })
            .await;
        match result {
            Ok(value) => value,
            Err(never) => match never {},
        }
    }

    /// Like [`get_or_fetch`](Self::get_or_fetch) for fallible fetches.
    /// Errors are returned to the caller and never stored.
    pub async fn get_or_try_fetch<F, Fut, E>(
        &self,
        key: &str,
        ttl: Duration,
        fetch: F,
    ) -> Result<V, E>
    where
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<V, E>>,
    {
        if let Some(value) = self.get(key).await {
            tracing::debug!(key, "cache hit");
            return Ok(value);
        }

        let key_lock = self.key_lock(key).await;
        let guard = key_lock.lock().await;

        // Another caller may have filled the entry while we waited.
        let result = match self.get(key).await {
            Some(value) => {
                tracing::debug!(key, "cache hit");
                Ok(value)
            }
            None => {
                tracing::debug!(key, "cache miss");
                match fetch().await {
                    Ok(value) => {
                        let mut store = self.inner.lock().await;
                        store.put(key.to_owned(), value.clone(), ttl);
                        Ok(value)
                    }
                    Err(error) => Err(error),
                }
            }
        };

        drop(guard);
        self.release_key_lock(key, key_lock).await;
        result
    }

    async fn key_lock(&self, key: &str) -> Arc<Mutex<()>> {
        let mut store = self.inner.lock().await;
        Arc::clone(store.key_locks.entry(key.to_owned()).or_default())
    }

    async fn release_key_lock(&self, key: &str, key_lock: Arc<Mutex<()>>) {
        let mut store = self.inner.lock().await;
        // The table and this handle are the only holders: nobody is waiting.
        if Arc::strong_count(&key_lock) == 2 {
            store.key_locks.remove(key);
        }
    }

    /// Fresh entry for `key`, if any.
    pub async fn get(&self, key: &str) -> Option<V> {
        let store = self.inner.lock().await;
        store.get(key)
    }

    /// Remove expired entries.
    pub async fn clear_expired(&self) {
        let mut store = self.inner.lock().await;
        let now = Instant::now();
        store.map.retain(|_, entry| entry.is_fresh(now));
        store.prune_idle_key_locks();
    }

    /// Evict every entry unconditionally.
    pub async fn clear(&self) {
        let mut store = self.inner.lock().await;
        store.map.clear();
        store.prune_idle_key_locks();
    }

    /// Number of stored entries, expired ones included.
    pub async fn len(&self) -> usize {
        let store = self.inner.lock().await;
        store.map.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}
