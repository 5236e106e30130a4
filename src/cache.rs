use std::collections::HashMap;
use std::future::Future;
use std::time::{Duration, Instant};

use serde::de::DeserializeOwned;
use serde::Serialize;
use tokio::sync::RwLock;
use tracing::{debug, warn};

use crate::client::ApiError;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub endpoint: &'static str,
    pub params: String,
}

impl CacheKey {
    pub fn new<P: Serialize>(endpoint: &'static str, params: &P) -> Self {
        let params = serde_urlencoded::to_string(params).unwrap_or_default();
        Self { endpoint, params }
    }

    pub fn endpoint(endpoint: &'static str) -> Self {
        Self {
            endpoint,
            params: String::new(),
        }
    }
}

struct Entry {
    value: serde_json::Value,
    stored_at: Instant,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<CacheKey, Entry>,
    /// Bumped by every invalidation of an endpoint
    generations: HashMap<String, u64>,
}

impl Inner {
    fn generation(&self, endpoint: &str) -> u64 {
        self.generations.get(endpoint).copied().unwrap_or(0)
    }
}

/// Request-result cache shared by the route handlers.
///
/// Entries are keyed by endpoint plus serialized query parameters and expire
/// after `ttl`. Mutations must call [`QueryCache::invalidate`] for every
/// endpoint whose results they change. A fetch that was already in flight
/// when its endpoint was invalidated does not repopulate the cache.
pub struct QueryCache {
    inner: RwLock<Inner>,
    ttl: Duration,
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            inner: RwLock::new(Inner::default()),
            ttl,
        }
    }

    pub async fn get<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let inner = self.inner.read().await;
        let entry = inner.entries.get(key)?;
        if entry.stored_at.elapsed() >= self.ttl {
            return None;
        }
        serde_json::from_value(entry.value.clone()).ok()
    }

    #[cfg(test)]
    async fn put<T: Serialize>(&self, key: CacheKey, value: &T) {
        let generation = self.generation(key.endpoint).await;
        self.store(key, value, generation).await;
    }

    async fn generation(&self, endpoint: &str) -> u64 {
        self.inner.read().await.generation(endpoint)
    }

    /// Stores `value` unless `key`'s endpoint was invalidated after
    /// `generation` was read.
    async fn store<T: Serialize>(&self, key: CacheKey, value: &T, generation: u64) {
        let value = match serde_json::to_value(value) {
            Ok(value) => value,
            Err(e) => {
                warn!("Not caching {}: {}", key.endpoint, e);
                return;
            }
        };

        let mut inner = self.inner.write().await;
        if inner.generation(key.endpoint) != generation {
            debug!("Discarding {} result fetched before invalidation", key.endpoint);
            return;
        }
        inner.entries.insert(
            key,
            Entry {
                value,
                stored_at: Instant::now(),
            },
        );
    }

    /// Returns the cached value for `key`, or runs `fetch` and caches its
    /// success. Failures are never cached.
    pub async fn get_or_fetch<T, F, Fut>(&self, key: CacheKey, fetch: F) -> Result<T, ApiError>
    where
        T: Serialize + DeserializeOwned,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, ApiError>>,
    {
        if let Some(hit) = self.get(&key).await {
            debug!("Cache hit: {} {}", key.endpoint, key.params);
            return Ok(hit);
        }

        let generation = self.generation(key.endpoint).await;
        let value = fetch().await?;
        self.store(key, &value, generation).await;
        Ok(value)
    }

    /// Drops every entry for `endpoint`, whatever its parameters, and marks
    /// fetches already in flight for it as stale.
    pub async fn invalidate(&self, endpoint: &str) {
        let mut inner = self.inner.write().await;
        *inner.generations.entry(endpoint.to_string()).or_insert(0) += 1;
        let before = inner.entries.len();
        inner.entries.retain(|key, _| key.endpoint != endpoint);
        debug!("Invalidated {} cached {} results", before - inner.entries.len(), endpoint);
    }

    #[cfg(test)]
    async fn len(&self) -> usize {
        self.inner.read().await.entries.len()
    }
}
