//! In-memory cache implementation - used in tests and as fallback when Redis is unavailable.

use std::collections::HashMap;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::sync::RwLock;

use blog_core::ports::{Cache, CacheError};

struct CacheEntry {
    value: Vec<u8>,
    expires_at: Option<Instant>,
}

impl CacheEntry {
    fn is_expired(&self) -> bool {
        self.expires_at
            .map(|exp| Instant::now() >= exp)
            .unwrap_or(false)
    }
}

/// In-memory cache using a HashMap behind an async RwLock.
///
/// Note: Data is lost on process restart and is not shared between processes.
pub struct InMemoryCache {
    store: RwLock<HashMap<String, CacheEntry>>,
}

impl InMemoryCache {
    pub fn new() -> Self {
        Self {
            store: RwLock::new(HashMap::new()),
        }
    }

    /// Number of live entries.
    pub async fn len(&self) -> usize {
        let store = self.store.read().await;
        store.values().filter(|entry| !entry.is_expired()).count()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }
}

impl Default for InMemoryCache {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Cache for InMemoryCache {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError> {
        let store = self.store.read().await;
        let entry = store.get(key).ok_or(CacheError::Miss)?;

        if entry.is_expired() {
            drop(store);
            let mut store = self.store.write().await;
            // Re-check under the write lock; a fresh value may have landed meanwhile.
            if store.get(key).is_some_and(CacheEntry::is_expired) {
                store.remove(key);
            }
            return Err(CacheError::Miss);
        }

        Ok(entry.value.clone())
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut store = self.store.write().await;

        store.insert(
            key.to_string(),
            CacheEntry {
                value: value.to_vec(),
                expires_at: ttl.map(|d| Instant::now() + d),
            },
        );

        Ok(())
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        let mut store = self.store.write().await;
        for key in keys {
            store.remove(key);
        }
        Ok(())
    }
}
