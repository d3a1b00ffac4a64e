//! Typed, best-effort access to the cache port.
//!
//! Nothing here ever fails a request: a backend error on read is logged and
//! reported as a miss, and failed writes or deletes are logged and dropped.

use std::sync::Arc;
use std::time::Duration;

use serde::Serialize;
use serde::de::DeserializeOwned;

use crate::ports::{Cache, CacheError};

/// JSON-serializing wrapper around a [`Cache`] backend.
#[derive(Clone)]
pub struct CacheAdapter {
    backend: Arc<dyn Cache>,
}

impl CacheAdapter {
    pub fn new(backend: Arc<dyn Cache>) -> Self {
        Self { backend }
    }

    /// Look up and decode a value. `None` means "recompute from the store".
    pub async fn get<T: DeserializeOwned>(&self, key: &str) -> Option<T> {
        let bytes = match self.backend.get(key).await {
            Ok(bytes) => bytes,
            Err(CacheError::Miss) => {
                tracing::debug!(key = %key, "Cache miss");
                return None;
            }
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cache read failed, treating as miss");
                return None;
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(value) => Some(value),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cannot decode cached value");
                None
            }
        }
    }

    /// Encode and store a value.
    pub async fn set<T: Serialize + ?Sized>(&self, key: &str, value: &T, ttl: Option<Duration>) {
        let bytes = match serde_json::to_vec(value) {
            Ok(bytes) => bytes,
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "Cannot encode value for cache");
                return;
            }
        };

        if let Err(e) = self.backend.set(key, &bytes, ttl).await {
            tracing::warn!(key = %key, error = %e, "Cache write failed");
        }
    }

    /// Drop one or more keys.
    pub async fn delete(&self, keys: &[String]) {
        if keys.is_empty() {
            return;
        }
        if let Err(e) = self.backend.delete(keys).await {
            tracing::warn!(keys = ?keys, error = %e, "Cache delete failed");
        }
    }
}
