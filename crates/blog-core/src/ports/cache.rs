use async_trait::async_trait;
use std::time::Duration;

/// Cache trait - abstraction over caching backends (Redis, in-memory).
///
/// Values are opaque byte blobs; typing and serialization live one layer up.
#[async_trait]
pub trait Cache: Send + Sync {
    /// Get a value from the cache. A missing or expired key is `CacheError::Miss`.
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError>;

    /// Set a value in the cache with optional TTL.
    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError>;

    /// Delete keys from the cache. Absent keys are not an error.
    async fn delete(&self, keys: &[String]) -> Result<(), CacheError>;
}

/// Cache operation errors.
#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache miss")]
    Miss,

    #[error("Connection failed: {0}")]
    Connection(String),

    #[error("Operation failed: {0}")]
    Operation(String),
}
