//! Redis-backed blog cache.
//!
//! Values are stored as raw bytes under the key the post store chooses.
//! Entries without a TTL are plain `SET`s and live until deleted.

use std::env;
use std::time::Duration;

use async_trait::async_trait;
use redis::aio::ConnectionManager;
use redis::{AsyncCommands, Client, RedisError};

use blog_core::ports::{Cache, CacheError};

const DEFAULT_URL: &str = "redis://localhost:6379";

/// Where the cache lives and what to do when it cannot be reached.
#[derive(Debug, Clone)]
pub struct RedisConfig {
    pub url: String,
    /// Upper bound on the initial connect.
    pub connect_timeout: Duration,
    /// Run on an in-memory cache instead of failing startup.
    pub fallback_to_memory: bool,
}

impl Default for RedisConfig {
    fn default() -> Self {
        Self {
            url: DEFAULT_URL.to_string(),
            connect_timeout: Duration::from_secs(5),
            fallback_to_memory: true,
        }
    }
}

impl RedisConfig {
    /// Reads `REDIS_URL`, `REDIS_CONNECT_TIMEOUT_SECS` and
    /// `REDIS_FALLBACK_TO_MEMORY`, keeping the default for anything unset.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            url: env::var("REDIS_URL").unwrap_or(defaults.url),
            connect_timeout: env::var("REDIS_CONNECT_TIMEOUT_SECS")
                .ok()
                .and_then(|secs| secs.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.connect_timeout),
            fallback_to_memory: env::var("REDIS_FALLBACK_TO_MEMORY")
                .map(|flag| matches!(flag.as_str(), "true" | "1"))
                .unwrap_or(defaults.fallback_to_memory),
        }
    }
}

/// Shared blog cache on Redis.
///
/// The connection manager reconnects on its own, so a Redis restart shows up
/// as a few failed operations rather than a dead cache.
pub struct RedisCache {
    conn: ConnectionManager,
}

impl RedisCache {
    pub async fn new(config: &RedisConfig) -> Result<Self, CacheError> {
        let client = Client::open(config.url.as_str()).map_err(unreachable)?;

        let conn = tokio::time::timeout(config.connect_timeout, ConnectionManager::new(client))
            .await
            .map_err(|_| {
                CacheError::Connection(format!(
                    "no answer from {} within {:?}",
                    config.url, config.connect_timeout
                ))
            })?
            .map_err(unreachable)?;

        tracing::info!(url = %config.url, "Blog cache connected to Redis");
        Ok(Self { conn })
    }
}

fn unreachable(e: RedisError) -> CacheError {
    CacheError::Connection(e.to_string())
}

fn failed(e: RedisError) -> CacheError {
    if e.is_io_error() || e.is_connection_dropped() || e.is_connection_refusal() {
        CacheError::Connection(e.to_string())
    } else {
        CacheError::Operation(e.to_string())
    }
}

#[async_trait]
impl Cache for RedisCache {
    async fn get(&self, key: &str) -> Result<Vec<u8>, CacheError> {
        let mut conn = self.conn.clone();
        let value: Option<Vec<u8>> = conn.get(key).await.map_err(failed)?;
        value.ok_or(CacheError::Miss)
    }

    async fn set(&self, key: &str, value: &[u8], ttl: Option<Duration>) -> Result<(), CacheError> {
        let mut conn = self.conn.clone();
        let value = value.to_vec();
        match ttl {
            // SETEX refuses 0.
            Some(ttl) => conn.set_ex::<_, _, ()>(key, value, ttl.as_secs().max(1)).await,
            None => conn.set::<_, _, ()>(key, value).await,
        }
        .map_err(failed)
    }

    async fn delete(&self, keys: &[String]) -> Result<(), CacheError> {
        if keys.is_empty() {
            return Ok(());
        }
        let mut conn = self.conn.clone();
        conn.del::<_, ()>(keys.to_vec()).await.map_err(failed)
    }
}
