//! Application state - the stores and the backends behind them.

use std::sync::Arc;

use blog_core::ports::{Cache, CommentRepository, PostRepository, SystemClock};
use blog_core::services::CacheAdapter;
use blog_core::{CommentStore, PostStore};
use blog_infra::{InMemoryCache, InMemoryDatastore};

use crate::config::AppConfig;

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub posts: PostStore,
    pub comments: CommentStore,
}

impl AppState {
    /// Build the application state with appropriate implementations.
    pub async fn new(config: &AppConfig) -> anyhow::Result<Self> {
        let cache = build_cache(config).await?;
        let (posts, comments) = build_datastore(config).await?;

        tracing::info!("Application state initialized");

        Ok(Self {
            posts: PostStore::new(
                posts,
                comments.clone(),
                CacheAdapter::new(cache),
                config.blog.clone(),
            ),
            comments: CommentStore::new(comments, Arc::new(SystemClock)),
        })
    }
}

#[cfg(feature = "redis")]
async fn build_cache(config: &AppConfig) -> anyhow::Result<Arc<dyn Cache>> {
    use blog_infra::RedisCache;

    let Some(redis) = &config.redis else {
        tracing::info!("REDIS_URL not set, using in-memory cache");
        return Ok(Arc::new(InMemoryCache::new()));
    };

    match RedisCache::new(redis).await {
        Ok(cache) => Ok(Arc::new(cache)),
        Err(e) if redis.fallback_to_memory => {
            tracing::error!(error = %e, "Failed to connect to Redis. Using in-memory fallback.");
            Ok(Arc::new(InMemoryCache::new()))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to connect to Redis and fallback is disabled");
            Err(e.into())
        }
    }
}

#[cfg(not(feature = "redis"))]
async fn build_cache(_config: &AppConfig) -> anyhow::Result<Arc<dyn Cache>> {
    tracing::info!("Running without redis feature - using in-memory cache");
    Ok(Arc::new(InMemoryCache::new()))
}

type Repositories = (Arc<dyn PostRepository>, Arc<dyn CommentRepository>);

#[cfg(feature = "postgres")]
async fn build_datastore(config: &AppConfig) -> anyhow::Result<Repositories> {
    use blog_infra::PostgresDatastore;
    use blog_infra::database::connect;

    let Some(db_config) = &config.database else {
        tracing::warn!("DATABASE_URL not set. Running without database (in-memory mode).");
        return Ok(in_memory());
    };

    let conn = connect(db_config).await?;
    let datastore = Arc::new(PostgresDatastore::new(conn));
    Ok((datastore.clone(), datastore))
}

#[cfg(not(feature = "postgres"))]
async fn build_datastore(_config: &AppConfig) -> anyhow::Result<Repositories> {
    tracing::info!("Running without postgres feature - using in-memory datastore");
    Ok(in_memory())
}

fn in_memory() -> Repositories {
    let datastore = Arc::new(InMemoryDatastore::new());
    (datastore.clone(), datastore)
}
