//! Application configuration loaded from environment variables.

use std::env;

use blog_core::BlogConfig;
use blog_infra::DatabaseConfig;
#[cfg(feature = "redis")]
use blog_infra::RedisConfig;

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub blog: BlogConfig,
    /// `None` runs on the in-memory datastore.
    pub database: Option<DatabaseConfig>,
    /// `None` runs on the in-memory cache.
    #[cfg(feature = "redis")]
    pub redis: Option<RedisConfig>,
    /// Store the development fixture before printing the summary.
    pub seed_fixture: bool,
}

impl AppConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        Self {
            blog: BlogConfig::from_env(),
            database: DatabaseConfig::from_env(),
            #[cfg(feature = "redis")]
            redis: env::var("REDIS_URL").ok().map(|_| RedisConfig::from_env()),
            seed_fixture: env::var("BLOG_SEED_FIXTURE")
                .map(|v| v == "true" || v == "1")
                .unwrap_or(true),
        }
    }
}
