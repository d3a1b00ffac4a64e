//! Blog configuration, built once at startup and shared by reference.

use std::env;
use std::time::Duration;

/// Listing and cache settings for the post store.
#[derive(Debug, Clone)]
pub struct BlogConfig {
    /// Posts shown per listing page.
    pub posts_per_page: u64,
    /// How long the cached post count stays valid.
    pub post_count_ttl: Duration,
    /// Prefix for post permalinks, with leading and trailing slash.
    pub base_uri: String,
}

impl Default for BlogConfig {
    fn default() -> Self {
        Self {
            posts_per_page: 10,
            post_count_ttl: Duration::from_secs(60 * 60),
            base_uri: "/blog/".to_string(),
        }
    }
}

impl BlogConfig {
    /// Load configuration from environment variables.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            posts_per_page: env::var("BLOG_POSTS_PER_PAGE")
                .ok()
                .and_then(|s| s.parse().ok())
                .filter(|n| *n > 0)
                .unwrap_or(defaults.posts_per_page),
            post_count_ttl: env::var("BLOG_POST_COUNT_TTL_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(defaults.post_count_ttl),
            base_uri: env::var("BLOG_BASE_URI").unwrap_or(defaults.base_uri),
        }
    }
}
