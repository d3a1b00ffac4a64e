//! Stores and helpers built on top of the ports.

mod cache;
mod comments;
mod posts;
mod slug;

pub use cache::CacheAdapter;
pub use comments::CommentStore;
pub use posts::{LAST_UPDATED_CACHE_KEY, POST_COUNT_CACHE_KEY, PostStore, page_cache_key};
pub use slug::{MAX_SLUG_RETRIES, claim_slug, title_to_slug};
