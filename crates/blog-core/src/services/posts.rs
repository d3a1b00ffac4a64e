//! Post store - listing pages, single posts, creation and the derived caches.
//!
//! Cached values and when they are dropped:
//!
//! - post count: expires after `BlogConfig::post_count_ttl`, deleted on creation
//! - listing pages: no expiry, deleted on creation (not on update)
//! - last-updated timestamp: no expiry, never deleted
//!
//! Admin callers never read or fill the public page and timestamp entries,
//! since their results include drafts.

use std::sync::Arc;

use chrono::{DateTime, Utc};

use crate::config::BlogConfig;
use crate::domain::{Comment, Post};
use crate::error::{BlogError, RepoError};
use crate::ports::{
    Caller, CommentRepository, PostQuery, PostRepository, PostTransaction, TransactionOptions,
};

use super::cache::CacheAdapter;
use super::slug::claim_slug;

pub const POST_COUNT_CACHE_KEY: &str = "blog_post_count";
pub const LAST_UPDATED_CACHE_KEY: &str = "blog_last_updated";

/// Attempts per `store_post` before a transaction conflict is returned.
const TRANSACTION_ATTEMPTS: u32 = 3;

/// Cache key of one public listing page.
pub fn page_cache_key(page: u64) -> String {
    format!("blog_page_{page}")
}

/// Data access for posts.
#[derive(Clone)]
pub struct PostStore {
    posts: Arc<dyn PostRepository>,
    comments: Arc<dyn CommentRepository>,
    cache: CacheAdapter,
    config: BlogConfig,
}

impl PostStore {
    pub fn new(
        posts: Arc<dyn PostRepository>,
        comments: Arc<dyn CommentRepository>,
        cache: CacheAdapter,
        mut config: BlogConfig,
    ) -> Self {
        if config.posts_per_page == 0 {
            tracing::warn!("posts_per_page is 0, using 1");
            config.posts_per_page = 1;
        }
        Self {
            posts,
            comments,
            cache,
            config,
        }
    }

    pub fn config(&self) -> &BlogConfig {
        &self.config
    }

    /// One listing page, newest first. Pages are 1-based; 0 reads as 1.
    pub async fn load_posts(&self, caller: &dyn Caller, page: u64) -> Result<Vec<Post>, BlogError> {
        let page = page.max(1);
        let admin = caller.is_admin();
        let key = page_cache_key(page);

        if !admin {
            if let Some(posts) = self.cache.get::<Vec<Post>>(&key).await {
                return Ok(posts);
            }
        }

        let query = PostQuery::page(page, self.config.posts_per_page, admin);
        let posts = self.posts.query(&query).await?;

        if !admin {
            self.cache.set(&key, &posts, None).await;
        }
        Ok(posts)
    }

    /// A post and its comments, oldest comment first.
    ///
    /// Drafts are reported as `NotFound` to non-admin callers. If the stored
    /// comment count disagrees with the comments actually found, the post is
    /// corrected and the count alone is written back, so an edit committed in
    /// the meantime survives; a failed write-back is only logged and the
    /// returned post still carries the fresh count.
    pub async fn load_post(
        &self,
        caller: &dyn Caller,
        slug: &str,
    ) -> Result<(Post, Vec<Comment>), BlogError> {
        let not_found = || BlogError::NotFound {
            slug: slug.to_string(),
        };

        let mut post = self.posts.find_by_slug(slug).await?.ok_or_else(not_found)?;
        if post.draft && !caller.is_admin() {
            return Err(not_found());
        }

        let comments = self.comments.find_by_post(slug).await?;

        let actual = u32::try_from(comments.len()).unwrap_or(u32::MAX);
        if actual != post.num_comments {
            tracing::warn!(
                slug = %slug,
                stored = post.num_comments,
                actual,
                "Comment count mismatch, correcting"
            );
            post.num_comments = actual;
            if let Err(e) = self.posts.set_num_comments(slug, actual).await {
                tracing::warn!(slug = %slug, error = %e, "Failed to persist corrected comment count");
            }
        }

        Ok((post, comments))
    }

    /// Create or update a post.
    ///
    /// A post without a slug is created: a slug is claimed and the post
    /// written in one transaction, then the count and every listing page are
    /// dropped from the cache. On success `post.slug` is set; on failure the
    /// post is left untouched. A post with a slug is written back as is.
    pub async fn store_post(&self, post: &mut Post) -> Result<(), BlogError> {
        let creating = !post.is_saved();

        let stored = self.write_in_transaction(post).await?;
        *post = stored;

        if creating {
            self.invalidate_listing().await;
        }
        Ok(())
    }

    /// Number of listing pages: `posts / posts_per_page + 1`.
    pub async fn page_count(&self) -> Result<u64, BlogError> {
        let count = match self.cache.get::<u64>(POST_COUNT_CACHE_KEY).await {
            Some(count) => count,
            None => {
                tracing::info!("Counting posts");
                let count = self.posts.count().await?;
                tracing::info!(count, "Got post count");
                self.cache
                    .set(POST_COUNT_CACHE_KEY, &count, Some(self.config.post_count_ttl))
                    .await;
                count
            }
        };
        Ok(count / self.config.posts_per_page + 1)
    }

    /// Update time of the most recently updated visible post, or the Unix
    /// epoch when there is none.
    pub async fn page_last_updated(&self, caller: &dyn Caller) -> Result<DateTime<Utc>, BlogError> {
        let admin = caller.is_admin();

        if !admin {
            if let Some(updated) = self.cache.get::<DateTime<Utc>>(LAST_UPDATED_CACHE_KEY).await {
                return Ok(updated);
            }
        }

        let latest = self.posts.query(&PostQuery::latest_update(admin)).await?;
        let updated = latest
            .first()
            .map(|post| post.updated)
            .unwrap_or_default();

        if !admin {
            self.cache.set(LAST_UPDATED_CACHE_KEY, &updated, None).await;
        }
        Ok(updated)
    }

    async fn write_in_transaction(&self, post: &Post) -> Result<Post, BlogError> {
        let mut attempt = 0;
        loop {
            attempt += 1;
            let mut tx = self
                .posts
                .begin(TransactionOptions { cross_group: true })
                .await?;

            let mut staged = post.clone();
            let result = match stage(tx.as_mut(), &mut staged).await {
                Ok(()) => tx.commit().await.map_err(BlogError::from),
                Err(e) => {
                    if let Err(rollback_err) = tx.rollback().await {
                        tracing::warn!(error = %rollback_err, "Rollback failed");
                    }
                    Err(e)
                }
            };

            match result {
                Ok(()) => return Ok(staged),
                Err(e) if e.is_conflict() && attempt < TRANSACTION_ATTEMPTS => {
                    tracing::warn!(
                        title = %post.title,
                        attempt,
                        error = %e,
                        "Post transaction conflicted, retrying"
                    );
                }
                Err(e) => return Err(e),
            }
        }
    }

    async fn invalidate_listing(&self) {
        tracing::info!("Resetting cached post count and pages");
        self.cache.delete(&[POST_COUNT_CACHE_KEY.to_string()]).await;

        let page_count = match self.page_count().await {
            Ok(count) => count,
            Err(e) => {
                tracing::error!(error = %e, "Cannot recount posts, listing pages may be stale");
                return;
            }
        };

        let keys: Vec<String> = (0..=page_count).map(page_cache_key).collect();
        self.cache.delete(&keys).await;
    }
}

/// Claim a slug if the post has none, then stage the write.
async fn stage(tx: &mut dyn PostTransaction, post: &mut Post) -> Result<(), BlogError> {
    if post.slug.is_none() {
        post.slug = Some(claim_slug(tx, &post.title).await?);
    }
    tx.put(post).await.map_err(|e| match e {
        RepoError::MissingKey => BlogError::UnsavedPost,
        other => other.into(),
    })
}
