use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Comment, Post};
use crate::error::RepoError;

/// Sort order for post queries. Both are newest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostOrder {
    CreatedDesc,
    UpdatedDesc,
}

/// Filter, order and window for a post query.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PostQuery {
    pub include_drafts: bool,
    pub order: PostOrder,
    pub offset: u64,
    pub limit: u64,
}

impl PostQuery {
    /// One listing page, newest first. Pages are 1-based; a page past the
    /// addressable range yields an offset no store can reach.
    pub fn page(page: u64, per_page: u64, include_drafts: bool) -> Self {
        Self {
            include_drafts,
            order: PostOrder::CreatedDesc,
            offset: page.saturating_sub(1).saturating_mul(per_page),
            limit: per_page,
        }
    }

    /// The single most recently updated post.
    pub fn latest_update(include_drafts: bool) -> Self {
        Self {
            include_drafts,
            order: PostOrder::UpdatedDesc,
            offset: 0,
            limit: 1,
        }
    }
}

/// Transaction settings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TransactionOptions {
    /// Allow the transaction to touch more than one entity group.
    pub cross_group: bool,
}

/// Post persistence.
#[async_trait]
pub trait PostRepository: Send + Sync {
    /// Find a post by its slug.
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError>;

    /// Run a filtered, ordered, windowed query.
    async fn query(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError>;

    /// Count all posts, drafts included.
    async fn count(&self) -> Result<u64, RepoError>;

    /// Write a post outside of any transaction. The post must have a slug.
    async fn save(&self, post: &Post) -> Result<(), RepoError>;

    /// Overwrite only the stored comment count of a post, leaving every other
    /// field as currently persisted. A missing post is not an error.
    async fn set_num_comments(&self, slug: &str, num_comments: u32) -> Result<(), RepoError>;

    /// Open a transaction.
    async fn begin(
        &self,
        options: TransactionOptions,
    ) -> Result<Box<dyn PostTransaction>, RepoError>;
}

/// An open post transaction.
///
/// Slugs probed with [`exists`](PostTransaction::exists) must still have the
/// observed state at commit time; otherwise `commit` fails with
/// `RepoError::Conflict` and nothing is written.
#[async_trait]
pub trait PostTransaction: Send {
    async fn exists(&mut self, slug: &str) -> Result<bool, RepoError>;

    /// Stage a write. The post must have a slug.
    async fn put(&mut self, post: &Post) -> Result<(), RepoError>;

    async fn commit(self: Box<Self>) -> Result<(), RepoError>;

    async fn rollback(self: Box<Self>) -> Result<(), RepoError>;
}

/// Comment persistence, scoped by parent post.
#[async_trait]
pub trait CommentRepository: Send + Sync {
    /// All comments of a post, oldest first.
    async fn find_by_post(&self, post_slug: &str) -> Result<Vec<Comment>, RepoError>;

    /// Insert a comment under a post and return its generated key.
    async fn insert(&self, post_slug: &str, comment: &Comment) -> Result<Uuid, RepoError>;
}
