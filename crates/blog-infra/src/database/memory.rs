//! In-memory datastore - used in tests and when no database is configured.
//!
//! Transactions are optimistic: every slug probed through
//! [`PostTransaction::exists`] is remembered together with the answer, and the
//! commit is refused if any of those answers no longer holds.

use std::collections::HashMap;
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;
use uuid::Uuid;

use blog_core::domain::{Comment, Post};
use blog_core::error::RepoError;
use blog_core::ports::{
    CommentRepository, PostOrder, PostQuery, PostRepository, PostTransaction, TransactionOptions,
};

#[derive(Default)]
struct State {
    posts: HashMap<String, Post>,
    /// Comments per post slug, in insertion order.
    comments: HashMap<String, Vec<Comment>>,
}

/// Posts and comments held in process memory.
///
/// Note: Data is lost on process restart.
#[derive(Clone, Default)]
pub struct InMemoryDatastore {
    state: Arc<RwLock<State>>,
}

impl InMemoryDatastore {
    pub fn new() -> Self {
        Self::default()
    }
}

fn slug_of(post: &Post) -> Result<&str, RepoError> {
    post.slug.as_deref().ok_or(RepoError::MissingKey)
}

#[async_trait]
impl PostRepository for InMemoryDatastore {
    async fn find_by_slug(&self, slug: &str) -> Result<Option<Post>, RepoError> {
        let state = self.state.read().await;
        Ok(state.posts.get(slug).cloned())
    }

    async fn query(&self, query: &PostQuery) -> Result<Vec<Post>, RepoError> {
        let state = self.state.read().await;

        let mut posts: Vec<&Post> = state
            .posts
            .values()
            .filter(|post| query.include_drafts || !post.draft)
            .collect();
        posts.sort_by(|a, b| {
            let newest_first = match query.order {
                PostOrder::CreatedDesc => b.created.cmp(&a.created),
                PostOrder::UpdatedDesc => b.updated.cmp(&a.updated),
            };
            newest_first.then_with(|| a.slug.cmp(&b.slug))
        });

        let offset = usize::try_from(query.offset).unwrap_or(usize::MAX);
        let limit = usize::try_from(query.limit).unwrap_or(usize::MAX);
        Ok(posts.into_iter().skip(offset).take(limit).cloned().collect())
    }

    async fn count(&self) -> Result<u64, RepoError> {
        let state = self.state.read().await;
        Ok(state.posts.len() as u64)
    }

    async fn save(&self, post: &Post) -> Result<(), RepoError> {
        let slug = slug_of(post)?.to_string();
        let mut state = self.state.write().await;
        state.posts.insert(slug, post.clone());
        Ok(())
    }

    async fn set_num_comments(&self, slug: &str, num_comments: u32) -> Result<(), RepoError> {
        let mut state = self.state.write().await;
        if let Some(post) = state.posts.get_mut(slug) {
            post.num_comments = num_comments;
        }
        Ok(())
    }

    async fn begin(
        &self,
        options: TransactionOptions,
    ) -> Result<Box<dyn PostTransaction>, RepoError> {
        tracing::trace!(cross_group = options.cross_group, "Begin in-memory transaction");
        Ok(Box::new(InMemoryTransaction {
            state: Arc::clone(&self.state),
            observed: HashMap::new(),
            staged: Vec::new(),
        }))
    }
}

#[async_trait]
impl CommentRepository for InMemoryDatastore {
    async fn find_by_post(&self, post_slug: &str) -> Result<Vec<Comment>, RepoError> {
        let state = self.state.read().await;
        let mut comments = state.comments.get(post_slug).cloned().unwrap_or_default();
        // Stable, so equal timestamps keep insertion order.
        comments.sort_by_key(|comment| comment.created);
        Ok(comments)
    }

    async fn insert(&self, post_slug: &str, comment: &Comment) -> Result<Uuid, RepoError> {
        let id = Uuid::new_v4();
        let mut stored = comment.clone();
        stored.id = Some(id);

        let mut state = self.state.write().await;
        state
            .comments
            .entry(post_slug.to_string())
            .or_default()
            .push(stored);
        Ok(id)
    }
}

struct InMemoryTransaction {
    state: Arc<RwLock<State>>,
    /// Slug -> whether it existed when first probed.
    observed: HashMap<String, bool>,
    staged: Vec<Post>,
}

#[async_trait]
impl PostTransaction for InMemoryTransaction {
    async fn exists(&mut self, slug: &str) -> Result<bool, RepoError> {
        if self
            .staged
            .iter()
            .any(|post| post.slug.as_deref() == Some(slug))
        {
            return Ok(true);
        }

        let present = self.state.read().await.posts.contains_key(slug);
        Ok(*self.observed.entry(slug.to_string()).or_insert(present))
    }

    async fn put(&mut self, post: &Post) -> Result<(), RepoError> {
        let slug = slug_of(post)?;
        self.staged.retain(|staged| staged.slug.as_deref() != Some(slug));
        self.staged.push(post.clone());
        Ok(())
    }

    async fn commit(self: Box<Self>) -> Result<(), RepoError> {
        let InMemoryTransaction {
            state,
            observed,
            staged,
        } = *self;
        let mut state = state.write().await;

        for (slug, existed) in &observed {
            if state.posts.contains_key(slug) != *existed {
                return Err(RepoError::Conflict(format!(
                    "post {slug} changed during transaction"
                )));
            }
        }

        for post in staged {
            if let Some(slug) = post.slug.clone() {
                state.posts.insert(slug, post);
            }
        }
        Ok(())
    }

    async fn rollback(self: Box<Self>) -> Result<(), RepoError> {
        Ok(())
    }
}
