//! Comment store.

use std::sync::Arc;

use crate::domain::{Comment, Post};
use crate::error::BlogError;
use crate::ports::{Clock, CommentRepository};

/// Append-only comment persistence.
#[derive(Clone)]
pub struct CommentStore {
    comments: Arc<dyn CommentRepository>,
    clock: Arc<dyn Clock>,
}

impl CommentStore {
    pub fn new(comments: Arc<dyn CommentRepository>, clock: Arc<dyn Clock>) -> Self {
        Self { comments, clock }
    }

    /// Store a comment under `post`, stamping its creation time and key.
    ///
    /// The post's `num_comments` is not touched here; `PostStore::load_post`
    /// corrects it the next time the post is read.
    pub async fn store_comment(&self, post: &Post, comment: &mut Comment) -> Result<(), BlogError> {
        let slug = post.slug.as_deref().ok_or(BlogError::UnsavedPost)?;

        let mut stored = comment.clone();
        stored.created = self.clock.now();
        let id = self.comments.insert(slug, &stored).await?;
        stored.id = Some(id);

        tracing::debug!(slug = %slug, comment_id = %id, "Stored comment");
        *comment = stored;
        Ok(())
    }
}
