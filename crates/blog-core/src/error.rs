//! Domain-level error types.

use thiserror::Error;

/// Blog errors - what callers of the stores branch on.
#[derive(Debug, Error)]
pub enum BlogError {
    /// Missing slug, or a draft requested by a non-admin caller.
    #[error("Post not found: {slug}")]
    NotFound { slug: String },

    #[error("No free slug for post with title: {title}")]
    SlugExhausted { title: String },

    #[error("Post has not been stored yet")]
    UnsavedPost,

    #[error(transparent)]
    Store(#[from] RepoError),
}

impl BlogError {
    /// True for errors the routing layer should render as "not found".
    pub fn is_not_found(&self) -> bool {
        matches!(self, BlogError::NotFound { .. })
    }

    /// True when a transaction lost against a concurrent writer.
    pub(crate) fn is_conflict(&self) -> bool {
        matches!(self, BlogError::Store(RepoError::Conflict(_)))
    }
}

/// Repository-level errors.
#[derive(Debug, Error)]
pub enum RepoError {
    #[error("Database connection failed: {0}")]
    Connection(String),

    #[error("Query execution failed: {0}")]
    Query(String),

    #[error("Transaction conflict: {0}")]
    Conflict(String),

    #[error("Post has no slug")]
    MissingKey,
}
