use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Comment entity - belongs to exactly one post.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    /// Assigned by the store on insert.
    pub id: Option<Uuid>,
    pub author: String,
    pub author_email: String,
    pub author_url: String,
    pub text: String,
    pub approved: bool,
    pub created: DateTime<Utc>,
}

impl Comment {
    /// Create a new, unapproved comment.
    pub fn new(
        author: impl Into<String>,
        author_email: impl Into<String>,
        author_url: impl Into<String>,
        text: impl Into<String>,
    ) -> Self {
        Self {
            id: None,
            author: author.into(),
            author_email: author_email.into(),
            author_url: author_url.into(),
            text: text.into(),
            approved: false,
            created: Utc::now(),
        }
    }
}
