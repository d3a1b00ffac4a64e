use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Post entity - a single blog entry, keyed by its slug.
///
/// A post starts out unsaved (`slug == None`). The slug is assigned exactly
/// once, when the post is first stored, and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    pub slug: Option<String>,
    pub title: String,
    /// Markdown source.
    pub text: String,
    pub created: DateTime<Utc>,
    pub updated: DateTime<Utc>,
    pub num_comments: u32,
    pub draft: bool,
}

impl Post {
    /// Create a new, unsaved post.
    pub fn new(title: impl Into<String>, text: impl Into<String>) -> Self {
        let now = Utc::now();
        Self {
            slug: None,
            title: title.into(),
            text: text.into(),
            created: now,
            updated: now,
            num_comments: 0,
            draft: false,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.slug.is_some()
    }

    /// Public path of the post, `{base}YYYY/MM/DD/{slug}/`.
    pub fn permalink(&self, base_uri: &str) -> Option<String> {
        let slug = self.slug.as_deref()?;
        Some(format!(
            "{}{}/{}/",
            base_uri,
            self.created.format("%Y/%m/%d"),
            slug
        ))
    }

    /// Path of the edit form for this post.
    pub fn edit_link(&self, base_uri: &str) -> Option<String> {
        self.permalink(base_uri).map(|link| link + "edit")
    }
}
