//! Development fixture - a handful of posts and one commented post.

use chrono::{DateTime, Duration, Utc};

use blog_core::domain::{Comment, Post};
use blog_core::{BlogError, CommentStore, PostStore};

const FIXTURE_POSTS: u32 = 20;

/// Store twenty dated posts followed by a post carrying two comments.
///
/// Posts are dated from ten days ahead, one hour apart, so the newest
/// fixture entries sort above anything written by hand.
pub async fn store_development_fixture(
    posts: &PostStore,
    comments: &CommentStore,
) -> Result<(), BlogError> {
    store_fixture_from(posts, comments, Utc::now() + Duration::days(10)).await
}

async fn store_fixture_from(
    posts: &PostStore,
    comments: &CommentStore,
    start: DateTime<Utc>,
) -> Result<(), BlogError> {
    let mut at = start;

    for n in 0..FIXTURE_POSTS {
        at += Duration::hours(1);
        let mut post = Post::new(
            format!("My post #{n}"),
            format!("This is the text of post #{n}"),
        );
        post.created = at - Duration::hours(1);
        post.updated = at;
        posts.store_post(&mut post).await?;
    }

    let mut post = Post::new(
        "Post with comments",
        "This is the text of a post with comments",
    );
    post.created = at;
    post.updated = at;
    posts.store_post(&mut post).await?;

    let mut approved = Comment::new("icke", "icke@hier.com", "http://icke.com", "icke war hier");
    approved.approved = true;
    comments.store_comment(&post, &mut approved).await?;

    let mut pending = Comment::new("other", "other@example.com", "", "other comment");
    comments.store_comment(&post, &mut pending).await?;

    tracing::info!(posts = FIXTURE_POSTS + 1, "Stored development fixture");
    Ok(())
}
