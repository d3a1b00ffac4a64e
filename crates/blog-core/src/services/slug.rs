//! Slug derivation and collision probing.
//!
//! A slug is derived from the title once, when a post is first stored, and is
//! the post's key from then on. Collisions are resolved by probing a short,
//! fixed list of numbered candidates inside the creating transaction.

use crate::error::BlogError;
use crate::ports::PostTransaction;

/// Numbered suffixes tried after the bare slug (`-1` through `-5`).
///
/// This is a hard limit: a sixth post with the same title fails with
/// [`BlogError::SlugExhausted`] instead of searching further.
pub const MAX_SLUG_RETRIES: usize = 5;

/// Probe base for titles that contain no slug-safe characters.
const FALLBACK_SLUG: &str = "post";

/// Turn a title into a URL-safe slug.
///
/// Whitespace becomes `-`, everything outside `[A-Za-z0-9_-]` is dropped,
/// runs of dashes collapse to one and the result is lowercased.
pub fn title_to_slug(title: &str) -> String {
    let mut slug = String::with_capacity(title.len());
    for ch in title.chars() {
        let ch = if ch.is_whitespace() { '-' } else { ch };
        if !(ch.is_ascii_alphanumeric() || ch == '_' || ch == '-') {
            continue;
        }
        if ch == '-' && slug.ends_with('-') {
            continue;
        }
        slug.push(ch.to_ascii_lowercase());
    }
    slug
}

/// Candidate keys in probe order: `base`, `base-1`, ..., `base-5`.
fn candidates(base: &str) -> impl Iterator<Item = String> + '_ {
    std::iter::once(base.to_string())
        .chain((1..=MAX_SLUG_RETRIES).map(move |i| format!("{base}-{i}")))
}

/// Find the first free slug for `title` within the given transaction.
pub async fn claim_slug(tx: &mut dyn PostTransaction, title: &str) -> Result<String, BlogError> {
    let mut base = title_to_slug(title);
    if base.is_empty() {
        base = FALLBACK_SLUG.to_string();
    }

    for candidate in candidates(&base) {
        if !tx.exists(&candidate).await? {
            tracing::debug!(slug = %candidate, "Claimed slug");
            return Ok(candidate);
        }
    }

    Err(BlogError::SlugExhausted {
        title: title.to_string(),
    })
}
