//! # Blog Seed
//!
//! Wires the post and comment stores to their configured backends,
//! optionally stores the development fixture and logs a summary of the
//! first listing page.

mod config;
mod fixture;
mod state;
mod telemetry;

use blog_core::domain::Viewer;

use config::AppConfig;
use state::AppState;
use telemetry::{LogFormat, init_telemetry};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_telemetry(LogFormat::from_env());

    let config = AppConfig::from_env();
    tracing::info!(
        posts_per_page = config.blog.posts_per_page,
        base_uri = %config.blog.base_uri,
        "Starting blog seed"
    );

    let state = AppState::new(&config).await?;

    if config.seed_fixture {
        fixture::store_development_fixture(&state.posts, &state.comments).await?;
    }

    let visitor = Viewer::anonymous();
    let pages = state.posts.page_count().await?;
    let last_updated = state.posts.page_last_updated(&visitor).await?;
    tracing::info!(pages, %last_updated, "Blog summary");

    for post in state.posts.load_posts(&visitor, 1).await? {
        let link = post.permalink(&config.blog.base_uri).unwrap_or_default();
        tracing::info!(title = %post.title, %link, comments = post.num_comments, "Listed post");
    }

    Ok(())
}
