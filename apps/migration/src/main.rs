//! Creates and drops the blog tables.
//!
//! Reads `DATABASE_URL` (or `--database-url`) and accepts the usual
//! sea-orm-migration subcommands: `up`, `down`, `status`, `fresh`, `reset`.

use sea_orm_migration::prelude::*;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("info,sea_orm_migration=info"));
    tracing_subscriber::fmt().with_env_filter(env_filter).init();

    tracing::info!("Running blog table migrations");
    cli::run_cli(migration::Migrator).await;
}
