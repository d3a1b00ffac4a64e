//! # Blog Core
//!
//! The domain layer of the blog.
//! Posts, comments, slug assignment and the derived listing caches live here;
//! storage and caching backends are reached only through the traits in [`ports`].

pub mod config;
pub mod domain;
pub mod error;
pub mod ports;
pub mod services;

pub use config::BlogConfig;
pub use error::{BlogError, RepoError};
pub use services::{CommentStore, PostStore, title_to_slug};
