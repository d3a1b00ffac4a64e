//! Ports - trait definitions for external dependencies.
//! These are the "interfaces" that infrastructure must implement.

mod auth;
mod cache;
mod clock;
mod repository;

pub use auth::Caller;
pub use cache::{Cache, CacheError};
pub use clock::{Clock, SystemClock};
pub use repository::{
    CommentRepository, PostOrder, PostQuery, PostRepository, PostTransaction, TransactionOptions,
};
