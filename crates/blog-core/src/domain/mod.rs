//! Domain entities - the core business objects.

mod comment;
mod post;
mod viewer;

pub use comment::Comment;
pub use post::Post;
pub use viewer::Viewer;
