//! Authorization port.

use crate::domain::Viewer;

/// Answers whether the current caller may see drafts and bypass public caches.
pub trait Caller: Send + Sync {
    fn is_admin(&self) -> bool;
}

impl Caller for Viewer {
    fn is_admin(&self) -> bool {
        self.admin
    }
}
