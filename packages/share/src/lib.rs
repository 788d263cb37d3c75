// ABOUTME: Share-sheet ingestion for Bookmarker
// ABOUTME: Turns links and images shared from other apps into bookmarks

pub mod error;
pub mod handler;

pub use error::{ShareError, ShareResult};
pub use handler::{is_image, is_url, ShareHandler, SharedItem, SharedKind};
