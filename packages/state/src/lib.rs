// ABOUTME: Application state for Bookmarker
// ABOUTME: Lock-guarded cache over the tag and bookmark stores, batch tag operations, and UI notifications

pub mod batch;
pub mod notifications;
pub mod state;

pub use batch::{BatchOperations, TagSelection};
pub use notifications::{Notification, NotificationKind, Notifier};
pub use state::AppState;
