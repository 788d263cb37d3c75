// ABOUTME: Cloud sync collaborator for Bookmarker
// ABOUTME: Provider trait with Google Drive and OneDrive backends plus the periodic sync loop

pub mod error;
pub mod providers;
pub mod sync;

pub use error::{CloudError, CloudResult};
pub use providers::{CloudSync, GoogleDriveSync, OneDriveSync};
pub use sync::{SyncManager, SyncSnapshot};

/// Version of the uploaded snapshot format
pub const SYNC_FORMAT_VERSION: u32 = 1;
