// ABOUTME: Core types, traits, and utilities for Bookmarker
// ABOUTME: Foundational package providing shared models, timestamps, and ids across all packages

pub mod constants;
pub mod timestamp;
pub mod types;
pub mod utils;

// Re-export main types
pub use types::{Bookmark, User};

// Re-export constants
pub use constants::{bookmarker_dir, database_file, exports_dir, EXPORT_VERSION};

// Re-export utilities
pub use utils::{generate_bookmark_id, generate_group_id, generate_tag_id};
