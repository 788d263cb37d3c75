// ABOUTME: Tag management system for organizing bookmarks
// ABOUTME: Provides tag and group types, the SQLite tag store, and the export/import codec

pub mod bookmarks;
pub mod export;
pub mod storage;
pub mod types;
pub mod validation;

// Re-export main types
pub use bookmarks::BookmarkStorage;
pub use export::{select_for_export, write_export_file, TagExport};
pub use storage::{ImportSummary, TagStorage};
pub use types::{Tag, TagGroup, TagStats, UsageOperation};
pub use validation::validate_hierarchy;
