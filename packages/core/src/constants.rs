use std::env;
use std::path::PathBuf;

/// Version string written into every tag export envelope
pub const EXPORT_VERSION: &str = "1.0";

/// Default swatch for tags created implicitly from bookmark tag names
pub const DEFAULT_TAG_COLOR: &str = "#2196F3";

/// Name given to groups synthesized from a tag selection
pub const DEFAULT_GROUP_NAME: &str = "New Group";

/// Get the path to the Bookmarker directory (~/.bookmarker)
pub fn bookmarker_dir() -> PathBuf {
    // First try HOME environment variable (useful for tests)
    if let Ok(home) = env::var("HOME") {
        PathBuf::from(home).join(".bookmarker")
    } else {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".bookmarker")
    }
}

/// Get the path to the SQLite database (~/.bookmarker/bookmarker.db)
pub fn database_file() -> PathBuf {
    bookmarker_dir().join("bookmarker.db")
}

/// Get the default directory for tag exports (~/.bookmarker/exports)
pub fn exports_dir() -> PathBuf {
    bookmarker_dir().join("exports")
}
