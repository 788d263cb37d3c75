// ABOUTME: Environment variable name constants
// ABOUTME: Centralized definitions of all environment variable names used across Bookmarker

// Storage Configuration
pub const BOOKMARKER_DATA_DIR: &str = "BOOKMARKER_DATA_DIR";
pub const BOOKMARKER_DB_PATH: &str = "BOOKMARKER_DB_PATH";
pub const BOOKMARKER_DB_MAX_CONNECTIONS: &str = "BOOKMARKER_DB_MAX_CONNECTIONS";
pub const BOOKMARKER_DB_BUSY_TIMEOUT_SECS: &str = "BOOKMARKER_DB_BUSY_TIMEOUT_SECS";

// Tag Export Configuration
pub const BOOKMARKER_EXPORT_DIR: &str = "BOOKMARKER_EXPORT_DIR";

// Cloud Sync Configuration
pub const BOOKMARKER_SYNC_INTERVAL_MINUTES: &str = "BOOKMARKER_SYNC_INTERVAL_MINUTES";

// Logging
pub const BOOKMARKER_LOG: &str = "BOOKMARKER_LOG";
pub const RUST_LOG: &str = "RUST_LOG";

// OAuth Client Credentials
pub const GOOGLE_CLIENT_ID: &str = "GOOGLE_CLIENT_ID";
pub const GOOGLE_CLIENT_SECRET: &str = "GOOGLE_CLIENT_SECRET";
pub const MS_CLIENT_ID: &str = "MS_CLIENT_ID";
pub const MS_CLIENT_SECRET: &str = "MS_CLIENT_SECRET";
