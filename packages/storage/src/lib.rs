// ABOUTME: Data layer foundation for Bookmarker
// ABOUTME: SQLite pool setup, embedded schema migrations, and the typed storage error

pub mod db;
pub mod error;

pub use db::{Database, DatabaseConfig};
pub use error::{StorageError, StorageResult};
