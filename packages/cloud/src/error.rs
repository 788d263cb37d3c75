// ABOUTME: Cloud sync error types
// ABOUTME: Provider failures, unimplemented backends, and snapshot encoding errors

use bookmarker_storage::StorageError;
use thiserror::Error;

/// Result type for cloud operations
pub type CloudResult<T> = Result<T, CloudError>;

#[derive(Debug, Error)]
pub enum CloudError {
    #[error("{0} sync is not implemented")]
    NotImplemented(String),

    #[error("Upload failed: {0}")]
    Upload(String),

    #[error("Download failed: {0}")]
    Download(String),

    #[error("Invalid sync interval: {0}")]
    InvalidInterval(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl CloudError {
    pub fn not_implemented(provider: impl Into<String>) -> Self {
        Self::NotImplemented(provider.into())
    }

    /// Whether retrying later could succeed
    pub fn is_retryable(&self) -> bool {
        matches!(self, CloudError::Upload(_) | CloudError::Download(_))
    }
}
