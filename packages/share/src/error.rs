// ABOUTME: Error types for share-sheet ingestion
// ABOUTME: Empty payloads and content that is neither a web link nor an image

use thiserror::Error;

pub type ShareResult<T> = Result<T, ShareError>;

#[derive(Error, Debug, PartialEq, Eq)]
pub enum ShareError {
    #[error("Shared content is empty")]
    Empty,

    #[error("Unsupported content type: {0}")]
    Unsupported(String),
}
