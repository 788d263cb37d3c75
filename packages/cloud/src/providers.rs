// ABOUTME: Cloud storage provider abstraction for sync snapshots
// ABOUTME: Google Drive and OneDrive backends are declared but not implemented yet

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::{CloudError, CloudResult};

/// Remote store holding one opaque snapshot per account
#[async_trait]
pub trait CloudSync: Send + Sync {
    /// Provider name used in logs and errors
    fn name(&self) -> &str;

    /// Replace the remote snapshot
    async fn upload(&self, data: &[u8]) -> CloudResult<()>;

    /// Fetch the remote snapshot
    async fn download(&self) -> CloudResult<Vec<u8>>;

    /// When the remote snapshot was last written, `None` if never
    async fn last_sync(&self) -> CloudResult<Option<DateTime<Utc>>>;
}

/// Google Drive app-data folder backend
#[derive(Debug, Clone)]
pub struct GoogleDriveSync {
    access_token: String,
}

impl GoogleDriveSync {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

#[async_trait]
impl CloudSync for GoogleDriveSync {
    fn name(&self) -> &str {
        "Google Drive"
    }

    // TODO: upload through the Drive v3 multipart endpoint into appDataFolder
    async fn upload(&self, _data: &[u8]) -> CloudResult<()> {
        Err(CloudError::not_implemented(self.name()))
    }

    async fn download(&self) -> CloudResult<Vec<u8>> {
        Err(CloudError::not_implemented(self.name()))
    }

    async fn last_sync(&self) -> CloudResult<Option<DateTime<Utc>>> {
        Ok(None)
    }
}

/// OneDrive app folder backend
#[derive(Debug, Clone)]
pub struct OneDriveSync {
    access_token: String,
}

impl OneDriveSync {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self {
            access_token: access_token.into(),
        }
    }

    pub fn has_token(&self) -> bool {
        !self.access_token.is_empty()
    }
}

#[async_trait]
impl CloudSync for OneDriveSync {
    fn name(&self) -> &str {
        "OneDrive"
    }

    async fn upload(&self, _data: &[u8]) -> CloudResult<()> {
        Err(CloudError::not_implemented(self.name()))
    }

    async fn download(&self) -> CloudResult<Vec<u8>> {
        Err(CloudError::not_implemented(self.name()))
    }

    async fn last_sync(&self) -> CloudResult<Option<DateTime<Utc>>> {
        Ok(None)
    }
}
