// ABOUTME: Periodic background upload of the local library to a cloud provider
// ABOUTME: Snapshot encoding, one-shot sync and restore, and the start/stop sync loop

use std::sync::Arc;
use std::time::Duration;

use bookmarker_config::Config;
use bookmarker_core::{timestamp, Bookmark};
use bookmarker_state::{AppState, Notifier};
use bookmarker_tags::{ImportSummary, TagExport};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use tokio::time;
use tracing::{debug, info, warn};

use crate::error::{CloudError, CloudResult};
use crate::providers::CloudSync;
use crate::SYNC_FORMAT_VERSION;

/// Everything uploaded in one sync
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SyncSnapshot {
    pub version: u32,
    #[serde(with = "timestamp::rfc3339")]
    pub synced_at: DateTime<Utc>,
    pub bookmarks: Vec<Bookmark>,
    pub tags: TagExport,
}

impl SyncSnapshot {
    pub fn to_bytes(&self) -> CloudResult<Vec<u8>> {
        Ok(serde_json::to_vec(self)?)
    }

    pub fn from_bytes(data: &[u8]) -> CloudResult<Self> {
        Ok(serde_json::from_slice(data)?)
    }
}

/// Uploads a snapshot of the application state on a fixed interval
#[derive(Clone)]
pub struct SyncManager {
    provider: Arc<dyn CloudSync>,
    state: Arc<AppState>,
    notifier: Option<Notifier>,
    interval: Duration,
    running: Arc<RwLock<bool>>,
    last_sync: Arc<RwLock<Option<DateTime<Utc>>>>,
}

impl SyncManager {
    pub fn new(
        provider: Arc<dyn CloudSync>,
        state: Arc<AppState>,
        interval: Duration,
    ) -> CloudResult<Self> {
        if interval.is_zero() {
            return Err(CloudError::InvalidInterval(
                "interval must be greater than zero".to_string(),
            ));
        }

        Ok(Self {
            provider,
            state,
            notifier: None,
            interval,
            running: Arc::new(RwLock::new(false)),
            last_sync: Arc::new(RwLock::new(None)),
        })
    }

    /// Manager using `sync_interval_minutes` from the configuration
    pub fn from_config(
        provider: Arc<dyn CloudSync>,
        state: Arc<AppState>,
        config: &Config,
    ) -> CloudResult<Self> {
        let interval = Duration::from_secs(config.sync_interval_minutes.saturating_mul(60));
        Self::new(provider, state, interval)
    }

    /// Report background failures to the UI as well as the log
    pub fn with_notifier(mut self, notifier: Notifier) -> Self {
        self.notifier = Some(notifier);
        self
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    pub async fn is_running(&self) -> bool {
        *self.running.read().await
    }

    /// Time of the last successful upload from this process
    pub async fn last_sync(&self) -> Option<DateTime<Utc>> {
        *self.last_sync.read().await
    }

    /// Start the background loop. Returns false if it was already running.
    pub async fn start(&self) -> bool {
        let mut running = self.running.write().await;
        if *running {
            return false;
        }
        *running = true;
        drop(running);

        let manager = self.clone();
        tokio::spawn(async move {
            info!(
                "Cloud sync started with {} every {:?}",
                manager.provider.name(),
                manager.interval
            );

            loop {
                if !*manager.running.read().await {
                    info!("Cloud sync stopped");
                    break;
                }

                if let Err(e) = manager.sync_once().await {
                    warn!("Sync with {} failed: {}", manager.provider.name(), e);
                    if let Some(notifier) = &manager.notifier {
                        notifier.error(format!("Sync failed: {}", e));
                    }
                }

                time::sleep(manager.interval).await;
            }
        });

        true
    }

    /// Ask the loop to exit; it finishes after the current sleep
    pub async fn stop(&self) {
        let mut running = self.running.write().await;
        *running = false;
    }

    /// Upload the current state once and record when it happened
    pub async fn sync_once(&self) -> CloudResult<DateTime<Utc>> {
        let (tags, tag_groups) = self.state.tag_snapshot().await;
        let snapshot = SyncSnapshot {
            version: SYNC_FORMAT_VERSION,
            synced_at: timestamp::now(),
            bookmarks: self.state.get_bookmarks().await,
            tags: TagExport::new(tags, tag_groups),
        };
        let data = snapshot.to_bytes()?;

        debug!(
            "Uploading {} bytes ({} bookmarks, {} tags) to {}",
            data.len(),
            snapshot.bookmarks.len(),
            snapshot.tags.tags.len(),
            self.provider.name()
        );
        self.provider.upload(&data).await?;

        let at = snapshot.synced_at;
        *self.last_sync.write().await = Some(at);
        if let Some(mut user) = self.state.current_user().await {
            user.last_sync = Some(at);
            self.state.save_user(user).await;
        }

        info!("✅ Synced library to {}", self.provider.name());
        Ok(at)
    }

    /// Replace local tags with the remote snapshot and re-save its bookmarks
    pub async fn restore(&self) -> CloudResult<ImportSummary> {
        let data = self.provider.download().await?;
        let snapshot = SyncSnapshot::from_bytes(&data)?;

        let summary = self.state.import_tags(&snapshot.tags).await?;
        for bookmark in &snapshot.bookmarks {
            self.state.save_bookmark(bookmark).await?;
        }

        info!(
            "✅ Restored {} bookmarks and {} tags from {}",
            snapshot.bookmarks.len(),
            summary.tags_imported,
            self.provider.name()
        );
        Ok(summary)
    }
}
