// ABOUTME: Batch tag operations driven by the UI selection
// ABOUTME: Delete, group, and export the selected tags, reporting the outcome as notifications

use std::path::PathBuf;
use std::sync::Arc;

use bookmarker_storage::{StorageError, StorageResult};
use bookmarker_tags::TagGroup;
use tokio::task::JoinHandle;
use tracing::{error, warn};

use crate::notifications::Notifier;
use crate::state::AppState;

/// Tag ids picked in the UI, in the order they were selected
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TagSelection {
    ids: Vec<String>,
}

impl TagSelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn select(&mut self, tag_id: impl Into<String>) {
        let tag_id = tag_id.into();
        if !self.contains(&tag_id) {
            self.ids.push(tag_id);
        }
    }

    pub fn deselect(&mut self, tag_id: &str) {
        self.ids.retain(|id| id != tag_id);
    }

    /// Flip membership; returns whether the tag is now selected
    pub fn toggle(&mut self, tag_id: &str) -> bool {
        if self.contains(tag_id) {
            self.deselect(tag_id);
            false
        } else {
            self.select(tag_id);
            true
        }
    }

    pub fn contains(&self, tag_id: &str) -> bool {
        self.ids.iter().any(|id| id == tag_id)
    }

    pub fn ids(&self) -> &[String] {
        &self.ids
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn clear(&mut self) {
        self.ids.clear();
    }
}

/// Runs batch actions over the current selection.
///
/// A successful action clears the selection and posts an info notification.
/// A failed action keeps the selection for a retry and posts an error.
pub struct BatchOperations {
    state: Arc<AppState>,
    notifier: Notifier,
    selection: TagSelection,
}

impl BatchOperations {
    pub fn new(state: Arc<AppState>, notifier: Notifier) -> Self {
        Self {
            state,
            notifier,
            selection: TagSelection::new(),
        }
    }

    pub fn selection(&self) -> &TagSelection {
        &self.selection
    }

    pub fn selection_mut(&mut self) -> &mut TagSelection {
        &mut self.selection
    }

    /// The batch toolbar is shown while anything is selected
    pub fn toolbar_visible(&self) -> bool {
        !self.selection.is_empty()
    }

    pub async fn delete_selected(&mut self) -> StorageResult<u64> {
        let ids = self.selected_ids()?;
        match self.state.delete_tags(&ids).await {
            Ok(removed) => {
                self.selection.clear();
                self.notifier.info(format!("{} tags deleted", ids.len()));
                Ok(removed)
            }
            Err(e) => {
                warn!("Batch delete failed: {}", e);
                self.notifier.error(format!("Error deleting tags: {}", e));
                Err(e)
            }
        }
    }

    pub async fn group_selected(&mut self) -> StorageResult<TagGroup> {
        let ids = self.selected_ids()?;
        match self.state.group_tags(&ids).await {
            Ok(group) => {
                self.selection.clear();
                self.notifier.info(format!("{} tags grouped", ids.len()));
                Ok(group)
            }
            Err(e) => {
                warn!("Batch group failed: {}", e);
                self.notifier.error(format!("Error grouping tags: {}", e));
                Err(e)
            }
        }
    }

    pub async fn export_selected(&mut self) -> StorageResult<PathBuf> {
        let ids = self.selected_ids()?;
        match self.state.export_tags(&ids).await {
            Ok(path) => {
                self.selection.clear();
                self.notifier
                    .info(format!("Tags exported successfully to {}", path.display()));
                Ok(path)
            }
            Err(e) => {
                warn!("Batch export failed: {}", e);
                self.notifier.error(format!("Failed to export tags: {}", e));
                Err(e)
            }
        }
    }

    /// Export every tag in the background. The outcome is only reported
    /// through the notifier.
    pub fn spawn_export_all(&self) -> JoinHandle<()> {
        let state = Arc::clone(&self.state);
        let notifier = self.notifier.clone();

        tokio::spawn(async move {
            match state.export_all_tags().await {
                Ok(path) => {
                    notifier.info(format!("Tags exported successfully to {}", path.display()))
                }
                Err(e) => {
                    error!("Background export failed: {}", e);
                    notifier.error(format!("Failed to export tags: {}", e));
                }
            }
        })
    }

    fn selected_ids(&self) -> StorageResult<Vec<String>> {
        if self.selection.is_empty() {
            return Err(StorageError::InvalidInput("no tags selected".to_string()));
        }
        Ok(self.selection.ids().to_vec())
    }
}
