// ABOUTME: Tag export envelope and its JSON file format
// ABOUTME: Selection closure for partial exports and collision-free export file writing

use std::collections::HashSet;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use bookmarker_core::{timestamp, EXPORT_VERSION};
use bookmarker_storage::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::fs::{self, OpenOptions};
use tokio::io::{AsyncWrite, AsyncWriteExt};
use tracing::{debug, info, warn};

use crate::types::{null_as_default, Tag, TagGroup};

const MAX_NAME_ATTEMPTS: usize = 1000;

/// Portable snapshot of tags and groups
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TagExport {
    #[serde(default, deserialize_with = "null_as_default")]
    pub tags: Vec<Tag>,
    #[serde(default, deserialize_with = "null_as_default")]
    pub tag_groups: Vec<TagGroup>,
    #[serde(with = "timestamp::rfc3339")]
    pub exported_at: DateTime<Utc>,
    #[serde(default)]
    pub version: String,
}

impl TagExport {
    /// Envelope stamped with the current time and format version
    pub fn new(tags: Vec<Tag>, tag_groups: Vec<TagGroup>) -> Self {
        Self {
            tags,
            tag_groups,
            exported_at: timestamp::now(),
            version: EXPORT_VERSION.to_string(),
        }
    }

    pub fn to_json_pretty(&self) -> StorageResult<String> {
        Ok(serde_json::to_string_pretty(self)?)
    }

    pub fn from_json(raw: &str) -> StorageResult<Self> {
        Ok(serde_json::from_str(raw)?)
    }

    /// Read and decode an export file
    pub async fn read_from_file(path: &Path) -> StorageResult<Self> {
        debug!("Reading tag export: {}", path.display());
        let raw = fs::read_to_string(path).await?;
        Self::from_json(&raw)
    }
}

/// Build the export for a tag selection.
///
/// `tags` holds only the selected tags, in collection order. Every group that
/// contains at least one selected id is included whole, so its `tag_ids` may
/// reference tags outside the export.
pub fn select_for_export(tags: &[Tag], groups: &[TagGroup], tag_ids: &[String]) -> TagExport {
    let wanted: HashSet<&str> = tag_ids.iter().map(String::as_str).collect();

    let selected_tags = tags
        .iter()
        .filter(|tag| wanted.contains(tag.id.as_str()))
        .cloned()
        .collect();

    let selected_groups = groups
        .iter()
        .filter(|group| group.tag_ids.iter().any(|id| wanted.contains(id.as_str())))
        .cloned()
        .collect();

    TagExport::new(selected_tags, selected_groups)
}

/// `tag_export_<YYYY-MM-DD_HH-MM-SS>.json`
pub fn export_file_name(at: &DateTime<Utc>) -> String {
    format!("tag_export_{}.json", at.format("%Y-%m-%d_%H-%M-%S"))
}

/// Write `export` as pretty JSON into `dir` and return the file path.
///
/// Files are opened create-new; when the timestamped name is taken a `_<n>`
/// suffix is appended, so an existing export is never overwritten.
pub async fn write_export_file(dir: &Path, export: &TagExport) -> StorageResult<PathBuf> {
    fs::create_dir_all(dir).await?;

    let json = export.to_json_pretty()?;
    let base = export_file_name(&export.exported_at);
    let stem = base.trim_end_matches(".json");

    for attempt in 0..MAX_NAME_ATTEMPTS {
        let name = if attempt == 0 {
            base.clone()
        } else {
            format!("{}_{}.json", stem, attempt)
        };
        let path = dir.join(name);

        let file = match OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => continue,
            Err(e) => return Err(e.into()),
        };

        write_or_discard(file, &path, json.as_bytes()).await?;

        info!(
            "✅ Exported {} tags and {} groups to {}",
            export.tags.len(),
            export.tag_groups.len(),
            path.display()
        );
        return Ok(path);
    }

    Err(StorageError::InvalidInput(format!(
        "no free export file name for {} in {}",
        base,
        dir.display()
    )))
}

/// Write the whole file or remove it, so no truncated export is left behind
async fn write_or_discard<W>(mut writer: W, path: &Path, contents: &[u8]) -> StorageResult<()>
where
    W: AsyncWrite + Unpin,
{
    let result = async {
        writer.write_all(contents).await?;
        writer.flush().await
    }
    .await;

    if let Err(e) = result {
        drop(writer);
        if let Err(remove_err) = fs::remove_file(path).await {
            warn!(
                "Failed to remove partial export {}: {}",
                path.display(),
                remove_err
            );
        }
        return Err(e.into());
    }

    Ok(())
}
