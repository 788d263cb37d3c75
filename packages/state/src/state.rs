// ABOUTME: Shared application state guarded by a single reader/writer lock
// ABOUTME: Writes go to the store first and reach the in-memory snapshot only on success

use std::collections::HashSet;
use std::path::{Path, PathBuf};

use bookmarker_config::Config;
use bookmarker_core::constants::DEFAULT_GROUP_NAME;
use bookmarker_core::{Bookmark, User};
use bookmarker_storage::{Database, DatabaseConfig, StorageResult};
use bookmarker_tags::{
    export, BookmarkStorage, ImportSummary, Tag, TagExport, TagGroup, TagStorage,
};
use tokio::sync::RwLock;
use tracing::{debug, info};

/// Bookmarks loaded into the snapshot on reload
const RECENT_BOOKMARKS: i64 = 100;

#[derive(Debug, Default)]
struct StateInner {
    bookmarks: Vec<Bookmark>,
    tags: Vec<Tag>,
    tag_groups: Vec<TagGroup>,
    current_user: Option<User>,
    current_page: String,
    search_query: String,
}

impl StateInner {
    fn upsert_tag(&mut self, tag: Tag) {
        match self.tags.iter_mut().find(|t| t.id == tag.id) {
            Some(existing) => *existing = tag,
            None => self.tags.push(tag),
        }
    }

    fn upsert_group(&mut self, group: TagGroup) {
        match self.tag_groups.iter_mut().find(|g| g.id == group.id) {
            Some(existing) => *existing = group,
            None => self.tag_groups.push(group),
        }
    }

    fn upsert_bookmark(&mut self, bookmark: Bookmark) {
        match self.bookmarks.iter_mut().find(|b| b.id == bookmark.id) {
            Some(existing) => *existing = bookmark,
            None => self.bookmarks.push(bookmark),
        }
    }

    /// Mirror the store's referential cleanup for deleted tags
    fn remove_tags(&mut self, ids: &HashSet<&str>) {
        self.tags.retain(|t| !ids.contains(t.id.as_str()));

        for tag in &mut self.tags {
            if tag
                .parent_id
                .as_deref()
                .is_some_and(|parent| ids.contains(parent))
            {
                tag.parent_id = None;
            }
        }

        for group in &mut self.tag_groups {
            group.tag_ids.retain(|id| !ids.contains(id.as_str()));
        }
    }
}

/// Application state shared between the UI and background tasks.
///
/// One lock guards the whole snapshot. Mutations hold the write lock across
/// the durable write, so readers never see a half-applied change.
pub struct AppState {
    inner: RwLock<StateInner>,
    tags: TagStorage,
    bookmarks: BookmarkStorage,
    export_dir: PathBuf,
}

impl AppState {
    /// Empty state over the given stores. Call [`AppState::reload`] to populate.
    pub fn new(tags: TagStorage, bookmarks: BookmarkStorage, export_dir: impl Into<PathBuf>) -> Self {
        Self {
            inner: RwLock::new(StateInner::default()),
            tags,
            bookmarks,
            export_dir: export_dir.into(),
        }
    }

    /// Open the configured database and load the snapshot
    pub async fn open(config: &Config) -> StorageResult<Self> {
        let db_config = DatabaseConfig {
            path: config.database_path.clone(),
            enable_wal: true,
            max_connections: config.db_max_connections,
            busy_timeout_seconds: config.db_busy_timeout_seconds,
        };
        let database = Database::connect(&db_config).await?;

        let state = Self::new(
            TagStorage::new(database.pool().clone()),
            BookmarkStorage::new(database.pool().clone()),
            config.export_dir.clone(),
        );
        state.reload().await?;

        info!("Application state ready");
        Ok(state)
    }

    pub fn export_dir(&self) -> &Path {
        &self.export_dir
    }

    pub fn tag_storage(&self) -> &TagStorage {
        &self.tags
    }

    /// Rebuild tags, groups and recent bookmarks from the store
    pub async fn reload(&self) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        self.load_tags(&mut inner).await?;
        self.load_bookmarks(&mut inner).await?;

        debug!(
            "Loaded {} tags, {} groups, {} bookmarks",
            inner.tags.len(),
            inner.tag_groups.len(),
            inner.bookmarks.len()
        );
        Ok(())
    }

    async fn load_tags(&self, inner: &mut StateInner) -> StorageResult<()> {
        let tags = self.tags.get_all_tags().await?;
        let tag_groups = self.tags.get_all_tag_groups().await?;
        inner.tags = tags;
        inner.tag_groups = tag_groups;
        Ok(())
    }

    /// Bookmarks carry tag names, so any tag rename or delete must reload them
    async fn load_bookmarks(&self, inner: &mut StateInner) -> StorageResult<()> {
        inner.bookmarks = self.bookmarks.get_recent_bookmarks(RECENT_BOOKMARKS).await?;
        Ok(())
    }

    // ---- tags ----

    pub async fn get_tags(&self) -> Vec<Tag> {
        self.inner.read().await.tags.clone()
    }

    pub async fn get_tag_groups(&self) -> Vec<TagGroup> {
        self.inner.read().await.tag_groups.clone()
    }

    /// Tags and groups read under one lock acquisition
    pub async fn tag_snapshot(&self) -> (Vec<Tag>, Vec<TagGroup>) {
        let inner = self.inner.read().await;
        (inner.tags.clone(), inner.tag_groups.clone())
    }

    /// Persist a tag, then replace or append it in the snapshot
    pub async fn save_tag(&self, tag: &Tag) -> StorageResult<Tag> {
        let mut inner = self.inner.write().await;
        let saved = self.tags.save_tag(tag).await?;
        inner.upsert_tag(saved.clone());
        self.load_bookmarks(&mut inner).await?;
        Ok(saved)
    }

    pub async fn delete_tag(&self, tag_id: &str) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        self.tags.delete_tag(tag_id).await?;
        inner.remove_tags(&HashSet::from([tag_id]));
        self.load_bookmarks(&mut inner).await?;
        Ok(())
    }

    /// Delete tags and strip them from every group, keeping remaining order
    pub async fn delete_tags(&self, tag_ids: &[String]) -> StorageResult<u64> {
        let mut inner = self.inner.write().await;
        let removed = self.tags.delete_tags(tag_ids).await?;

        let ids: HashSet<&str> = tag_ids.iter().map(String::as_str).collect();
        inner.remove_tags(&ids);
        self.load_bookmarks(&mut inner).await?;

        info!("Deleted {} tags", removed);
        Ok(removed)
    }

    pub async fn save_tag_group(&self, group: &TagGroup) -> StorageResult<TagGroup> {
        let mut inner = self.inner.write().await;
        let saved = self.tags.save_tag_group(group).await?;
        inner.upsert_group(saved.clone());
        Ok(saved)
    }

    pub async fn delete_tag_group(&self, group_id: &str) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        self.tags.delete_tag_group(group_id).await?;
        inner.tag_groups.retain(|g| g.id != group_id);
        Ok(())
    }

    /// Case-insensitive substring match on name or description.
    /// An empty query returns every tag.
    pub async fn search_tags(&self, query: &str) -> Vec<Tag> {
        let inner = self.inner.read().await;
        if query.is_empty() {
            return inner.tags.clone();
        }

        let needle = query.to_lowercase();
        inner
            .tags
            .iter()
            .filter(|t| {
                t.name.to_lowercase().contains(&needle)
                    || t.description.to_lowercase().contains(&needle)
            })
            .cloned()
            .collect()
    }

    /// Create one expanded group holding `tag_ids`, appended after existing groups
    pub async fn group_tags(&self, tag_ids: &[String]) -> StorageResult<TagGroup> {
        let mut inner = self.inner.write().await;

        let mut group = TagGroup::new(DEFAULT_GROUP_NAME, inner.tag_groups.len() as i64);
        group.tag_ids = tag_ids.to_vec();
        group.dedupe();

        let created = self.tags.create_tag_group(&group).await?;
        inner.tag_groups.push(created.clone());

        info!("Grouped {} tags into {}", created.tag_ids.len(), created.id);
        Ok(created)
    }

    /// Export the selected tags (and every group touching them) to a new file
    pub async fn export_tags(&self, tag_ids: &[String]) -> StorageResult<PathBuf> {
        let selection = {
            let inner = self.inner.read().await;
            export::select_for_export(&inner.tags, &inner.tag_groups, tag_ids)
        };
        export::write_export_file(&self.export_dir, &selection).await
    }

    /// Export every tag and group
    pub async fn export_all_tags(&self) -> StorageResult<PathBuf> {
        let selection = {
            let inner = self.inner.read().await;
            TagExport::new(inner.tags.clone(), inner.tag_groups.clone())
        };
        export::write_export_file(&self.export_dir, &selection).await
    }

    /// Replace all tags and groups, then rebuild the snapshot from the store
    pub async fn import_tags(&self, export: &TagExport) -> StorageResult<ImportSummary> {
        let mut inner = self.inner.write().await;
        let summary = self.tags.import_tags(export).await?;
        self.load_tags(&mut inner).await?;
        self.load_bookmarks(&mut inner).await?;
        Ok(summary)
    }

    pub async fn import_tags_from_file(&self, path: &Path) -> StorageResult<ImportSummary> {
        let export = TagExport::read_from_file(path).await?;
        self.import_tags(&export).await
    }

    // ---- bookmarks ----

    pub async fn get_bookmarks(&self) -> Vec<Bookmark> {
        self.inner.read().await.bookmarks.clone()
    }

    /// Persist a bookmark and refresh tags, whose links and stats may have changed
    pub async fn save_bookmark(&self, bookmark: &Bookmark) -> StorageResult<Bookmark> {
        let mut inner = self.inner.write().await;
        let saved = self.bookmarks.save_bookmark(bookmark).await?;
        inner.upsert_bookmark(saved.clone());
        self.load_tags(&mut inner).await?;
        Ok(saved)
    }

    pub async fn delete_bookmark(&self, bookmark_id: &str) -> StorageResult<()> {
        let mut inner = self.inner.write().await;
        self.bookmarks.delete_bookmark(bookmark_id).await?;
        inner.bookmarks.retain(|b| b.id != bookmark_id);
        self.load_tags(&mut inner).await?;
        Ok(())
    }

    pub async fn search_bookmarks(&self, query: &str) -> StorageResult<Vec<Bookmark>> {
        self.bookmarks.search_bookmarks(query).await
    }

    // ---- session ----

    pub async fn current_user(&self) -> Option<User> {
        self.inner.read().await.current_user.clone()
    }

    pub async fn save_user(&self, user: User) {
        self.inner.write().await.current_user = Some(user);
    }

    /// Forget the user and drop the whole snapshot. Stored data is untouched.
    pub async fn logout(&self) {
        let mut inner = self.inner.write().await;
        *inner = StateInner::default();
        info!("Logged out");
    }

    pub async fn current_page(&self) -> String {
        self.inner.read().await.current_page.clone()
    }

    pub async fn set_current_page(&self, page: impl Into<String>) {
        self.inner.write().await.current_page = page.into();
    }

    pub async fn search_query(&self) -> String {
        self.inner.read().await.search_query.clone()
    }

    pub async fn set_search_query(&self, query: impl Into<String>) {
        self.inner.write().await.search_query = query.into();
    }
}
