// ABOUTME: Tag storage layer using SQLite
// ABOUTME: CRUD for tags and tag groups, hierarchy queries, usage stats, and transactional import/export

use std::collections::{HashMap, HashSet};

use bookmarker_core::timestamp;
use bookmarker_storage::{StorageError, StorageResult};
use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::{debug, info, warn};

use crate::export::TagExport;
use crate::types::{Tag, TagGroup, TagStats, UsageOperation};
use crate::validation::validate_hierarchy;

const TAG_SELECT: &str = r#"
    SELECT t.id, t.name, t.color, t.description, t.parent_id, t.tag_order,
           t.created_at, t.updated_at, t.usage_stats,
           (SELECT COUNT(*) FROM bookmark_tags bt WHERE bt.tag_id = t.id) AS bookmark_count
    FROM tags t
"#;

/// Outcome of a full-replace import
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ImportSummary {
    pub tags_imported: usize,
    pub groups_imported: usize,
    /// Group members dropped because their tag was not part of the import
    pub memberships_dropped: usize,
    /// Bookmark links re-attached to an imported tag with the same id or name
    pub associations_restored: usize,
}

#[derive(Clone)]
pub struct TagStorage {
    pool: SqlitePool,
}

impl TagStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }

    // ---- tags ----

    /// Insert a new tag. Duplicate ids or names are constraint violations.
    pub async fn create_tag(&self, tag: &Tag) -> StorageResult<Tag> {
        debug!("Creating tag: {} (name: {})", tag.id, tag.name);

        let mut tag = tag.clone();
        tag.normalize();

        let mut tx = self.pool.begin().await?;
        check_parent(&mut tx, &tag.id, tag.parent_id.as_deref())
            .await
            .map_err(|e| e.in_transaction("create_tag"))?;
        insert_tag(&mut tx, &tag)
            .await
            .map_err(|e| e.in_transaction("create_tag"))?;
        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("create_tag"))?;

        self.get_tag(&tag.id).await
    }

    /// Get a single tag by ID
    pub async fn get_tag(&self, tag_id: &str) -> StorageResult<Tag> {
        debug!("Fetching tag: {}", tag_id);

        let mut conn = self.pool.acquire().await?;
        fetch_tag(&mut conn, tag_id)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("tag '{}'", tag_id)))
    }

    /// Get a tag by its unique name
    pub async fn get_tag_by_name(&self, name: &str) -> StorageResult<Option<Tag>> {
        debug!("Fetching tag by name: {}", name);

        let mut conn = self.pool.acquire().await?;
        fetch_tag_by_name(&mut conn, name).await
    }

    /// Replace every mutable field of an existing tag
    pub async fn update_tag(&self, tag: &Tag) -> StorageResult<Tag> {
        debug!("Updating tag: {}", tag.id);

        let mut tag = tag.clone();
        tag.normalize();
        tag.updated_at = timestamp::now();
        let usage_stats = serde_json::to_string(&tag.usage_stats)?;

        let mut tx = self.pool.begin().await?;
        check_parent(&mut tx, &tag.id, tag.parent_id.as_deref())
            .await
            .map_err(|e| e.in_transaction("update_tag"))?;

        let result = sqlx::query(
            r#"
            UPDATE tags
            SET name = ?, color = ?, description = ?, parent_id = ?, tag_order = ?,
                updated_at = ?, usage_stats = ?
            WHERE id = ?
            "#,
        )
        .bind(&tag.name)
        .bind(&tag.color)
        .bind(&tag.description)
        .bind(&tag.parent_id)
        .bind(tag.order)
        .bind(timestamp::format(&tag.updated_at))
        .bind(&usage_stats)
        .bind(&tag.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).in_transaction("update_tag"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("tag '{}'", tag.id)));
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("update_tag"))?;

        self.get_tag(&tag.id).await
    }

    /// Insert or replace by id. `created_at` of an existing row is kept.
    pub async fn save_tag(&self, tag: &Tag) -> StorageResult<Tag> {
        debug!("Saving tag: {} (name: {})", tag.id, tag.name);

        let mut tag = tag.clone();
        tag.normalize();
        tag.updated_at = timestamp::now();
        let usage_stats = serde_json::to_string(&tag.usage_stats)?;

        let mut tx = self.pool.begin().await?;
        check_parent(&mut tx, &tag.id, tag.parent_id.as_deref())
            .await
            .map_err(|e| e.in_transaction("save_tag"))?;

        sqlx::query(
            r#"
            INSERT INTO tags (id, name, color, description, parent_id, tag_order,
                              created_at, updated_at, usage_stats)
            VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                color = excluded.color,
                description = excluded.description,
                parent_id = excluded.parent_id,
                tag_order = excluded.tag_order,
                updated_at = excluded.updated_at,
                usage_stats = excluded.usage_stats
            "#,
        )
        .bind(&tag.id)
        .bind(&tag.name)
        .bind(&tag.color)
        .bind(&tag.description)
        .bind(&tag.parent_id)
        .bind(tag.order)
        .bind(timestamp::format(&tag.created_at))
        .bind(timestamp::format(&tag.updated_at))
        .bind(&usage_stats)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).in_transaction("save_tag"))?;

        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("save_tag"))?;

        self.get_tag(&tag.id).await
    }

    /// Delete a tag. Children become roots and memberships cascade.
    pub async fn delete_tag(&self, tag_id: &str) -> StorageResult<()> {
        debug!("Deleting tag: {}", tag_id);

        let result = sqlx::query("DELETE FROM tags WHERE id = ?")
            .bind(tag_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("tag '{}'", tag_id)));
        }

        Ok(())
    }

    /// Delete several tags atomically. Unknown ids are ignored.
    pub async fn delete_tags(&self, tag_ids: &[String]) -> StorageResult<u64> {
        debug!("Deleting {} tags", tag_ids.len());

        let mut tx = self.pool.begin().await?;
        let mut removed = 0;

        for tag_id in tag_ids {
            let result = sqlx::query("DELETE FROM tags WHERE id = ?")
                .bind(tag_id)
                .execute(&mut *tx)
                .await
                .map_err(|e| StorageError::from(e).in_transaction("delete_tags"))?;
            removed += result.rows_affected();
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("delete_tags"))?;

        Ok(removed)
    }

    /// Direct children of `parent_id`, or root tags for `None`
    pub async fn get_tags_by_parent(&self, parent_id: Option<&str>) -> StorageResult<Vec<Tag>> {
        debug!("Fetching tags by parent: {:?}", parent_id);

        let query = format!("{} WHERE t.parent_id IS ? ORDER BY t.tag_order, t.name", TAG_SELECT);
        let rows = sqlx::query(&query)
            .bind(parent_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_tag).collect()
    }

    pub async fn get_all_tags(&self) -> StorageResult<Vec<Tag>> {
        debug!("Fetching all tags");

        let mut conn = self.pool.acquire().await?;
        fetch_all_tags(&mut conn).await
    }

    /// Tags linked to a bookmark, by name
    pub async fn get_tags_for_bookmark(&self, bookmark_id: &str) -> StorageResult<Vec<Tag>> {
        debug!("Fetching tags for bookmark: {}", bookmark_id);

        let query = format!(
            "{} JOIN bookmark_tags link ON link.tag_id = t.id WHERE link.bookmark_id = ? ORDER BY t.name",
            TAG_SELECT
        );
        let rows = sqlx::query(&query)
            .bind(bookmark_id)
            .fetch_all(&self.pool)
            .await?;

        rows.iter().map(row_to_tag).collect()
    }

    /// Record a usage event against a tag and return the updated tag
    pub async fn record_usage(&self, tag_id: &str, operation: UsageOperation) -> StorageResult<Tag> {
        debug!("Recording {:?} for tag: {}", operation, tag_id);

        let mut tx = self.pool.begin().await?;
        apply_usage(&mut tx, tag_id, operation, timestamp::now())
            .await
            .map_err(|e| e.in_transaction("record_usage"))?;
        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("record_usage"))?;

        self.get_tag(tag_id).await
    }

    // ---- tag groups ----

    pub async fn create_tag_group(&self, group: &TagGroup) -> StorageResult<TagGroup> {
        debug!("Creating tag group: {} (name: {})", group.id, group.name);

        let mut group = group.clone();
        group.dedupe();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            "INSERT INTO tag_groups (id, name, group_order, expanded) VALUES (?, ?, ?, ?)",
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(group.order)
        .bind(group.expanded)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).in_transaction("create_tag_group"))?;

        write_members(&mut tx, &group.id, &group.tag_ids)
            .await
            .map_err(|e| e.in_transaction("create_tag_group"))?;
        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("create_tag_group"))?;

        Ok(group)
    }

    pub async fn get_tag_group(&self, group_id: &str) -> StorageResult<TagGroup> {
        debug!("Fetching tag group: {}", group_id);

        let row = sqlx::query("SELECT id, name, group_order, expanded FROM tag_groups WHERE id = ?")
            .bind(group_id)
            .fetch_optional(&self.pool)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("tag group '{}'", group_id)))?;

        let tag_ids: Vec<String> = sqlx::query_scalar(
            "SELECT tag_id FROM tag_group_members WHERE group_id = ? ORDER BY position",
        )
        .bind(group_id)
        .fetch_all(&self.pool)
        .await?;

        row_to_group(&row, tag_ids)
    }

    pub async fn update_tag_group(&self, group: &TagGroup) -> StorageResult<TagGroup> {
        debug!("Updating tag group: {}", group.id);

        let mut group = group.clone();
        group.dedupe();

        let mut tx = self.pool.begin().await?;
        let result = sqlx::query(
            "UPDATE tag_groups SET name = ?, group_order = ?, expanded = ? WHERE id = ?",
        )
        .bind(&group.name)
        .bind(group.order)
        .bind(group.expanded)
        .bind(&group.id)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).in_transaction("update_tag_group"))?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("tag group '{}'", group.id)));
        }

        write_members(&mut tx, &group.id, &group.tag_ids)
            .await
            .map_err(|e| e.in_transaction("update_tag_group"))?;
        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("update_tag_group"))?;

        Ok(group)
    }

    /// Insert or replace a group and its membership list
    pub async fn save_tag_group(&self, group: &TagGroup) -> StorageResult<TagGroup> {
        debug!("Saving tag group: {} (name: {})", group.id, group.name);

        let mut group = group.clone();
        group.dedupe();

        let mut tx = self.pool.begin().await?;
        sqlx::query(
            r#"
            INSERT INTO tag_groups (id, name, group_order, expanded)
            VALUES (?, ?, ?, ?)
            ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                group_order = excluded.group_order,
                expanded = excluded.expanded
            "#,
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(group.order)
        .bind(group.expanded)
        .execute(&mut *tx)
        .await
        .map_err(|e| StorageError::from(e).in_transaction("save_tag_group"))?;

        write_members(&mut tx, &group.id, &group.tag_ids)
            .await
            .map_err(|e| e.in_transaction("save_tag_group"))?;
        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("save_tag_group"))?;

        Ok(group)
    }

    /// Delete a group. Member tags are untouched.
    pub async fn delete_tag_group(&self, group_id: &str) -> StorageResult<()> {
        debug!("Deleting tag group: {}", group_id);

        let result = sqlx::query("DELETE FROM tag_groups WHERE id = ?")
            .bind(group_id)
            .execute(&self.pool)
            .await?;

        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("tag group '{}'", group_id)));
        }

        Ok(())
    }

    pub async fn get_all_tag_groups(&self) -> StorageResult<Vec<TagGroup>> {
        debug!("Fetching all tag groups");

        let mut conn = self.pool.acquire().await?;
        fetch_all_groups(&mut conn).await
    }

    // ---- import / export ----

    /// Snapshot every tag and group from one read transaction
    pub async fn export_tags(&self) -> StorageResult<TagExport> {
        let mut tx = self.pool.begin().await?;
        let tags = fetch_all_tags(&mut tx)
            .await
            .map_err(|e| e.in_transaction("export_tags"))?;
        let tag_groups = fetch_all_groups(&mut tx)
            .await
            .map_err(|e| e.in_transaction("export_tags"))?;
        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("export_tags"))?;

        info!("Exporting {} tags and {} groups", tags.len(), tag_groups.len());
        Ok(TagExport::new(tags, tag_groups))
    }

    /// Replace all tags and groups with the contents of `export`.
    ///
    /// Runs in one transaction: on any failure the previous tags, groups and
    /// bookmark links are left as they were.
    pub async fn import_tags(&self, export: &TagExport) -> StorageResult<ImportSummary> {
        info!(
            "Importing {} tags and {} groups (format version {})",
            export.tags.len(),
            export.tag_groups.len(),
            export.version
        );

        let mut tags = export.tags.clone();
        for tag in &mut tags {
            tag.normalize();
        }
        validate_hierarchy(&tags)?;

        let mut tx = self.pool.begin().await?;
        let summary = replace_all(&mut tx, &tags, &export.tag_groups)
            .await
            .map_err(|e| e.in_transaction("import_tags"))?;
        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("import_tags"))?;

        info!(
            "✅ Imported {} tags and {} groups ({} memberships dropped, {} bookmark links restored)",
            summary.tags_imported,
            summary.groups_imported,
            summary.memberships_dropped,
            summary.associations_restored
        );
        Ok(summary)
    }
}

async fn replace_all(
    conn: &mut SqliteConnection,
    tags: &[Tag],
    groups: &[TagGroup],
) -> StorageResult<ImportSummary> {
    let links: Vec<(String, String, String)> =
        sqlx::query_as("SELECT bookmark_id, tag_id, created_at FROM bookmark_tags")
            .fetch_all(&mut *conn)
            .await?;
    let previous_names: HashMap<String, String> = sqlx::query_as("SELECT id, name FROM tags")
        .fetch_all(&mut *conn)
        .await?
        .into_iter()
        .collect();

    sqlx::query("DELETE FROM tag_groups")
        .execute(&mut *conn)
        .await?;
    sqlx::query("DELETE FROM tags").execute(&mut *conn).await?;

    let mut summary = ImportSummary::default();

    for tag in tags {
        insert_tag(conn, tag).await?;
        summary.tags_imported += 1;
    }

    let known: HashSet<&str> = tags.iter().map(|t| t.id.as_str()).collect();

    for group in groups {
        let mut group = group.clone();
        group.dedupe();

        let before = group.tag_ids.len();
        group.tag_ids.retain(|id| known.contains(id.as_str()));
        let dropped = before - group.tag_ids.len();
        if dropped > 0 {
            warn!(
                "Group '{}' references {} tags missing from the import; dropping them",
                group.id, dropped
            );
            summary.memberships_dropped += dropped;
        }

        sqlx::query(
            "INSERT INTO tag_groups (id, name, group_order, expanded) VALUES (?, ?, ?, ?)",
        )
        .bind(&group.id)
        .bind(&group.name)
        .bind(group.order)
        .bind(group.expanded)
        .execute(&mut *conn)
        .await?;
        write_members(conn, &group.id, &group.tag_ids).await?;
        summary.groups_imported += 1;
    }

    // Ids differ between installs; bookmarks link by name, so fall back to it
    let imported_by_name: HashMap<&str, &str> = tags
        .iter()
        .map(|t| (t.name.as_str(), t.id.as_str()))
        .collect();

    for (bookmark_id, tag_id, created_at) in &links {
        let target = if known.contains(tag_id.as_str()) {
            Some(tag_id.as_str())
        } else {
            previous_names
                .get(tag_id)
                .and_then(|name| imported_by_name.get(name.as_str()).copied())
        };
        let Some(target) = target else {
            continue;
        };

        let result = sqlx::query(
            "INSERT OR IGNORE INTO bookmark_tags (bookmark_id, tag_id, created_at) VALUES (?, ?, ?)",
        )
        .bind(bookmark_id)
        .bind(target)
        .bind(created_at)
        .execute(&mut *conn)
        .await?;
        summary.associations_restored += result.rows_affected() as usize;
    }

    Ok(summary)
}

/// Reject a parent that is missing, the tag itself, or one of its descendants
pub(crate) async fn check_parent(
    conn: &mut SqliteConnection,
    tag_id: &str,
    parent_id: Option<&str>,
) -> StorageResult<()> {
    let Some(parent_id) = parent_id else {
        return Ok(());
    };

    if parent_id == tag_id {
        return Err(StorageError::Validation(format!(
            "tag '{}' is its own parent",
            tag_id
        )));
    }

    let exists: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM tags WHERE id = ?")
        .bind(parent_id)
        .fetch_one(&mut *conn)
        .await?;
    if exists == 0 {
        return Err(StorageError::Validation(format!(
            "tag '{}' references missing parent '{}'",
            tag_id, parent_id
        )));
    }

    // Walk up from the proposed parent; meeting the tag itself means a cycle
    let cycle: i64 = sqlx::query_scalar(
        r#"
        WITH RECURSIVE ancestors(id) AS (
            SELECT ?
            UNION
            SELECT t.parent_id FROM tags t
            JOIN ancestors a ON t.id = a.id
            WHERE t.parent_id IS NOT NULL
        )
        SELECT COUNT(*) FROM ancestors WHERE id = ?
        "#,
    )
    .bind(parent_id)
    .bind(tag_id)
    .fetch_one(&mut *conn)
    .await?;

    if cycle > 0 {
        return Err(StorageError::Validation(format!(
            "making '{}' the parent of '{}' would create a cycle",
            parent_id, tag_id
        )));
    }

    Ok(())
}

pub(crate) async fn insert_tag(conn: &mut SqliteConnection, tag: &Tag) -> StorageResult<()> {
    let usage_stats = serde_json::to_string(&tag.usage_stats.normalized())?;

    sqlx::query(
        r#"
        INSERT INTO tags (id, name, color, description, parent_id, tag_order,
                          created_at, updated_at, usage_stats)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?)
        "#,
    )
    .bind(&tag.id)
    .bind(&tag.name)
    .bind(&tag.color)
    .bind(&tag.description)
    .bind(&tag.parent_id)
    .bind(tag.order)
    .bind(timestamp::format(&tag.created_at))
    .bind(timestamp::format(&tag.updated_at))
    .bind(&usage_stats)
    .execute(&mut *conn)
    .await?;

    Ok(())
}

async fn fetch_all_tags(conn: &mut SqliteConnection) -> StorageResult<Vec<Tag>> {
    let query = format!("{} ORDER BY t.tag_order, t.name", TAG_SELECT);
    let rows = sqlx::query(&query).fetch_all(&mut *conn).await?;

    rows.iter().map(row_to_tag).collect()
}

async fn fetch_all_groups(conn: &mut SqliteConnection) -> StorageResult<Vec<TagGroup>> {
    let rows = sqlx::query(
        "SELECT id, name, group_order, expanded FROM tag_groups ORDER BY group_order, name",
    )
    .fetch_all(&mut *conn)
    .await?;

    let member_rows: Vec<(String, String)> = sqlx::query_as(
        "SELECT group_id, tag_id FROM tag_group_members ORDER BY group_id, position",
    )
    .fetch_all(&mut *conn)
    .await?;

    let mut members: HashMap<String, Vec<String>> = HashMap::new();
    for (group_id, tag_id) in member_rows {
        members.entry(group_id).or_default().push(tag_id);
    }

    rows.iter()
        .map(|row| {
            let id: String = row.try_get("id")?;
            let tag_ids = members.remove(&id).unwrap_or_default();
            row_to_group(row, tag_ids)
        })
        .collect()
}

pub(crate) async fn fetch_tag(conn: &mut SqliteConnection, tag_id: &str) -> StorageResult<Option<Tag>> {
    let query = format!("{} WHERE t.id = ?", TAG_SELECT);
    let row = sqlx::query(&query)
        .bind(tag_id)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(row_to_tag).transpose()
}

pub(crate) async fn fetch_tag_by_name(
    conn: &mut SqliteConnection,
    name: &str,
) -> StorageResult<Option<Tag>> {
    let query = format!("{} WHERE t.name = ?", TAG_SELECT);
    let row = sqlx::query(&query)
        .bind(name)
        .fetch_optional(&mut *conn)
        .await?;

    row.as_ref().map(row_to_tag).transpose()
}

/// Update a tag's usage counters in place
pub(crate) async fn apply_usage(
    conn: &mut SqliteConnection,
    tag_id: &str,
    operation: UsageOperation,
    at: DateTime<Utc>,
) -> StorageResult<()> {
    let raw: Option<String> = sqlx::query_scalar("SELECT usage_stats FROM tags WHERE id = ?")
        .bind(tag_id)
        .fetch_optional(&mut *conn)
        .await?;
    let raw = raw.ok_or_else(|| StorageError::NotFound(format!("tag '{}'", tag_id)))?;

    let mut stats = parse_stats(&raw)?;
    stats.record(operation, at);

    sqlx::query("UPDATE tags SET usage_stats = ?, updated_at = ? WHERE id = ?")
        .bind(serde_json::to_string(&stats)?)
        .bind(timestamp::format(&at))
        .bind(tag_id)
        .execute(&mut *conn)
        .await?;

    Ok(())
}

async fn write_members(
    conn: &mut SqliteConnection,
    group_id: &str,
    tag_ids: &[String],
) -> StorageResult<()> {
    sqlx::query("DELETE FROM tag_group_members WHERE group_id = ?")
        .bind(group_id)
        .execute(&mut *conn)
        .await?;

    for (position, tag_id) in tag_ids.iter().enumerate() {
        sqlx::query("INSERT INTO tag_group_members (group_id, tag_id, position) VALUES (?, ?, ?)")
            .bind(group_id)
            .bind(tag_id)
            .bind(position as i64)
            .execute(&mut *conn)
            .await?;
    }

    Ok(())
}

pub(crate) fn parse_timestamp(value: &str) -> StorageResult<DateTime<Utc>> {
    timestamp::parse(value)
        .map_err(|e| StorageError::InvalidTimestamp(format!("'{}': {}", value, e)))
}

fn parse_stats(raw: &str) -> StorageResult<TagStats> {
    if raw.trim().is_empty() {
        return Ok(TagStats::default());
    }
    let stats: TagStats = serde_json::from_str(raw)?;
    Ok(stats.normalized())
}

fn row_to_tag(row: &SqliteRow) -> StorageResult<Tag> {
    let parent_id: Option<String> = row.try_get("parent_id")?;
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;
    let usage_stats: String = row.try_get("usage_stats")?;

    Ok(Tag {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        color: row.try_get("color")?,
        description: row.try_get("description")?,
        parent_id: parent_id.filter(|p| !p.is_empty()),
        order: row.try_get("tag_order")?,
        count: row.try_get("bookmark_count")?,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
        usage_stats: parse_stats(&usage_stats)?,
    })
}

fn row_to_group(row: &SqliteRow, tag_ids: Vec<String>) -> StorageResult<TagGroup> {
    Ok(TagGroup {
        id: row.try_get("id")?,
        name: row.try_get("name")?,
        tag_ids,
        order: row.try_get("group_order")?,
        expanded: row.try_get("expanded")?,
    })
}
