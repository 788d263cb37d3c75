// ABOUTME: Bookmark storage and the bookmark-to-tag association
// ABOUTME: Reconciles tag names with tag ids and keeps tag usage stats in step with links

use std::collections::HashSet;

use bookmarker_core::constants::DEFAULT_TAG_COLOR;
use bookmarker_core::{timestamp, Bookmark};
use bookmarker_storage::{StorageError, StorageResult};
use sqlx::sqlite::SqliteRow;
use sqlx::{Row, SqliteConnection, SqlitePool};
use tracing::debug;

use crate::storage::{apply_usage, fetch_tag_by_name, insert_tag, parse_timestamp};
use crate::types::{Tag, UsageOperation};

const BOOKMARK_COLUMNS: &str = "b.id, b.user_id, b.url, b.title, b.description, b.image_url, \
     b.favicon_url, b.is_favorite, b.created_at, b.updated_at";

#[derive(Clone)]
pub struct BookmarkStorage {
    pool: SqlitePool,
}

impl BookmarkStorage {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert or replace a bookmark and relink its tags by name.
    ///
    /// Unknown names become new tags. Tags gaining the bookmark record an
    /// `Add`, tags losing it record a `Remove`.
    pub async fn save_bookmark(&self, bookmark: &Bookmark) -> StorageResult<Bookmark> {
        debug!("Saving bookmark: {} ({})", bookmark.id, bookmark.url);

        let mut tx = self.pool.begin().await?;
        save_in_tx(&mut tx, bookmark)
            .await
            .map_err(|e| e.in_transaction("save_bookmark"))?;
        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("save_bookmark"))?;

        self.get_bookmark(&bookmark.id).await
    }

    pub async fn get_bookmark(&self, bookmark_id: &str) -> StorageResult<Bookmark> {
        debug!("Fetching bookmark: {}", bookmark_id);

        let mut conn = self.pool.acquire().await?;
        let query = format!("SELECT {} FROM bookmarks b WHERE b.id = ?", BOOKMARK_COLUMNS);
        let row = sqlx::query(&query)
            .bind(bookmark_id)
            .fetch_optional(&mut *conn)
            .await?
            .ok_or_else(|| StorageError::NotFound(format!("bookmark '{}'", bookmark_id)))?;

        let tags = tag_names(&mut conn, bookmark_id).await?;
        row_to_bookmark(&row, tags)
    }

    /// Most recently created bookmarks first
    pub async fn get_recent_bookmarks(&self, limit: i64) -> StorageResult<Vec<Bookmark>> {
        debug!("Fetching {} recent bookmarks", limit);

        let query = format!(
            "SELECT {} FROM bookmarks b ORDER BY b.created_at DESC, b.id LIMIT ?",
            BOOKMARK_COLUMNS
        );
        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&query).bind(limit).fetch_all(&mut *conn).await?;

        load_bookmarks(&mut conn, rows).await
    }

    /// Substring match on title, description, URL, or any tag name
    pub async fn search_bookmarks(&self, query: &str) -> StorageResult<Vec<Bookmark>> {
        debug!("Searching bookmarks: {}", query);

        let pattern = format!("%{}%", escape_like(query));
        let sql = format!(
            r#"
            SELECT {} FROM bookmarks b
            WHERE b.title LIKE ? ESCAPE '\' OR b.description LIKE ? ESCAPE '\'
               OR b.url LIKE ? ESCAPE '\'
               OR EXISTS (
                   SELECT 1 FROM bookmark_tags bt JOIN tags t ON t.id = bt.tag_id
                   WHERE bt.bookmark_id = b.id AND t.name LIKE ? ESCAPE '\'
               )
            ORDER BY b.updated_at DESC, b.id
            "#,
            BOOKMARK_COLUMNS
        );

        let mut conn = self.pool.acquire().await?;
        let rows = sqlx::query(&sql)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .bind(&pattern)
            .fetch_all(&mut *conn)
            .await?;

        load_bookmarks(&mut conn, rows).await
    }

    /// Delete a bookmark and release its tags
    pub async fn delete_bookmark(&self, bookmark_id: &str) -> StorageResult<()> {
        debug!("Deleting bookmark: {}", bookmark_id);

        let mut tx = self.pool.begin().await?;
        let tag_ids = linked_tag_ids(&mut tx, bookmark_id)
            .await
            .map_err(|e| e.in_transaction("delete_bookmark"))?;

        let result = sqlx::query("DELETE FROM bookmarks WHERE id = ?")
            .bind(bookmark_id)
            .execute(&mut *tx)
            .await
            .map_err(|e| StorageError::from(e).in_transaction("delete_bookmark"))?;
        if result.rows_affected() == 0 {
            return Err(StorageError::NotFound(format!("bookmark '{}'", bookmark_id)));
        }

        let now = timestamp::now();
        for tag_id in &tag_ids {
            apply_usage(&mut tx, tag_id, UsageOperation::Remove, now)
                .await
                .map_err(|e| e.in_transaction("delete_bookmark"))?;
        }

        tx.commit()
            .await
            .map_err(|e| StorageError::from(e).in_transaction("delete_bookmark"))?;

        Ok(())
    }
}

async fn save_in_tx(conn: &mut SqliteConnection, bookmark: &Bookmark) -> StorageResult<()> {
    let now = timestamp::now();
    let previous: HashSet<String> = linked_tag_ids(conn, &bookmark.id).await?.into_iter().collect();

    sqlx::query(
        r#"
        INSERT INTO bookmarks (id, user_id, url, title, description, image_url, favicon_url,
                               is_favorite, created_at, updated_at)
        VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?)
        ON CONFLICT(id) DO UPDATE SET
            user_id = excluded.user_id,
            url = excluded.url,
            title = excluded.title,
            description = excluded.description,
            image_url = excluded.image_url,
            favicon_url = excluded.favicon_url,
            is_favorite = excluded.is_favorite,
            updated_at = excluded.updated_at
        "#,
    )
    .bind(&bookmark.id)
    .bind(&bookmark.user_id)
    .bind(&bookmark.url)
    .bind(&bookmark.title)
    .bind(&bookmark.description)
    .bind(&bookmark.image_url)
    .bind(&bookmark.favicon_url)
    .bind(bookmark.is_favorite)
    .bind(timestamp::format(&bookmark.created_at))
    .bind(timestamp::format(&now))
    .execute(&mut *conn)
    .await?;

    let mut current: Vec<String> = Vec::new();
    for name in bookmark.tags.iter().map(|n| n.trim()).filter(|n| !n.is_empty()) {
        let tag_id = match fetch_tag_by_name(conn, name).await? {
            Some(tag) => tag.id,
            None => {
                let tag = Tag::new(name, DEFAULT_TAG_COLOR);
                debug!("Creating tag '{}' for bookmark {}", name, bookmark.id);
                insert_tag(conn, &tag).await?;
                tag.id
            }
        };
        if !current.contains(&tag_id) {
            current.push(tag_id);
        }
    }

    sqlx::query("DELETE FROM bookmark_tags WHERE bookmark_id = ?")
        .bind(&bookmark.id)
        .execute(&mut *conn)
        .await?;

    for tag_id in &current {
        sqlx::query("INSERT INTO bookmark_tags (bookmark_id, tag_id, created_at) VALUES (?, ?, ?)")
            .bind(&bookmark.id)
            .bind(tag_id)
            .bind(timestamp::format(&now))
            .execute(&mut *conn)
            .await?;

        if !previous.contains(tag_id) {
            apply_usage(conn, tag_id, UsageOperation::Add, now).await?;
        }
    }

    for tag_id in previous.iter().filter(|id| !current.contains(*id)) {
        apply_usage(conn, tag_id, UsageOperation::Remove, now).await?;
    }

    Ok(())
}

/// Make `%`, `_` and the escape character match literally
fn escape_like(query: &str) -> String {
    let mut escaped = String::with_capacity(query.len());
    for c in query.chars() {
        if matches!(c, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(c);
    }
    escaped
}

async fn linked_tag_ids(conn: &mut SqliteConnection, bookmark_id: &str) -> StorageResult<Vec<String>> {
    let ids = sqlx::query_scalar("SELECT tag_id FROM bookmark_tags WHERE bookmark_id = ?")
        .bind(bookmark_id)
        .fetch_all(&mut *conn)
        .await?;
    Ok(ids)
}

async fn tag_names(conn: &mut SqliteConnection, bookmark_id: &str) -> StorageResult<Vec<String>> {
    let names = sqlx::query_scalar(
        r#"
        SELECT t.name FROM bookmark_tags bt
        JOIN tags t ON t.id = bt.tag_id
        WHERE bt.bookmark_id = ?
        ORDER BY t.name
        "#,
    )
    .bind(bookmark_id)
    .fetch_all(&mut *conn)
    .await?;
    Ok(names)
}

async fn load_bookmarks(
    conn: &mut SqliteConnection,
    rows: Vec<SqliteRow>,
) -> StorageResult<Vec<Bookmark>> {
    let mut bookmarks = Vec::with_capacity(rows.len());
    for row in &rows {
        let id: String = row.try_get("id")?;
        let tags = tag_names(conn, &id).await?;
        bookmarks.push(row_to_bookmark(row, tags)?);
    }
    Ok(bookmarks)
}

fn row_to_bookmark(row: &SqliteRow, tags: Vec<String>) -> StorageResult<Bookmark> {
    let created_at: String = row.try_get("created_at")?;
    let updated_at: String = row.try_get("updated_at")?;

    Ok(Bookmark {
        id: row.try_get("id")?,
        user_id: row.try_get("user_id")?,
        url: row.try_get("url")?,
        title: row.try_get("title")?,
        description: row.try_get("description")?,
        image_url: row.try_get("image_url")?,
        favicon_url: row.try_get("favicon_url")?,
        is_favorite: row.try_get("is_favorite")?,
        tags,
        created_at: parse_timestamp(&created_at)?,
        updated_at: parse_timestamp(&updated_at)?,
    })
}
