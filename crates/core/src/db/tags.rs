//! Tag storage and association.
//!
//! Tags are a shared vocabulary: names are globally unique, normalized to
//! trimmed lowercase, created implicitly on first use, and never deleted
//! when their last bookmark reference goes away.

use std::collections::BTreeMap;

use super::bookmarks::{Bookmark, load_tags, row_to_bookmark_at};
use super::connection::Db;
use crate::Error;
use serde::Serialize;
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// A stored tag.
#[derive(Debug, Clone, Serialize)]
pub struct Tag {
    pub id: i64,
    pub name: String,
    pub created_at: String,
}

/// Normalize a tag name: trim whitespace, lowercase.
///
/// Returns None for names that are empty after trimming; those are
/// silently skipped rather than stored.
pub fn normalize_tag(name: &str) -> Option<String> {
    let normalized = name.trim().to_lowercase();
    if normalized.is_empty() { None } else { Some(normalized) }
}

/// Get or create a tag row by its already-normalized name.
pub(crate) fn get_or_create(conn: &rusqlite::Connection, name: &str) -> rusqlite::Result<i64> {
    conn.execute(
        "INSERT OR IGNORE INTO tags (name, created_at) VALUES (?1, ?2)",
        params![name, chrono::Utc::now().to_rfc3339()],
    )?;
    conn.query_row("SELECT id FROM tags WHERE name = ?1", params![name], |row| row.get(0))
}

/// Replace a bookmark's tag set with the given names.
///
/// Names are normalized; empty ones are skipped. Runs within whatever
/// transaction the caller holds, so the association update is atomic with
/// the bookmark write.
pub(crate) fn replace_tags(conn: &rusqlite::Connection, bookmark_id: i64, names: &[String]) -> rusqlite::Result<()> {
    conn.execute("DELETE FROM bookmark_tags WHERE bookmark_id = ?1", params![bookmark_id])?;
    for name in names {
        let Some(name) = normalize_tag(name) else { continue };
        let tag_id = get_or_create(conn, &name)?;
        conn.execute(
            "INSERT OR IGNORE INTO bookmark_tags (bookmark_id, tag_id) VALUES (?1, ?2)",
            params![bookmark_id, tag_id],
        )?;
    }
    Ok(())
}

impl Db {
    /// Get or create a tag by name, normalizing it first.
    ///
    /// # Errors
    ///
    /// Returns `Error::InvalidInput` if the name is empty after trimming.
    pub async fn get_or_create_tag(&self, name: &str) -> Result<Tag, Error> {
        let Some(name) = normalize_tag(name) else {
            return Err(Error::InvalidInput("tag name must not be empty".into()));
        };

        self.conn
            .call(move |conn| -> Result<Tag, Error> {
                let id = get_or_create(conn, &name)?;
                let tag = conn
                    .query_row(
                        "SELECT id, name, created_at FROM tags WHERE id = ?1",
                        params![id],
                        |row| Ok(Tag { id: row.get(0)?, name: row.get(1)?, created_at: row.get(2)? }),
                    )
                    .map_err(Error::from)?;
                Ok(tag)
            })
            .await
            .map_err(Error::from)
    }

    /// Group a user's bookmarks by tag name.
    ///
    /// Only tags that appear on at least one of the user's bookmarks are
    /// present; a bookmark with several tags appears under each of them.
    pub async fn bookmarks_by_tag(&self, user_id: i64) -> Result<BTreeMap<String, Vec<Bookmark>>, Error> {
        self.conn
            .call(move |conn| -> Result<BTreeMap<String, Vec<Bookmark>>, Error> {
                let mut stmt = conn.prepare(
                    "SELECT t.name,
                            b.id, b.user_id, b.url, b.title, b.description, b.source, b.source_id,
                            b.content_type, b.preview_image, b.favicon, b.created_at, b.updated_at
                     FROM tags t
                     JOIN bookmark_tags bt ON bt.tag_id = t.id
                     JOIN bookmarks b ON b.id = bt.bookmark_id
                     WHERE b.user_id = ?1
                     ORDER BY t.name ASC, b.created_at DESC",
                )?;

                let rows = stmt.query_map(params![user_id], |row| {
                    let name: String = row.get(0)?;
                    let bookmark = row_to_bookmark_offset(row)?;
                    Ok((name, bookmark))
                })?;

                let mut grouped: BTreeMap<String, Vec<Bookmark>> = BTreeMap::new();
                for row in rows {
                    let (name, mut bookmark) = row?;
                    bookmark.tags = load_tags(conn, bookmark.id)?;
                    grouped.entry(name).or_default().push(bookmark);
                }
                Ok(grouped)
            })
            .await
            .map_err(Error::from)
    }
}

/// Map a joined row whose bookmark columns start at index 1.
fn row_to_bookmark_offset(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
    row_to_bookmark_at(row, 1)
}
