//! Bookmark CRUD operations.
//!
//! Every operation is scoped to the owning user: a bookmark id belonging to
//! another user behaves exactly like a missing id. Writes that touch tag
//! associations run inside one transaction with the bookmark row itself.

use super::connection::Db;
use super::tags::replace_tags;
use crate::Error;
use serde::{Deserialize, Serialize};
use tokio_rusqlite::params;
use tokio_rusqlite::rusqlite;

/// Where a bookmark came from.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Source {
    #[default]
    Manual,
    Twitter,
    Reddit,
    Instagram,
    Facebook,
    Pinterest,
    Pocket,
    Tiktok,
    Youtube,
}

impl Source {
    pub fn as_str(self) -> &'static str {
        match self {
            Source::Manual => "manual",
            Source::Twitter => "twitter",
            Source::Reddit => "reddit",
            Source::Instagram => "instagram",
            Source::Facebook => "facebook",
            Source::Pinterest => "pinterest",
            Source::Pocket => "pocket",
            Source::Tiktok => "tiktok",
            Source::Youtube => "youtube",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "manual" => Some(Source::Manual),
            "twitter" => Some(Source::Twitter),
            "reddit" => Some(Source::Reddit),
            "instagram" => Some(Source::Instagram),
            "facebook" => Some(Source::Facebook),
            "pinterest" => Some(Source::Pinterest),
            "pocket" => Some(Source::Pocket),
            "tiktok" => Some(Source::Tiktok),
            "youtube" => Some(Source::Youtube),
            _ => None,
        }
    }
}

/// A stored bookmark with its tag names.
#[derive(Debug, Clone, Serialize)]
pub struct Bookmark {
    pub id: i64,
    pub user_id: i64,
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Source,
    pub source_id: Option<String>,
    pub content_type: Option<String>,
    pub preview_image: Option<String>,
    pub favicon: Option<String>,
    pub created_at: String,
    pub updated_at: String,
    pub tags: Vec<String>,
}

/// Fields for creating a bookmark.
#[derive(Debug, Clone)]
pub struct NewBookmark {
    pub url: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Source,
    pub source_id: Option<String>,
    pub content_type: Option<String>,
    pub preview_image: Option<String>,
    pub favicon: Option<String>,
    pub tags: Vec<String>,
}

impl NewBookmark {
    /// A bare bookmark for the given URL with every optional field unset.
    pub fn with_url(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            title: None,
            description: None,
            source: Source::Manual,
            source_id: None,
            content_type: None,
            preview_image: None,
            favicon: None,
            tags: Vec::new(),
        }
    }
}

/// Partial update: `Some` fields are written, `None` fields keep their
/// current value. `tags: Some(..)` replaces the whole tag set.
#[derive(Debug, Clone, Default)]
pub struct BookmarkUpdate {
    pub url: Option<String>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub source: Option<Source>,
    pub source_id: Option<String>,
    pub content_type: Option<String>,
    pub preview_image: Option<String>,
    pub favicon: Option<String>,
    pub tags: Option<Vec<String>>,
}

pub(crate) const BOOKMARK_COLUMNS: &str = "b.id, b.user_id, b.url, b.title, b.description, b.source, b.source_id, \
     b.content_type, b.preview_image, b.favicon, b.created_at, b.updated_at";

/// Map a row whose bookmark columns start at the given index.
pub(crate) fn row_to_bookmark_at(row: &rusqlite::Row, at: usize) -> rusqlite::Result<Bookmark> {
    let source: String = row.get(at + 5)?;
    Ok(Bookmark {
        id: row.get(at)?,
        user_id: row.get(at + 1)?,
        url: row.get(at + 2)?,
        title: row.get(at + 3)?,
        description: row.get(at + 4)?,
        source: Source::parse(&source).unwrap_or_default(),
        source_id: row.get(at + 6)?,
        content_type: row.get(at + 7)?,
        preview_image: row.get(at + 8)?,
        favicon: row.get(at + 9)?,
        created_at: row.get(at + 10)?,
        updated_at: row.get(at + 11)?,
        tags: Vec::new(),
    })
}

pub(crate) fn row_to_bookmark(row: &rusqlite::Row) -> rusqlite::Result<Bookmark> {
    row_to_bookmark_at(row, 0)
}

/// Load a bookmark's tag names, sorted.
pub(crate) fn load_tags(conn: &rusqlite::Connection, bookmark_id: i64) -> rusqlite::Result<Vec<String>> {
    let mut stmt = conn.prepare(
        "SELECT t.name FROM tags t
         JOIN bookmark_tags bt ON bt.tag_id = t.id
         WHERE bt.bookmark_id = ?1
         ORDER BY t.name ASC",
    )?;
    let names = stmt
        .query_map(params![bookmark_id], |row| row.get(0))?
        .collect::<rusqlite::Result<Vec<String>>>()?;
    Ok(names)
}

/// Fetch one bookmark scoped to its owner, tags included.
pub(crate) fn get_scoped(conn: &rusqlite::Connection, user_id: i64, id: i64) -> rusqlite::Result<Option<Bookmark>> {
    let result = conn.query_row(
        &format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks b WHERE b.id = ?1 AND b.user_id = ?2"),
        params![id, user_id],
        row_to_bookmark,
    );

    match result {
        Ok(mut bookmark) => {
            bookmark.tags = load_tags(conn, bookmark.id)?;
            Ok(Some(bookmark))
        }
        Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
        Err(e) => Err(e),
    }
}

impl Db {
    /// Create a bookmark with its tag associations in one transaction.
    pub async fn create_bookmark(&self, user_id: i64, new: NewBookmark) -> Result<Bookmark, Error> {
        self.conn
            .call(move |conn| -> Result<Bookmark, Error> {
                let tx = conn.transaction()?;
                let now = chrono::Utc::now().to_rfc3339();
                tx.execute(
                    "INSERT INTO bookmarks (user_id, url, title, description, source, source_id,
                                            content_type, preview_image, favicon, created_at, updated_at)
                     VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?10)",
                    params![
                        user_id,
                        new.url,
                        new.title,
                        new.description,
                        new.source.as_str(),
                        new.source_id,
                        new.content_type,
                        new.preview_image,
                        new.favicon,
                        now,
                    ],
                )?;
                let id = tx.last_insert_rowid();
                replace_tags(&tx, id, &new.tags)?;
                let bookmark = get_scoped(&tx, user_id, id)?
                    .ok_or_else(|| Error::NotFound(format!("bookmark {id}")))?;
                tx.commit()?;
                Ok(bookmark)
            })
            .await
            .map_err(Error::from)
    }

    /// Get a bookmark by id, scoped to its owner.
    pub async fn get_bookmark(&self, user_id: i64, id: i64) -> Result<Option<Bookmark>, Error> {
        self.conn
            .call(move |conn| -> Result<Option<Bookmark>, Error> { get_scoped(conn, user_id, id).map_err(Error::from) })
            .await
            .map_err(Error::from)
    }

    /// Apply a partial update, bumping `updated_at`.
    ///
    /// `None` fields keep their stored value; `tags: Some(..)` replaces the
    /// association set inside the same transaction as the field update.
    pub async fn update_bookmark(&self, user_id: i64, id: i64, update: BookmarkUpdate) -> Result<Bookmark, Error> {
        self.conn
            .call(move |conn| -> Result<Bookmark, Error> {
                let tx = conn.transaction()?;
                let current = get_scoped(&tx, user_id, id)?
                    .ok_or_else(|| Error::NotFound(format!("bookmark {id}")))?;

                let url = update.url.unwrap_or(current.url);
                let title = update.title.or(current.title);
                let description = update.description.or(current.description);
                let source = update.source.unwrap_or(current.source);
                let source_id = update.source_id.or(current.source_id);
                let content_type = update.content_type.or(current.content_type);
                let preview_image = update.preview_image.or(current.preview_image);
                let favicon = update.favicon.or(current.favicon);
                let updated_at = chrono::Utc::now().to_rfc3339();

                tx.execute(
                    "UPDATE bookmarks
                     SET url = ?1, title = ?2, description = ?3, source = ?4, source_id = ?5,
                         content_type = ?6, preview_image = ?7, favicon = ?8, updated_at = ?9
                     WHERE id = ?10 AND user_id = ?11",
                    params![
                        url,
                        title,
                        description,
                        source.as_str(),
                        source_id,
                        content_type,
                        preview_image,
                        favicon,
                        updated_at,
                        id,
                        user_id,
                    ],
                )?;

                if let Some(tags) = &update.tags {
                    replace_tags(&tx, id, tags)?;
                }

                let bookmark = get_scoped(&tx, user_id, id)?
                    .ok_or_else(|| Error::NotFound(format!("bookmark {id}")))?;
                tx.commit()?;
                Ok(bookmark)
            })
            .await
            .map_err(Error::from)
    }

    /// Delete a bookmark by id, scoped to its owner.
    ///
    /// # Errors
    ///
    /// Returns `Error::NotFound` if the id doesn't exist for this user.
    pub async fn delete_bookmark(&self, user_id: i64, id: i64) -> Result<(), Error> {
        self.conn
            .call(move |conn| -> Result<(), Error> {
                let deleted = conn.execute(
                    "DELETE FROM bookmarks WHERE id = ?1 AND user_id = ?2",
                    params![id, user_id],
                )?;
                if deleted == 0 {
                    return Err(Error::NotFound(format!("bookmark {id}")));
                }
                Ok(())
            })
            .await
            .map_err(Error::from)
    }

    /// Delete several bookmarks by id, scoped to the owner.
    ///
    /// Ids belonging to other users are ignored, not errors. Returns the
    /// number of rows actually deleted.
    pub async fn bulk_delete_bookmarks(&self, user_id: i64, ids: Vec<i64>) -> Result<u64, Error> {
        if ids.is_empty() {
            return Ok(0);
        }
        self.conn
            .call(move |conn| -> Result<u64, Error> {
                let placeholders = ids.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
                let sql = format!("DELETE FROM bookmarks WHERE user_id = ? AND id IN ({placeholders})");
                let mut stmt = conn.prepare(&sql)?;

                let mut values: Vec<rusqlite::types::Value> = Vec::with_capacity(ids.len() + 1);
                values.push(rusqlite::types::Value::Integer(user_id));
                values.extend(ids.iter().map(|id| rusqlite::types::Value::Integer(*id)));

                let deleted = stmt.execute(rusqlite::params_from_iter(values))?;
                Ok(deleted as u64)
            })
            .await
            .map_err(Error::from)
    }
}
