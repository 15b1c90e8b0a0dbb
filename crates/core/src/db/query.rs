//! Bookmark filter and search query construction.
//!
//! Translates a set of optional filter parameters into one SQL statement,
//! always scoped to the requesting user. Filters are conjunctive: a
//! bookmark must satisfy every active filter to match.
//!
//! Time bounds compare RFC3339 strings directly; for a fixed-format UTC
//! encoding, lexicographic order is chronological order.

use super::bookmarks::{BOOKMARK_COLUMNS, Bookmark, Source, load_tags, row_to_bookmark};
use super::connection::Db;
use super::tags::normalize_tag;
use crate::Error;
use chrono::{DateTime, Utc};
use tokio_rusqlite::rusqlite;
use tokio_rusqlite::rusqlite::types::Value;

/// Relative time window for the `period` filter.
///
/// Month and year are approximated as 30 and 365 days.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Period {
    Today,
    Week,
    Month,
    Year,
}

impl Period {
    /// Parse a period parameter. Unrecognized values yield `None`, which
    /// applies no time filter at all.
    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "today" => Some(Period::Today),
            "week" => Some(Period::Week),
            "month" => Some(Period::Month),
            "year" => Some(Period::Year),
            _ => None,
        }
    }

    pub fn days(self) -> i64 {
        match self {
            Period::Today => 1,
            Period::Week => 7,
            Period::Month => 30,
            Period::Year => 365,
        }
    }

    /// The earliest `created_at` that still falls inside the window.
    pub fn cutoff(self, now: DateTime<Utc>) -> DateTime<Utc> {
        now - chrono::Duration::days(self.days())
    }
}

/// Optional filters composed into one bookmark query.
///
/// All filters are independently optional and ANDed together when combined.
#[derive(Debug, Clone, Default)]
pub struct BookmarkFilter {
    /// Exact match on the bookmark source.
    pub source: Option<Source>,
    /// The bookmark must carry every listed tag (intersection, not union).
    pub tags: Vec<String>,
    /// Creation-time window.
    pub period: Option<Period>,
    /// Exact match on the classified content type.
    pub content_type: Option<String>,
    /// Case-insensitive substring match against title, description, url,
    /// or any tag name.
    pub q: Option<String>,
}

/// Split a comma-separated tag parameter into normalized names.
///
/// Each name is trimmed and lowercased; empty entries are dropped.
pub fn parse_tag_list(raw: &str) -> Vec<String> {
    raw.split(',').filter_map(normalize_tag).collect()
}

impl Db {
    /// List a user's bookmarks matching the filter, newest first.
    ///
    /// An unused tag name or an empty time window returns an empty list,
    /// never an error.
    pub async fn list_bookmarks(&self, user_id: i64, filter: BookmarkFilter) -> Result<Vec<Bookmark>, Error> {
        self.conn
            .call(move |conn| -> Result<Vec<Bookmark>, Error> {
                let mut sql = format!("SELECT {BOOKMARK_COLUMNS} FROM bookmarks b WHERE b.user_id = ?");
                let mut values: Vec<Value> = vec![Value::Integer(user_id)];

                if let Some(source) = filter.source {
                    sql.push_str(" AND b.source = ?");
                    values.push(Value::Text(source.as_str().to_string()));
                }

                if let Some(content_type) = filter.content_type {
                    sql.push_str(" AND b.content_type = ?");
                    values.push(Value::Text(content_type));
                }

                if let Some(period) = filter.period {
                    sql.push_str(" AND b.created_at >= ?");
                    values.push(Value::Text(period.cutoff(Utc::now()).to_rfc3339()));
                }

                if !filter.tags.is_empty() {
                    let placeholders = filter.tags.iter().map(|_| "?").collect::<Vec<_>>().join(", ");
                    sql.push_str(&format!(
                        " AND b.id IN (
                             SELECT bt.bookmark_id FROM bookmark_tags bt
                             JOIN tags t ON t.id = bt.tag_id
                             WHERE t.name IN ({placeholders})
                             GROUP BY bt.bookmark_id
                             HAVING COUNT(DISTINCT t.id) = {}
                         )",
                        filter.tags.len()
                    ));
                    values.extend(filter.tags.into_iter().map(Value::Text));
                }

                if let Some(q) = filter.q {
                    let pattern = format!("%{q}%");
                    sql.push_str(
                        " AND (b.title LIKE ? OR b.description LIKE ? OR b.url LIKE ?
                           OR EXISTS (
                               SELECT 1 FROM bookmark_tags bt
                               JOIN tags t ON t.id = bt.tag_id
                               WHERE bt.bookmark_id = b.id AND t.name LIKE ?
                           ))",
                    );
                    for _ in 0..4 {
                        values.push(Value::Text(pattern.clone()));
                    }
                }

                sql.push_str(" ORDER BY b.created_at DESC, b.id DESC");

                let mut stmt = conn.prepare(&sql)?;
                let mut bookmarks = stmt
                    .query_map(rusqlite::params_from_iter(values), row_to_bookmark)?
                    .collect::<rusqlite::Result<Vec<Bookmark>>>()?;

                for bookmark in &mut bookmarks {
                    bookmark.tags = load_tags(conn, bookmark.id)?;
                }
                Ok(bookmarks)
            })
            .await
            .map_err(Error::from)
    }
}
