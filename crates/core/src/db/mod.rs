//! SQLite-backed store for users, bookmarks, and tags.
//!
//! This module provides persistent storage using SQLite with async access
//! via tokio-rusqlite. It supports:
//!
//! - Automatic schema migrations
//! - WAL mode for concurrent access
//! - User-scoped bookmark CRUD with atomic tag association
//! - A composable filter/search query builder

pub mod bookmarks;
pub mod connection;
pub mod migrations;
pub mod query;
pub mod tags;
pub mod users;

pub use crate::Error;

pub use bookmarks::{Bookmark, BookmarkUpdate, NewBookmark, Source};
pub use connection::Db;
pub use query::{BookmarkFilter, Period};
pub use tags::Tag;
pub use users::User;
