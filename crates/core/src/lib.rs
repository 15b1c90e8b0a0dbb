//! Core types and shared functionality for linkvault.
//!
//! This crate provides:
//! - SQLite-backed bookmark store (users, bookmarks, tags, query builder)
//! - Unified error types
//! - Configuration structures

pub mod config;
pub mod db;
pub mod error;

pub use config::AppConfig;
pub use db::{Bookmark, Db, Source, Tag};
pub use error::Error;
