//! Network fetch and metadata extraction for linkvault.
//!
//! This crate implements the enrichment pipeline: fetch a user-supplied
//! URL (tolerating broken TLS, timeouts, redirects, and non-HTML payloads)
//! and heuristically derive structured metadata from whatever comes back.

pub mod extract;
pub mod fetch;

pub use extract::{ContentKind, MetadataExtractor, PageMetadata};
pub use fetch::{FetchClient, FetchConfig, FetchResponse};
