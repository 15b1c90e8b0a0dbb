//! Metadata extraction pipeline.
//!
//! ### Contract
//! - `extract` never fails: every outcome is a `PageMetadata`, with absent
//!   fields as `None` and an `error` string when the result is degraded.
//!   A bookmark write must never fail merely because enrichment did.
//! - Exactly one outbound request per invocation, no retries.
//!
//! ### Degradation ladder
//! - Invalid URL: everything `None`, no network call.
//! - Non-2xx: everything `None`, error carries the status code.
//! - Timeout or transport/parse failure: URL-derived title and synthesized
//!   favicon, everything else `None`.
//! - Non-HTML payload: same shape plus the classified content type, no
//!   error.

pub mod classify;
pub mod html;
pub mod resolve;

pub use classify::ContentKind;

use scraper::Html;
use serde::Serialize;
use url::Url;

use crate::fetch::{FetchClient, FetchConfig, validate};
use linkvault_core::Error;

/// The outcome of one metadata extraction.
///
/// Every field is independently optional; `error` marks a degraded
/// best-effort result rather than a failure of the call itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct PageMetadata {
    pub title: Option<String>,
    pub description: Option<String>,
    pub preview_image: Option<String>,
    pub favicon: Option<String>,
    pub content_type: Option<ContentKind>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl PageMetadata {
    fn invalid_url() -> Self {
        Self { error: Some("Invalid URL format".to_string()), ..Default::default() }
    }

    fn request_failed(status: u16) -> Self {
        Self { error: Some(format!("Request failed with status {status}")), ..Default::default() }
    }

    /// The degraded shape used when we know the URL but not the content:
    /// URL-derived title, conventional favicon, everything else absent.
    fn degraded(url: &Url, content_type: Option<ContentKind>, error: Option<String>) -> Self {
        Self {
            title: Some(resolve::title_from_url(url)),
            description: None,
            preview_image: None,
            favicon: Some(resolve::default_favicon(url)),
            content_type,
            error,
        }
    }
}

/// Fetches pages and derives bookmark metadata from them.
///
/// Stateless across invocations: no shared caches, no retries, no
/// coordination needed between concurrent calls.
pub struct MetadataExtractor {
    fetcher: FetchClient,
}

impl MetadataExtractor {
    /// Create an extractor with explicit fetch configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        Ok(Self { fetcher: FetchClient::new(config)? })
    }

    /// Extract metadata for a URL, degrading instead of failing.
    pub async fn extract(&self, url_str: &str) -> PageMetadata {
        let url = match validate(url_str) {
            Ok(url) => url,
            Err(e) => {
                tracing::warn!(url = url_str, error = %e, "metadata extraction skipped: invalid URL");
                return PageMetadata::invalid_url();
            }
        };

        let response = match self.fetcher.fetch(url_str).await {
            Ok(response) => response,
            Err(Error::InvalidUrl(_)) => return PageMetadata::invalid_url(),
            Err(Error::HttpStatus(status)) => {
                tracing::warn!(url = url_str, status, "metadata fetch got non-success status");
                return PageMetadata::request_failed(status);
            }
            Err(Error::FetchTimeout(_)) => {
                tracing::warn!(url = url_str, "metadata fetch timed out");
                return PageMetadata::degraded(&url, None, Some("Request timed out".to_string()));
            }
            Err(e) => {
                tracing::warn!(url = url_str, error = %e, "metadata fetch failed");
                return PageMetadata::degraded(&url, None, Some(e.to_string()));
            }
        };

        let initial = classify::classify(url.as_str(), &response.content_type);

        // Non-HTML payloads get the cheap classification only; parsing them
        // as HTML would be garbage in, garbage out.
        if initial != ContentKind::Article && !response.content_type.contains("text/html") {
            return PageMetadata::degraded(&url, Some(initial), None);
        }

        let document = Html::parse_document(&response.body);
        let title = html::extract_title(&document, &url);
        let description = html::extract_description(&document);
        let preview_image = html::extract_preview_image(&document, &url);
        let favicon = html::extract_favicon(&document, &url);
        let content_type = classify::refine(initial, &document);

        PageMetadata {
            title: Some(title),
            description,
            preview_image,
            favicon: Some(favicon),
            content_type: Some(content_type),
            error: None,
        }
    }
}
