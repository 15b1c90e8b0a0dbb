//! HTTP fetch for metadata enrichment.
//!
//! ### Transport policy
//! - Bounded timeout (default 10s), limited redirect following.
//! - Certificate validation disabled by default: bookmarked sites are
//!   arbitrary public pages with frequently broken TLS, and this is a
//!   read-only, non-sensitive fetch.
//! - Max body bytes: 5MB (configurable); larger bodies are truncated at
//!   the byte limit rather than rejected.
//!
//! Exactly one outbound request per fetch; no retries. Callers needing
//! retry wrap this contract themselves.

pub mod url;

use std::time::{Duration, Instant};

use reqwest::{Client, StatusCode, Url, header};

pub use url::{UrlError, validate};

use linkvault_core::Error;

/// Configuration for the fetch client.
#[derive(Debug, Clone)]
pub struct FetchConfig {
    /// User agent string (default: "linkvault/0.1")
    pub user_agent: String,

    /// Maximum response body size in bytes (default: 5MB)
    pub max_bytes: usize,

    /// Request timeout (default: 10s)
    pub timeout: Duration,

    /// Maximum number of redirects to follow (default: 5)
    pub max_redirects: usize,

    /// Whether to accept invalid TLS certificates (default: true)
    pub accept_invalid_certs: bool,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "linkvault/0.1".to_string(),
            max_bytes: 5 * 1024 * 1024,
            timeout: Duration::from_millis(10_000),
            max_redirects: 5,
            accept_invalid_certs: true,
        }
    }
}

/// Response from a fetch operation.
#[derive(Debug, Clone)]
pub struct FetchResponse {
    /// The URL requested
    pub url: Url,
    /// The final URL after redirects
    pub final_url: Url,
    /// HTTP status code
    pub status: StatusCode,
    /// Content-Type header, lowercased
    pub content_type: String,
    /// Response body decoded as text (possibly truncated at max_bytes)
    pub body: String,
    /// Time taken to fetch in milliseconds
    pub fetch_ms: u64,
}

/// HTTP fetch client for metadata enrichment.
pub struct FetchClient {
    http: Client,
    config: FetchConfig,
}

impl FetchClient {
    /// Create a new fetch client with the given configuration.
    pub fn new(config: FetchConfig) -> Result<Self, Error> {
        let http = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout)
            .redirect(reqwest::redirect::Policy::limited(config.max_redirects))
            .danger_accept_invalid_certs(config.accept_invalid_certs)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()
            .map_err(|e| Error::FetchFailed(format!("failed to build HTTP client: {e}")))?;

        Ok(Self { http, config })
    }

    /// Fetch a URL, returning the body text and response metadata.
    ///
    /// # Errors
    ///
    /// - `Error::InvalidUrl` if the input is not a well-formed absolute URL
    ///   (no network call is made in that case)
    /// - `Error::FetchTimeout` if the bounded wait elapses
    /// - `Error::HttpStatus` on a non-2xx response
    /// - `Error::FetchFailed` on any other transport failure
    pub async fn fetch(&self, url_str: &str) -> Result<FetchResponse, Error> {
        let start = Instant::now();
        let url = validate(url_str).map_err(|e| Error::InvalidUrl(e.to_string()))?;

        let response = self
            .http
            .get(url.as_str())
            .header(
                "Accept",
                "text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8",
            )
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    Error::FetchTimeout(url_str.to_string())
                } else {
                    Error::FetchFailed(format!("network error: {e}"))
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            return Err(Error::HttpStatus(status.as_u16()));
        }

        let final_url = response.url().clone();
        let content_type = response
            .headers()
            .get(header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or("")
            .to_lowercase();

        let bytes = response.bytes().await.map_err(|e| {
            if e.is_timeout() {
                Error::FetchTimeout(url_str.to_string())
            } else {
                Error::FetchFailed(format!("failed to read response: {e}"))
            }
        })?;

        let capped = &bytes[..bytes.len().min(self.config.max_bytes)];
        let body = String::from_utf8_lossy(capped).into_owned();

        let fetch_ms = start.elapsed().as_millis() as u64;

        tracing::debug!(
            "fetched {} -> {} in {}ms ({} bytes)",
            url,
            final_url,
            fetch_ms,
            bytes.len()
        );

        Ok(FetchResponse { url, final_url, status, content_type, body, fetch_ms })
    }

    /// Get reference to the configuration.
    pub fn config(&self) -> &FetchConfig {
        &self.config
    }
}
