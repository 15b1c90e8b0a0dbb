//! URL validation for user-supplied bookmark targets.

/// Error type for URL validation failures.
#[derive(Debug, Clone, thiserror::Error)]
pub enum UrlError {
    #[error("empty URL")]
    Empty,

    #[error("unsupported scheme: {0}")]
    UnsupportedScheme(String),

    #[error("missing host")]
    MissingHost,

    #[error("invalid URL: {0}")]
    InvalidUrl(String),
}

/// Validate that the input is a well-formed absolute http(s) URL.
///
/// Unlike a canonicalizer this does not repair input: a scheme-less or
/// host-less string is rejected, not defaulted. Leading/trailing whitespace
/// is the only thing forgiven.
pub fn validate(input: &str) -> Result<url::Url, UrlError> {
    let trimmed = input.trim();

    if trimmed.is_empty() {
        return Err(UrlError::Empty);
    }

    let parsed = url::Url::parse(trimmed).map_err(|e| UrlError::InvalidUrl(e.to_string()))?;

    match parsed.scheme() {
        "http" | "https" => {}
        scheme => return Err(UrlError::UnsupportedScheme(scheme.to_string())),
    }

    if parsed.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    Ok(parsed)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_basic() {
        let url = validate("https://example.com/page").unwrap();
        assert_eq!(url.scheme(), "https");
        assert_eq!(url.host_str(), Some("example.com"));
    }

    #[test]
    fn test_validate_http_allowed() {
        let url = validate("http://example.com").unwrap();
        assert_eq!(url.scheme(), "http");
    }

    #[test]
    fn test_validate_trims_whitespace() {
        let url = validate("  https://example.com  ").unwrap();
        assert_eq!(url.as_str(), "https://example.com/");
    }

    #[test]
    fn test_validate_rejects_empty() {
        assert!(matches!(validate(""), Err(UrlError::Empty)));
        assert!(matches!(validate("   "), Err(UrlError::Empty)));
    }

    #[test]
    fn test_validate_rejects_scheme_less() {
        assert!(matches!(validate("example.com/page"), Err(UrlError::InvalidUrl(_))));
    }

    #[test]
    fn test_validate_rejects_unsupported_scheme() {
        assert!(matches!(validate("ftp://example.com"), Err(UrlError::UnsupportedScheme(_))));
        assert!(matches!(validate("file:///etc/passwd"), Err(UrlError::UnsupportedScheme(_))));
    }

    #[test]
    fn test_validate_rejects_garbage() {
        assert!(validate("not a url").is_err());
        assert!(validate("http://").is_err());
    }

    #[test]
    fn test_validate_preserves_query() {
        let url = validate("https://example.com/watch?v=abc").unwrap();
        assert_eq!(url.query(), Some("v=abc"));
    }
}
