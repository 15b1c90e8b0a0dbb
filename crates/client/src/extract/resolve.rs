//! Reference resolution against a base URL, plus URL-derived fallbacks.
//!
//! `resolve` is pure and total: it never touches the network and never
//! fails, even on malformed candidates. Best-effort string construction is
//! the contract, because the inputs come from arbitrary untrusted HTML.

use std::sync::LazyLock;

use regex::Regex;
use url::Url;

static TRAILING_EXT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\.\w+$").expect("invalid regex"));

/// Host plus explicit port when present, like a URL authority.
fn host_with_port(base: &Url) -> String {
    let host = base.host_str().unwrap_or("");
    match base.port() {
        Some(port) => format!("{host}:{port}"),
        None => host.to_string(),
    }
}

/// Resolve an image/link reference found in HTML against the page URL.
///
/// Rules, checked in order: already-absolute references are returned
/// unchanged; `//`-prefixed ones inherit the base scheme; `/`-prefixed
/// ones inherit scheme and host; anything else is taken relative to the
/// base's directory (final path segment dropped).
pub fn resolve(candidate: &str, base: &Url) -> String {
    if candidate.starts_with("http://") || candidate.starts_with("https://") {
        return candidate.to_string();
    }

    let scheme = base.scheme();

    if candidate.starts_with("//") {
        return format!("{scheme}:{candidate}");
    }

    let host = host_with_port(base);

    if candidate.starts_with('/') {
        return format!("{scheme}://{host}{candidate}");
    }

    let base_path = base.path();
    let dir = if base_path.ends_with('/') {
        base_path.to_string()
    } else {
        let mut segments: Vec<&str> = base_path.split('/').collect();
        segments.pop();
        format!("{}/", segments.join("/"))
    };

    format!("{scheme}://{host}{dir}{candidate}")
}

/// Derive a human-readable title from the URL itself.
///
/// Takes the last non-empty path segment, turns `-`/`_` into spaces,
/// strips a trailing extension, and capitalizes; falls back to the domain
/// when the path carries nothing usable.
pub fn title_from_url(url: &Url) -> String {
    if let Some(segment) = url.path().split('/').filter(|p| !p.is_empty()).next_back() {
        let name = segment.replace(['-', '_'], " ");
        let name = TRAILING_EXT.replace(&name, "");
        let name = name.trim();
        if !name.is_empty() {
            return capitalize(name);
        }
    }
    url.host_str().unwrap_or_default().to_string()
}

/// The conventional favicon location for the URL's origin.
pub fn default_favicon(url: &Url) -> String {
    format!("{}://{}/favicon.ico", url.scheme(), host_with_port(url))
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase(),
        None => String::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base(url: &str) -> Url {
        Url::parse(url).unwrap()
    }

    #[test]
    fn test_resolve_absolute_unchanged() {
        let b = base("https://site.com/blog/post");
        assert_eq!(resolve("https://cdn.example/x.png", &b), "https://cdn.example/x.png");
        assert_eq!(resolve("http://cdn.example/x.png", &b), "http://cdn.example/x.png");
    }

    #[test]
    fn test_resolve_protocol_relative() {
        let b = base("https://site.com/blog/post");
        assert_eq!(resolve("//cdn.example/x.png", &b), "https://cdn.example/x.png");
    }

    #[test]
    fn test_resolve_root_relative() {
        let b = base("https://site.com/blog/post");
        assert_eq!(resolve("/img/a.png", &b), "https://site.com/img/a.png");
    }

    #[test]
    fn test_resolve_path_relative() {
        let b = base("https://site.com/blog/post");
        assert_eq!(resolve("b.png", &b), "https://site.com/blog/b.png");
    }

    #[test]
    fn test_resolve_path_relative_with_trailing_slash() {
        let b = base("https://site.com/blog/");
        assert_eq!(resolve("b.png", &b), "https://site.com/blog/b.png");
    }

    #[test]
    fn test_resolve_keeps_port() {
        let b = base("http://localhost:8080/a/b");
        assert_eq!(resolve("/img.png", &b), "http://localhost:8080/img.png");
    }

    #[test]
    fn test_resolve_is_total_on_garbage() {
        let b = base("https://site.com/blog/post");
        // Nonsense in, best-effort string out; never a panic or error.
        assert_eq!(resolve("::::", &b), "https://site.com/blog/::::");
    }

    #[test]
    fn test_title_from_url_segment() {
        let url = base("https://site.com/posts/my-first_post.html");
        assert_eq!(title_from_url(&url), "My first post");
    }

    #[test]
    fn test_title_from_url_falls_back_to_domain() {
        let url = base("https://site.com/");
        assert_eq!(title_from_url(&url), "site.com");
    }

    #[test]
    fn test_title_from_url_skips_trailing_slash_segment() {
        let url = base("https://site.com/articles/rust-tips/");
        assert_eq!(title_from_url(&url), "Rust tips");
    }

    #[test]
    fn test_default_favicon() {
        let url = base("https://site.com/blog/post");
        assert_eq!(default_favicon(&url), "https://site.com/favicon.ico");
    }

    #[test]
    fn test_capitalize_lowercases_rest() {
        assert_eq!(capitalize("rUST tIPS"), "Rust tips");
    }
}
