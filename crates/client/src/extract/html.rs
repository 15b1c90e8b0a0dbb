//! Field extractors over parsed HTML.
//!
//! Each field is extracted independently via a prioritized fallback chain
//! across Open Graph, Twitter Card, and plain HTML tags; the first
//! non-empty match wins. Extractors return `None` (or a synthesized
//! fallback where the contract demands one) instead of failing, whatever
//! the markup looks like.

use scraper::{Html, Selector};
use url::Url;

use super::resolve::{default_favicon, resolve, title_from_url};

/// Description truncation length for the first-paragraph fallback.
const MAX_DESCRIPTION_CHARS: usize = 300;

/// Minimum width/height for an inline image to count as a preview.
const MIN_PREVIEW_DIMENSION: u32 = 100;

/// First non-empty `content` of a `<meta>` tag matched by attribute.
pub(crate) fn meta_content(html: &Html, attr: &str, name: &str) -> Option<String> {
    let selector = Selector::parse(&format!(r#"meta[{attr}="{name}"]"#)).ok()?;
    html.select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(String::from)
}

/// Page title: `og:title`, `twitter:title`, `<title>`, then a title
/// derived from the URL itself.
pub fn extract_title(html: &Html, url: &Url) -> String {
    meta_content(html, "property", "og:title")
        .or_else(|| meta_content(html, "name", "twitter:title"))
        .or_else(|| title_tag(html))
        .unwrap_or_else(|| title_from_url(url))
}

fn title_tag(html: &Html) -> Option<String> {
    let selector = Selector::parse("title").expect("invalid selector");
    let text = html.select(&selector).next()?.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() { None } else { Some(text.to_string()) }
}

/// Page description: `og:description`, `twitter:description`,
/// `<meta name="description">`, then the first paragraph's text.
pub fn extract_description(html: &Html) -> Option<String> {
    meta_content(html, "property", "og:description")
        .or_else(|| meta_content(html, "name", "twitter:description"))
        .or_else(|| meta_content(html, "name", "description"))
        .or_else(|| first_paragraph(html))
}

fn first_paragraph(html: &Html) -> Option<String> {
    let selector = Selector::parse("p").expect("invalid selector");
    let text = html.select(&selector).next()?.text().collect::<String>();
    let text = text.trim();
    if text.is_empty() {
        return None;
    }
    if text.chars().count() > MAX_DESCRIPTION_CHARS {
        let truncated: String = text.chars().take(MAX_DESCRIPTION_CHARS).collect();
        Some(truncated + "...")
    } else {
        Some(text.to_string())
    }
}

/// Preview image: `og:image`, `twitter:image`, the first inline image
/// with believable dimensions, then the first inline image that doesn't
/// look like an icon or logo. Resolved against the page URL.
pub fn extract_preview_image(html: &Html, url: &Url) -> Option<String> {
    if let Some(content) = meta_content(html, "property", "og:image") {
        return Some(resolve(&content, url));
    }
    if let Some(content) = meta_content(html, "name", "twitter:image") {
        return Some(resolve(&content, url));
    }

    let selector = Selector::parse("img[src]").expect("invalid selector");

    for img in html.select(&selector) {
        let element = img.value();
        let (Some(width), Some(height)) = (element.attr("width"), element.attr("height")) else {
            continue;
        };
        let (Ok(width), Ok(height)) = (width.trim().parse::<u32>(), height.trim().parse::<u32>()) else {
            continue;
        };
        if width >= MIN_PREVIEW_DIMENSION
            && height >= MIN_PREVIEW_DIMENSION
            && let Some(src) = element.attr("src")
        {
            return Some(resolve(src, url));
        }
    }

    for img in html.select(&selector) {
        let Some(src) = img.value().attr("src") else { continue };
        let lower = src.to_lowercase();
        if !lower.ends_with(".ico") && !lower.ends_with(".svg") && !lower.contains("logo") {
            return Some(resolve(src, url));
        }
    }

    None
}

/// Favicon: the first `<link>` whose `rel` mentions an icon, else the
/// conventional `/favicon.ico` at the page's origin.
pub fn extract_favicon(html: &Html, url: &Url) -> String {
    let selector = Selector::parse("link[rel][href]").expect("invalid selector");
    for link in html.select(&selector) {
        let element = link.value();
        let rel = element.attr("rel").unwrap_or("");
        if rel.to_lowercase().contains("icon")
            && let Some(href) = element.attr("href")
        {
            return resolve(href, url);
        }
    }
    default_favicon(url)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page_url() -> Url {
        Url::parse("https://site.com/blog/post").unwrap()
    }

    fn doc(html: &str) -> Html {
        Html::parse_document(html)
    }

    #[test]
    fn test_title_prefers_og_over_title_tag() {
        let html = doc(
            r#"<html><head>
                <meta property="og:title" content="Foo">
                <title>Not Foo</title>
            </head></html>"#,
        );
        assert_eq!(extract_title(&html, &page_url()), "Foo");
    }

    #[test]
    fn test_title_twitter_fallback() {
        let html = doc(r#"<html><head><meta name="twitter:title" content="Tweeted"></head></html>"#);
        assert_eq!(extract_title(&html, &page_url()), "Tweeted");
    }

    #[test]
    fn test_title_tag_fallback_trims() {
        let html = doc("<html><head><title>  Plain Title  </title></head></html>");
        assert_eq!(extract_title(&html, &page_url()), "Plain Title");
    }

    #[test]
    fn test_title_url_fallback() {
        let html = doc("<html><head></head><body></body></html>");
        assert_eq!(extract_title(&html, &page_url()), "Post");
    }

    #[test]
    fn test_title_ignores_empty_og_content() {
        let html = doc(
            r#"<html><head>
                <meta property="og:title" content="   ">
                <title>Real</title>
            </head></html>"#,
        );
        assert_eq!(extract_title(&html, &page_url()), "Real");
    }

    #[test]
    fn test_description_chain() {
        let html = doc(r#"<html><head><meta name="description" content="meta desc"></head></html>"#);
        assert_eq!(extract_description(&html).as_deref(), Some("meta desc"));

        let html = doc(r#"<html><head><meta property="og:description" content="og desc"><meta name="description" content="meta desc"></head></html>"#);
        assert_eq!(extract_description(&html).as_deref(), Some("og desc"));
    }

    #[test]
    fn test_description_first_paragraph_fallback() {
        let html = doc("<html><body><p> first paragraph </p><p>second</p></body></html>");
        assert_eq!(extract_description(&html).as_deref(), Some("first paragraph"));
    }

    #[test]
    fn test_description_paragraph_truncated() {
        let long = "x".repeat(400);
        let html = doc(&format!("<html><body><p>{long}</p></body></html>"));
        let description = extract_description(&html).unwrap();
        assert_eq!(description.chars().count(), 303);
        assert!(description.ends_with("..."));
    }

    #[test]
    fn test_description_none_when_absent() {
        let html = doc("<html><body><div>no paragraphs</div></body></html>");
        assert_eq!(extract_description(&html), None);
    }

    #[test]
    fn test_preview_image_og_resolved() {
        let html = doc(r#"<html><head><meta property="og:image" content="/img/a.png"></head></html>"#);
        assert_eq!(
            extract_preview_image(&html, &page_url()).as_deref(),
            Some("https://site.com/img/a.png")
        );
    }

    #[test]
    fn test_preview_image_sized_img() {
        let html = doc(
            r#"<html><body>
                <img src="tiny.png" width="20" height="20">
                <img src="hero.png" width="640" height="480">
            </body></html>"#,
        );
        assert_eq!(
            extract_preview_image(&html, &page_url()).as_deref(),
            Some("https://site.com/blog/hero.png")
        );
    }

    #[test]
    fn test_preview_image_skips_unparseable_dimensions() {
        let html = doc(
            r#"<html><body>
                <img src="weird.png" width="auto" height="100%">
                <img src="real.png" width="200" height="150">
            </body></html>"#,
        );
        assert_eq!(
            extract_preview_image(&html, &page_url()).as_deref(),
            Some("https://site.com/blog/real.png")
        );
    }

    #[test]
    fn test_preview_image_filtered_fallback() {
        let html = doc(
            r#"<html><body>
                <img src="/brand/logo.png">
                <img src="/favicon.ico">
                <img src="/vector.svg">
                <img src="/photos/sunset.jpg">
            </body></html>"#,
        );
        assert_eq!(
            extract_preview_image(&html, &page_url()).as_deref(),
            Some("https://site.com/photos/sunset.jpg")
        );
    }

    #[test]
    fn test_preview_image_none() {
        let html = doc(r#"<html><body><img src="/logo.svg"></body></html>"#);
        assert_eq!(extract_preview_image(&html, &page_url()), None);
    }

    #[test]
    fn test_favicon_from_link_rel() {
        let html = doc(r#"<html><head><link rel="shortcut icon" href="/fav.png"></head></html>"#);
        assert_eq!(extract_favicon(&html, &page_url()), "https://site.com/fav.png");
    }

    #[test]
    fn test_favicon_default_when_absent() {
        let html = doc("<html><head></head></html>");
        assert_eq!(extract_favicon(&html, &page_url()), "https://site.com/favicon.ico");
    }

    #[test]
    fn test_favicon_ignores_unrelated_links() {
        let html = doc(
            r#"<html><head>
                <link rel="stylesheet" href="/style.css">
                <link rel="icon" href="//cdn.site.com/fav.ico">
            </head></html>"#,
        );
        assert_eq!(extract_favicon(&html, &page_url()), "https://cdn.site.com/fav.ico");
    }
}
