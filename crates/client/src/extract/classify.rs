//! Coarse content classification for bookmarked URLs.
//!
//! Two passes: `classify` uses only the URL and the Content-Type header,
//! both available before any parsing. `refine` inspects the HTML body and
//! runs only when the cheap signals were generic (article) or absent
//! (unknown), since body signals are expensive to obtain but more precise.

use scraper::{Html, Selector};
use serde::{Deserialize, Serialize};

use super::html::meta_content;

const IMAGE_EXTS: &[&str] = &[".jpg", ".jpeg", ".png", ".gif", ".webp", ".svg"];
const VIDEO_EXTS: &[&str] = &[".mp4", ".webm", ".mov", ".avi"];
const AUDIO_EXTS: &[&str] = &[".mp3", ".wav", ".ogg", ".m4a"];
const DOCUMENT_EXTS: &[&str] = &[".pdf", ".doc", ".docx", ".ppt", ".pptx", ".xls", ".xlsx"];

const VIDEO_EMBED_HOSTS: &[&str] = &["youtube", "vimeo", "dailymotion"];
const SOCIAL_SITE_NAMES: &[&str] = &["twitter", "instagram", "facebook", "reddit", "linkedin"];

/// Semantic category assigned to a bookmark's content.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ContentKind {
    Article,
    Video,
    Image,
    Audio,
    Document,
    Social,
    Unknown,
}

impl ContentKind {
    pub fn as_str(self) -> &'static str {
        match self {
            ContentKind::Article => "article",
            ContentKind::Video => "video",
            ContentKind::Image => "image",
            ContentKind::Audio => "audio",
            ContentKind::Document => "document",
            ContentKind::Social => "social",
            ContentKind::Unknown => "unknown",
        }
    }
}

fn has_extension(path: &str, extensions: &[&str]) -> bool {
    extensions.iter().any(|ext| path.ends_with(ext))
}

/// Classify from the URL and Content-Type header alone.
///
/// Decision order, first match wins: known-platform URL patterns, then
/// file extensions on the URL path, then header families, then `text/html`
/// as article, else unknown.
pub fn classify(url: &str, content_type_header: &str) -> ContentKind {
    let url_lower = url.to_lowercase();

    if ["youtube.com/watch", "youtu.be/", "youtube.com/shorts"]
        .iter()
        .any(|p| url_lower.contains(p))
        || url_lower.contains("tiktok.com")
    {
        return ContentKind::Video;
    }

    if url_lower.contains("instagram.com") {
        if url_lower.contains("/p/") {
            return ContentKind::Image;
        }
        if url_lower.contains("/reel/") {
            return ContentKind::Video;
        }
    }

    if ["twitter.com", "x.com", "reddit.com"].iter().any(|p| url_lower.contains(p)) {
        return ContentKind::Social;
    }

    let path = url::Url::parse(url)
        .map(|u| u.path().to_lowercase())
        .unwrap_or_default();

    if has_extension(&path, IMAGE_EXTS) {
        return ContentKind::Image;
    }
    if has_extension(&path, VIDEO_EXTS) {
        return ContentKind::Video;
    }
    if has_extension(&path, AUDIO_EXTS) {
        return ContentKind::Audio;
    }
    if has_extension(&path, DOCUMENT_EXTS) {
        return ContentKind::Document;
    }

    let header = content_type_header.to_lowercase();
    if header.contains("image/") {
        return ContentKind::Image;
    }
    if header.contains("video/") {
        return ContentKind::Video;
    }
    if header.contains("audio/") {
        return ContentKind::Audio;
    }
    if ["application/pdf", "application/msword", "application/vnd.ms"]
        .iter()
        .any(|p| header.contains(p))
    {
        return ContentKind::Document;
    }
    if header.contains("text/html") {
        return ContentKind::Article;
    }

    ContentKind::Unknown
}

/// Refine a generic classification using signals from the parsed body.
///
/// Anything already classified as a concrete media type passes through
/// untouched.
pub fn refine(initial: ContentKind, html: &Html) -> ContentKind {
    if initial != ContentKind::Article && initial != ContentKind::Unknown {
        return initial;
    }

    let video = Selector::parse("video").expect("invalid selector");
    if html.select(&video).next().is_some() {
        return ContentKind::Video;
    }

    let iframe = Selector::parse("iframe[src]").expect("invalid selector");
    for element in html.select(&iframe) {
        if let Some(src) = element.value().attr("src") {
            let src = src.to_lowercase();
            if VIDEO_EMBED_HOSTS.iter().any(|host| src.contains(host)) {
                return ContentKind::Video;
            }
        }
    }

    if meta_content(html, "property", "og:type").as_deref() == Some("image") {
        return ContentKind::Image;
    }

    if let Some(site_name) = meta_content(html, "property", "og:site_name") {
        let site_name = site_name.to_lowercase();
        if SOCIAL_SITE_NAMES.iter().any(|name| site_name == *name) {
            return ContentKind::Social;
        }
    }

    ContentKind::Article
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_classify_platform_urls() {
        assert_eq!(classify("https://youtube.com/watch?v=x", "text/html"), ContentKind::Video);
        assert_eq!(classify("https://youtu.be/abc", ""), ContentKind::Video);
        assert_eq!(classify("https://www.youtube.com/shorts/abc", ""), ContentKind::Video);
        assert_eq!(classify("https://www.tiktok.com/@someone/video/1", ""), ContentKind::Video);
        assert_eq!(classify("https://instagram.com/p/abc", ""), ContentKind::Image);
        assert_eq!(classify("https://instagram.com/reel/abc", ""), ContentKind::Video);
        assert_eq!(classify("https://twitter.com/someone/status/1", ""), ContentKind::Social);
        assert_eq!(classify("https://x.com/someone", ""), ContentKind::Social);
        assert_eq!(classify("https://reddit.com/r/rust", "text/html"), ContentKind::Social);
    }

    #[test]
    fn test_classify_extensions() {
        assert_eq!(classify("https://a.com/x.pdf", ""), ContentKind::Document);
        assert_eq!(classify("https://a.com/photo.JPG", ""), ContentKind::Image);
        assert_eq!(classify("https://a.com/clip.webm", ""), ContentKind::Video);
        assert_eq!(classify("https://a.com/song.mp3", ""), ContentKind::Audio);
        assert_eq!(classify("https://a.com/deck.pptx", ""), ContentKind::Document);
    }

    #[test]
    fn test_classify_extension_ignores_query() {
        assert_eq!(classify("https://a.com/x.pdf?download=1", ""), ContentKind::Document);
    }

    #[test]
    fn test_classify_headers() {
        assert_eq!(classify("https://a.com/x", "image/png"), ContentKind::Image);
        assert_eq!(classify("https://a.com/x", "video/mp4"), ContentKind::Video);
        assert_eq!(classify("https://a.com/x", "audio/mpeg"), ContentKind::Audio);
        assert_eq!(classify("https://a.com/x", "application/pdf"), ContentKind::Document);
        assert_eq!(classify("https://a.com/x", "application/vnd.ms-excel"), ContentKind::Document);
        assert_eq!(classify("https://a.com/", "text/html; charset=utf-8"), ContentKind::Article);
        assert_eq!(classify("https://a.com/x", "application/octet-stream"), ContentKind::Unknown);
    }

    #[test]
    fn test_classify_platform_beats_header() {
        // URL patterns are checked before the header.
        assert_eq!(classify("https://youtube.com/watch?v=x", "image/png"), ContentKind::Video);
    }

    #[test]
    fn test_refine_passes_through_concrete_kinds() {
        let html = Html::parse_document("<video></video>");
        assert_eq!(refine(ContentKind::Document, &html), ContentKind::Document);
        assert_eq!(refine(ContentKind::Image, &html), ContentKind::Image);
    }

    #[test]
    fn test_refine_video_element() {
        let html = Html::parse_document("<html><body><video src='a.mp4'></video></body></html>");
        assert_eq!(refine(ContentKind::Article, &html), ContentKind::Video);
    }

    #[test]
    fn test_refine_video_iframe() {
        let html = Html::parse_document(
            r#"<html><body><iframe src="https://www.YouTube.com/embed/abc"></iframe></body></html>"#,
        );
        assert_eq!(refine(ContentKind::Unknown, &html), ContentKind::Video);
    }

    #[test]
    fn test_refine_ignores_unrelated_iframe() {
        let html = Html::parse_document(r#"<html><body><iframe src="https://maps.example/embed"></iframe></body></html>"#);
        assert_eq!(refine(ContentKind::Article, &html), ContentKind::Article);
    }

    #[test]
    fn test_refine_og_type_image() {
        let html = Html::parse_document(r#"<html><head><meta property="og:type" content="image"></head></html>"#);
        assert_eq!(refine(ContentKind::Article, &html), ContentKind::Image);
    }

    #[test]
    fn test_refine_social_site_name() {
        let html = Html::parse_document(r#"<html><head><meta property="og:site_name" content="Reddit"></head></html>"#);
        assert_eq!(refine(ContentKind::Article, &html), ContentKind::Social);
    }

    #[test]
    fn test_refine_defaults_to_article() {
        let html = Html::parse_document("<html><body><p>plain page</p></body></html>");
        assert_eq!(refine(ContentKind::Unknown, &html), ContentKind::Article);
    }
}
