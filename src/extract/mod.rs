// src/extract/mod.rs
// =============================================================================
// Everything the crawler reads out of a fetched page.
//
// Submodules:
// - clean: raw text -> cleaned, printable text
// - html: links / text / description from HTML pages
// - markdown: links / text from raw Markdown pages
//
// All of it is synchronous CPU work with no network or shared state, so
// the coordinator can run it on the blocking thread pool.
// =============================================================================

mod clean;
mod html;
mod markdown;

use serde::Serialize;
use url::Url;

pub use clean::{clean_text, collapse_whitespace, strip_boilerplate};
pub use html::{html_description, html_links, html_text, parse_html};
pub use markdown::{markdown_links, markdown_text, parse_markdown};

/// How a fetched body should be read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PageKind {
    Html,
    Markdown,
    PlainText,
}

impl PageKind {
    /// Picks a reader from the Content-Type header, falling back to the URL
    /// extension. Returns None for content the crawler does not index
    /// (images, PDFs, archives, ...).
    pub fn detect(url: &str, content_type: Option<&str>) -> Option<PageKind> {
        let markdown_path = has_markdown_extension(url);

        let Some(content_type) = content_type else {
            // Servers that omit the header are almost always serving HTML
            return Some(if markdown_path { PageKind::Markdown } else { PageKind::Html });
        };

        let mime = content_type
            .split(';')
            .next()
            .unwrap_or("")
            .trim()
            .to_ascii_lowercase();

        match mime.as_str() {
            "text/html" | "application/xhtml+xml" => Some(PageKind::Html),
            "text/markdown" | "text/x-markdown" => Some(PageKind::Markdown),
            "text/plain" if markdown_path => Some(PageKind::Markdown),
            "text/plain" => Some(PageKind::PlainText),
            "" => Some(PageKind::Html),
            _ => None,
        }
    }
}

/// What one page contributes to the crawl.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Absolute outgoing link targets, not yet scope-checked
    pub links: Vec<String>,
    /// Cleaned text for the indexer
    pub text: String,
    /// `<meta name="description">`, HTML only
    pub description: Option<String>,
}

/// Reads a fetched body according to its kind.
///
/// `page_url` is the URL the body was served from; relative links are
/// resolved against it.
pub fn parse_page(kind: PageKind, body: &str, page_url: &str, strip_noise: bool) -> ParsedPage {
    let mut page = match kind {
        PageKind::Html => parse_html(body, page_url),
        PageKind::Markdown => parse_markdown(body, page_url),
        PageKind::PlainText => ParsedPage {
            text: clean_text(body),
            ..ParsedPage::default()
        },
    };

    if strip_noise {
        page.text = strip_boilerplate(&page.text);
    }

    page
}

// Resolves an href to an absolute URL.
//
// Pure fragments point back at the current page, and mailto:/tel:/
// javascript:/data: targets are not pages, so they are skipped early.
pub(crate) fn resolve_href(base: &Url, href: &str) -> Option<String> {
    let href = href.trim();
    let lower = href.to_ascii_lowercase();

    if href.is_empty()
        || href.starts_with('#')
        || lower.starts_with("mailto:")
        || lower.starts_with("tel:")
        || lower.starts_with("javascript:")
        || lower.starts_with("data:")
    {
        return None;
    }

    base.join(href).ok().map(|url| url.to_string())
}

fn has_markdown_extension(url: &str) -> bool {
    let path = match Url::parse(url) {
        Ok(parsed) => parsed.path().to_ascii_lowercase(),
        Err(_) => return false,
    };
    path.ends_with(".md") || path.ends_with(".markdown")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_from_content_type() {
        let url = "https://docs.example.com/page";
        assert_eq!(
            PageKind::detect(url, Some("text/html; charset=utf-8")),
            Some(PageKind::Html)
        );
        assert_eq!(
            PageKind::detect(url, Some("text/markdown")),
            Some(PageKind::Markdown)
        );
        assert_eq!(
            PageKind::detect(url, Some("text/plain")),
            Some(PageKind::PlainText)
        );
        assert_eq!(PageKind::detect(url, Some("image/png")), None);
        assert_eq!(PageKind::detect(url, Some("application/pdf")), None);
    }

    #[test]
    fn test_detect_markdown_by_extension() {
        let url = "https://raw.example.com/docs/README.md";
        assert_eq!(PageKind::detect(url, None), Some(PageKind::Markdown));
        assert_eq!(
            PageKind::detect(url, Some("text/plain; charset=utf-8")),
            Some(PageKind::Markdown)
        );
    }

    #[test]
    fn test_missing_content_type_defaults_to_html() {
        assert_eq!(
            PageKind::detect("https://docs.example.com/", None),
            Some(PageKind::Html)
        );
    }

    #[test]
    fn test_resolve_href_skips_non_pages() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(resolve_href(&base, "#section"), None);
        assert_eq!(resolve_href(&base, "MAILTO:a@b.com"), None);
        assert_eq!(resolve_href(&base, "tel:+123"), None);
        assert_eq!(resolve_href(&base, "  "), None);
        assert_eq!(
            resolve_href(&base, " /docs "),
            Some("https://example.com/docs".to_string())
        );
    }

    #[test]
    fn test_resolve_absolute_link() {
        let base = Url::parse("https://example.com/page").unwrap();
        assert_eq!(
            resolve_href(&base, "https://other.com"),
            Some("https://other.com/".to_string())
        );
    }

    #[test]
    fn test_parse_plain_text_has_no_links() {
        let page = parse_page(
            PageKind::PlainText,
            "See https://example.com/x for more",
            "https://example.com/notes.txt",
            false,
        );
        assert!(page.links.is_empty());
        assert_eq!(page.text, "See httpsexample.comx for more");
    }

    #[test]
    fn test_parse_page_strips_boilerplate_when_asked() {
        let html = "<main>Configure the client.</main><footer>Privacy Policy</footer>";
        let kept = parse_page(PageKind::Html, html, "https://example.com/", false);
        let stripped = parse_page(PageKind::Html, html, "https://example.com/", true);
        assert_eq!(kept.text, "Configure the client. Privacy Policy");
        assert_eq!(stripped.text, "Configure the client.");
    }
}
