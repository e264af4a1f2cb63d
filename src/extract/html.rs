// src/extract/html.rs
// =============================================================================
// HTML pages: outgoing links, visible text and the meta description.
//
// We use the `scraper` crate (html5ever underneath), which is forgiving:
// malformed markup still produces a tree, so a broken page yields whatever
// links and text could be recovered instead of an error.
// =============================================================================

use scraper::{Html, Node, Selector};
use url::Url;

use super::clean::clean_text;
use super::{resolve_href, ParsedPage};

// Text under these elements is never page content
const HIDDEN_ELEMENTS: [&str; 4] = ["script", "style", "noscript", "template"];

/// Parses an HTML page once and pulls out everything the crawler needs.
pub fn parse_html(markup: &str, page_url: &str) -> ParsedPage {
    let document = Html::parse_document(markup);

    ParsedPage {
        links: document_links(&document, page_url),
        text: clean_text(&visible_text(&document)),
        description: document_description(&document),
    }
}

/// Extracts the cleaned, visible text of an HTML page.
///
/// Script and style contents never appear in the output.
pub fn html_text(markup: &str) -> String {
    let document = Html::parse_document(markup);
    clean_text(&visible_text(&document))
}

/// Extracts every `<a href>` target as an absolute URL.
///
/// Relative hrefs resolve against the page's `<base href>` if it has one,
/// otherwise against the page's own URL (never the crawl's start URL).
pub fn html_links(markup: &str, page_url: &str) -> Vec<String> {
    let document = Html::parse_document(markup);
    document_links(&document, page_url)
}

/// Returns `<meta name="description">` content, if present and non-empty.
pub fn html_description(markup: &str) -> Option<String> {
    let document = Html::parse_document(markup);
    document_description(&document)
}

fn document_links(document: &Html, page_url: &str) -> Vec<String> {
    let mut links = Vec::new();

    // Without a parsable page URL relative links cannot be resolved
    let page = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return links,
    };

    // Constant selectors, known to be valid
    let anchor_selector = Selector::parse("a[href]").unwrap();
    let base_selector = Selector::parse("base[href]").unwrap();

    let base = document
        .select(&base_selector)
        .next()
        .and_then(|element| element.value().attr("href"))
        .and_then(|href| page.join(href.trim()).ok())
        .unwrap_or(page);

    for element in document.select(&anchor_selector) {
        if let Some(href) = element.value().attr("href") {
            if let Some(absolute_url) = resolve_href(&base, href) {
                links.push(absolute_url);
            }
        }
    }

    links
}

fn visible_text(document: &Html) -> String {
    let mut parts: Vec<&str> = Vec::new();

    for node in document.root_element().descendants() {
        let Node::Text(text) = node.value() else {
            continue;
        };

        let hidden = node.ancestors().any(|ancestor| match ancestor.value() {
            Node::Element(element) => HIDDEN_ELEMENTS.contains(&element.name()),
            _ => false,
        });

        let text = text.trim();
        if !hidden && !text.is_empty() {
            parts.push(text);
        }
    }

    parts.join(" ")
}

fn document_description(document: &Html) -> Option<String> {
    let selector = Selector::parse(r#"meta[name="description"]"#).unwrap();

    document
        .select(&selector)
        .filter_map(|element| element.value().attr("content"))
        .map(str::trim)
        .find(|content| !content.is_empty())
        .map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_content_never_in_text() {
        let html = r#"<script>evil()</script><p>Hello\u0041 World!</p>"#;
        assert_eq!(html_text(html), "HelloA World!");
    }

    #[test]
    fn test_style_and_noscript_removed() {
        let html = r#"
            <html><head><style>body { color: red; }</style></head>
            <body><noscript>enable js</noscript><h1>Install</h1><p>Run   the
            installer.</p></body></html>
        "#;
        assert_eq!(html_text(html), "Install Run the installer.");
    }

    #[test]
    fn test_text_nodes_are_space_separated() {
        let html = "<ul><li>one</li><li>two</li></ul><p>three</p>";
        assert_eq!(html_text(html), "one two three");
    }

    #[test]
    fn test_resolve_relative_link_against_page() {
        let html = r#"<a href="install">Install</a>"#;
        let links = html_links(html, "https://docs.example.com/guide/");
        assert_eq!(links, vec!["https://docs.example.com/guide/install"]);
    }

    #[test]
    fn test_resolve_root_relative_and_parent_links() {
        let html = r#"
            <a href="/docs">Docs</a>
            <a href="../about">About</a>
        "#;
        let links = html_links(html, "https://example.com/page/sub/");
        assert_eq!(
            links,
            vec!["https://example.com/docs", "https://example.com/page/about"]
        );
    }

    #[test]
    fn test_base_href_overrides_page_url() {
        let html = r#"
            <head><base href="/v2/"></head>
            <body><a href="intro">Intro</a></body>
        "#;
        let links = html_links(html, "https://docs.example.com/v1/index.html");
        assert_eq!(links, vec!["https://docs.example.com/v2/intro"]);
    }

    #[test]
    fn test_skip_mailto_and_fragments() {
        let html = r##"
            <a href="mailto:test@example.com">Email</a>
            <a href="#section">Section</a>
            <a href="javascript:void(0)">Click</a>
            <a href="/real">Real</a>
        "##;
        let links = html_links(html, "https://example.com/");
        assert_eq!(links, vec!["https://example.com/real"]);
    }

    #[test]
    fn test_invalid_page_url_yields_no_links() {
        let html = r#"<a href="/docs">Docs</a>"#;
        assert!(html_links(html, "not a url").is_empty());
    }

    #[test]
    fn test_malformed_markup_still_parses() {
        let html = r#"<div><a href="/a">A<p>unclosed <b>bold"#;
        let page = parse_html(html, "https://example.com/");
        assert_eq!(page.links, vec!["https://example.com/a"]);
        assert_eq!(page.text, "A unclosed bold");
    }

    #[test]
    fn test_meta_description() {
        let html = r#"<head><meta name="description" content="  Getting started guide "></head>"#;
        assert_eq!(
            html_description(html),
            Some("Getting started guide".to_string())
        );
        assert_eq!(html_description("<p>no meta</p>"), None);
    }
}
