// src/extract/markdown.rs
// =============================================================================
// Markdown pages. Some documentation sites serve their sources as raw
// .md files; we read those with `pulldown-cmark` instead of treating the
// Markdown syntax as text.
//
// pulldown-cmark produces a stream of events. A link shows up as
//   Start(Link) -> Text -> End(Link)
// and prose as Text / Code events between block starts and ends.
// =============================================================================

use pulldown_cmark::{Event, LinkType, Parser, Tag};
use url::Url;

use super::clean::clean_text;
use super::{resolve_href, ParsedPage};

/// Parses a Markdown page into links and cleaned text.
pub fn parse_markdown(markdown: &str, page_url: &str) -> ParsedPage {
    ParsedPage {
        links: markdown_links(markdown, page_url),
        text: markdown_text(markdown),
        description: None,
    }
}

/// Extracts link targets, resolved against the page URL.
///
/// Email autolinks (`<someone@example.com>`) are not pages and are skipped.
pub fn markdown_links(markdown: &str, page_url: &str) -> Vec<String> {
    let mut links = Vec::new();

    let page = match Url::parse(page_url) {
        Ok(url) => url,
        Err(_) => return links,
    };

    for event in Parser::new(markdown) {
        if let Event::Start(Tag::Link(link_type, dest_url, _title)) = event {
            if link_type == LinkType::Email {
                continue;
            }
            if let Some(absolute_url) = resolve_href(&page, &dest_url) {
                links.push(absolute_url);
            }
        }
    }

    links
}

/// Extracts the readable text of a Markdown document, then cleans it.
pub fn markdown_text(markdown: &str) -> String {
    let mut text = String::new();

    for event in Parser::new(markdown) {
        match event {
            Event::Text(chunk) | Event::Code(chunk) => {
                text.push_str(&chunk);
                text.push(' ');
            }
            Event::SoftBreak | Event::HardBreak | Event::End(_) => text.push(' '),
            _ => {}
        }
    }

    clean_text(&text)
}
