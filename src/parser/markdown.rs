// src/parser/markdown.rs
// =============================================================================
// This module extracts links and text from Markdown pages.
//
// We use the `pulldown-cmark` crate which:
// - Parses Markdown into events (heading, paragraph, link, etc.)
// - Follows CommonMark
// - Is fast and memory-efficient (it's a streaming parser)
//
// Unlike HTML, relative links in Markdown are resolved against the page URL
// too, so a README linking to "docs/guide.md" leads the crawler there.
// =============================================================================

use pulldown_cmark::{Event, Parser, Tag};
use url::Url;

use super::{resolve_link, PageContent};

// Extracts links and readable text from Markdown
//
// Example input:
//   "Check out [Rust](https://www.rust-lang.org)!"
//
// Example output:
//   links = ["https://www.rust-lang.org/"], text = "Check out Rust !"
pub(super) fn extract_markdown(markdown: &str, base: &Url) -> PageContent {
    let mut content = PageContent::default();

    for event in Parser::new(markdown) {
        match event {
            // In pulldown-cmark 0.9, Link is Tag::Link(link_type, dest_url, title)
            Event::Start(Tag::Link(_link_type, dest_url, _title)) => {
                if let Some(link) = resolve_link(base, &dest_url) {
                    content.links.push(link);
                }
            }

            Event::Text(text) | Event::Code(text) => {
                content.text.push_str(&text);
                content.text.push(' ');
            }

            _ => {}
        }
    }

    content
}
