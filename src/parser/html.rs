// src/parser/html.rs
// =============================================================================
// This module extracts links and visible text from HTML pages.
//
// We use the `scraper` crate which:
// - Parses HTML into a DOM (Document Object Model)
// - Lets us walk every node in the document tree
// - Is built on html5ever (Mozilla's HTML parser)
//
// One walk over the tree collects both:
// - the href of every <a> element, resolved to an absolute URL
// - every text node that a reader would actually see (nothing inside
//   <head>, <script>, <style>, <noscript> or <template>)
// =============================================================================

use scraper::{ElementRef, Html};
use url::Url;

use super::{resolve_link, PageContent};

// Elements whose text never shows up on the rendered page
const HIDDEN_ELEMENTS: &[&str] = &["head", "script", "style", "noscript", "template"];

// Extracts links and visible text from an HTML document
//
// Parameters:
//   html: the HTML content to parse
//   base: the URL of the page (for resolving relative links)
pub(super) fn extract_html(html: &str, base: &Url) -> PageContent {
    let document = Html::parse_document(html);
    let mut content = PageContent::default();

    for node in document.root_element().descendants() {
        if let Some(element) = ElementRef::wrap(node) {
            if element.value().name() == "a" {
                if let Some(link) = element
                    .value()
                    .attr("href")
                    .and_then(|href| resolve_link(base, href))
                {
                    content.links.push(link);
                }
            }
            continue;
        }

        let Some(fragment) = node.value().as_text() else {
            continue;
        };

        let hidden = node
            .ancestors()
            .filter_map(|ancestor| ancestor.value().as_element())
            .any(|element| HIDDEN_ELEMENTS.contains(&element.name()));

        if !hidden {
            content.text.push_str(fragment);
            content.text.push(' ');
        }
    }

    content
}
