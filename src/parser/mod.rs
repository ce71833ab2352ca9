// src/parser/mod.rs
// =============================================================================
// This module turns a location into the two things the crawler cares about:
// - the links found on the page (where to go next)
// - how often each word appears on the page
//
// The crawler only ever talks to the PageParser trait. It never knows if a
// page came from the network, from disk, or from a test stub.
//
// Submodules:
// - http: HttpPageParser, the real parser (http://, https:// and file://)
// - html: Extracts links and visible text from HTML pages
// - markdown: Extracts links and text from Markdown pages
// - words: Splits text into words and counts them
// =============================================================================

mod html;
mod http;
mod markdown;
mod words;

#[cfg(test)]
pub mod stub;

use std::collections::HashMap;
use std::path::PathBuf;
use thiserror::Error;

pub use http::HttpPageParser;

/// What a successful parse of one page produces.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ParsedPage {
    /// Outgoing links, in the order they appear on the page
    pub links: Vec<String>,
    /// Word -> number of times it appears on the page
    pub word_counts: HashMap<String, u64>,
}

/// Why a page could not be parsed.
///
/// The crawler treats every variant the same way: the page is a dead end.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid URL '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("HTTP {0}")]
    Status(u16),

    #[error("could not read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported scheme '{0}'")]
    UnsupportedScheme(String),
}

crate::profiled_interface! {
    /// The parse capability used by the crawler.
    pub trait PageParser: Send + Sync {
        #[profiled]
        async fn parse(&self, url: &str) -> Result<ParsedPage, ParseError>;
    }
}

// Text and links pulled out of a page, before the words are counted
#[derive(Debug, Default)]
struct PageContent {
    text: String,
    links: Vec<String>,
}

// Only these link types are worth following
fn is_crawlable_link(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://") || url.starts_with("file://")
}

// Resolves a link (possibly relative) against the page it was found on
//
// Returns None for in-page anchors and for javascript:, mailto: and tel:
// links, and for anything that is not http(s) or file once resolved.
fn resolve_link(base: &url::Url, href: &str) -> Option<String> {
    let href = href.trim();
    if href.is_empty()
        || href.starts_with('#')
        || href.starts_with("mailto:")
        || href.starts_with("tel:")
        || href.starts_with("javascript:")
    {
        return None;
    }

    let resolved = base.join(href).ok()?.to_string();
    is_crawlable_link(&resolved).then_some(resolved)
}
