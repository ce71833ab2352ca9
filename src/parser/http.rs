// src/parser/http.rs
// =============================================================================
// The real page parser.
//
// Key functionality:
// - Fetches http:// and https:// pages with a shared reqwest client
// - Reads file:// pages straight from disk (handy for offline crawls)
// - Picks the Markdown or HTML extractor based on the content type
// - Counts words, skipping the configured ignored words
//
// Any failure (bad URL, network error, non-2xx status, missing file) comes
// back as a ParseError. The crawler treats that page as a dead end.
// =============================================================================

use async_trait::async_trait;
use reqwest::Client;
use std::time::Duration;
use tracing::debug;
use url::Url;

use super::html::extract_html;
use super::markdown::extract_markdown;
use super::words::count_words;
use super::{PageParser, ParseError, ParsedPage};
use crate::patterns::PatternList;

// How to read a page's body
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ContentKind {
    Html,
    Markdown,
}

impl ContentKind {
    // Guesses the content kind from a URL path such as "/docs/README.md"
    fn from_path(path: &str) -> Self {
        let lower = path.to_ascii_lowercase();
        if lower.ends_with(".md") || lower.ends_with(".markdown") {
            ContentKind::Markdown
        } else {
            ContentKind::Html
        }
    }
}

/// Fetches pages over HTTP(S) or from disk and parses them.
#[derive(Debug, Clone)]
pub struct HttpPageParser {
    client: Client,
    ignored_words: PatternList,
}

impl HttpPageParser {
    // Creates a parser whose requests give up after `timeout`
    //
    // The client is built once and reused for every page (connection pooling)
    pub fn new(timeout: Duration, ignored_words: PatternList) -> Result<Self, ParseError> {
        let client = Client::builder()
            .timeout(timeout)
            .redirect(reqwest::redirect::Policy::limited(5))
            .build()?;

        Ok(Self {
            client,
            ignored_words,
        })
    }

    async fn fetch(&self, location: &Url) -> Result<(String, ContentKind), ParseError> {
        match location.scheme() {
            "http" | "https" => self.fetch_remote(location).await,
            "file" => fetch_file(location).await,
            other => Err(ParseError::UnsupportedScheme(other.to_string())),
        }
    }

    async fn fetch_remote(&self, location: &Url) -> Result<(String, ContentKind), ParseError> {
        let response = self.client.get(location.clone()).send().await?;

        if !response.status().is_success() {
            return Err(ParseError::Status(response.status().as_u16()));
        }

        let declared_markdown = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .is_some_and(|value| value.contains("markdown"));

        let kind = if declared_markdown {
            ContentKind::Markdown
        } else {
            ContentKind::from_path(location.path())
        };

        Ok((response.text().await?, kind))
    }
}

async fn fetch_file(location: &Url) -> Result<(String, ContentKind), ParseError> {
    let path = location
        .to_file_path()
        .map_err(|()| ParseError::UnsupportedScheme(format!("file ({location})")))?;

    let body = tokio::fs::read_to_string(&path)
        .await
        .map_err(|source| ParseError::Io {
            path: path.clone(),
            source,
        })?;

    Ok((body, ContentKind::from_path(location.path())))
}

#[async_trait]
impl PageParser for HttpPageParser {
    async fn parse(&self, url: &str) -> Result<ParsedPage, ParseError> {
        let location = Url::parse(url).map_err(|source| ParseError::InvalidUrl {
            url: url.to_string(),
            source,
        })?;

        let (body, kind) = self.fetch(&location).await?;
        let content = match kind {
            ContentKind::Html => extract_html(&body, &location),
            ContentKind::Markdown => extract_markdown(&body, &location),
        };

        debug!(
            url,
            links = content.links.len(),
            bytes = body.len(),
            "parsed page"
        );

        Ok(ParsedPage {
            links: content.links,
            word_counts: count_words(&content.text, &self.ignored_words),
        })
    }
}
