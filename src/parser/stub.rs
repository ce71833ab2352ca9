// src/parser/stub.rs
// =============================================================================
// A scripted PageParser for tests.
//
// Pages are registered up front with their links and word counts. Anything
// not registered fails like a 404. Every call is counted so tests can check
// that no page was parsed twice. Optionally each parse moves a FakeClock
// forward, which is how tests push a crawl past its deadline.
// =============================================================================

use async_trait::async_trait;
use dashmap::DashMap;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::{PageParser, ParseError, ParsedPage};
use crate::clock::FakeClock;

#[derive(Default)]
pub struct StubParser {
    pages: HashMap<String, Result<ParsedPage, u16>>,
    calls: DashMap<String, usize>,
    advance: Option<(Arc<FakeClock>, Duration)>,
}

impl StubParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn page(mut self, url: &str, links: &[&str], words: &[(&str, u64)]) -> Self {
        let page = ParsedPage {
            links: links.iter().map(|link| link.to_string()).collect(),
            word_counts: words
                .iter()
                .map(|(word, count)| (word.to_string(), *count))
                .collect(),
        };
        self.pages.insert(url.to_string(), Ok(page));
        self
    }

    pub fn failing(mut self, url: &str, status: u16) -> Self {
        self.pages.insert(url.to_string(), Err(status));
        self
    }

    pub fn advancing(mut self, clock: Arc<FakeClock>, step: Duration) -> Self {
        self.advance = Some((clock, step));
        self
    }

    pub fn calls(&self, url: &str) -> usize {
        self.calls.get(url).map(|count| *count).unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.calls.iter().map(|entry| *entry.value()).sum()
    }
}

#[async_trait]
impl PageParser for StubParser {
    async fn parse(&self, url: &str) -> Result<ParsedPage, ParseError> {
        *self.calls.entry(url.to_string()).or_insert(0) += 1;

        // Give other tasks a chance to interleave with this one
        tokio::task::yield_now().await;

        if let Some((clock, step)) = &self.advance {
            clock.advance(*step);
        }

        match self.pages.get(url) {
            Some(Ok(page)) => Ok(page.clone()),
            Some(Err(status)) => Err(ParseError::Status(*status)),
            None => Err(ParseError::Status(404)),
        }
    }
}
