// src/crawl/config.rs
// =============================================================================
// The settings for one crawl, checked once before anything runs.
//
// A CrawlConfig can only be made through CrawlConfigBuilder::build(), which
// rejects bad input (zero timeout, malformed ignore pattern, no parser).
// Once built it never changes; every crawl task reads the same values.
// =============================================================================

use std::sync::Arc;
use std::time::Duration;

use crate::clock::{Clock, SystemClock};
use crate::error::ConfigError;
use crate::parser::PageParser;
use crate::patterns::PatternList;

pub struct CrawlConfig {
    pub(crate) start_pages: Vec<String>,
    pub(crate) max_depth: usize,
    pub(crate) timeout: Duration,
    pub(crate) ignored_urls: PatternList,
    pub(crate) parser: Arc<dyn PageParser>,
    pub(crate) clock: Arc<dyn Clock>,
}

impl CrawlConfig {
    pub fn builder() -> CrawlConfigBuilder {
        CrawlConfigBuilder::default()
    }

    pub fn start_pages(&self) -> &[String] {
        &self.start_pages
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    pub fn timeout(&self) -> Duration {
        self.timeout
    }
}

#[derive(Default)]
pub struct CrawlConfigBuilder {
    start_pages: Vec<String>,
    max_depth: usize,
    timeout: Duration,
    ignored_urls: Vec<String>,
    parser: Option<Arc<dyn PageParser>>,
    clock: Option<Arc<dyn Clock>>,
}

impl CrawlConfigBuilder {
    /// Start pages, in order. Duplicates are allowed; each page is still
    /// crawled at most once.
    pub fn start_pages<I, S>(mut self, pages: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.start_pages.extend(pages.into_iter().map(Into::into));
        self
    }

    /// How many link hops to parse. 0 parses nothing.
    pub fn max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Regex patterns; a URL fully matching any of them is skipped.
    pub fn ignored_urls<I, S>(mut self, patterns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.ignored_urls.extend(patterns.into_iter().map(Into::into));
        self
    }

    pub fn parser(mut self, parser: Arc<dyn PageParser>) -> Self {
        self.parser = Some(parser);
        self
    }

    /// Defaults to the system clock.
    pub fn clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    pub fn build(self) -> Result<CrawlConfig, ConfigError> {
        if self.timeout.is_zero() {
            return Err(ConfigError::ZeroTimeout);
        }

        let parser = self.parser.ok_or(ConfigError::MissingParser)?;
        let ignored_urls = PatternList::new(&self.ignored_urls)?;

        Ok(CrawlConfig {
            start_pages: self.start_pages,
            max_depth: self.max_depth,
            timeout: self.timeout,
            ignored_urls,
            parser,
            clock: self.clock.unwrap_or_else(|| Arc::new(SystemClock)),
        })
    }
}
