// src/crawl/engine.rs
// =============================================================================
// The crawl entry point.
//
// crawl() sets up a fresh visited set and word counter, runs one root task
// over all the start pages, and waits. The root task waits for its siblings,
// which wait for theirs, so when the root task returns every task of the
// crawl has finished. Only then are the counts copied into the result.
//
// ParallelCrawler wraps the same thing behind the WebCrawler trait so the
// crawl itself can be profiled like any other component.
// =============================================================================

use async_trait::async_trait;
use std::sync::Arc;
use tracing::info;

use super::config::CrawlConfig;
use super::result::CrawlResult;
use super::state::{VisitedSet, WordCounts};
use super::task::{explore, CrawlContext};

// Crawls from the configured start pages until the work runs out or the
// deadline passes. Page failures and the deadline are not errors; whatever
// was counted before the crawl stopped is returned.
pub async fn crawl(config: &CrawlConfig) -> CrawlResult {
    let started = config.clock.now();
    let context = Arc::new(CrawlContext {
        deadline: started.checked_add(config.timeout),
        clock: Arc::clone(&config.clock),
        ignored_urls: config.ignored_urls.clone(),
        parser: Arc::clone(&config.parser),
        visited: VisitedSet::default(),
        counts: WordCounts::default(),
    });

    info!(
        start_pages = config.start_pages.len(),
        max_depth = config.max_depth,
        timeout = ?config.timeout,
        "starting crawl"
    );

    explore(
        Arc::clone(&context),
        config.start_pages.clone(),
        config.max_depth,
    )
    .await;

    let result = CrawlResult {
        word_counts: context.counts.snapshot(),
        visited: context.visited.snapshot(),
    };

    info!(
        urls_visited = result.urls_visited(),
        distinct_words = result.word_counts.len(),
        elapsed = ?config.clock.now().saturating_duration_since(started),
        "crawl finished"
    );

    result
}

crate::profiled_interface! {
    /// A crawler as seen by the rest of the program.
    pub trait WebCrawler: Send + Sync {
        #[profiled]
        async fn crawl(&self) -> CrawlResult;

        /// Worker threads this crawler wants
        fn max_parallelism(&self) -> usize;
    }
}

/// Crawls with tasks spread over the tokio worker pool.
pub struct ParallelCrawler {
    config: CrawlConfig,
    parallelism: usize,
}

impl ParallelCrawler {
    pub fn new(config: CrawlConfig, parallelism: usize) -> Self {
        Self {
            config,
            parallelism,
        }
    }
}

#[async_trait]
impl WebCrawler for ParallelCrawler {
    async fn crawl(&self) -> CrawlResult {
        crawl(&self.config).await
    }

    fn max_parallelism(&self) -> usize {
        self.parallelism
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::clock::FakeClock;
    use crate::parser::stub::StubParser;
    use crate::parser::PageParser;
    use crate::profiler::Profiler;
    use std::collections::HashMap;
    use std::time::Duration;

    fn config(parser: Arc<StubParser>, start_pages: &[&str], max_depth: usize) -> CrawlConfig {
        CrawlConfig::builder()
            .start_pages(start_pages.iter().copied())
            .max_depth(max_depth)
            .timeout(Duration::from_secs(60))
            .parser(parser)
            .build()
            .unwrap()
    }

    fn words(pairs: &[(&str, u64)]) -> HashMap<String, u64> {
        pairs.iter().map(|(w, c)| (w.to_string(), *c)).collect()
    }

    fn visited(urls: &[&str]) -> Vec<String> {
        urls.iter().map(|url| url.to_string()).collect()
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_failed_page_is_visited_but_adds_nothing() {
        let parser = Arc::new(
            StubParser::new()
                .page("A", &["B", "C"], &[("x", 2)])
                .page("B", &[], &[("x", 1), ("y", 1)])
                .failing("C", 500),
        );

        let result = crawl(&config(parser.clone(), &["A"], 2)).await;

        assert_eq!(result.word_counts, words(&[("x", 3), ("y", 1)]));
        assert_eq!(
            result.visited.into_iter().collect::<Vec<_>>(),
            visited(&["A", "B", "C"])
        );
        assert_eq!(parser.calls("C"), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_duplicate_start_pages_are_parsed_once() {
        let parser = Arc::new(StubParser::new().page("A", &[], &[("x", 4)]));

        let result = crawl(&config(parser.clone(), &["A", "A", "A"], 1)).await;

        assert_eq!(result.word_counts, words(&[("x", 4)]));
        assert_eq!(result.urls_visited(), 1);
        assert_eq!(parser.calls("A"), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_zero_depth_parses_nothing() {
        let parser = Arc::new(StubParser::new().page("A", &["B"], &[("x", 1)]));

        let result = crawl(&config(parser.clone(), &["A", "B"], 0)).await;

        assert!(result.word_counts.is_empty());
        assert!(result.visited.is_empty());
        assert_eq!(parser.total_calls(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_depth_limits_hops() {
        let parser = Arc::new(
            StubParser::new()
                .page("A", &["B"], &[("a", 1)])
                .page("B", &["C"], &[("b", 1)])
                .page("C", &[], &[("c", 1)]),
        );

        let result = crawl(&config(parser.clone(), &["A"], 2)).await;

        assert_eq!(result.word_counts, words(&[("a", 1), ("b", 1)]));
        assert_eq!(parser.calls("C"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_cycles_terminate_and_each_page_is_parsed_once() {
        // Every page links to every page, including itself
        let all = ["A", "B", "C", "D"];
        let parser = Arc::new(
            all.iter()
                .fold(StubParser::new(), |parser, url| parser.page(url, &all, &[("w", 1)])),
        );

        let result = crawl(&config(parser.clone(), &["A", "C"], 10)).await;

        assert_eq!(result.word_counts, words(&[("w", 4)]));
        assert_eq!(result.urls_visited(), 4);
        for url in all {
            assert_eq!(parser.calls(url), 1, "{url} parsed more than once");
        }
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 8)]
    async fn test_wide_graph_counts_are_exact() {
        // A root linking to 50 pages that all link to one shared leaf
        let children: Vec<String> = (0..50).map(|i| format!("child-{i}")).collect();
        let child_refs: Vec<&str> = children.iter().map(String::as_str).collect();

        let parser = children.iter().fold(
            StubParser::new()
                .page("root", &child_refs, &[("root", 1)])
                .page("leaf", &[], &[("leaf", 7)]),
            |parser, child| parser.page(child, &["leaf", "root"], &[("child", 2)]),
        );
        let parser = Arc::new(parser);

        let result = crawl(&config(parser.clone(), &["root"], 3)).await;

        assert_eq!(
            result.word_counts,
            words(&[("root", 1), ("child", 100), ("leaf", 7)])
        );
        assert_eq!(result.urls_visited(), 52);
        assert_eq!(parser.calls("leaf"), 1);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_ignored_urls_are_never_visited() {
        let parser = Arc::new(
            StubParser::new()
                .page(
                    "https://site.test/",
                    &["https://site.test/private/1", "https://site.test/ok"],
                    &[("home", 1)],
                )
                .page("https://site.test/private/1", &[], &[("secret", 1)])
                .page("https://site.test/ok", &[], &[("ok", 1)]),
        );

        let config = CrawlConfig::builder()
            .start_pages(["https://site.test/private/1", "https://site.test/"])
            .max_depth(3)
            .timeout(Duration::from_secs(60))
            .ignored_urls(["https://site\\.test/private/.*"])
            .parser(parser.clone())
            .build()
            .unwrap();
        let result = crawl(&config).await;

        assert_eq!(result.word_counts, words(&[("home", 1), ("ok", 1)]));
        assert!(!result.visited.contains("https://site.test/private/1"));
        assert_eq!(parser.calls("https://site.test/private/1"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_deadline_stops_new_parses() {
        let clock = Arc::new(FakeClock::new());
        // Each parse takes two "minutes" on the fake clock
        let parser = Arc::new(
            StubParser::new()
                .page("A", &["B"], &[("a", 1)])
                .page("B", &["C"], &[("b", 1)])
                .advancing(clock.clone(), Duration::from_secs(120)),
        );

        let config = CrawlConfig::builder()
            .start_pages(["A"])
            .max_depth(5)
            .timeout(Duration::from_secs(60))
            .parser(parser.clone())
            .clock(clock)
            .build()
            .unwrap();
        let result = crawl(&config).await;

        assert_eq!(result.word_counts, words(&[("a", 1)]));
        assert_eq!(parser.calls("B"), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_clock_already_past_deadline_parses_nothing() {
        // A clock that jumps an hour ahead after the crawl reads its start time
        struct JumpingClock {
            inner: FakeClock,
            reads: std::sync::atomic::AtomicUsize,
        }
        impl crate::clock::Clock for JumpingClock {
            fn now(&self) -> std::time::Instant {
                if self.reads.fetch_add(1, std::sync::atomic::Ordering::SeqCst) == 1 {
                    self.inner.advance(Duration::from_secs(3600));
                }
                self.inner.now()
            }
        }

        let parser = Arc::new(StubParser::new().page("A", &["B"], &[("a", 1)]));
        let config = CrawlConfig::builder()
            .start_pages(["A", "B"])
            .max_depth(3)
            .timeout(Duration::from_secs(1))
            .parser(parser.clone())
            .clock(Arc::new(JumpingClock {
                inner: FakeClock::new(),
                reads: Default::default(),
            }))
            .build()
            .unwrap();
        let result = crawl(&config).await;

        assert!(result.word_counts.is_empty());
        assert!(result.visited.is_empty());
        assert_eq!(parser.total_calls(), 0);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_repeated_crawls_do_not_share_state() {
        let parser = Arc::new(StubParser::new().page("A", &[], &[("x", 1)]));
        let config = config(parser.clone(), &["A"], 1);

        let first = crawl(&config).await;
        let second = crawl(&config).await;

        assert_eq!(first, second);
        assert_eq!(parser.calls("A"), 2);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_profiled_parser_and_crawler() {
        let profiler = Profiler::builder()
            .clock(Arc::new(crate::clock::SystemClock))
            .build()
            .unwrap();
        let stub = StubParser::new()
            .page("A", &["B", "C"], &[("x", 2)])
            .page("B", &[], &[("x", 1), ("y", 1)])
            .failing("C", 404);
        let parser: Arc<dyn PageParser> = Arc::new(profiler.wrap(stub));

        let config = CrawlConfig::builder()
            .start_pages(["A"])
            .max_depth(2)
            .timeout(Duration::from_secs(60))
            .parser(parser)
            .build()
            .unwrap();
        let crawler = profiler.wrap(ParallelCrawler::new(config, 4));

        assert_eq!(crawler.max_parallelism(), 4);
        let result = crawler.crawl().await;
        assert_eq!(result.word_counts, words(&[("x", 3), ("y", 1)]));

        let snapshot = profiler.ledger().snapshot();
        let parse = snapshot
            .iter()
            .find(|record| record.key.operation.starts_with("parse"))
            .unwrap();
        assert_eq!(parse.calls, 3);
        assert!(parse.key.implementation.ends_with("StubParser"));

        let crawl = snapshot
            .iter()
            .find(|record| record.key.operation.starts_with("crawl"))
            .unwrap();
        assert_eq!(crawl.calls, 1);
        assert!(crawl.key.implementation.ends_with("ParallelCrawler"));
        assert_eq!(snapshot.len(), 2);
    }
}
