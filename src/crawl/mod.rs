// src/crawl/mod.rs
// =============================================================================
// This module handles the parallel crawl.
//
// Features:
// - Depth-first, link-following crawl from one or more start pages
// - Independent branches run at the same time on the tokio worker pool
// - Each page is parsed at most once, even when many branches reach it
// - A max depth and a deadline bound the crawl
// - Ignored-URL patterns keep whole areas of a site out of the crawl
//
// Submodules:
// - config: CrawlConfig and its builder
// - state: the visited set and word counts shared by all tasks
// - task: the recursive crawl task
// - engine: crawl(), the entry point, and the WebCrawler trait
// - result: the finished crawl and its ranked report
// =============================================================================

mod config;
mod engine;
mod result;
mod state;
mod task;

pub use config::{CrawlConfig, CrawlConfigBuilder};
pub use engine::{crawl, ParallelCrawler, WebCrawler};
pub use result::{popular_words, CrawlReport, CrawlResult, RankedWords};
