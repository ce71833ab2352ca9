// src/lib.rs
// =============================================================================
// link-crawler: a parallel, depth-bounded web crawler that counts words.
//
// Modules:
// - crawl: the parallel crawl engine (crawl(), CrawlConfig, CrawlResult)
// - parser: the PageParser trait and the HTTP/file implementation
// - profiler: transparent method timing (Profiler, profiled_interface!)
// - config: JSON crawl settings
// - clock, patterns, error: shared building blocks
//
// Quick example:
//   let parser = Arc::new(HttpPageParser::new(timeout, PatternList::default())?);
//   let config = CrawlConfig::builder()
//       .start_pages(["https://example.com/"])
//       .max_depth(2)
//       .timeout(timeout)
//       .parser(parser)
//       .build()?;
//   let result = crawl(&config).await;
// =============================================================================

pub mod clock;
pub mod config;
pub mod crawl;
pub mod error;
pub mod parser;
pub mod patterns;
pub mod profiler;
