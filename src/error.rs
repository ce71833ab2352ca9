// src/error.rs
// =============================================================================
// Configuration errors.
//
// These are the only errors a crawl can report to its caller. They are all
// detected while building the configuration, before any page is fetched.
// Problems with individual pages (timeouts, 404s, bad HTML) are NOT errors
// here: a page that fails to parse is simply skipped.
// =============================================================================

use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ConfigError {
    /// maxDepth in a settings file was below zero
    #[error("max depth must not be negative, got {0}")]
    NegativeDepth(i64),

    /// The crawl timeout must leave some time to crawl
    #[error("timeout must be greater than zero")]
    ZeroTimeout,

    /// The worker pool needs at least one thread
    #[error("parallelism must be greater than zero")]
    ZeroParallelism,

    /// An ignored URL or ignored word pattern did not compile
    #[error("invalid pattern '{pattern}': {source}")]
    InvalidPattern {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// No page parser was supplied to the crawl config builder
    #[error("a page parser is required")]
    MissingParser,

    /// The settings file could not be read
    #[error("could not read settings file {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The settings file was not valid settings JSON
    #[error("malformed settings: {0}")]
    Malformed(#[from] serde_json::Error),
}
