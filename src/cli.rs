// src/cli.rs
// =============================================================================
// This file defines our command-line interface using the `clap` crate.
//
// Two ways to start a crawl:
// - run:  read every setting from a JSON settings file
// - site: give the start pages and settings as flags
//
// Rust concepts:
// - Derive macros: clap generates the parsing code from these types
// - Option<T>: flags that may be left out
// =============================================================================

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use link_crawler::config::{
    CrawlSettings, DEFAULT_MAX_DEPTH, DEFAULT_POPULAR_WORD_COUNT, DEFAULT_TIMEOUT_SECONDS,
};

#[derive(Parser, Debug)]
#[command(
    name = "link-crawler",
    version,
    about = "Crawl linked pages in parallel and report the most popular words",
    long_about = "link-crawler follows links from one or more start pages, up to a maximum depth \
                  and within a time limit, and counts the words on every page it reaches. \
                  Independent branches of the site are crawled in parallel."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Crawl using a JSON settings file
    ///
    /// Example: link-crawler run crawl.json --json
    Run {
        /// Path to the settings file
        settings: PathBuf,

        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,

        /// Print how long the profiled operations took
        #[arg(long)]
        profile: bool,
    },

    /// Crawl from start pages given on the command line
    ///
    /// Example: link-crawler site https://example.com --max-depth 2
    Site {
        /// One or more start pages (http://, https:// or file://)
        #[arg(required = true)]
        start_pages: Vec<String>,

        /// How many link hops to follow (0 = parse nothing, 1 = only the start pages)
        #[arg(long, default_value_t = DEFAULT_MAX_DEPTH)]
        max_depth: i64,

        /// Stop starting new pages after this many seconds
        #[arg(long, default_value_t = DEFAULT_TIMEOUT_SECONDS)]
        timeout_secs: u64,

        /// Regex for URLs to skip (must match the whole URL); repeatable
        #[arg(long = "ignore-url")]
        ignored_urls: Vec<String>,

        /// Regex for words not to count (must match the whole word); repeatable
        #[arg(long = "ignore-word")]
        ignored_words: Vec<String>,

        /// Worker threads (default: number of CPUs)
        #[arg(long)]
        parallelism: Option<usize>,

        /// How many of the most popular words to report
        #[arg(long, default_value_t = DEFAULT_POPULAR_WORD_COUNT)]
        top: usize,

        /// Print how long the profiled operations took
        #[arg(long)]
        profile: bool,

        /// Print the result as JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

/// How the result should be shown.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OutputOptions {
    pub json: bool,
    pub profile: bool,
}

impl Commands {
    // Turns the subcommand into settings plus output options
    //
    // `load` reads a settings file; it is a parameter so this stays testable
    pub fn into_settings<E>(
        self,
        load: impl FnOnce(&std::path::Path) -> Result<CrawlSettings, E>,
    ) -> Result<(CrawlSettings, OutputOptions), E> {
        match self {
            Commands::Run {
                settings,
                json,
                profile,
            } => Ok((load(settings.as_path())?, OutputOptions { json, profile })),
            Commands::Site {
                start_pages,
                max_depth,
                timeout_secs,
                ignored_urls,
                ignored_words,
                parallelism,
                top,
                profile,
                json,
            } => {
                let settings = CrawlSettings {
                    start_pages,
                    ignored_urls,
                    ignored_words,
                    parallelism,
                    max_depth,
                    timeout_seconds: timeout_secs,
                    popular_word_count: top,
                    ..CrawlSettings::default()
                };
                Ok((settings, OutputOptions { json, profile }))
            }
        }
    }
}
