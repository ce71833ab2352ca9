// src/main.rs
// =============================================================================
// This is the entry point of our CLI application.
//
// What happens here:
// 1. Parse command-line arguments using clap
// 2. Turn them into CrawlSettings (from a JSON file or from flags)
// 3. Build the parser and crawler, both wrapped by the profiler
// 4. Run the crawl on a tokio worker pool sized by `parallelism`
// 5. Print (and optionally save) the most popular words and the timings
// 6. Exit with proper code (0 = success, 2 = error)
//
// Rust concepts used:
// - Arc<dyn Trait>: one parser shared by every crawl task
// - Result<T, E> with anyhow: every setup error ends up in one place
// - An explicit tokio runtime: the worker count comes from the settings,
//   so #[tokio::main] can't be used
// =============================================================================

mod cli; // src/cli.rs - command-line parsing

use anyhow::{Context, Result};
use clap::Parser; // Parser trait enables the parse() method
use std::fs::OpenOptions;
use std::io::Write;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use cli::{Cli, OutputOptions};
use link_crawler::clock::SystemClock;
use link_crawler::config::CrawlSettings;
use link_crawler::crawl::{CrawlConfig, CrawlReport, CrawlResult, ParallelCrawler, WebCrawler};
use link_crawler::parser::{HttpPageParser, PageParser};
use link_crawler::patterns::PatternList;
use link_crawler::profiler::{Profiled, Profiler, TimingLedger, TimingRecord};

fn main() {
    let exit_code = match run() {
        Ok(()) => 0,
        Err(e) => {
            // {:#} prints the whole chain of context, e.g. "invalid settings: ..."
            eprintln!("Error: {:#}", e);
            2
        }
    };

    std::process::exit(exit_code);
}

fn run() -> Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let (settings, output) = cli
        .command
        .into_settings(CrawlSettings::from_path)
        .context("failed to load settings")?;

    if settings.start_pages.is_empty() {
        warn!("no start pages given, nothing will be crawled");
    }

    let ledger = Arc::new(TimingLedger::new());
    let profiler = Profiler::builder()
        .clock(Arc::new(SystemClock))
        .ledger(Arc::clone(&ledger))
        .build()?;
    let crawler = build_crawler(&settings, &profiler)?;

    // The runtime's worker pool is the crawl's thread pool
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .worker_threads(crawler.max_parallelism())
        .enable_all()
        .build()
        .context("failed to start the worker pool")?;
    let result = runtime.block_on(crawler.crawl());

    print_results(&result, &settings, output)?;

    if output.profile || settings.profile_output_path.is_some() {
        report_profile(&ledger, &settings, output)?;
    }

    Ok(())
}

// Logs go to stderr so `--json` output on stdout stays clean
// Set RUST_LOG (e.g. RUST_LOG=link_crawler=debug) to see every page
fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("warn,link_crawler=info")),
        )
        .with_writer(std::io::stderr)
        .init();
}

// Builds the crawler described by the settings
// Parameters:
//   settings: the validated-on-read crawl settings
//   profiler: wraps the page parser and the crawler so both are timed
// Returns: the profiled crawler, ready to run
fn build_crawler(
    settings: &CrawlSettings,
    profiler: &Profiler,
) -> Result<Profiled<ParallelCrawler>> {
    let timeout = settings.timeout()?;
    let ignored_words = PatternList::new(&settings.ignored_words)?;

    let page_parser =
        HttpPageParser::new(timeout, ignored_words).context("failed to build the HTTP client")?;
    let parser: Arc<dyn PageParser> = Arc::new(profiler.wrap(page_parser));

    let config = CrawlConfig::builder()
        .start_pages(settings.start_pages.iter().cloned())
        .max_depth(settings.max_depth()?)
        .timeout(timeout)
        .ignored_urls(settings.ignored_urls.iter().cloned())
        .parser(parser)
        .build()?;

    info!(
        start_pages = config.start_pages().len(),
        max_depth = config.max_depth(),
        timeout = ?config.timeout(),
        "crawl configured"
    );

    Ok(profiler.wrap(ParallelCrawler::new(config, settings.parallelism()?)))
}

// Prints the result either as a table or JSON, and saves it if asked
// Parameters:
//   result: the finished crawl
//   settings: popularWordCount and resultPath come from here
//   output: table or JSON
fn print_results(result: &CrawlResult, settings: &CrawlSettings, output: OutputOptions) -> Result<()> {
    let report = result.report(settings.popular_word_count);

    if let Some(path) = &settings.result_path {
        let json = serde_json::to_string_pretty(&report)?;
        std::fs::write(path, json)
            .with_context(|| format!("failed to write result to {}", path.display()))?;
        info!(path = %path.display(), "result saved");
    }

    if output.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_table(&report);
    }
    Ok(())
}

// Prints the popular words as a human-readable table in the terminal
fn print_table(report: &CrawlReport) {
    println!("{:<40} {:>10}", "WORD", "COUNT");
    println!("{}", "=".repeat(51));

    for (word, count) in &report.word_counts.0 {
        // Truncate long words by characters, not bytes, so we never split a char
        let word_display = if word.chars().count() > 37 {
            format!("{}...", word.chars().take(37).collect::<String>())
        } else {
            word.clone()
        };

        println!("{:<40} {:>10}", word_display, count);
    }

    println!();

    println!("📊 Summary:");
    println!("   🌐 URLs visited: {}", report.urls_visited);
    println!("   📝 Words shown: {}", report.word_counts.0.len());
}

// Writes one line per profiled operation
// With profileOutputPath set the lines are appended to that file, one block
// per run; otherwise they go to the terminal (stderr when printing JSON)
fn report_profile(ledger: &TimingLedger, settings: &CrawlSettings, output: OutputOptions) -> Result<()> {
    let lines: Vec<String> = ledger.snapshot().iter().map(format_timing).collect();

    match &settings.profile_output_path {
        Some(path) => {
            let mut file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("failed to open profile output {}", path.display()))?;
            writeln!(file, "Run with {} profiled operation(s):", lines.len())?;
            for line in &lines {
                writeln!(file, "{}", line)?;
            }
            writeln!(file)?;
            info!(path = %path.display(), "profile saved");
        }
        None if output.json => {
            for line in &lines {
                eprintln!("{}", line);
            }
        }
        None => {
            println!();
            println!("⏱️  Profile:");
            if ledger.is_empty() {
                println!("   (no profiled calls)");
            }
            for line in &lines {
                println!("   {}", line);
            }
        }
    }
    Ok(())
}

// Formats one ledger entry, e.g.
//   link_crawler::parser::http::HttpPageParser#parse(&self, url: &str) -> ... took 1.2s over 14 call(s)
fn format_timing(record: &TimingRecord) -> String {
    format!(
        "{}#{} took {:?} over {} call(s)",
        record.key.implementation, record.key.operation, record.total, record.calls
    )
}
