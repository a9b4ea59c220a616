//! Keyseek command-line entry point
//!
//! Starts a keyword crawl rooted at the given URL, polls progressive results
//! while the crawl runs, and prints the final list of matching URLs.

use anyhow::Context;
use clap::Parser;
use keyseek::config::load_config;
use keyseek::crawler::{CrawlEngine, CrawlWorker, HttpFetcher};
use keyseek::storage::SqliteStore;
use keyseek::task::TaskRegistry;
use keyseek::CrawlService;
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::mpsc;
use tracing_subscriber::EnvFilter;

/// Keyseek: keyword-triggered, origin-restricted web crawler
///
/// Crawls same-origin pages reachable from URL and reports every page whose
/// content contains KEYWORD. Partial results are printed while the crawl is
/// still running.
#[derive(Parser, Debug)]
#[command(name = "keyseek")]
#[command(version)]
#[command(about = "Keyword-triggered, origin-restricted web crawler", long_about = None)]
struct Cli {
    /// Starting URL; its origin (scheme + host + port) bounds the crawl
    #[arg(value_name = "URL")]
    url: String,

    /// Keyword to search for (4-32 characters, case-insensitive)
    #[arg(value_name = "KEYWORD")]
    keyword: String,

    /// Path to TOML configuration file
    #[arg(short, long, default_value = "keyseek.toml")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load config {}", cli.config.display()))?;

    let store = Arc::new(Mutex::new(
        SqliteStore::new(std::path::Path::new(&config.storage.database_path))
            .context("failed to open crawl database")?,
    ));
    let registry = Arc::new(TaskRegistry::new());

    let (jobs_tx, jobs_rx) = mpsc::unbounded_channel();
    let service = CrawlService::new(Arc::clone(&registry), Arc::clone(&store), jobs_tx);

    let fetcher = HttpFetcher::new(&config.crawler).context("failed to build HTTP client")?;
    let engine = CrawlEngine::new(config.crawler.clone(), fetcher, Arc::clone(&store));
    let worker = Arc::new(CrawlWorker::new(engine, Arc::clone(&registry), store));
    tokio::spawn(worker.run(jobs_rx));

    let id = service.start_crawl(&cli.keyword, &cli.url)?;
    println!("Crawl started: {}", id);

    // Poll progressive results until the crawl finishes
    let mut last_count = 0;
    loop {
        tokio::time::sleep(Duration::from_millis(500)).await;

        let result = match service.get_result(&id)? {
            Some(result) => result,
            None => continue,
        };

        if result.urls.len() > last_count {
            for url in &result.urls[last_count..] {
                println!("  match: {}", url);
            }
            last_count = result.urls.len();
        }

        if result.status == "done" {
            println!(
                "Crawl {} done: {} matching URL(s)",
                result.id,
                result.urls.len()
            );
            break;
        }
    }

    Ok(())
}

/// Sets up the tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("keyseek=info,warn"),
            1 => EnvFilter::new("keyseek=debug,info"),
            2 => EnvFilter::new("keyseek=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
