//! Docs-Mirror main entry point
//!
//! This is the command-line interface for the Docs-Mirror documentation mirror.

use anyhow::Context;
use clap::Parser;
use docs_mirror::config::{load_config, validate, Config};
use docs_mirror::crawler::run_crawl;
use std::fs::OpenOptions;
use std::path::PathBuf;
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

/// Docs-Mirror: mirror a documentation site from its sitemaps
///
/// Docs-Mirror walks the site's sitemap index, filters out localized and
/// SDK reference trees, and saves every remaining page under a
/// date-partitioned output directory.
#[derive(Parser, Debug)]
#[command(name = "docs-mirror")]
#[command(version = "1.0.0")]
#[command(about = "Mirror a documentation site from its sitemaps", long_about = None)]
struct Cli {
    /// Optional path to a TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Number of concurrent workers to download files
    #[arg(long)]
    workers: Option<usize>,

    /// Maximum number of documents to queue per sitemap, for testing (0 = unlimited)
    #[arg(long, value_name = "N")]
    test: Option<usize>,

    /// Pause after every download to avoid 403 responses
    #[arg(long)]
    rate_limit: bool,

    /// Write logs to this file instead of stdout
    #[arg(long, value_name = "PATH")]
    logfile: Option<PathBuf>,

    /// Root of the output tree
    #[arg(long, value_name = "DIR")]
    output: Option<String>,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Show the resolved configuration without crawling
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet, cli.logfile.as_ref())?;

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config);
        return Ok(());
    }

    tracing::info!("Starting documentation mirror");
    match run_crawl(&config).await {
        Ok(summary) => {
            tracing::info!(
                "Mirror finished: {} documents saved, {} failed",
                summary.stored,
                summary.fetch_failed + summary.store_failed
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Mirror failed: {}", e);
            Err(e.into())
        }
    }
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool, logfile: Option<&PathBuf>) -> anyhow::Result<()> {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("docs_mirror=info,warn"),
            1 => EnvFilter::new("docs_mirror=debug,info"),
            2 => EnvFilter::new("docs_mirror=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    match logfile {
        Some(path) => {
            let file = OpenOptions::new()
                .create(true)
                .append(true)
                .open(path)
                .with_context(|| format!("Failed to open log file {}", path.display()))?;

            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_writer(Mutex::new(file))
                .with_ansi(false)
                .with_target(false)
                .init();
            tracing::info!("Debug mode enabled - logs written to file.");
        }
        None => {
            tracing_subscriber::fmt()
                .with_env_filter(filter)
                .with_target(false)
                .with_thread_ids(false)
                .with_file(false)
                .init();
        }
    }

    Ok(())
}

/// Loads the config file (or defaults) and applies command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => {
            tracing::info!("Loading configuration from: {}", path.display());
            load_config(path)
                .with_context(|| format!("Failed to load configuration {}", path.display()))?
        }
        None => Config::default(),
    };

    if let Some(workers) = cli.workers {
        config.crawler.workers = workers;
    }
    if let Some(limit) = cli.test {
        config.crawler.document_limit = limit;
    }
    if cli.rate_limit {
        config.crawler.rate_limit = true;
    }
    if let Some(output) = &cli.output {
        config.output.base_dir = output.clone();
    }

    validate(&config).context("Invalid configuration")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config) {
    println!("=== Docs-Mirror Dry Run ===\n");

    println!("Crawler:");
    println!("  Root sitemap: {}", config.crawler.sitemap_url);
    println!("  Workers: {}", config.crawler.workers);
    match config.crawler.document_limit {
        0 => println!("  Document limit: none"),
        n => println!("  Document limit: {} per sitemap", n),
    }
    if config.crawler.rate_limit {
        println!(
            "  Rate limiting: {}ms pause per worker",
            config.crawler.rate_limit_delay_ms
        );
    } else {
        println!("  Rate limiting: off");
    }

    println!("\nFetcher:");
    println!("  Max attempts: {}", config.fetcher.max_attempts);
    println!("  Backoff: {}ms", config.fetcher.backoff_ms);
    println!("  User agents: {}", config.fetcher.user_agents.len());

    println!("\nFilter:");
    println!("  Host: {}", config.filter.host);
    println!("  Exclude locales: {}", config.filter.exclude_locales);
    println!(
        "  Excluded segments ({}):",
        config.filter.excluded_segments.len() + 1
    );
    println!("    - cdk");
    for segment in &config.filter.excluded_segments {
        println!("    - {}", segment);
    }

    println!("\nOutput:");
    println!("  Base directory: {}", config.output.base_dir);
    println!("  Index file: {}", config.output.index_file);

    println!("\n✓ Configuration is valid");
}
