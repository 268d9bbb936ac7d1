//! Ripple-Crawl main entry point
//!
//! This is the command-line interface for the Ripple-Crawl web crawler.

use anyhow::{bail, Context};
use clap::Parser;
use ripple_crawl::config::{self, Config};
use ripple_crawl::crawler::{Crawler, Fetcher, HttpFetcher, StaticFetcher};
use ripple_crawl::output::{
    print_report, write_markdown_summary, CollectingSink, ConsoleSink, MultiSink, ResultSink,
};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

/// Seed of the built-in demo site
const DEMO_SEED: &str = "https://golang.org/";

/// Ripple-Crawl: a concurrent, depth-bounded web crawler
///
/// Ripple-Crawl fetches a seed page, follows its links concurrently up to a
/// fixed depth, and never fetches the same address twice.
#[derive(Parser, Debug)]
#[command(name = "ripple-crawl")]
#[command(version)]
#[command(about = "A concurrent, depth-bounded web crawler", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: Option<PathBuf>,

    /// Address to start from (overrides the config)
    #[arg(long)]
    seed: Option<String>,

    /// Maximum link hops to follow (overrides the config)
    #[arg(short = 'd', long)]
    max_depth: Option<u32>,

    /// Maximum fetches in flight at once (overrides the config)
    #[arg(long)]
    max_concurrent: Option<u32>,

    /// Write a markdown summary to this path (overrides the config)
    #[arg(long, value_name = "PATH")]
    summary: Option<PathBuf>,

    /// Crawl a small built-in site instead of the network
    #[arg(long, conflicts_with = "config")]
    demo: bool,

    /// Validate settings and show what would be crawled without crawling
    #[arg(long)]
    dry_run: bool,

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

    let config = resolve_config(&cli)?;

    if cli.dry_run {
        handle_dry_run(&config, cli.demo);
        return Ok(());
    }

    handle_crawl(config, cli.demo, cli.quiet).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("ripple_crawl=info,warn"),
            1 => EnvFilter::new("ripple_crawl=debug,info"),
            2 => EnvFilter::new("ripple_crawl=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_writer(std::io::stderr)
        .init();
}

/// Builds the effective configuration from the config file, demo mode and
/// command-line overrides
fn resolve_config(cli: &Cli) -> anyhow::Result<Config> {
    let mut config = match (&cli.config, cli.demo, &cli.seed) {
        (Some(path), _, _) => {
            tracing::info!("Loading configuration from: {}", path.display());
            let (config, hash) = config::load_config_with_hash(path)
                .with_context(|| format!("failed to load {}", path.display()))?;
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            config
        }
        (None, true, _) => Config::for_seed(DEMO_SEED, 4),
        (None, false, Some(seed)) => Config::for_seed(seed.clone(), 1),
        (None, false, None) => bail!("a CONFIG file, --seed or --demo is required"),
    };

    if let Some(seed) = &cli.seed {
        config.crawler.seed = seed.clone();
    }
    if let Some(depth) = cli.max_depth {
        config.crawler.max_depth = depth;
    }
    if let Some(limit) = cli.max_concurrent {
        config.crawler.max_concurrent_fetches = Some(limit);
    }
    if let Some(path) = &cli.summary {
        config.output.summary_path = Some(path.display().to_string());
    }

    config::validate(&config).context("invalid settings")?;
    Ok(config)
}

/// Handles the --dry-run mode: shows what would be crawled
fn handle_dry_run(config: &Config, demo: bool) {
    println!("=== Ripple-Crawl Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Seed: {}", config.crawler.seed);
    println!("  Max depth: {}", config.crawler.max_depth);
    match config.crawler.max_concurrent_fetches {
        Some(limit) => println!("  Max concurrent fetches: {}", limit),
        None => println!("  Max concurrent fetches: unbounded"),
    }
    println!("  Request timeout: {}s", config.crawler.request_timeout);
    println!(
        "  Fetcher: {}",
        if demo { "built-in demo site" } else { "HTTP" }
    );

    println!("\nUser Agent:");
    println!("  {}", config.user_agent.header_value());

    println!("\nOutput:");
    match &config.output.summary_path {
        Some(path) => println!("  Summary: {}", path),
        None => println!("  Summary: none"),
    }

    println!("\n✓ Configuration is valid");
}

/// Handles the main crawl operation
async fn handle_crawl(config: Config, demo: bool, quiet: bool) -> anyhow::Result<()> {
    let fetcher: Arc<dyn Fetcher> = if demo {
        tracing::info!("Crawling the built-in demo site");
        Arc::new(StaticFetcher::sample_site())
    } else {
        Arc::new(HttpFetcher::from_config(&config).context("failed to build HTTP client")?)
    };

    let collected = Arc::new(CollectingSink::new());
    let summarize = config.output.summary_path.is_some();
    let mut sink = MultiSink::new();
    if !quiet {
        // Failures are listed in the summary when one is written
        let console = if summarize {
            ConsoleSink::pages_only()
        } else {
            ConsoleSink::new()
        };
        sink = sink.with(Arc::new(console));
    }
    if summarize {
        sink = sink.with(collected.clone());
    }
    let sink: Arc<dyn ResultSink> = Arc::new(sink);

    let mut crawler = Crawler::new(fetcher, sink);
    if let Some(limit) = config.crawler.max_concurrent_fetches {
        crawler = crawler.with_max_concurrent_fetches(limit as usize);
    }

    let handle = crawler.start(&config.crawler.seed, i64::from(config.crawler.max_depth))?;
    let ctrl_c = tokio::spawn(cancel_on_ctrl_c(handle.cancellation_token()));

    let report = handle.wait().await;
    ctrl_c.abort();

    if !quiet {
        println!();
        print_report(&report);
    }

    if let Some(path) = &config.output.summary_path {
        write_markdown_summary(
            &report,
            &collected.records(),
            &collected.failures(),
            Path::new(path),
        )
        .with_context(|| format!("failed to write summary to {}", path))?;
        tracing::info!("Summary written to: {}", path);
    }

    Ok(())
}

/// Raises `cancel` on the first Ctrl-C
async fn cancel_on_ctrl_c(cancel: CancellationToken) {
    if tokio::signal::ctrl_c().await.is_ok() {
        tracing::warn!("Interrupted, letting in-flight fetches finish");
        cancel.cancel();
    }
}
