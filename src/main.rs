//! Scopecrawl command-line entry point

use anyhow::Context;
use clap::Parser;
use scopecrawl::config::DEFAULT_AGENT_CORPUS;
use scopecrawl::{crawl_with_shutdown, CrawlConfig, CrawlOutcome, ScanType};
use std::path::PathBuf;
use std::time::Duration;
use tokio::sync::watch;
use tracing_subscriber::EnvFilter;

/// Scope-constrained crawler feeding a web vulnerability scanner
#[derive(Parser, Debug)]
#[command(name = "scopecrawl")]
#[command(version)]
#[command(about = "Crawl in-scope pages and hand them to a vulnerability scanner", long_about = None)]
struct Cli {
    /// URL(s) to start crawling at; may be given multiple times
    #[arg(short, long = "url", required = true)]
    url: Vec<String>,

    /// File containing scope entries, e.g. example.com or *.example.com
    #[arg(short = 'f', long)]
    scope_file: PathBuf,

    /// Type of vulnerability to scan for
    #[arg(short, long, value_enum)]
    scan_type: ScanType,

    /// Headers to be sent with every request, as 'Name: value'
    #[arg(short = 'H', long = "header")]
    header: Vec<String>,

    /// Use a user agent drawn at random from the corpus for this run
    #[arg(long, default_value_t = false)]
    random_agent: bool,

    /// Allow URLs communicating over plain HTTP to be crawled
    #[arg(long, default_value_t = false)]
    allow_http: bool,

    /// Maximum number of retries on a URL when trying to crawl it
    #[arg(long, default_value_t = 1)]
    max_retries: u32,

    /// Factor for exponential backoff when attempting retries, in seconds
    #[arg(long, default_value_t = 1.0)]
    backoff_factor: f64,

    /// Maximum number of requests within one rate-limit window
    #[arg(long, default_value_t = 10)]
    max_concurrent_requests: usize,

    /// Rate-limit window length in seconds
    #[arg(long, default_value_t = 60)]
    time_period: u64,

    /// Path to the user-agent corpus file
    #[arg(long, default_value = DEFAULT_AGENT_CORPUS)]
    agent_corpus: PathBuf,

    /// Increase logging verbosity (-v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    fn into_config(self) -> CrawlConfig {
        let mut config = CrawlConfig::new(self.url, self.scope_file);
        config.scan_type = self.scan_type;
        config.headers = self.header;
        config.random_agent = self.random_agent;
        config.allow_http = self.allow_http;
        config.max_retries = self.max_retries;
        config.backoff_factor = self.backoff_factor;
        config.max_concurrent_requests = self.max_concurrent_requests;
        config.time_period = Duration::from_secs(self.time_period);
        config.agent_corpus = self.agent_corpus;
        config
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    setup_logging(cli.verbose, cli.quiet);

    // The engine accepts any well-formed http/https seed; the plain-HTTP
    // policy for seeds is a CLI concern.
    if !cli.allow_http {
        for seed in &cli.url {
            if let Ok(url) = scopecrawl::url::canonical_seed(seed) {
                if url.scheme() == "http" {
                    anyhow::bail!(
                        "Seed URL uses HTTP instead of HTTPS: {seed}\n\
                         To crawl URLs communicating over HTTP, append --allow-http."
                    );
                }
            }
        }
    }

    let scan_type = cli.scan_type;
    let config = cli.into_config();

    // Ctrl-C flips the shutdown signal; the crawl aborts in-flight
    // fetches, closes its sessions, and reports Aborted.
    let (shutdown_tx, shutdown_rx) = watch::channel(false);
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::info!("Interrupt received");
            let _ = shutdown_tx.send(true);
        }
    });

    let outcome = crawl_with_shutdown(config, shutdown_rx)
        .await
        .context("crawl failed to start")?;

    match outcome {
        CrawlOutcome::Completed(visited) => {
            let mut urls: Vec<String> = visited.iter().map(|u| u.to_string()).collect();
            urls.sort();
            for url in &urls {
                println!("{url}");
            }
            tracing::info!(
                "Visited {} pages; handing off to the {:?} scanner",
                urls.len(),
                scan_type
            );
            println!("[*] Done!");
        }
        CrawlOutcome::Aborted => {
            println!("[*] Aborted!");
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
            0 => EnvFilter::new("scopecrawl=info,warn"),
            1 => EnvFilter::new("scopecrawl=debug,info"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();
}
