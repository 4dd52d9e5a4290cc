//! The crawl engine
//!
//! This module contains the core crawling logic:
//! - The shared request rate limiter
//! - The per-host session pool
//! - Fetching with retry/backoff and link extraction
//! - Wave-based orchestration of the whole crawl

mod fetcher;
mod limiter;
mod orchestrator;
mod sessions;

pub use fetcher::{fetch_page, FetchContext, FetchOutcome};
pub use limiter::RateLimiter;
pub use orchestrator::{CrawlOutcome, Orchestrator};
pub use sessions::SessionPool;

use crate::config::CrawlConfig;
use crate::Result;
use tokio::sync::watch;

/// Runs a complete crawl with external cancellation support
///
/// Flip the watch channel to `true` to cancel: in-flight fetches are
/// aborted, sessions are closed, and the crawl reports
/// [`CrawlOutcome::Aborted`] instead of an error.
///
/// # Returns
///
/// * `Ok(CrawlOutcome::Completed(visited))` - the frontier was exhausted
/// * `Ok(CrawlOutcome::Aborted)` - the crawl was cancelled cleanly
/// * `Err(CrawlError)` - a fatal startup failure, before any network use
pub async fn crawl_with_shutdown(
    config: CrawlConfig,
    shutdown: watch::Receiver<bool>,
) -> Result<CrawlOutcome> {
    Orchestrator::new(config, shutdown)?.run().await
}

/// Runs a complete crawl to completion
///
/// # Example
///
/// ```no_run
/// use scopecrawl::{crawl, CrawlConfig, CrawlOutcome};
///
/// # async fn example() -> scopecrawl::Result<()> {
/// let config = CrawlConfig::new(vec!["https://a.test/".into()], "scope.txt");
/// if let CrawlOutcome::Completed(visited) = crawl(config).await? {
///     println!("Visited {} pages", visited.len());
/// }
/// # Ok(())
/// # }
/// ```
pub async fn crawl(config: CrawlConfig) -> Result<CrawlOutcome> {
    // Keep the sender alive for the duration so the crawl is cancellable
    // in principle but never spuriously aborted.
    let (_tx, rx) = watch::channel(false);
    crawl_with_shutdown(config, rx).await
}
