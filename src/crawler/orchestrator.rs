//! Crawl orchestration
//!
//! The orchestrator owns the frontier and visited sets and drives the
//! crawl through its states: Initializing (scope and seed validation,
//! no network), Crawling (repeated concurrent waves with a completion
//! barrier), Draining (session teardown), Done. External cancellation
//! reaches Aborted from any state but still drains the session pool.
//!
//! Both sets are mutated only between waves, after the barrier has
//! confirmed no fetch of the current wave is still running; the fetch
//! tasks themselves see immutable snapshots.

use crate::config::{validate, CrawlConfig};
use crate::crawler::sessions::{load_agent_corpus, pick_agent, SessionPool};
use crate::crawler::{fetch_page, FetchContext, FetchOutcome, RateLimiter};
use crate::scope::{load_scope_file, netloc_of, ScopeList};
use crate::url::canonical_seed;
use crate::{CrawlError, Result};
use std::collections::HashSet;
use std::sync::Arc;
use tokio::sync::watch;
use tokio::task::JoinSet;
use url::Url;

/// Terminal result of a crawl
#[derive(Debug)]
pub enum CrawlOutcome {
    /// The frontier was exhausted; contains the full visited set
    Completed(HashSet<Url>),

    /// The crawl was cancelled; sessions were still closed cleanly
    Aborted,
}

/// Owns all crawl state and drives the wave loop
pub struct Orchestrator {
    config: CrawlConfig,
    scope: Arc<ScopeList>,
    limiter: Arc<RateLimiter>,
    pool: SessionPool,
    frontier: HashSet<Url>,
    visited: HashSet<Url>,
    shutdown: watch::Receiver<bool>,
}

impl Orchestrator {
    /// Runs the Initializing state: all validation, no network activity
    ///
    /// Loads and validates the scope list, canonicalizes every seed
    /// (fragment stripped first) and requires it in scope, and draws the
    /// run's user agent when rotation is requested. Any failure here
    /// aborts the crawl before a single request is made.
    pub fn new(config: CrawlConfig, shutdown: watch::Receiver<bool>) -> Result<Self> {
        validate(&config)?;

        let scope = load_scope_file(&config.scope_file)?;

        let mut frontier = HashSet::new();
        for seed in &config.seeds {
            let url = canonical_seed(seed)?;
            if !scope.is_in_scope(&url) {
                return Err(CrawlError::OutOfScopeSeed {
                    url: url.to_string(),
                });
            }
            frontier.insert(url);
        }

        let user_agent = if config.random_agent {
            let corpus = load_agent_corpus(&config.agent_corpus)?;
            let agent = pick_agent(&corpus);
            if agent.is_none() {
                tracing::warn!(
                    "User-agent corpus {} is empty, using the default agent",
                    config.agent_corpus.display()
                );
            }
            agent
        } else {
            None
        };

        let pool = SessionPool::new(config.header_map()?, user_agent);
        let limiter = Arc::new(RateLimiter::new(
            config.max_concurrent_requests,
            config.time_period,
        ));

        Ok(Self {
            config,
            scope: Arc::new(scope),
            limiter,
            pool,
            frontier,
            visited: HashSet::new(),
            shutdown,
        })
    }

    /// Runs the crawl to completion or cancellation
    ///
    /// Each iteration moves the whole frontier into the visited set,
    /// dispatches one concurrent fetch per entry, waits at the wave
    /// barrier, and unions the surviving discovered links back into the
    /// frontier. The loop terminates once a wave discovers nothing new;
    /// the visited set is then the crawl's result.
    pub async fn run(mut self) -> Result<CrawlOutcome> {
        tracing::info!(
            seeds = self.frontier.len(),
            scope_entries = self.scope.len(),
            "Starting crawl"
        );

        let mut wave = 0u32;
        let mut aborted = *self.shutdown.borrow();

        while !self.frontier.is_empty() && !aborted {
            wave += 1;
            let batch: Vec<Url> = self.frontier.drain().collect();
            self.visited.extend(batch.iter().cloned());

            tracing::info!(
                wave,
                dispatched = batch.len(),
                visited = self.visited.len(),
                "Dispatching wave"
            );

            match self.run_wave(batch).await? {
                Some(discovered) => {
                    for url in discovered {
                        if !self.visited.contains(&url) {
                            self.frontier.insert(url);
                        }
                    }
                }
                None => aborted = true,
            }
        }

        // Draining: release every session exactly once, cancelled or not
        self.pool.close_all();

        if aborted {
            tracing::info!(visited = self.visited.len(), "Crawl aborted");
            Ok(CrawlOutcome::Aborted)
        } else {
            tracing::info!(
                waves = wave,
                visited = self.visited.len(),
                "Crawl complete"
            );
            Ok(CrawlOutcome::Completed(self.visited))
        }
    }

    /// Dispatches one wave and waits at its completion barrier
    ///
    /// Returns the union of links discovered by the wave, or `None` when
    /// cancellation interrupted it (in-flight fetches are aborted; their
    /// backoff sleeps are cancel-safe).
    async fn run_wave(&mut self, batch: Vec<Url>) -> Result<Option<HashSet<Url>>> {
        let ctx = Arc::new(FetchContext {
            scope: Arc::clone(&self.scope),
            visited: Arc::new(self.visited.clone()),
            limiter: Arc::clone(&self.limiter),
            allow_http: self.config.allow_http,
            max_retries: self.config.max_retries,
            backoff_factor: self.config.backoff_factor,
        });

        // Acquire or reuse the session for each entry's host before
        // dispatch; a session build failure is fatal, and run() has not
        // yet drained, so close here before surfacing it.
        let mut dispatch = Vec::with_capacity(batch.len());
        for url in batch {
            let Some(netloc) = netloc_of(&url) else {
                tracing::warn!("Skipping frontier entry without a host: {url}");
                continue;
            };
            match self.pool.session_for(&netloc) {
                Ok(session) => dispatch.push((url, session)),
                Err(e) => {
                    self.pool.close_all();
                    return Err(e.into());
                }
            }
        }

        let mut tasks = JoinSet::new();
        for (url, session) in dispatch {
            tasks.spawn(fetch_page(url, session, Arc::clone(&ctx)));
        }

        let mut discovered = HashSet::new();
        loop {
            tokio::select! {
                joined = tasks.join_next() => match joined {
                    Some(Ok(FetchOutcome::Success { links, .. })) => {
                        discovered.extend(links);
                    }
                    Some(Ok(FetchOutcome::Failed { .. })) => {}
                    Some(Err(e)) => {
                        tracing::warn!("Fetch task panicked: {e}");
                    }
                    None => break,
                },
                _ = shutdown_requested(&mut self.shutdown) => {
                    tracing::info!("Shutdown requested, aborting in-flight fetches");
                    tasks.shutdown().await;
                    return Ok(None);
                }
            }
        }

        Ok(Some(discovered))
    }
}

/// Resolves once the shutdown signal flips to true
///
/// Never resolves when the sender side has gone away, so a crawl without
/// a live cancellation handle just runs to completion.
async fn shutdown_requested(shutdown: &mut watch::Receiver<bool>) {
    loop {
        if *shutdown.borrow() {
            return;
        }
        if shutdown.changed().await.is_err() {
            std::future::pending::<()>().await;
        }
    }
}
