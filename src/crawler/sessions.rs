//! Per-host session pool
//!
//! One reusable HTTP session per destination `host[:port]`, created
//! lazily on first use and carrying the crawl's configured headers plus
//! the run's user agent. Sessions live until the orchestrator drains the
//! pool at crawl end, on every exit path including cancellation.

use crate::ConfigError;
use rand::seq::SliceRandom;
use reqwest::header::HeaderMap;
use reqwest::Client;
use std::collections::HashMap;
use std::path::Path;
use std::time::Duration;

/// User agent reported when rotation is disabled
const DEFAULT_USER_AGENT: &str = concat!("scopecrawl/", env!("CARGO_PKG_VERSION"));

/// Registry of per-host HTTP sessions
///
/// Creation is idempotent per host for the lifetime of one crawl: the
/// first request to a host builds its session, later requests reuse it
/// and its pooled connections.
pub struct SessionPool {
    sessions: HashMap<String, Client>,
    headers: HeaderMap,
    user_agent: String,
}

impl SessionPool {
    /// Creates an empty pool
    ///
    /// `user_agent` is the agent chosen for this crawl run; `None` falls
    /// back to the crate's own identifier.
    pub fn new(headers: HeaderMap, user_agent: Option<String>) -> Self {
        Self {
            sessions: HashMap::new(),
            headers,
            user_agent: user_agent.unwrap_or_else(|| DEFAULT_USER_AGENT.to_string()),
        }
    }

    /// Returns the session for a host, creating it on first use
    pub fn session_for(&mut self, netloc: &str) -> Result<Client, reqwest::Error> {
        if let Some(client) = self.sessions.get(netloc) {
            return Ok(client.clone());
        }

        let client = build_session(&self.headers, &self.user_agent)?;
        tracing::debug!("Opened session for {netloc}");
        self.sessions.insert(netloc.to_string(), client.clone());
        Ok(client)
    }

    /// Returns the number of open sessions
    pub fn open_sessions(&self) -> usize {
        self.sessions.len()
    }

    /// Releases every open session
    ///
    /// Called exactly once, after the frontier is exhausted or the crawl
    /// is cancelled. Must not run while any fetch is outstanding.
    pub fn close_all(&mut self) {
        let count = self.sessions.len();
        self.sessions.clear();
        tracing::info!("Closed {count} host sessions");
    }
}

/// Builds one host session with the crawl's headers and timeouts
///
/// The connect and total-request timeouts are enforced per request,
/// independently of the retry policy; a timeout surfaces to the fetch
/// pipeline as a retryable failure.
fn build_session(headers: &HeaderMap, user_agent: &str) -> Result<Client, reqwest::Error> {
    Client::builder()
        .user_agent(user_agent)
        .default_headers(headers.clone())
        .connect_timeout(Duration::from_secs(5))
        .timeout(Duration::from_secs(10))
        .gzip(true)
        .brotli(true)
        .build()
}

/// Loads the user-agent corpus: one agent string per line
pub fn load_agent_corpus(path: &Path) -> Result<Vec<String>, ConfigError> {
    let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::AgentCorpus {
        path: path.to_path_buf(),
        source,
    })?;

    Ok(contents
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(str::to_string)
        .collect())
}

/// Draws one agent from the corpus for this crawl run
pub fn pick_agent(corpus: &[String]) -> Option<String> {
    corpus.choose(&mut rand::thread_rng()).cloned()
}
