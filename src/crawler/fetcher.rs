//! Fetch-and-parse pipeline
//!
//! Performs a rate-limited GET with bounded retries and exponential
//! backoff, parses the response body as HTML, and extracts the candidate
//! links that survive normalization and scope filtering.

use crate::crawler::RateLimiter;
use crate::scope::ScopeList;
use crate::url::{canonicalize, scheme_allowed, valid_href};
use reqwest::Client;
use scraper::{Html, Selector};
use std::collections::HashSet;
use std::sync::Arc;
use std::time::Duration;
use url::Url;

/// Backoff delays never exceed this, whatever the factor and attempt
const MAX_BACKOFF: Duration = Duration::from_secs(60);

/// Read-only inputs shared by every fetch task of one wave
pub struct FetchContext {
    /// The immutable scope list
    pub scope: Arc<ScopeList>,

    /// Snapshot of the visited set at wave dispatch
    pub visited: Arc<HashSet<Url>>,

    /// The process-wide rate limiter
    pub limiter: Arc<RateLimiter>,

    /// Whether plain-HTTP links may enter the frontier
    pub allow_http: bool,

    /// Maximum retries per URL on transient failure
    pub max_retries: u32,

    /// Exponential backoff factor in seconds
    pub backoff_factor: f64,
}

/// Tagged outcome of one fetch
///
/// Network failures are values, not errors: the orchestrator consumes
/// both variants uniformly and a failed URL never aborts its wave.
#[derive(Debug)]
pub enum FetchOutcome {
    /// The page was fetched and parsed
    Success {
        /// Raw response body, available to the downstream scanner
        body: String,

        /// In-scope canonical links discovered on the page
        links: Vec<Url>,
    },

    /// Retries were exhausted; the URL contributes no links
    Failed {
        /// Description of the final failure
        reason: String,
    },
}

/// Fetches one URL and extracts its outgoing in-scope links
///
/// Every attempt, the first included, acquires the shared rate limiter
/// before touching the network. Transport errors and non-success HTTP
/// statuses are retried up to `max_retries` times with a delay of
/// `backoff_factor * 2^attempt` seconds between attempts; exhaustion
/// degrades to [`FetchOutcome::Failed`] rather than propagating.
pub async fn fetch_page(url: Url, session: Client, ctx: Arc<FetchContext>) -> FetchOutcome {
    let mut attempt: u32 = 0;

    loop {
        ctx.limiter.acquire().await;

        match try_fetch(&url, &session).await {
            Ok(body) => {
                let links = extract_links(&body, &url, &ctx);
                tracing::debug!("Fetched {url}: {} in-scope links", links.len());
                return FetchOutcome::Success { body, links };
            }
            Err(reason) if attempt >= ctx.max_retries => {
                tracing::warn!("Giving up on {url} after {attempt} retries: {reason}");
                return FetchOutcome::Failed { reason };
            }
            Err(reason) => {
                let delay = backoff_delay(ctx.backoff_factor, attempt);
                tracing::debug!("Fetch of {url} failed ({reason}), retrying in {delay:?}");
                tokio::time::sleep(delay).await;
                attempt += 1;
            }
        }
    }
}

/// Issues a single GET attempt
///
/// A query string on the URL is re-issued as structured parameters
/// against the query-less URL, letting the session layer re-encode it.
/// Any 4xx/5xx status is a failure subject to the caller's retry policy.
async fn try_fetch(url: &Url, session: &Client) -> Result<String, String> {
    let mut request_url = url.clone();
    let params: Vec<(String, String)> = url
        .query_pairs()
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    request_url.set_query(None);

    let mut request = session.get(request_url);
    if !params.is_empty() {
        request = request.query(&params);
    }

    let response = request.send().await.map_err(|e| e.to_string())?;
    let response = response.error_for_status().map_err(|e| e.to_string())?;
    response.text().await.map_err(|e| e.to_string())
}

/// Computes the delay before retry number `attempt`
fn backoff_delay(factor: f64, attempt: u32) -> Duration {
    let secs = factor * 2f64.powi(attempt.min(i32::MAX as u32) as i32);
    if !secs.is_finite() || secs >= MAX_BACKOFF.as_secs_f64() {
        return MAX_BACKOFF;
    }
    Duration::from_secs_f64(secs.max(0.0))
}

/// Extracts the surviving candidate links from a fetched page
///
/// Scans every `<a href>` element, applies href validation, resolves to
/// canonical form against the page URL, and drops anything out of scope,
/// already visited, or gated out by the HTTP policy.
fn extract_links(body: &str, page_url: &Url, ctx: &FetchContext) -> Vec<Url> {
    let document = Html::parse_document(body);
    let mut seen = HashSet::new();
    let mut links = Vec::new();

    if let Ok(selector) = Selector::parse("a[href]") {
        for element in document.select(&selector) {
            let Some(href) = element.value().attr("href") else {
                continue;
            };

            if !valid_href(href) {
                continue;
            }

            let Ok(next_url) = canonicalize(page_url, href) else {
                tracing::debug!("Dropping unresolvable href on {page_url}: {href}");
                continue;
            };

            if !scheme_allowed(&next_url, ctx.allow_http) {
                continue;
            }
            if !ctx.scope.is_in_scope(&next_url) || ctx.visited.contains(&next_url) {
                continue;
            }

            if seen.insert(next_url.clone()) {
                links.push(next_url);
            }
        }
    }

    links
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scope::ScopeEntry;

    fn context(scope_entries: &[&str], allow_http: bool) -> FetchContext {
        let entries = scope_entries
            .iter()
            .map(|e| ScopeEntry::parse(e).unwrap())
            .collect();
        FetchContext {
            scope: Arc::new(ScopeList::new(entries)),
            visited: Arc::new(HashSet::new()),
            limiter: Arc::new(RateLimiter::new(10, Duration::from_secs(1))),
            allow_http,
            max_retries: 0,
            backoff_factor: 0.0,
        }
    }

    fn page_url() -> Url {
        Url::parse("https://a.test/").unwrap()
    }

    #[test]
    fn test_extract_in_scope_links() {
        let ctx = context(&["a.test"], false);
        let body = r#"<html><body>
            <a href="/b">B</a>
            <a href="https://a.test/c#frag">C</a>
            <a href="https://other.test/">Out of scope</a>
        </body></html>"#;

        let links = extract_links(body, &page_url(), &ctx);
        assert_eq!(
            links,
            vec![
                Url::parse("https://a.test/b").unwrap(),
                Url::parse("https://a.test/c").unwrap(),
            ]
        );
    }

    #[test]
    fn test_extract_drops_pseudo_links() {
        let ctx = context(&["a.test"], false);
        let body = r#"<html><body>
            <a href="/b">B</a>
            <a href="tel+12345">Call</a>
            <a href="javascript:void(0)">JS</a>
            <a href="mailto:x@a.test">Mail</a>
        </body></html>"#;

        let links = extract_links(body, &page_url(), &ctx);
        assert_eq!(links, vec![Url::parse("https://a.test/b").unwrap()]);
    }

    #[test]
    fn test_extract_drops_http_when_disallowed() {
        let ctx = context(&["a.test"], false);
        let body = r#"<a href="http://a.test/c">C</a>"#;
        assert!(extract_links(body, &page_url(), &ctx).is_empty());

        let ctx = context(&["a.test"], true);
        assert_eq!(extract_links(body, &page_url(), &ctx).len(), 1);
    }

    #[test]
    fn test_extract_drops_visited() {
        let mut ctx = context(&["a.test"], false);
        let mut visited = HashSet::new();
        visited.insert(Url::parse("https://a.test/b").unwrap());
        ctx.visited = Arc::new(visited);

        let body = r#"<a href="/b">B</a><a href="/c">C</a>"#;
        let links = extract_links(body, &page_url(), &ctx);
        assert_eq!(links, vec![Url::parse("https://a.test/c").unwrap()]);
    }

    #[test]
    fn test_extract_dedups_within_page() {
        let ctx = context(&["a.test"], false);
        let body = r#"<a href="/b">B</a><a href="/b#x">B again</a>"#;
        assert_eq!(extract_links(body, &page_url(), &ctx).len(), 1);
    }

    #[test]
    fn test_backoff_delay_grows_per_attempt() {
        assert_eq!(backoff_delay(1.0, 0), Duration::from_secs(1));
        assert_eq!(backoff_delay(1.0, 2), Duration::from_secs(4));
        assert_eq!(backoff_delay(0.5, 1), Duration::from_secs(1));
        assert_eq!(backoff_delay(0.0, 5), Duration::ZERO);
    }

    #[test]
    fn test_backoff_delay_is_capped() {
        assert_eq!(backoff_delay(1.0, 30), MAX_BACKOFF);
        assert_eq!(backoff_delay(f64::MAX, 1), MAX_BACKOFF);
    }
}
