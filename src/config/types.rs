use crate::ConfigError;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use std::path::PathBuf;
use std::time::Duration;

/// Default location of the user-agent corpus file
pub const DEFAULT_AGENT_CORPUS: &str = "data/common-user-agents.txt";

/// Which downstream scanner the visited set is handed to
///
/// The crawl core treats this as an opaque selector; it only produces the
/// visited-URL set the selected scanner consumes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, clap::ValueEnum)]
pub enum ScanType {
    /// Cross-site scripting scan
    Xss,
}

/// Configuration for one crawl run
#[derive(Debug, Clone)]
pub struct CrawlConfig {
    /// Seed URLs the crawl starts from
    pub seeds: Vec<String>,

    /// Path to the scope file (one host entry per line)
    pub scope_file: PathBuf,

    /// Downstream scanner selector
    pub scan_type: ScanType,

    /// Custom headers sent with every request, as raw `Name: value` lines
    pub headers: Vec<String>,

    /// Use a user agent drawn at random from the corpus for this run
    pub random_agent: bool,

    /// Permit crawling plain-HTTP URLs
    pub allow_http: bool,

    /// Maximum number of retries per URL on transient failure
    pub max_retries: u32,

    /// Factor for exponential backoff between retries, in seconds
    pub backoff_factor: f64,

    /// Maximum number of requests within one rate-limit window
    pub max_concurrent_requests: usize,

    /// Length of the rate-limit window
    pub time_period: Duration,

    /// Path to the user-agent corpus, consulted when `random_agent` is set
    pub agent_corpus: PathBuf,
}

impl CrawlConfig {
    /// Creates a configuration with the default knob settings
    ///
    /// Defaults: 1 retry, backoff factor 1.0, at most 10 requests per
    /// 60-second window, HTTPS only, no agent rotation.
    pub fn new(seeds: Vec<String>, scope_file: impl Into<PathBuf>) -> Self {
        Self {
            seeds,
            scope_file: scope_file.into(),
            scan_type: ScanType::Xss,
            headers: Vec::new(),
            random_agent: false,
            allow_http: false,
            max_retries: 1,
            backoff_factor: 1.0,
            max_concurrent_requests: 10,
            time_period: Duration::from_secs(60),
            agent_corpus: PathBuf::from(DEFAULT_AGENT_CORPUS),
        }
    }

    /// Parses the raw header lines into a header map
    ///
    /// Each line must look like `Name: value`.
    pub fn header_map(&self) -> Result<HeaderMap, ConfigError> {
        let mut map = HeaderMap::new();
        for raw in &self.headers {
            let (name, value) = raw
                .split_once(':')
                .ok_or_else(|| ConfigError::InvalidHeader(raw.clone()))?;

            let name = HeaderName::from_bytes(name.trim().as_bytes())
                .map_err(|_| ConfigError::InvalidHeader(raw.clone()))?;
            let value = HeaderValue::from_str(value.trim())
                .map_err(|_| ConfigError::InvalidHeader(raw.clone()))?;
            map.insert(name, value);
        }
        Ok(map)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_cli() {
        let config = CrawlConfig::new(vec!["https://a.test/".into()], "scope.txt");
        assert_eq!(config.max_retries, 1);
        assert_eq!(config.backoff_factor, 1.0);
        assert_eq!(config.max_concurrent_requests, 10);
        assert_eq!(config.time_period, Duration::from_secs(60));
        assert!(!config.allow_http);
        assert!(!config.random_agent);
    }

    #[test]
    fn test_header_map_parses_lines() {
        let mut config = CrawlConfig::new(vec![], "scope.txt");
        config.headers = vec![
            "Authorization: Bearer token".to_string(),
            "X-Custom:  spaced value ".to_string(),
        ];

        let map = config.header_map().unwrap();
        assert_eq!(map.get("authorization").unwrap(), "Bearer token");
        assert_eq!(map.get("x-custom").unwrap(), "spaced value");
    }

    #[test]
    fn test_header_map_rejects_missing_colon() {
        let mut config = CrawlConfig::new(vec![], "scope.txt");
        config.headers = vec!["NoColonHere".to_string()];
        assert!(matches!(
            config.header_map(),
            Err(ConfigError::InvalidHeader(_))
        ));
    }
}
