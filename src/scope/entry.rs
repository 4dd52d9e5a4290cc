//! Scope entry parsing and structural validation
//!
//! A scope entry is one line of the scope file: a bare domain or IPv4
//! literal, optionally prefixed with `*.` to include subdomains and
//! optionally suffixed with `:port`.

use crate::ScopeError;
use std::net::Ipv4Addr;

/// A validated host specification from the scope file
///
/// Every `ScopeEntry` in memory has passed structural validation; invalid
/// lines are rejected at load time and never silently matched.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScopeEntry {
    /// The host part: a lowercased domain or an IPv4 literal
    host: String,

    /// Explicit port, when the entry carries one
    port: Option<u16>,

    /// Whether the entry had a leading `*.` subdomain marker
    wildcard: bool,
}

impl ScopeEntry {
    /// Parses and validates a single scope file line
    ///
    /// Accepted forms: `host`, `ip`, `host:port`, `ip:port`, `*.host`,
    /// `*.host:port`. The port must be an integer in [0, 65535].
    ///
    /// # Examples
    ///
    /// ```
    /// use scopecrawl::ScopeEntry;
    ///
    /// assert!(ScopeEntry::parse("example.com").is_ok());
    /// assert!(ScopeEntry::parse("*.example.com:8080").is_ok());
    /// assert!(ScopeEntry::parse("10.0.0.1:70000").is_err());
    /// ```
    pub fn parse(line: &str) -> Result<Self, ScopeError> {
        let line = line.trim();
        if line.is_empty() {
            return Err(ScopeError::EmptyEntry);
        }

        let (wildcard, rest) = match line.strip_prefix("*.") {
            Some(rest) => (true, rest),
            None => (false, line),
        };

        let (host, port) = match rest.split_once(':') {
            Some((host, port_str)) => {
                if port_str.is_empty() || !port_str.bytes().all(|b| b.is_ascii_digit()) {
                    return Err(ScopeError::InvalidPort(port_str.to_string()));
                }
                let port = port_str
                    .parse::<u16>()
                    .map_err(|_| ScopeError::InvalidPort(port_str.to_string()))?;
                (host, Some(port))
            }
            None => (rest, None),
        };

        let host = host.to_ascii_lowercase();
        if !is_valid_domain(&host) && !is_valid_ipv4(&host) {
            return Err(ScopeError::InvalidHost(host));
        }

        Ok(Self {
            host,
            port,
            wildcard,
        })
    }

    /// Returns the `host[:port]` string this entry matches against
    pub fn key(&self) -> String {
        match self.port {
            Some(port) => format!("{}:{}", self.host, port),
            None => self.host.clone(),
        }
    }

    /// Returns whether this entry carries the `*.` subdomain marker
    pub fn is_wildcard(&self) -> bool {
        self.wildcard
    }
}

/// Checks whether a string is a syntactically valid domain name
///
/// Requires at least two dot-separated labels, each 1-63 characters of
/// ASCII alphanumerics and hyphens with no leading or trailing hyphen,
/// and an alphabetic top-level label.
fn is_valid_domain(host: &str) -> bool {
    let labels: Vec<&str> = host.split('.').collect();
    if labels.len() < 2 {
        return false;
    }

    for label in &labels {
        if label.is_empty() || label.len() > 63 {
            return false;
        }
        if !label
            .bytes()
            .all(|b| b.is_ascii_alphanumeric() || b == b'-')
        {
            return false;
        }
        if label.starts_with('-') || label.ends_with('-') {
            return false;
        }
    }

    // Top-level label must not look like a number, otherwise IPv4-ish
    // strings with out-of-range octets would slip through as domains.
    labels
        .last()
        .is_some_and(|tld| tld.bytes().all(|b| b.is_ascii_alphabetic()))
}

/// Checks whether a string is a valid dotted-quad IPv4 literal
fn is_valid_ipv4(host: &str) -> bool {
    host.parse::<Ipv4Addr>().is_ok()
}
