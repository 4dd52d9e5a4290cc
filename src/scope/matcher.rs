//! Scope matching against candidate URLs
//!
//! Matching operates on the URL's full `host[:port]` string:
//! - Exact entries match the full string only, never subdomains
//! - Wildcard entries match the bare base domain and any strict subdomain
//!   (suffix match on `"." + base`, so `evil-example.com` never matches
//!   `*.example.com`)

use crate::scope::ScopeEntry;
use url::Url;

/// The ordered, immutable set of validated scope entries
///
/// Loaded once at startup and shared read-only across all concurrent
/// fetches for the remainder of the crawl.
#[derive(Debug, Clone, Default)]
pub struct ScopeList {
    entries: Vec<ScopeEntry>,
}

impl ScopeList {
    /// Creates a scope list from already-validated entries
    pub fn new(entries: Vec<ScopeEntry>) -> Self {
        Self { entries }
    }

    /// Returns the number of entries in the list
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns whether the list has no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Decides whether a URL's host is covered by this scope list
    ///
    /// The match key is the URL's `host[:port]` string; the port participates
    /// only when the URL carries an explicit, non-default port.
    ///
    /// # Examples
    ///
    /// ```
    /// use scopecrawl::{ScopeEntry, ScopeList};
    /// use url::Url;
    ///
    /// let scope = ScopeList::new(vec![ScopeEntry::parse("*.example.com").unwrap()]);
    /// let url = Url::parse("https://a.example.com/page").unwrap();
    /// assert!(scope.is_in_scope(&url));
    /// ```
    pub fn is_in_scope(&self, url: &Url) -> bool {
        let Some(netloc) = netloc_of(url) else {
            return false;
        };

        self.entries
            .iter()
            .any(|entry| matches_entry(entry, &netloc))
    }
}

/// Extracts the `host[:port]` match key from a URL
///
/// Default ports are normalized away by the `url` crate, so the port
/// appears only when it was explicit and non-default in the original URL.
pub fn netloc_of(url: &Url) -> Option<String> {
    let host = url.host_str()?;
    Some(match url.port() {
        Some(port) => format!("{}:{}", host, port),
        None => host.to_string(),
    })
}

/// Checks a single entry against a `host[:port]` string
fn matches_entry(entry: &ScopeEntry, netloc: &str) -> bool {
    let key = entry.key();
    if entry.is_wildcard() {
        // The bare base domain itself is always included.
        netloc == key || netloc.ends_with(&format!(".{}", key))
    } else {
        netloc == key
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scope(entries: &[&str]) -> ScopeList {
        ScopeList::new(
            entries
                .iter()
                .map(|e| ScopeEntry::parse(e).unwrap())
                .collect(),
        )
    }

    fn url(s: &str) -> Url {
        Url::parse(s).unwrap()
    }

    #[test]
    fn test_exact_match() {
        let list = scope(&["example.com"]);
        assert!(list.is_in_scope(&url("https://example.com")));
        assert!(list.is_in_scope(&url("https://example.com/deep/page")));
    }

    #[test]
    fn test_exact_never_matches_subdomain() {
        let list = scope(&["example.com"]);
        assert!(!list.is_in_scope(&url("https://sub.example.com")));
    }

    #[test]
    fn test_wildcard_matches_subdomain() {
        let list = scope(&["*.example.com"]);
        assert!(list.is_in_scope(&url("https://a.example.com")));
        assert!(list.is_in_scope(&url("https://deep.nested.example.com")));
    }

    #[test]
    fn test_wildcard_matches_bare_domain() {
        let list = scope(&["*.example.com"]);
        assert!(list.is_in_scope(&url("https://example.com")));
    }

    #[test]
    fn test_wildcard_respects_dot_boundary() {
        let list = scope(&["*.example.com"]);
        assert!(!list.is_in_scope(&url("https://evil-example.com")));
        assert!(!list.is_in_scope(&url("https://notexample.com")));
    }

    #[test]
    fn test_port_in_match_key() {
        let list = scope(&["example.com:8080"]);
        assert!(list.is_in_scope(&url("https://example.com:8080/")));
        assert!(!list.is_in_scope(&url("https://example.com/")));

        let list = scope(&["example.com"]);
        assert!(!list.is_in_scope(&url("https://example.com:8080/")));
    }

    #[test]
    fn test_default_port_is_normalized_away() {
        // https on 443 parses with no explicit port, so the bare entry matches
        let list = scope(&["example.com"]);
        assert!(list.is_in_scope(&url("https://example.com:443/")));
    }

    #[test]
    fn test_wildcard_with_port() {
        let list = scope(&["*.example.com:8080"]);
        assert!(list.is_in_scope(&url("https://a.example.com:8080/")));
        assert!(!list.is_in_scope(&url("https://a.example.com/")));
    }

    #[test]
    fn test_ipv4_entries() {
        let list = scope(&["127.0.0.1:8443"]);
        assert!(list.is_in_scope(&url("https://127.0.0.1:8443/")));
        assert!(!list.is_in_scope(&url("https://127.0.0.1/")));
    }

    #[test]
    fn test_empty_scope_matches_nothing() {
        let list = ScopeList::default();
        assert!(!list.is_in_scope(&url("https://example.com")));
        assert!(list.is_empty());
    }

    #[test]
    fn test_multiple_entries() {
        let list = scope(&["a.test", "*.b.test"]);
        assert!(list.is_in_scope(&url("https://a.test/")));
        assert!(list.is_in_scope(&url("https://x.b.test/")));
        assert!(!list.is_in_scope(&url("https://c.test/")));
        assert_eq!(list.len(), 2);
    }
}
