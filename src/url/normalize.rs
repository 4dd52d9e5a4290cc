use crate::UrlError;
use url::Url;

/// Decides whether an href is worth resolving at all
///
/// Rejects:
/// - empty strings
/// - absolute URLs with a scheme outside http/https (`javascript:`,
///   `mailto:`, `data:`, ...)
/// - absolute URLs with a scheme but no host
/// - `tel+` pseudo-links, which parse as relative paths but are not
///   hyperlinks
///
/// Schemeless (relative) hrefs are accepted for resolution against the
/// page URL.
pub fn valid_href(href: &str) -> bool {
    if href.is_empty() {
        return false;
    }

    if href.starts_with("tel+") {
        return false;
    }

    match Url::parse(href) {
        Ok(parsed) => {
            let scheme = parsed.scheme();
            if scheme != "http" && scheme != "https" {
                return false;
            }
            parsed.host_str().is_some()
        }
        // No scheme: a relative link, resolved later against the base
        Err(url::ParseError::RelativeUrlWithoutBase) => true,
        Err(_) => false,
    }
}

/// Resolves an href against its page URL into canonical form
///
/// Joins relative hrefs against the base, then strips any fragment. The
/// result is the deduplication key for the frontier and visited sets: two
/// URLs that differ only by fragment canonicalize identically.
///
/// Canonicalization is idempotent: re-resolving an already-canonical URL
/// against itself yields the same URL.
pub fn canonicalize(base: &Url, href: &str) -> Result<Url, UrlError> {
    let mut resolved = base
        .join(href)
        .map_err(|e| UrlError::Parse(format!("{href}: {e}")))?;
    resolved.set_fragment(None);
    Ok(resolved)
}

/// Parses and canonicalizes a seed URL
///
/// Seeds must be absolute http/https URLs with a host; the fragment is
/// stripped before any scope check.
pub fn canonical_seed(raw: &str) -> Result<Url, UrlError> {
    let mut url = Url::parse(raw).map_err(|e| UrlError::Parse(format!("{raw}: {e}")))?;

    if url.scheme() != "http" && url.scheme() != "https" {
        return Err(UrlError::InvalidScheme(url.scheme().to_string()));
    }
    if url.host_str().is_none() {
        return Err(UrlError::MissingHost);
    }

    url.set_fragment(None);
    Ok(url)
}

/// The scheme gate applied before a URL may enter the frontier
///
/// `https` always passes; `http` passes only when explicitly allowed.
pub fn scheme_allowed(url: &Url, allow_http: bool) -> bool {
    match url.scheme() {
        "https" => true,
        "http" => allow_http,
        _ => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn base() -> Url {
        Url::parse("https://a.test/dir/page").unwrap()
    }

    #[test]
    fn test_valid_href_relative() {
        assert!(valid_href("/b"));
        assert!(valid_href("b"));
        assert!(valid_href("../b?q=1"));
    }

    #[test]
    fn test_valid_href_absolute() {
        assert!(valid_href("https://a.test/b"));
        assert!(valid_href("http://a.test/b"));
    }

    #[test]
    fn test_invalid_href_empty() {
        assert!(!valid_href(""));
    }

    #[test]
    fn test_invalid_href_foreign_schemes() {
        assert!(!valid_href("javascript:void(0)"));
        assert!(!valid_href("mailto:x@a.test"));
        assert!(!valid_href("ftp://a.test/file"));
        assert!(!valid_href("data:text/html,hi"));
    }

    #[test]
    fn test_invalid_href_tel_pseudo_link() {
        assert!(!valid_href("tel+12345"));
    }

    #[test]
    fn test_canonicalize_relative() {
        let url = canonicalize(&base(), "/b").unwrap();
        assert_eq!(url.as_str(), "https://a.test/b");

        let url = canonicalize(&base(), "sibling").unwrap();
        assert_eq!(url.as_str(), "https://a.test/dir/sibling");
    }

    #[test]
    fn test_canonicalize_strips_fragment() {
        let url = canonicalize(&base(), "/b#section").unwrap();
        assert_eq!(url.as_str(), "https://a.test/b");
    }

    #[test]
    fn test_fragment_only_difference_dedups() {
        let one = canonicalize(&base(), "/b#x").unwrap();
        let two = canonicalize(&base(), "/b#y").unwrap();
        assert_eq!(one, two);
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let first = canonicalize(&base(), "/b?x=1#frag").unwrap();
        let second = canonicalize(&first, first.as_str()).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_canonical_seed_strips_fragment() {
        let url = canonical_seed("https://a.test/page#top").unwrap();
        assert_eq!(url.as_str(), "https://a.test/page");
    }

    #[test]
    fn test_canonical_seed_rejects_bad_scheme() {
        assert!(matches!(
            canonical_seed("ftp://a.test/"),
            Err(UrlError::InvalidScheme(_))
        ));
    }

    #[test]
    fn test_canonical_seed_rejects_garbage() {
        assert!(canonical_seed("not a url").is_err());
    }

    #[test]
    fn test_scheme_gate() {
        let https = Url::parse("https://a.test/").unwrap();
        let http = Url::parse("http://a.test/").unwrap();

        assert!(scheme_allowed(&https, false));
        assert!(scheme_allowed(&https, true));
        assert!(!scheme_allowed(&http, false));
        assert!(scheme_allowed(&http, true));
    }
}
