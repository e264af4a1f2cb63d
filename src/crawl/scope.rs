// src/crawl/scope.rs
// =============================================================================
// Site scope: which URLs belong to the site being crawled.
//
// A scope is derived once from the base URL. A candidate is in scope when,
// after dropping its fragment and query string:
// - it parses as an absolute URL
// - its scheme is http or https
// - its host and explicit port equal the base URL's (no subdomain matching)
//
// The same step canonicalizes the URL, so the string returned by
// canonicalize() is what the crawler stores in its visited set.
// =============================================================================

use url::Url;

use crate::error::{CrawlError, Result};

/// The network location (host and explicit port) a crawl is confined to.
/// Both http and https are accepted on it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SiteScope {
    host: String,
    port: Option<u16>,
}

impl SiteScope {
    /// Derive the scope from the crawl's base URL.
    ///
    /// Fails if the URL is unparsable, not http(s), or has no host.
    pub fn from_base_url(base_url: &str) -> Result<Self> {
        let parsed = Url::parse(base_url.trim()).map_err(|e| CrawlError::InvalidBaseUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        if !is_http_scheme(parsed.scheme()) {
            return Err(CrawlError::UnsupportedScheme {
                url: base_url.to_string(),
                scheme: parsed.scheme().to_string(),
            });
        }

        let host = parsed
            .host_str()
            .filter(|h| !h.is_empty())
            .ok_or_else(|| CrawlError::MissingHost(base_url.to_string()))?;

        Ok(Self {
            host: host.to_string(),
            port: parsed.port(),
        })
    }

    /// True if `candidate` is an absolute http(s) URL on this site.
    pub fn is_valid(&self, candidate: &str) -> bool {
        self.canonicalize(candidate).is_some()
    }

    /// Returns the canonical form of an in-scope URL, or None if the
    /// candidate is empty, malformed, or outside the scope.
    ///
    /// Fragments and query strings never make a page distinct:
    /// `https://docs.example.com/x?y=1#frag` -> `https://docs.example.com/x`
    pub fn canonicalize(&self, candidate: &str) -> Option<String> {
        let stripped = strip_fragment_and_query(candidate.trim());
        if stripped.is_empty() {
            return None;
        }

        // Parse errors mean "not a page of this site", never a crawl failure
        let parsed = Url::parse(stripped).ok()?;

        if !is_http_scheme(parsed.scheme()) {
            return None;
        }
        if parsed.host_str() != Some(self.host.as_str()) || parsed.port() != self.port {
            return None;
        }

        Some(parsed.to_string())
    }
}

fn is_http_scheme(scheme: &str) -> bool {
    scheme == "http" || scheme == "https"
}

// Everything from the first '#' goes, then everything from the first '?'
fn strip_fragment_and_query(url: &str) -> &str {
    let url = url.split('#').next().unwrap_or("");
    url.split('?').next().unwrap_or("")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn docs_scope() -> SiteScope {
        SiteScope::from_base_url("https://docs.example.com/").unwrap()
    }

    #[test]
    fn test_rejects_other_host() {
        assert!(!docs_scope().is_valid("https://other.example.com/x"));
    }

    #[test]
    fn test_rejects_subdomain() {
        assert!(!docs_scope().is_valid("https://api.docs.example.com/x"));
    }

    #[test]
    fn test_rejects_mailto() {
        assert!(!docs_scope().is_valid("mailto:a@b.com"));
    }

    #[test]
    fn test_rejects_empty_and_relative() {
        let scope = docs_scope();
        assert!(!scope.is_valid(""));
        assert!(!scope.is_valid("   "));
        assert!(!scope.is_valid("/relative/path"));
        assert!(!scope.is_valid("#only-a-fragment"));
    }

    #[test]
    fn test_rejects_malformed() {
        assert!(!docs_scope().is_valid("https://docs.example.com:99999/x"));
        assert!(!docs_scope().is_valid("http://[::1"));
    }

    #[test]
    fn test_strips_query_and_fragment() {
        let scope = docs_scope();
        assert!(scope.is_valid("https://docs.example.com/x?y=1#frag"));
        assert_eq!(
            scope.canonicalize("https://docs.example.com/x?y=1#frag"),
            Some("https://docs.example.com/x".to_string())
        );
    }

    #[test]
    fn test_canonicalize_is_idempotent() {
        let scope = docs_scope();
        for url in [
            "https://docs.example.com/guide?page=2",
            "https://docs.example.com/guide#install",
            "https://other.example.com/guide?x#y",
            "ftp://docs.example.com/file",
        ] {
            let once = scope.canonicalize(url);
            match &once {
                Some(canonical) => {
                    assert!(scope.is_valid(canonical));
                    assert_eq!(scope.canonicalize(canonical), once);
                }
                None => assert!(!scope.is_valid(url)),
            }
        }
    }

    #[test]
    fn test_accepts_http_variant_of_same_host() {
        assert!(docs_scope().is_valid("http://docs.example.com/page"));
    }

    #[test]
    fn test_scope_does_not_depend_on_base_scheme() {
        let https = docs_scope();
        let http = SiteScope::from_base_url("http://docs.example.com/").unwrap();
        assert_eq!(https, http);
        assert_eq!(
            http.canonicalize("https://docs.example.com/a"),
            Some("https://docs.example.com/a".to_string())
        );
    }

    #[test]
    fn test_explicit_port_must_match() {
        let scope = SiteScope::from_base_url("http://localhost:8080/docs/").unwrap();
        assert!(scope.is_valid("http://localhost:8080/docs/a"));
        assert!(!scope.is_valid("http://localhost:9090/docs/a"));
        assert!(!scope.is_valid("http://localhost/docs/a"));
    }

    #[test]
    fn test_host_comparison_ignores_case() {
        assert_eq!(
            docs_scope().canonicalize("https://DOCS.Example.com/Page"),
            Some("https://docs.example.com/Page".to_string())
        );
    }

    #[test]
    fn test_base_url_errors() {
        assert!(matches!(
            SiteScope::from_base_url("not a url"),
            Err(CrawlError::InvalidBaseUrl { .. })
        ));
        assert!(matches!(
            SiteScope::from_base_url("ftp://docs.example.com/"),
            Err(CrawlError::UnsupportedScheme { .. })
        ));
        assert!(matches!(
            SiteScope::from_base_url("file:///tmp/index.html"),
            Err(CrawlError::UnsupportedScheme { .. })
        ));
    }
}
