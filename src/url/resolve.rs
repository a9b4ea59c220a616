//! Anchor href resolution
//!
//! Turns an anchor's href (absolute or relative) into an absolute URL
//! against the page it appeared on, per RFC 3986 reference resolution.

use url::Url;

/// Resolves `href` against `page_url`, returning the absolute URL.
///
/// Handles absolute, path-relative, root-relative, and protocol-relative
/// hrefs. Returns `None` on any parse failure of either input; the caller
/// logs and drops the link.
pub fn resolve_href(page_url: &str, href: &str) -> Option<Url> {
    let base = Url::parse(page_url).ok()?;
    base.join(href).ok()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absolute_href_passes_through() {
        let resolved = resolve_href("http://example.com/page", "http://example.com/other").unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/other");
    }

    #[test]
    fn test_root_relative_href() {
        let resolved = resolve_href("http://example.com/deep/page", "/p1").unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/p1");
    }

    #[test]
    fn test_path_relative_href() {
        let resolved = resolve_href("http://example.com/deep/page", "sibling").unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/deep/sibling");
    }

    #[test]
    fn test_protocol_relative_href() {
        let resolved = resolve_href("https://example.com/page", "//other.com/x").unwrap();
        assert_eq!(resolved.as_str(), "https://other.com/x");
    }

    #[test]
    fn test_parent_relative_href() {
        let resolved = resolve_href("http://example.com/a/b/c", "../d").unwrap();
        assert_eq!(resolved.as_str(), "http://example.com/a/d");
    }

    #[test]
    fn test_invalid_base_returns_none() {
        assert!(resolve_href("not a url", "/p1").is_none());
    }

    #[test]
    fn test_cross_origin_href_still_resolves() {
        // Resolution does not filter by origin; that is same_origin's job
        let resolved = resolve_href("http://example.com/", "https://example.com/p1").unwrap();
        assert_eq!(resolved.as_str(), "https://example.com/p1");
    }
}
