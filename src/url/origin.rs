//! Origin comparison for crawl scoping
//!
//! A crawl is restricted to the origin of its starting URL. Two URLs share an
//! origin when scheme, host, and effective port are all equal. Comparison
//! fails closed: anything that does not parse as an absolute URL with a
//! scheme and a host is never same-origin.

use url::Url;

/// Returns the effective port of a URL: the explicit port if present, else
/// the scheme's well-known default (80 for `http`, 443 for `https`).
///
/// Schemes without a recognized default (`ftp`, `javascript`, `file`, ...)
/// yield `None` when no port is explicit, which makes them non-matching in
/// [`same_origin`] unless both sides carry explicit equal ports.
pub fn effective_port(url: &Url) -> Option<u16> {
    if let Some(port) = url.port() {
        return Some(port);
    }
    match url.scheme() {
        "http" => Some(80),
        "https" => Some(443),
        _ => None,
    }
}

/// Checks whether `candidate` shares an origin with `origin`.
///
/// Scheme and host compare case-insensitively (the `url` crate normalizes
/// both to lowercase during parsing). Parse failures and URLs lacking a
/// scheme or host return false.
pub fn same_origin(candidate: &str, origin: &str) -> bool {
    let (candidate, origin) = match (Url::parse(candidate), Url::parse(origin)) {
        (Ok(c), Ok(o)) => (c, o),
        _ => return false,
    };

    let (candidate_host, origin_host) = match (candidate.host_str(), origin.host_str()) {
        (Some(c), Some(o)) => (c, o),
        _ => return false,
    };

    if candidate.scheme() != origin.scheme() || candidate_host != origin_host {
        return false;
    }

    match (effective_port(&candidate), effective_port(&origin)) {
        (Some(c), Some(o)) => c == o,
        _ => false,
    }
}
