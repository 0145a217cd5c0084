//! URL canonicalisation and host helpers.
//!
//! [`normalize_url`] produces the dedup key for search results: two URLs
//! that differ only in case of scheme/host, default port, fragment,
//! tracking parameters, query order or a trailing slash map to the same
//! string. [`host_of`] and [`domain_of`] are shared by the denylist, the
//! extractor and citation metadata.

use url::Url;

/// Query parameters dropped before comparison.
const TRACKING_PARAMS: &[&str] = &[
    "utm_source",
    "utm_medium",
    "utm_campaign",
    "utm_term",
    "utm_content",
    "fbclid",
    "gclid",
    "msclkid",
    "ref",
];

/// Canonicalise a URL for duplicate detection.
///
/// Unparseable input is returned trimmed but otherwise unchanged, so it
/// still dedups against an identical string.
///
/// ```
/// use research_search::orchestrator::url_normalize::normalize_url;
///
/// assert_eq!(
///     normalize_url("https://Example.COM:443/a/?utm_source=x&b=2&a=1#top"),
///     normalize_url("https://example.com/a?a=1&b=2"),
/// );
/// ```
pub fn normalize_url(raw: &str) -> String {
    let raw = raw.trim();
    let Ok(mut parsed) = Url::parse(raw) else {
        return raw.to_owned();
    };

    parsed.set_fragment(None);
    if matches!(
        (parsed.scheme(), parsed.port()),
        ("http", Some(80)) | ("https", Some(443))
    ) {
        let _ = parsed.set_port(None);
    }

    let mut params: Vec<(String, String)> = parsed
        .query_pairs()
        .filter(|(key, _)| !TRACKING_PARAMS.contains(&key.to_ascii_lowercase().as_str()))
        .map(|(k, v)| (k.into_owned(), v.into_owned()))
        .collect();
    params.sort();

    if params.is_empty() {
        parsed.set_query(None);
    } else {
        parsed.query_pairs_mut().clear().extend_pairs(&params);
    }

    let path = parsed.path().to_owned();
    if path.len() > 1 && path.ends_with('/') {
        parsed.set_path(path.trim_end_matches('/'));
    }

    parsed.to_string()
}

/// Lowercased host of `raw`, or `None` when it has none.
pub fn host_of(raw: &str) -> Option<String> {
    Url::parse(raw.trim())
        .ok()?
        .host_str()
        .filter(|h| !h.is_empty())
        .map(str::to_ascii_lowercase)
}

/// Host with a leading `www.` removed; empty when the URL has no host.
pub fn domain_of(raw: &str) -> String {
    host_of(raw)
        .map(|h| h.strip_prefix("www.").map(str::to_owned).unwrap_or(h))
        .unwrap_or_default()
}

/// `true` when `host` equals `domain` or is a subdomain of it.
pub fn host_matches(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}
