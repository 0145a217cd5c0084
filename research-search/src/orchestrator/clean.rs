//! Result cleaning: trim, drop incomplete and non-research hits, dedup.
//!
//! Cleaning is idempotent. Markup stripping happens once in the provider
//! parsers, not here, because entity decoding is not.

use std::collections::HashSet;

use scraper::Html;

use crate::types::SearchResult;

use super::url_normalize::{host_matches, host_of, normalize_url};

/// Social and video platforms excluded from research results.
pub const DENYLIST: &[&str] = &[
    "youtube.com",
    "tiktok.com",
    "instagram.com",
    "facebook.com",
    "twitter.com",
    "reddit.com",
];

/// `true` when `url`'s host is a denylisted domain or one of its subdomains.
pub fn is_denied(url: &str) -> bool {
    host_of(url).is_some_and(|host| DENYLIST.iter().any(|d| host_matches(&host, d)))
}

/// Clean a provider's result list, preserving order.
///
/// Fields are trimmed; entries with an empty title or URL, a denylisted
/// host, or a normalised URL already seen are dropped. The first
/// occurrence of a URL wins.
pub fn clean_results(results: Vec<SearchResult>) -> Vec<SearchResult> {
    let mut seen = HashSet::new();
    let before = results.len();

    let cleaned: Vec<SearchResult> = results
        .into_iter()
        .map(|r| SearchResult {
            title: r.title.trim().to_owned(),
            url: r.url.trim().to_owned(),
            snippet: r.snippet.trim().to_owned(),
            source: r.source,
        })
        .filter(|r| !r.title.is_empty() && !r.url.is_empty())
        .filter(|r| {
            let denied = is_denied(&r.url);
            if denied {
                tracing::debug!(url = %r.url, "dropping non-research domain");
            }
            !denied
        })
        .filter(|r| seen.insert(normalize_url(&r.url)))
        .collect();

    tracing::debug!(before, after = cleaned.len(), "search results cleaned");
    cleaned
}

/// Remove tags and decode HTML entities in provider text.
///
/// Providers return snippets with `<b>`/`<strong>` highlighting and
/// entity-escaped punctuation. The text is parsed as an HTML fragment, so a
/// `<` that does not open a tag stays literal. Whitespace runs collapse to
/// one space.
pub fn strip_markup(text: &str) -> String {
    let fragment = Html::parse_fragment(text);
    let plain: String = fragment.root_element().text().collect();
    plain.split_whitespace().collect::<Vec<_>>().join(" ")
}
