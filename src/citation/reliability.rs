//! Heuristic source reliability.
//!
//! Scores are counted in tenths so tier thresholds compare exactly.

use research_search::ExtractedContent;
use research_search::orchestrator::url_normalize::host_matches;

/// Domain labels that mark academic or government sites.
const HIGH_TRUST_LABELS: &[&str] = &["edu", "gov", "pubmed"];

const HIGH_TRUST_DOMAINS: &[&str] = &[
    "nature.com",
    "science.org",
    "arxiv.org",
    "jstor.org",
    "springer.com",
    "wiley.com",
];

const MEDIUM_TRUST_DOMAINS: &[&str] = &[
    "bbc.com",
    "reuters.com",
    "nytimes.com",
    "washingtonpost.com",
    "wikipedia.org",
    "britannica.com",
];

/// Text longer than this earns the content bonus.
const SUBSTANTIAL_TEXT_CHARS: usize = 500;

/// Trust tier of a domain.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrustTier {
    /// Academic, government and major scientific publishers.
    High,
    /// Established news and reference sites.
    Medium,
    /// Everything else.
    Unrated,
}

/// Tier for `domain`, matched on whole labels and domain suffixes.
pub fn trust_tier(domain: &str) -> TrustTier {
    let domain = domain.trim().to_lowercase();
    if domain.split('.').any(|label| HIGH_TRUST_LABELS.contains(&label))
        || HIGH_TRUST_DOMAINS.iter().any(|d| host_matches(&domain, d))
    {
        TrustTier::High
    } else if MEDIUM_TRUST_DOMAINS.iter().any(|d| host_matches(&domain, d)) {
        TrustTier::Medium
    } else {
        TrustTier::Unrated
    }
}

/// Reliability of a source in `[0.5, 1.0]`.
///
/// Base 0.5, plus 0.3 for a high-trust domain or 0.2 for a medium-trust
/// one, plus 0.1 each for authors, a publish date and more than 500
/// characters of text, capped at 1.0.
pub fn reliability_score(content: &ExtractedContent) -> f64 {
    let mut tenths: u8 = 5;
    tenths += match trust_tier(&content.domain) {
        TrustTier::High => 3,
        TrustTier::Medium => 2,
        TrustTier::Unrated => 0,
    };
    if !content.authors.is_empty() {
        tenths += 1;
    }
    if content
        .publish_date
        .as_deref()
        .is_some_and(|d| !d.trim().is_empty())
    {
        tenths += 1;
    }
    if content.text.chars().count() > SUBSTANTIAL_TEXT_CHARS {
        tenths += 1;
    }
    f64::from(tenths.min(10)) / 10.0
}
