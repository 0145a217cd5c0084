//! Bibliographic metadata derived from an extracted source.

use chrono::NaiveDate;
use research_search::ExtractedContent;
use research_search::orchestrator::url_normalize::domain_of;
use serde::{Deserialize, Serialize};

const MAX_AUTHORS: usize = 3;
const MAX_TITLE_CHARS: usize = 200;
const NO_DATE: &str = "n.d.";
const UNKNOWN_PUBLISHER: &str = "Unknown Publisher";

/// Date layouts tried, in order, on the part before any `T`.
const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%Y/%m/%d", "%m/%d/%Y", "%d/%m/%Y"];

/// Well-known site names by domain.
const PUBLISHERS: &[(&str, &str)] = &[
    ("wikipedia.org", "Wikipedia"),
    ("nytimes.com", "The New York Times"),
    ("washingtonpost.com", "The Washington Post"),
    ("bbc.com", "BBC"),
    ("cnn.com", "CNN"),
    ("reuters.com", "Reuters"),
    ("nature.com", "Nature"),
    ("science.org", "Science"),
    ("pubmed.ncbi.nlm.nih.gov", "PubMed"),
    ("arxiv.org", "arXiv"),
    ("scholar.google.com", "Google Scholar"),
    ("researchgate.net", "ResearchGate"),
];

/// Fields every citation style renders from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CitationMetadata {
    /// Formatted author list, empty when unknown.
    pub authors: String,
    /// Cleaned title.
    pub title: String,
    /// Site or publisher name.
    pub publisher: String,
    /// Four-digit year or `n.d.`.
    pub date: String,
    /// Source URL.
    pub url: String,
    /// Source domain.
    pub domain: String,
    /// Access date, e.g. `March 05, 2025`.
    pub access_date: String,
}

impl CitationMetadata {
    /// Derive metadata for `content`, accessed on `accessed`.
    ///
    /// # Errors
    ///
    /// Fails for a record with no URL, which cannot be cited.
    pub fn from_content(content: &ExtractedContent, accessed: NaiveDate) -> Result<Self, String> {
        let url = content.url.trim();
        if url.is_empty() {
            return Err("source has no URL".to_owned());
        }

        let domain = if content.domain.is_empty() {
            domain_of(url)
        } else {
            content.domain.clone()
        };

        let mut title = collapse_whitespace(&content.title);
        if title.is_empty() {
            title = content
                .search_title
                .as_deref()
                .map(collapse_whitespace)
                .unwrap_or_default();
        }

        Ok(Self {
            authors: format_authors(&content.authors),
            title: truncate_title(&title),
            publisher: publisher_for(&domain),
            date: publication_year(content.publish_date.as_deref()),
            url: url.to_owned(),
            domain,
            access_date: accessed.format("%B %d, %Y").to_string(),
        })
    }
}

fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn truncate_title(title: &str) -> String {
    match title.char_indices().nth(MAX_TITLE_CHARS) {
        Some((end, _)) => format!("{}...", &title[..end]),
        None => title.to_owned(),
    }
}

/// Join up to three authors: `A`, `A & B`, `A, B, & C`.
///
/// Only the first three entries are considered; blank and single-character
/// names among them are skipped.
pub fn format_authors(authors: &[String]) -> String {
    let cleaned: Vec<&str> = authors
        .iter()
        .take(MAX_AUTHORS)
        .map(|a| a.trim())
        .filter(|a| a.chars().count() > 1)
        .collect();

    match cleaned.as_slice() {
        [] => String::new(),
        [one] => (*one).to_owned(),
        [first, second] => format!("{first} & {second}"),
        [first, second, third, ..] => format!("{first}, {second}, & {third}"),
    }
}

/// Four-digit year of `date`, or `n.d.`.
///
/// The part before any `T` is parsed with each known layout; failing that,
/// the first `20xx` in it is used.
pub fn publication_year(date: Option<&str>) -> String {
    let Some(raw) = date.map(str::trim).filter(|d| !d.is_empty()) else {
        return NO_DATE.to_owned();
    };
    let day = raw.split('T').next().unwrap_or(raw);

    if let Some(parsed) = DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
    {
        return parsed.format("%Y").to_string();
    }
    find_twenty_first_century_year(day).unwrap_or_else(|| NO_DATE.to_owned())
}

fn find_twenty_first_century_year(text: &str) -> Option<String> {
    let bytes = text.as_bytes();
    bytes.windows(4).position(|w| {
        w[0] == b'2' && w[1] == b'0' && w[2].is_ascii_digit() && w[3].is_ascii_digit()
    })
    .map(|start| text[start..start + 4].to_owned())
}

/// Publisher name for `domain`: a known site name, else the capitalized
/// second-level label.
pub fn publisher_for(domain: &str) -> String {
    let domain = domain.trim().to_lowercase();
    let domain = domain.strip_prefix("www.").unwrap_or(&domain);
    if domain.is_empty() {
        return UNKNOWN_PUBLISHER.to_owned();
    }
    if let Some((_, name)) = PUBLISHERS.iter().find(|(d, _)| *d == domain) {
        return (*name).to_owned();
    }

    let labels: Vec<&str> = domain.split('.').collect();
    let main = if labels.len() >= 2 {
        labels[labels.len() - 2]
    } else {
        domain
    };
    capitalize(main)
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
