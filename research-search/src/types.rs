//! Core types: search results, provider identification, extracted page content.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use crate::error::SearchError;

/// A single search hit, mapped from a provider-specific response shape.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    /// The title of the result page.
    pub title: String,
    /// The URL of the result page.
    pub url: String,
    /// A text snippet describing the page.
    pub snippet: String,
    /// Tag of the provider that returned this result (e.g. `"serpapi"`).
    pub source: String,
}

/// Search providers the research agent can query.
///
/// The order of [`SearchEngine::all`] is the fallback registration order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SearchEngine {
    /// SerpApi's Google Search endpoint.
    SerpApi,
    /// Bing Web Search API v7.
    Bing,
    /// Brave Search API.
    Brave,
}

impl SearchEngine {
    /// Human-readable provider name.
    pub fn name(&self) -> &'static str {
        match self {
            Self::SerpApi => "SerpApi",
            Self::Bing => "Bing",
            Self::Brave => "Brave",
        }
    }

    /// Stable lowercase identifier, used as [`SearchResult::source`] and in config.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::SerpApi => "serpapi",
            Self::Bing => "bing",
            Self::Brave => "brave",
        }
    }

    /// The provider's own cap on results per call.
    pub fn max_results_per_call(&self) -> usize {
        match self {
            Self::SerpApi => 20,
            Self::Bing => 50,
            Self::Brave => 20,
        }
    }

    /// Default minimum interval between consecutive calls to this provider.
    pub fn default_min_interval(&self) -> Duration {
        match self {
            Self::SerpApi => Duration::from_millis(1000),
            Self::Bing => Duration::from_millis(500),
            Self::Brave => Duration::from_millis(1000),
        }
    }

    /// All providers in fallback registration order.
    pub fn all() -> &'static [SearchEngine] {
        &[Self::SerpApi, Self::Bing, Self::Brave]
    }
}

impl fmt::Display for SearchEngine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchEngine {
    type Err = SearchError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serpapi" | "google" => Ok(Self::SerpApi),
            "bing" => Ok(Self::Bing),
            "brave" => Ok(Self::Brave),
            other => Err(SearchError::Config(format!(
                "unsupported search engine: {other}"
            ))),
        }
    }
}

/// Content extraction strategies, in quality order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ExtractionMethod {
    /// Article-aware parser tuned for news and blog markup.
    Article,
    /// General-purpose boilerplate removal over paragraph blocks.
    Boilerplate,
    /// Readability-style main-content scoring.
    Readability,
    /// Raw markup text scrape, the last resort.
    Raw,
}

impl ExtractionMethod {
    /// Stable identifier recorded on every [`ExtractedContent`].
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Article => "article",
            Self::Boilerplate => "boilerplate",
            Self::Readability => "readability",
            Self::Raw => "raw",
        }
    }

    /// Cleaned text must be strictly longer than this many characters.
    pub fn min_chars(&self) -> usize {
        match self {
            Self::Raw => 50,
            _ => 100,
        }
    }

    /// All strategies in the order they are attempted.
    pub fn all() -> &'static [ExtractionMethod] {
        &[Self::Article, Self::Boilerplate, Self::Readability, Self::Raw]
    }
}

impl fmt::Display for ExtractionMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

/// Readable content extracted from one URL by exactly one strategy.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractedContent {
    /// Page title.
    pub title: String,
    /// Cleaned main text.
    pub text: String,
    /// Short extractive summary of the text.
    pub summary: String,
    /// Authors in document order.
    #[serde(default)]
    pub authors: Vec<String>,
    /// Publish date, ISO-8601 when it could be parsed.
    #[serde(default)]
    pub publish_date: Option<String>,
    /// The URL the content was fetched from.
    pub url: String,
    /// Host part of [`Self::url`].
    pub domain: String,
    /// Number of whitespace-separated words in the extracted text.
    pub word_count: usize,
    /// Which strategy produced this record.
    pub extraction_method: ExtractionMethod,
    /// Title reported by the search provider for this URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_title: Option<String>,
    /// Snippet reported by the search provider for this URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub search_snippet: Option<String>,
}
