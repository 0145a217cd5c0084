//! # research-search
//!
//! Web search and page content extraction for the research agent.
//!
//! ## Design
//!
//! - Queries SerpApi, Bing or Brave through their JSON APIs, one provider
//!   at a time, falling back in registration order when a provider fails
//! - Providers without an API key are never registered
//! - Each provider client owns a minimum-interval pacing guard
//! - Results are trimmed, filtered against a denylist of social/video
//!   platforms and deduplicated by normalised URL
//! - Pages are fetched once and read by four extraction strategies in
//!   quality order; the first to produce enough clean text wins
//! - Batch extraction is bounded-concurrent and tolerant of per-URL failure
//!
//! ## Security
//!
//! - API keys are redacted from `Debug` output and never logged
//! - Search queries are logged only at trace level

pub mod config;
pub mod content;
pub mod engine;
pub mod engines;
pub mod error;
pub mod extractor;
pub mod http;
pub mod orchestrator;
pub mod types;

pub use config::{ExtractionConfig, ProviderSettings, SearchConfig};
pub use content::{extract_document, AttemptOutcome, ExtractionReport, StrategyAttempt};
pub use engine::SearchEngineTrait;
pub use error::{Result, SearchError};
pub use extractor::Extractor;
pub use orchestrator::Searcher;
pub use types::{ExtractedContent, ExtractionMethod, SearchEngine, SearchResult};

/// Search with a searcher built from `config`, using its default engine
/// and result count.
///
/// # Errors
///
/// Returns [`SearchError::Config`] for an invalid configuration and
/// [`SearchError::AllProvidersFailed`] when no provider answers.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> research_search::Result<()> {
/// let mut config = research_search::SearchConfig::default();
/// config.brave.api_key = Some("brave-key".into());
/// let results = research_search::search("heat pump efficiency", &config).await?;
/// for result in &results {
///     println!("{}: {}", result.title, result.url);
/// }
/// # Ok(())
/// # }
/// ```
pub async fn search(query: &str, config: &SearchConfig) -> Result<Vec<SearchResult>> {
    Searcher::from_config(config)?.search(query).await
}

/// Fetch a page and extract its readable content.
///
/// # Errors
///
/// Returns [`SearchError::Http`] or [`SearchError::Timeout`] if the page
/// cannot be fetched, and [`SearchError::Parse`] if no strategy can read it.
///
/// # Examples
///
/// ```no_run
/// # async fn example() -> research_search::Result<()> {
/// let config = research_search::ExtractionConfig::default();
/// let page = research_search::fetch_page_content("https://example.com", &config).await?;
/// println!("{} ({} words, {})", page.title, page.word_count, page.extraction_method);
/// # Ok(())
/// # }
/// ```
pub async fn fetch_page_content(url: &str, config: &ExtractionConfig) -> Result<ExtractedContent> {
    let extractor = Extractor::new(config.clone())?;
    let report = extractor.extract_with_report(url).await?;
    report
        .content
        .ok_or_else(|| SearchError::Parse(format!("no extractable content at {url}")))
}
