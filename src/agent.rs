//! The research pipeline: search, extract, summarize, cite.

use chrono::Utc;
use research_search::{Extractor, SearchEngine, Searcher};

use crate::citation::{CitationStyle, generate_citations};
use crate::config::ResearchConfig;
use crate::error::{AgentError, Result};
use crate::report::Report;
use crate::summarize::Summarizer;
use crate::topic::validate_topic;

/// Per-request overrides of the configured defaults.
#[derive(Debug, Clone, Default)]
pub struct ResearchRequest {
    /// The research topic.
    pub topic: String,
    /// Provider tried first.
    pub engine: Option<SearchEngine>,
    /// Citation style.
    pub style: Option<CitationStyle>,
    /// Number of search results to request.
    pub max_results: Option<usize>,
}

impl ResearchRequest {
    /// A request for `topic` with every setting at its configured default.
    pub fn new(topic: impl Into<String>) -> Self {
        Self {
            topic: topic.into(),
            ..Self::default()
        }
    }
}

/// Runs research requests end to end.
///
/// Stage failures that leave nothing to report (bad topic, no results,
/// nothing extracted) are errors. Everything after extraction degrades
/// instead of failing.
#[derive(Debug)]
pub struct ResearchAgent {
    searcher: Searcher,
    extractor: Extractor,
    summarizer: Summarizer,
    style: CitationStyle,
}

impl ResearchAgent {
    /// Build every stage from `config`.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Search`] for an invalid search or extraction
    /// configuration and [`AgentError::Config`] if the summarizer cannot
    /// be built.
    pub fn new(config: &ResearchConfig) -> Result<Self> {
        let agent = Self {
            searcher: Searcher::from_config(&config.search)?,
            extractor: Extractor::new(config.extraction.clone())?,
            summarizer: Summarizer::new(config.summary.clone())?,
            style: config.citation.style(),
        };
        tracing::info!(
            engines = ?agent.searcher.engines(),
            summary = ?agent.summarizer.strategies(),
            style = %agent.style,
            "research agent ready"
        );
        Ok(agent)
    }

    /// Default citation style.
    pub fn style(&self) -> CitationStyle {
        self.style
    }

    /// Research `topic` with the configured defaults.
    ///
    /// # Errors
    ///
    /// See [`ResearchAgent::research_with`].
    pub async fn research(&self, topic: &str) -> Result<Report> {
        self.research_with(&ResearchRequest::new(topic)).await
    }

    /// Run one research request.
    ///
    /// # Errors
    ///
    /// - [`AgentError::InvalidTopic`] if the topic fails validation
    /// - [`AgentError::Search`] if every search provider fails
    /// - [`AgentError::NoResults`] if search returns nothing usable
    /// - [`AgentError::NoContent`] if no result could be extracted
    pub async fn research_with(&self, request: &ResearchRequest) -> Result<Report> {
        let topic = validate_topic(&request.topic)?;
        let engine = request.engine.unwrap_or_else(|| self.searcher.default_engine());
        let count = request
            .max_results
            .filter(|&n| n > 0)
            .unwrap_or_else(|| self.searcher.max_results());
        let style = request.style.unwrap_or(self.style);

        tracing::info!(topic, %engine, count, "starting research");

        let results = self
            .searcher
            .search_with(topic, count, engine)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "search stage failed"))?;
        if results.is_empty() {
            tracing::error!(topic, "search returned no results");
            return Err(AgentError::NoResults(topic.to_owned()));
        }

        let sources = self.extractor.extract_results(&results).await;
        tracing::info!(
            results = results.len(),
            extracted = sources.len(),
            "extraction finished"
        );
        if sources.is_empty() {
            tracing::error!(topic, "no content could be extracted");
            return Err(AgentError::NoContent(topic.to_owned()));
        }

        let summary = self.summarizer.summarize(&sources, topic).await;
        let citations = generate_citations(&sources, style, Utc::now().date_naive());

        let report = Report::new(topic, summary, sources, citations);
        tracing::info!(
            session_id = %report.session_id,
            sources = report.total_sources,
            citations = report.citations.len(),
            method = %report.summary.method,
            "research complete"
        );
        Ok(report)
    }
}
