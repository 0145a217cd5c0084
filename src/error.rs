//! Error types for the research pipeline.

use research_search::SearchError;

/// Top-level error type for a research request.
///
/// Only whole-stage failures surface here; per-provider, per-URL and
/// per-citation failures are recovered where they happen.
#[derive(Debug, thiserror::Error)]
pub enum AgentError {
    /// The topic failed validation.
    #[error("invalid topic: {0}")]
    InvalidTopic(String),

    /// Search succeeded but produced no usable results.
    #[error("no search results for topic: {0}")]
    NoResults(String),

    /// Every search result failed extraction.
    #[error("no content could be extracted for topic: {0}")]
    NoContent(String),

    /// Search stage failure (all providers exhausted, bad config).
    #[error("search failed: {0}")]
    Search(#[from] SearchError),

    /// Report store error.
    #[error("store error: {0}")]
    Store(String),

    /// No stored report with this session id.
    #[error("report not found: {0}")]
    NotFound(String),

    /// Export rendering or writing error.
    #[error("export error: {0}")]
    Export(String),

    /// Configuration error.
    #[error("config error: {0}")]
    Config(String),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// Convenience result type.
pub type Result<T> = std::result::Result<T, AgentError>;
