//! Error types for the research-search crate.
//!
//! All errors carry stable, human-readable messages. API keys never
//! appear in error text.

/// Errors that can occur while searching or fetching page content.
#[derive(Debug, thiserror::Error)]
pub enum SearchError {
    /// Every registered search provider was tried and failed.
    #[error("all search providers exhausted: {0}")]
    AllProvidersFailed(String),

    /// A request exceeded its per-call timeout.
    #[error("request timed out: {0}")]
    Timeout(String),

    /// An HTTP request failed at the transport level or returned a non-2xx status.
    #[error("HTTP error: {0}")]
    Http(String),

    /// A provider response or fetched page could not be parsed.
    #[error("parse error: {0}")]
    Parse(String),

    /// The provider answered with an error payload of its own.
    #[error("provider error: {0}")]
    Provider(String),

    /// The provider has no API key configured.
    #[error("missing credentials: {0}")]
    MissingCredentials(String),

    /// Invalid search configuration.
    #[error("config error: {0}")]
    Config(String),
}

impl SearchError {
    /// Whether this error is local to one provider, so the next provider
    /// in registration order should be tried.
    pub fn is_recoverable(&self) -> bool {
        !matches!(self, Self::AllProvidersFailed(_) | Self::Config(_))
    }

    /// Map a [`reqwest::Error`] into a search error, keeping timeouts distinct.
    pub(crate) fn from_reqwest(context: &str, err: reqwest::Error) -> Self {
        if err.is_timeout() {
            Self::Timeout(format!("{context}: {err}"))
        } else {
            Self::Http(format!("{context}: {err}"))
        }
    }
}

/// Convenience type alias for research-search results.
pub type Result<T> = std::result::Result<T, SearchError>;
