//! Search and extraction configuration with sensible defaults.
//!
//! [`SearchConfig`] controls which provider is tried first, per-provider
//! credentials, endpoints and pacing. [`ExtractionConfig`] controls page
//! fetching and batch concurrency. Both deserialize from TOML with every
//! field optional.

use std::fmt;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::SearchError;
use crate::types::SearchEngine;

/// User agent sent to search provider APIs.
pub const DEFAULT_API_USER_AGENT: &str = "AI-Research-Agent/1.0";

/// Browser-like user agent sent when fetching pages for extraction.
pub const DEFAULT_FETCH_USER_AGENT: &str = "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/131.0.0.0 Safari/537.36";

/// Credentials, endpoint override and pacing override for one search provider.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProviderSettings {
    /// API key. Providers without a key are not registered.
    pub api_key: Option<String>,
    /// Endpoint override; the provider's public API when unset.
    pub endpoint: Option<String>,
    /// Minimum milliseconds between consecutive calls; provider default when unset.
    pub min_interval_ms: Option<u64>,
}

impl ProviderSettings {
    /// The configured key, ignoring blank strings.
    pub fn key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }

    /// Endpoint to query for `engine`.
    pub fn endpoint_for(&self, engine: SearchEngine) -> String {
        match self.endpoint.as_deref().map(str::trim) {
            Some(custom) if !custom.is_empty() => custom.to_owned(),
            _ => default_endpoint(engine).to_owned(),
        }
    }

    /// Pacing interval for `engine`.
    pub fn min_interval_for(&self, engine: SearchEngine) -> Duration {
        self.min_interval_ms
            .map(Duration::from_millis)
            .unwrap_or_else(|| engine.default_min_interval())
    }
}

impl fmt::Debug for ProviderSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ProviderSettings")
            .field("api_key", &self.key().map(|_| "<redacted>"))
            .field("endpoint", &self.endpoint)
            .field("min_interval_ms", &self.min_interval_ms)
            .finish()
    }
}

/// Public API endpoint for each provider.
pub fn default_endpoint(engine: SearchEngine) -> &'static str {
    match engine {
        SearchEngine::SerpApi => "https://serpapi.com/search.json",
        SearchEngine::Bing => "https://api.bing.microsoft.com/v7.0/search",
        SearchEngine::Brave => "https://api.search.brave.com/res/v1/web/search",
    }
}

/// Configuration for web search.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Provider tried first. Remaining providers are tried in registration order.
    pub default_engine: SearchEngine,
    /// Number of results requested per search.
    pub max_results: usize,
    /// Per-request HTTP timeout in seconds.
    pub timeout_seconds: u64,
    /// User agent sent to provider APIs.
    pub user_agent: String,
    /// SerpApi settings.
    pub serpapi: ProviderSettings,
    /// Bing Web Search settings.
    pub bing: ProviderSettings,
    /// Brave Search settings.
    pub brave: ProviderSettings,
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            default_engine: SearchEngine::SerpApi,
            max_results: 10,
            timeout_seconds: 30,
            user_agent: DEFAULT_API_USER_AGENT.to_owned(),
            serpapi: ProviderSettings::default(),
            bing: ProviderSettings::default(),
            brave: ProviderSettings::default(),
        }
    }
}

impl SearchConfig {
    /// Settings for one provider.
    pub fn provider(&self, engine: SearchEngine) -> &ProviderSettings {
        match engine {
            SearchEngine::SerpApi => &self.serpapi,
            SearchEngine::Bing => &self.bing,
            SearchEngine::Brave => &self.brave,
        }
    }

    /// Mutable settings for one provider.
    pub fn provider_mut(&mut self, engine: SearchEngine) -> &mut ProviderSettings {
        match engine {
            SearchEngine::SerpApi => &mut self.serpapi,
            SearchEngine::Bing => &mut self.bing,
            SearchEngine::Brave => &mut self.brave,
        }
    }

    /// Providers that have credentials, in registration order.
    pub fn available_engines(&self) -> Vec<SearchEngine> {
        SearchEngine::all()
            .iter()
            .copied()
            .filter(|engine| self.provider(*engine).key().is_some())
            .collect()
    }

    /// Validates this configuration.
    ///
    /// Checks:
    /// - `max_results` must be greater than 0
    /// - `timeout_seconds` must be greater than 0
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.max_results == 0 {
            return Err(SearchError::Config(
                "max_results must be greater than 0".into(),
            ));
        }
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "timeout_seconds must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}

/// Configuration for fetching pages and extracting their content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExtractionConfig {
    /// Per-page fetch timeout in seconds.
    pub timeout_seconds: u64,
    /// User agent sent when fetching pages.
    pub user_agent: String,
    /// Maximum characters of cleaned text kept per page.
    pub max_content_chars: usize,
    /// Maximum pages fetched concurrently during batch extraction.
    pub concurrency: usize,
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            timeout_seconds: 30,
            user_agent: DEFAULT_FETCH_USER_AGENT.to_owned(),
            max_content_chars: 8000,
            concurrency: 5,
        }
    }
}

impl ExtractionConfig {
    /// Validates this configuration.
    pub fn validate(&self) -> Result<(), SearchError> {
        if self.timeout_seconds == 0 {
            return Err(SearchError::Config(
                "extraction timeout_seconds must be greater than 0".into(),
            ));
        }
        if self.concurrency == 0 {
            return Err(SearchError::Config(
                "extraction concurrency must be greater than 0".into(),
            ));
        }
        Ok(())
    }
}
