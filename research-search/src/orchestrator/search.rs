//! Provider fallback: try the requested engine, then the rest in order.
//!
//! Unlike a fan-out, each provider is a full retry of the query; results
//! are never merged across providers. The first provider to answer wins
//! and its results are cleaned and truncated.

use crate::config::SearchConfig;
use crate::engine::{ProviderClient, SearchEngineTrait};
use crate::engines::{BingEngine, BraveEngine, SerpApiEngine};
use crate::error::SearchError;
use crate::http::build_api_client;
use crate::types::{SearchEngine, SearchResult};

use super::clean::clean_results;

/// A registered provider, dispatched by variant.
#[derive(Debug)]
pub enum Provider {
    /// SerpApi (Google results).
    SerpApi(SerpApiEngine),
    /// Bing Web Search.
    Bing(BingEngine),
    /// Brave Search.
    Brave(BraveEngine),
}

impl Provider {
    /// Build the provider for `client`'s engine.
    pub fn from_client(client: ProviderClient) -> Self {
        match client.engine() {
            SearchEngine::SerpApi => Self::SerpApi(SerpApiEngine::new(client)),
            SearchEngine::Bing => Self::Bing(BingEngine::new(client)),
            SearchEngine::Brave => Self::Brave(BraveEngine::new(client)),
        }
    }

    /// Which engine this provider queries.
    pub fn engine(&self) -> SearchEngine {
        match self {
            Self::SerpApi(e) => e.engine_type(),
            Self::Bing(e) => e.engine_type(),
            Self::Brave(e) => e.engine_type(),
        }
    }

    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        match self {
            Self::SerpApi(e) => e.search(query, count).await,
            Self::Bing(e) => e.search(query, count).await,
            Self::Brave(e) => e.search(query, count).await,
        }
    }
}

/// Searches the web through the configured providers with fallback.
///
/// Providers without credentials are left out when the searcher is built,
/// so they never fail deep inside a request.
#[derive(Debug)]
pub struct Searcher {
    providers: Vec<Provider>,
    default_engine: SearchEngine,
    max_results: usize,
}

impl Searcher {
    /// Register every provider that has an API key in `config`.
    ///
    /// A searcher with no providers is valid; every search on it fails
    /// with [`SearchError::AllProvidersFailed`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] when the configuration is invalid
    /// or the HTTP client cannot be built.
    pub fn from_config(config: &SearchConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let http = build_api_client(config)?;

        let mut providers = Vec::new();
        for &engine in SearchEngine::all() {
            match ProviderClient::new(engine, http.clone(), config.provider(engine)) {
                Ok(client) => providers.push(Provider::from_client(client)),
                Err(e) => tracing::debug!(%engine, error = %e, "provider not registered"),
            }
        }

        tracing::info!(
            providers = ?providers.iter().map(Provider::engine).collect::<Vec<_>>(),
            "searcher ready"
        );

        Ok(Self::with_providers(
            providers,
            config.default_engine,
            config.max_results,
        ))
    }

    /// Build a searcher from already-constructed providers, kept in the
    /// given order.
    pub fn with_providers(
        providers: Vec<Provider>,
        default_engine: SearchEngine,
        max_results: usize,
    ) -> Self {
        Self {
            providers,
            default_engine,
            max_results,
        }
    }

    /// Engines that are registered, in fallback order.
    pub fn engines(&self) -> Vec<SearchEngine> {
        self.providers.iter().map(Provider::engine).collect()
    }

    /// The engine tried first when none is requested.
    pub fn default_engine(&self) -> SearchEngine {
        self.default_engine
    }

    /// The configured result count.
    pub fn max_results(&self) -> usize {
        self.max_results
    }

    /// Search with the default engine and the configured result count.
    ///
    /// # Errors
    ///
    /// See [`Searcher::search_with`].
    pub async fn search(&self, query: &str) -> Result<Vec<SearchResult>, SearchError> {
        self.search_with(query, self.max_results, self.default_engine)
            .await
    }

    /// Search with `engine` first, falling back over the remaining
    /// registered providers in registration order.
    ///
    /// Results from the winning provider are cleaned and truncated to
    /// `desired_count`. An empty answer from a provider is a success.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::AllProvidersFailed`] when every provider,
    /// including an unregistered requested engine, has failed, and the
    /// provider's own error when it is not recoverable (see
    /// [`SearchError::is_recoverable`]); fallback stops there.
    pub async fn search_with(
        &self,
        query: &str,
        desired_count: usize,
        engine: SearchEngine,
    ) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, %engine, desired_count, "search requested");

        let mut failures: Vec<String> = Vec::new();
        if !self.providers.iter().any(|p| p.engine() == engine) {
            let err = SearchError::MissingCredentials(format!("{engine} API key not configured"));
            tracing::warn!(%engine, error = %err, "requested provider unavailable");
            failures.push(format!("{engine}: {err}"));
        }

        let ordered = self
            .providers
            .iter()
            .filter(|p| p.engine() == engine)
            .chain(self.providers.iter().filter(|p| p.engine() != engine));

        for provider in ordered {
            let name = provider.engine();
            match provider.search(query, desired_count).await {
                Ok(raw) => {
                    let mut results = clean_results(raw);
                    results.truncate(desired_count);
                    tracing::info!(engine = %name, count = results.len(), "search succeeded");
                    return Ok(results);
                }
                Err(err) if !err.is_recoverable() => {
                    tracing::error!(engine = %name, error = %err, "provider misconfigured, not falling back");
                    return Err(err);
                }
                Err(err) => {
                    tracing::warn!(engine = %name, error = %err, "provider failed, trying next");
                    failures.push(format!("{name}: {err}"));
                }
            }
        }

        let message = if failures.is_empty() {
            "no search providers configured".to_owned()
        } else {
            failures.join("; ")
        };
        tracing::error!(error = %message, "all search providers failed");
        Err(SearchError::AllProvidersFailed(message))
    }
}
