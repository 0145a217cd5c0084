//! Trait definition for pluggable search provider backends.
//!
//! Each provider (SerpApi, Bing, Brave) implements [`SearchEngineTrait`] to
//! map its own request and JSON response shapes onto [`SearchResult`].
//! [`ProviderClient`] holds the per-provider state every implementation
//! shares: HTTP client, credentials, endpoint and pacing guard.

use crate::config::ProviderSettings;
use crate::error::SearchError;
use crate::http::Pacer;
use crate::types::{SearchEngine, SearchResult};

/// A pluggable search provider backend.
///
/// Implementations handle their own:
///
/// - request construction (query parameters, auth headers)
/// - mapping of the provider's JSON shape into [`SearchResult`]
/// - detection of provider-reported errors
/// - capping results at the provider's per-call maximum
///
/// All implementations must be `Send + Sync`.
pub trait SearchEngineTrait: Send + Sync {
    /// Run one search call and return mapped results.
    ///
    /// `count` is the number of results the caller wants; implementations
    /// clamp it to [`SearchEngine::max_results_per_call`].
    ///
    /// # Errors
    ///
    /// Returns [`SearchError`] if the request fails, the provider reports an
    /// error, or the response cannot be parsed.
    fn search(
        &self,
        query: &str,
        count: usize,
    ) -> impl std::future::Future<Output = Result<Vec<SearchResult>, SearchError>> + Send;

    /// Which [`SearchEngine`] this implementation represents.
    fn engine_type(&self) -> SearchEngine;
}

/// Per-provider connection state shared by every engine implementation.
#[derive(Debug)]
pub struct ProviderClient {
    engine: SearchEngine,
    client: reqwest::Client,
    api_key: String,
    endpoint: String,
    pacer: Pacer,
}

impl ProviderClient {
    /// Build the client for `engine` from its settings.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::MissingCredentials`] when no API key is configured.
    pub fn new(
        engine: SearchEngine,
        client: reqwest::Client,
        settings: &ProviderSettings,
    ) -> Result<Self, SearchError> {
        let api_key = settings.key().ok_or_else(|| {
            SearchError::MissingCredentials(format!("{engine} API key not configured"))
        })?;
        Ok(Self {
            engine,
            client,
            api_key: api_key.to_owned(),
            endpoint: settings.endpoint_for(engine),
            pacer: Pacer::new(settings.min_interval_for(engine)),
        })
    }

    /// The provider this client talks to.
    pub fn engine(&self) -> SearchEngine {
        self.engine
    }

    /// The API key sent with every request.
    pub(crate) fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Start a GET request against the provider endpoint.
    pub(crate) fn get(&self) -> reqwest::RequestBuilder {
        self.client.get(&self.endpoint)
    }

    /// Pace, send, and read the body of a provider request.
    ///
    /// Non-2xx statuses are returned as errors; `error_message` extracts a
    /// provider-reported message from the body when there is one.
    pub(crate) async fn execute(
        &self,
        request: reqwest::RequestBuilder,
        error_message: fn(&str) -> Option<String>,
    ) -> Result<String, SearchError> {
        self.pacer.wait().await;

        let name = self.engine.name();
        // A request that cannot be built means a malformed endpoint.
        let response = request.send().await.map_err(|e| {
            if e.is_builder() {
                SearchError::Config(format!("{name} endpoint is invalid: {e}"))
            } else {
                SearchError::from_reqwest(&format!("{name} request failed"), e)
            }
        })?;
        let status = response.status();
        let body = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest(&format!("{name} response read failed"), e))?;

        tracing::trace!(engine = name, %status, bytes = body.len(), "provider response received");

        if !status.is_success() {
            return Err(match error_message(&body) {
                Some(message) => SearchError::Provider(format!("{name}: {message}")),
                None => SearchError::Http(format!("{name} returned HTTP {status}")),
            });
        }
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// A mock engine for testing trait bounds and async execution.
    struct MockEngine {
        engine: SearchEngine,
        results: Vec<SearchResult>,
    }

    impl SearchEngineTrait for MockEngine {
        async fn search(&self, _query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError> {
            if self.results.is_empty() {
                return Err(SearchError::Provider("mock engine failure".into()));
            }
            Ok(self.results.iter().take(count).cloned().collect())
        }

        fn engine_type(&self) -> SearchEngine {
            self.engine
        }
    }

    fn hit(url: &str) -> SearchResult {
        SearchResult {
            title: "Test".into(),
            url: url.into(),
            snippet: "A test result".into(),
            source: "bing".into(),
        }
    }

    #[test]
    fn mock_engine_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<MockEngine>();
        assert_send_sync::<ProviderClient>();
    }

    #[tokio::test]
    async fn mock_engine_respects_count() {
        let engine = MockEngine {
            engine: SearchEngine::Bing,
            results: vec![hit("https://a.org"), hit("https://b.org")],
        };
        let results = engine.search("test", 1).await.expect("should succeed");
        assert_eq!(results.len(), 1);
        assert_eq!(engine.engine_type(), SearchEngine::Bing);
    }

    #[tokio::test]
    async fn mock_engine_propagates_errors() {
        let engine = MockEngine {
            engine: SearchEngine::Brave,
            results: vec![],
        };
        let err = engine.search("test", 3).await.unwrap_err();
        assert!(err.to_string().contains("mock engine failure"));
    }

    #[test]
    fn provider_client_requires_key() {
        let err = ProviderClient::new(
            SearchEngine::Brave,
            reqwest::Client::new(),
            &ProviderSettings::default(),
        )
        .unwrap_err();
        assert!(matches!(err, SearchError::MissingCredentials(_)));
        assert!(err.to_string().contains("Brave"));
    }

    #[test]
    fn provider_client_uses_endpoint_override() {
        let settings = ProviderSettings {
            api_key: Some("k".into()),
            endpoint: Some("http://localhost:1/x".into()),
            min_interval_ms: Some(0),
        };
        let client =
            ProviderClient::new(SearchEngine::SerpApi, reqwest::Client::new(), &settings)
                .expect("client");
        assert_eq!(client.engine(), SearchEngine::SerpApi);
        assert_eq!(client.endpoint, "http://localhost:1/x");
        assert_eq!(client.api_key(), "k");
    }
}
