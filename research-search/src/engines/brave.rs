//! Brave Search API, an independent index.
//!
//! Authenticates with the `X-Subscription-Token` header and restricts
//! results to the past year (`freshness=py`).

use serde::Deserialize;

use crate::engine::{ProviderClient, SearchEngineTrait};
use crate::error::SearchError;
use crate::orchestrator::clean::strip_markup;
use crate::types::{SearchEngine, SearchResult};

/// Brave Search client.
///
/// Third in registration order.
#[derive(Debug)]
pub struct BraveEngine {
    client: ProviderClient,
}

impl BraveEngine {
    /// Wrap a configured provider client.
    pub fn new(client: ProviderClient) -> Self {
        Self { client }
    }
}

impl SearchEngineTrait for BraveEngine {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Brave search");

        let count = count.min(SearchEngine::Brave.max_results_per_call());
        let request = self
            .client
            .get()
            .header("X-Subscription-Token", self.client.api_key())
            .header("Accept", "application/json")
            .query(&[
                ("q", query),
                ("count", &count.to_string()),
                ("safesearch", "moderate"),
                ("freshness", "py"),
            ]);

        let body = self.client.execute(request, error_message).await?;
        parse_brave_json(&body, SearchEngine::Brave.max_results_per_call())
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::Brave
    }
}

#[derive(Debug, Deserialize)]
struct BraveResponse {
    #[serde(default)]
    web: Option<BraveWeb>,
    #[serde(default)]
    error: Option<BraveError>,
}

#[derive(Debug, Deserialize)]
struct BraveWeb {
    #[serde(default)]
    results: Vec<BraveResult>,
}

#[derive(Debug, Deserialize)]
struct BraveResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    description: String,
}

#[derive(Debug, Deserialize)]
struct BraveError {
    #[serde(default)]
    detail: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<BraveResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map(|e| e.detail)
        .filter(|d| !d.is_empty())
}

/// Parse a Brave JSON body into search results.
pub(crate) fn parse_brave_json(
    body: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let response: BraveResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Brave response: {e}")))?;

    if let Some(error) = response.error {
        return Err(SearchError::Provider(format!("Brave: {}", error.detail)));
    }

    let results: Vec<SearchResult> = response
        .web
        .map(|web| web.results)
        .unwrap_or_default()
        .into_iter()
        .take(max_results)
        .map(|r| SearchResult {
            title: strip_markup(&r.title),
            url: r.url,
            snippet: strip_markup(&r.description),
            source: SearchEngine::Brave.tag().to_owned(),
        })
        .collect();

    tracing::debug!(count = results.len(), "Brave results parsed");
    Ok(results)
}
