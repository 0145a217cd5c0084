//! SerpApi provider: Google results through SerpApi's JSON API.
//!
//! Authenticates with an `api_key` query parameter. Provider-reported
//! failures arrive as a top-level `error` string, sometimes with HTTP 200.

use serde::Deserialize;

use crate::engine::{ProviderClient, SearchEngineTrait};
use crate::error::SearchError;
use crate::orchestrator::clean::strip_markup;
use crate::types::{SearchEngine, SearchResult};

/// SerpApi Google Search client.
///
/// Default provider and first in registration order.
#[derive(Debug)]
pub struct SerpApiEngine {
    client: ProviderClient,
}

impl SerpApiEngine {
    /// Wrap a configured provider client.
    pub fn new(client: ProviderClient) -> Self {
        Self { client }
    }
}

impl SearchEngineTrait for SerpApiEngine {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "SerpApi search");

        let num = count.min(SearchEngine::SerpApi.max_results_per_call());
        let request = self.client.get().query(&[
            ("q", query),
            ("api_key", self.client.api_key()),
            ("num", &num.to_string()),
            ("safe", "active"),
        ]);

        let body = self.client.execute(request, error_message).await?;
        parse_serpapi_json(&body, SearchEngine::SerpApi.max_results_per_call())
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::SerpApi
    }
}

#[derive(Debug, Deserialize)]
struct SerpApiResponse {
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    organic_results: Vec<SerpApiResult>,
}

#[derive(Debug, Deserialize)]
struct SerpApiResult {
    #[serde(default)]
    title: String,
    #[serde(default)]
    link: String,
    #[serde(default)]
    snippet: String,
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<SerpApiResponse>(body)
        .ok()
        .and_then(|r| r.error)
}

/// Parse a SerpApi JSON body into search results.
pub(crate) fn parse_serpapi_json(
    body: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let response: SerpApiResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("SerpApi response: {e}")))?;

    if let Some(error) = response.error {
        return Err(SearchError::Provider(format!("SerpApi: {error}")));
    }

    let results: Vec<SearchResult> = response
        .organic_results
        .into_iter()
        .take(max_results)
        .map(|r| SearchResult {
            title: strip_markup(&r.title),
            url: r.link,
            snippet: strip_markup(&r.snippet),
            source: SearchEngine::SerpApi.tag().to_owned(),
        })
        .collect();

    tracing::debug!(count = results.len(), "SerpApi results parsed");
    Ok(results)
}
