//! Bing Web Search API v7.
//!
//! Authenticates with the `Ocp-Apim-Subscription-Key` header. Errors come
//! back as `{"error": {"code": ..., "message": ...}}` with a non-2xx status.

use serde::Deserialize;

use crate::engine::{ProviderClient, SearchEngineTrait};
use crate::error::SearchError;
use crate::orchestrator::clean::strip_markup;
use crate::types::{SearchEngine, SearchResult};

/// Bing Web Search client.
///
/// Second in registration order; allows up to 50 results per call.
#[derive(Debug)]
pub struct BingEngine {
    client: ProviderClient,
}

impl BingEngine {
    /// Wrap a configured provider client.
    pub fn new(client: ProviderClient) -> Self {
        Self { client }
    }
}

impl SearchEngineTrait for BingEngine {
    async fn search(&self, query: &str, count: usize) -> Result<Vec<SearchResult>, SearchError> {
        tracing::trace!(query, "Bing search");

        let count = count.min(SearchEngine::Bing.max_results_per_call());
        let request = self
            .client
            .get()
            .header("Ocp-Apim-Subscription-Key", self.client.api_key())
            .query(&[
                ("q", query),
                ("count", &count.to_string()),
                ("textDecorations", "false"),
                ("textFormat", "Raw"),
                ("safeSearch", "Moderate"),
            ]);

        let body = self.client.execute(request, error_message).await?;
        parse_bing_json(&body, SearchEngine::Bing.max_results_per_call())
    }

    fn engine_type(&self) -> SearchEngine {
        SearchEngine::Bing
    }
}

#[derive(Debug, Deserialize)]
struct BingResponse {
    #[serde(rename = "webPages", default)]
    web_pages: Option<BingWebPages>,
    #[serde(default)]
    error: Option<BingError>,
}

#[derive(Debug, Deserialize)]
struct BingWebPages {
    #[serde(default)]
    value: Vec<BingResult>,
}

#[derive(Debug, Deserialize)]
struct BingResult {
    #[serde(default)]
    name: String,
    #[serde(default)]
    url: String,
    #[serde(default)]
    snippet: String,
}

#[derive(Debug, Deserialize)]
struct BingError {
    #[serde(default)]
    code: String,
    #[serde(default)]
    message: String,
}

impl BingError {
    fn describe(&self) -> String {
        if self.code.is_empty() {
            self.message.clone()
        } else {
            format!("{} ({})", self.message, self.code)
        }
    }
}

fn error_message(body: &str) -> Option<String> {
    serde_json::from_str::<BingResponse>(body)
        .ok()
        .and_then(|r| r.error)
        .map(|e| e.describe())
}

/// Parse a Bing JSON body into search results.
pub(crate) fn parse_bing_json(
    body: &str,
    max_results: usize,
) -> Result<Vec<SearchResult>, SearchError> {
    let response: BingResponse = serde_json::from_str(body)
        .map_err(|e| SearchError::Parse(format!("Bing response: {e}")))?;

    if let Some(error) = response.error {
        return Err(SearchError::Provider(format!("Bing: {}", error.describe())));
    }

    let results: Vec<SearchResult> = response
        .web_pages
        .map(|pages| pages.value)
        .unwrap_or_default()
        .into_iter()
        .take(max_results)
        .map(|r| SearchResult {
            title: strip_markup(&r.name),
            url: r.url,
            snippet: strip_markup(&r.snippet),
            source: SearchEngine::Bing.tag().to_owned(),
        })
        .collect();

    tracing::debug!(count = results.len(), "Bing results parsed");
    Ok(results)
}

#[cfg(test)]
mod tests {
    use super::*;

    const MOCK_BING_JSON: &str = r#"{
        "_type": "SearchResponse",
        "webPages": {
            "totalEstimatedMatches": 1200000,
            "value": [
                {"name": "Mitigation &amp; adaptation", "url": "https://climate.nasa.gov/solutions/",
                 "snippet": "Responding to climate change involves two approaches."},
                {"name": "Carbon pricing", "url": "https://www.worldbank.org/carbon",
                 "snippet": "Carbon pricing is an instrument."}
            ]
        }
    }"#;

    #[test]
    fn parse_mock_json_returns_results() {
        let results = parse_bing_json(MOCK_BING_JSON, 10).expect("should parse");
        assert_eq!(results.len(), 2);
        assert_eq!(results[0].title, "Mitigation & adaptation");
        assert_eq!(results[0].url, "https://climate.nasa.gov/solutions/");
        assert_eq!(results[1].source, "bing");
    }

    #[test]
    fn parse_respects_max_results() {
        let results = parse_bing_json(MOCK_BING_JSON, 1).expect("should parse");
        assert_eq!(results.len(), 1);
    }

    #[test]
    fn missing_web_pages_is_empty() {
        let results = parse_bing_json(r#"{"_type":"SearchResponse"}"#, 10).expect("parse");
        assert!(results.is_empty());
    }

    #[test]
    fn error_payload_is_provider_error() {
        let body = r#"{"error":{"code":"401","message":"Access denied due to invalid subscription key."}}"#;
        let err = parse_bing_json(body, 10).unwrap_err();
        assert!(matches!(err, SearchError::Provider(_)));
        assert_eq!(
            error_message(body).as_deref(),
            Some("Access denied due to invalid subscription key. (401)")
        );
    }

    #[test]
    fn malformed_json_is_parse_error() {
        assert!(matches!(
            parse_bing_json("{", 10).unwrap_err(),
            SearchError::Parse(_)
        ));
    }
}
