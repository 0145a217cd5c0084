//! Integration tests for provider fallback against mock provider APIs.
//!
//! Every provider endpoint is pointed at a wiremock server, so these tests
//! exercise request shaping, response parsing, cleaning and fallback order
//! over real HTTP. Live provider tests are `#[ignore]`.

use std::time::{Duration, Instant};

use research_search::{ProviderSettings, SearchConfig, SearchEngine, SearchError, Searcher};
use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn settings(server: &MockServer, route: &str, key: &str) -> ProviderSettings {
    ProviderSettings {
        api_key: Some(key.to_owned()),
        endpoint: Some(format!("{}{route}", server.uri())),
        min_interval_ms: Some(0),
    }
}

fn all_providers(server: &MockServer) -> SearchConfig {
    SearchConfig {
        serpapi: settings(server, "/serpapi/search.json", "serp-key"),
        bing: settings(server, "/bing/v7.0/search", "bing-key"),
        brave: settings(server, "/brave/res/v1/web/search", "brave-key"),
        timeout_seconds: 5,
        ..SearchConfig::default()
    }
}

fn bing_body() -> serde_json::Value {
    json!({
        "_type": "SearchResponse",
        "webPages": {"value": [
            {"name": "Climate change mitigation", "url": "https://www.ipcc.ch/report/ar6/wg3/",
             "snippet": "Working Group III assesses mitigation."},
            {"name": "Mitigation strategies", "url": "https://climate.nasa.gov/solutions/",
             "snippet": "Reducing the flow of heat-trapping gases."}
        ]}
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Fallback order
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn failing_default_provider_falls_back_to_bing() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/serpapi/search.json"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({"error": "Invalid API key."})))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bing/v7.0/search"))
        .and(header("Ocp-Apim-Subscription-Key", "bing-key"))
        .and(query_param("q", "climate change mitigation"))
        .and(query_param("count", "5"))
        .and(query_param("safeSearch", "Moderate"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bing_body()))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/brave/res/v1/web/search"))
        .respond_with(ResponseTemplate::new(500))
        .expect(0)
        .mount(&server)
        .await;

    let searcher = Searcher::from_config(&all_providers(&server)).expect("searcher");
    let results = searcher
        .search_with("climate change mitigation", 5, SearchEngine::SerpApi)
        .await
        .expect("bing should answer");

    assert_eq!(results.len(), 2);
    assert!(results.iter().all(|r| r.source == "bing"));
    assert_eq!(results[0].url, "https://www.ipcc.ch/report/ar6/wg3/");
}

#[tokio::test]
async fn requested_engine_is_tried_first() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/brave/res/v1/web/search"))
        .and(header("X-Subscription-Token", "brave-key"))
        .and(query_param("freshness", "py"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "web": {"results": [
                {"title": "Brave hit", "url": "https://brave-hit.org/a", "description": "From Brave"}
            ]}
        })))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/serpapi/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic_results": []})))
        .expect(0)
        .mount(&server)
        .await;

    let searcher = Searcher::from_config(&all_providers(&server)).expect("searcher");
    let results = searcher
        .search_with("heat pumps", 10, SearchEngine::Brave)
        .await
        .expect("brave should answer");
    assert_eq!(results.len(), 1);
    assert_eq!(results[0].source, "brave");
}

#[tokio::test]
async fn unregistered_engine_counts_as_failure_and_falls_back() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/serpapi/search.json"))
        .and(query_param("api_key", "serp-key"))
        .and(query_param("safe", "active"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {"title": "Serp hit", "link": "https://serp-hit.org/", "snippet": "From SerpApi"}
            ]
        })))
        .expect(1)
        .mount(&server)
        .await;

    let config = SearchConfig {
        serpapi: settings(&server, "/serpapi/search.json", "serp-key"),
        ..SearchConfig::default()
    };
    let searcher = Searcher::from_config(&config).expect("searcher");
    assert_eq!(searcher.engines(), vec![SearchEngine::SerpApi]);

    let results = searcher
        .search_with("peatland restoration", 3, SearchEngine::Bing)
        .await
        .expect("serpapi should answer");
    assert_eq!(results[0].title, "Serp hit");
}

#[tokio::test]
async fn provider_error_with_ok_status_triggers_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/serpapi/search.json"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({"error": "Your account has run out of searches."})),
        )
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bing/v7.0/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bing_body()))
        .mount(&server)
        .await;

    let searcher = Searcher::from_config(&all_providers(&server)).expect("searcher");
    let results = searcher.search("carbon pricing").await.expect("fallback");
    assert!(results.iter().all(|r| r.source == "bing"));
}

#[tokio::test]
async fn malformed_response_triggers_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/serpapi/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html>maintenance</html>"))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bing/v7.0/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bing_body()))
        .mount(&server)
        .await;

    let searcher = Searcher::from_config(&all_providers(&server)).expect("searcher");
    assert_eq!(searcher.search("x-ray").await.expect("fallback").len(), 2);
}

#[tokio::test]
async fn all_providers_failing_reports_each_failure() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(503))
        .expect(3)
        .mount(&server)
        .await;

    let searcher = Searcher::from_config(&all_providers(&server)).expect("searcher");
    let err = searcher.search("anything").await.unwrap_err();

    assert!(matches!(err, SearchError::AllProvidersFailed(_)));
    let message = err.to_string();
    assert!(message.contains("SerpApi"));
    assert!(message.contains("Bing"));
    assert!(message.contains("Brave"));
    assert!(!message.contains("serp-key"));
}

// ────────────────────────────────────────────────────────────────────────────
// Cleaning and truncation
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn results_are_cleaned_then_truncated() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/serpapi/search.json"))
        .and(query_param("num", "2"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "organic_results": [
                {"title": "Video", "link": "https://www.youtube.com/watch?v=abc", "snippet": "v"},
                {"title": "First", "link": "https://example.org/a?utm_source=x", "snippet": "<b>one</b>"},
                {"title": "Duplicate", "link": "https://example.org/a", "snippet": "dup"},
                {"title": "", "link": "https://example.org/untitled", "snippet": "no title"},
                {"title": "Second", "link": "https://example.org/b", "snippet": "two"},
                {"title": "Third", "link": "https://example.org/c", "snippet": "three"}
            ]
        })))
        .mount(&server)
        .await;

    let searcher = Searcher::from_config(&all_providers(&server)).expect("searcher");
    let results = searcher
        .search_with("research", 2, SearchEngine::SerpApi)
        .await
        .expect("results");

    let titles: Vec<&str> = results.iter().map(|r| r.title.as_str()).collect();
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(results[0].snippet, "one");
}

#[tokio::test]
async fn empty_answer_is_success_not_fallback() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/serpapi/search.json"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"organic_results": []})))
        .mount(&server)
        .await;

    Mock::given(method("GET"))
        .and(path("/bing/v7.0/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bing_body()))
        .expect(0)
        .mount(&server)
        .await;

    let searcher = Searcher::from_config(&all_providers(&server)).expect("searcher");
    assert!(searcher.search("obscure").await.expect("ok").is_empty());
}

// ────────────────────────────────────────────────────────────────────────────
// Pacing
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
async fn consecutive_calls_to_one_provider_are_paced() {
    let server = MockServer::start().await;

    Mock::given(method("GET"))
        .and(path("/bing/v7.0/search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(bing_body()))
        .expect(2)
        .mount(&server)
        .await;

    let config = SearchConfig {
        default_engine: SearchEngine::Bing,
        bing: ProviderSettings {
            min_interval_ms: Some(300),
            ..settings(&server, "/bing/v7.0/search", "bing-key")
        },
        ..SearchConfig::default()
    };
    let searcher = Searcher::from_config(&config).expect("searcher");

    let started = Instant::now();
    searcher.search("first").await.expect("first");
    searcher.search("second").await.expect("second");
    assert!(started.elapsed() >= Duration::from_millis(300));
}

// ────────────────────────────────────────────────────────────────────────────
// Live providers (manual)
// ────────────────────────────────────────────────────────────────────────────

#[tokio::test]
#[ignore]
async fn live_search_with_env_keys() {
    let mut config = SearchConfig::default();
    config.serpapi.api_key = std::env::var("SERPAPI_KEY").ok();
    config.bing.api_key = std::env::var("BING_API_KEY").ok();
    config.brave.api_key = std::env::var("BRAVE_API_KEY").ok();

    let searcher = Searcher::from_config(&config).expect("searcher");
    let results = searcher.search("rust programming language").await.expect("live search");
    assert!(!results.is_empty());
}
