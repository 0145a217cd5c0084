//! Page fetching and partial-failure-tolerant batch extraction.
//!
//! Every per-URL failure (transport error, non-2xx status, no strategy
//! succeeding) is logged and turned into "no record". A batch never fails;
//! it returns the successes in input order.

use futures::stream::{self, StreamExt};

use crate::config::ExtractionConfig;
use crate::content::{extract_document, ExtractionReport};
use crate::error::SearchError;
use crate::http::build_fetch_client;
use crate::types::{ExtractedContent, SearchResult};

/// Fetches pages and runs the extraction strategy cascade over them.
#[derive(Debug, Clone)]
pub struct Extractor {
    client: reqwest::Client,
    config: ExtractionConfig,
}

impl Extractor {
    /// Build an extractor with its own fetch client.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Config`] for an invalid configuration or
    /// [`SearchError::Http`] if the client cannot be built.
    pub fn new(config: ExtractionConfig) -> Result<Self, SearchError> {
        config.validate()?;
        let client = build_fetch_client(&config)?;
        Ok(Self { client, config })
    }

    /// The active configuration.
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Download `url` and return its body.
    ///
    /// # Errors
    ///
    /// Returns [`SearchError::Timeout`] or [`SearchError::Http`] on transport
    /// failure and [`SearchError::Http`] for a non-2xx status.
    pub async fn fetch(&self, url: &str) -> Result<String, SearchError> {
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| SearchError::from_reqwest("page fetch failed", e))?;

        let status = response.status();
        if !status.is_success() {
            return Err(SearchError::Http(format!("HTTP {status} fetching {url}")));
        }

        let body = response
            .text()
            .await
            .map_err(|e| SearchError::from_reqwest("page read failed", e))?;
        tracing::trace!(url, bytes = body.len(), "page fetched");
        Ok(body)
    }

    /// Fetch `url` and run the strategy cascade, returning the attempt trace.
    ///
    /// # Errors
    ///
    /// Only fetch failures are errors; a page no strategy can read is an
    /// `Ok` report without content.
    pub async fn extract_with_report(&self, url: &str) -> Result<ExtractionReport, SearchError> {
        let html = self.fetch(url).await?;
        Ok(extract_document(&html, url, self.config.max_content_chars))
    }

    /// Extract readable content from `url`, or `None` if it cannot be read.
    pub async fn extract(&self, url: &str) -> Option<ExtractedContent> {
        match self.extract_with_report(url).await {
            Ok(report) => {
                if report.content.is_none() {
                    tracing::warn!(url, "all extraction strategies failed");
                }
                report.content
            }
            Err(err) => {
                tracing::warn!(url, error = %err, "content extraction failed");
                None
            }
        }
    }

    /// Extract the page behind a search hit, keeping the provider's title
    /// and snippet on the record.
    pub async fn extract_result(&self, hit: &SearchResult) -> Option<ExtractedContent> {
        let mut content = self.extract(&hit.url).await?;
        content.search_title = Some(hit.title.clone()).filter(|t| !t.is_empty());
        content.search_snippet = Some(hit.snippet.clone()).filter(|s| !s.is_empty());
        if content.title.is_empty() {
            content.title.clone_from(&hit.title);
        }
        Some(content)
    }

    /// Extract many URLs concurrently, returning the successes in input order.
    pub async fn extract_batch(&self, urls: &[String]) -> Vec<ExtractedContent> {
        let results = stream::iter(urls.iter().enumerate())
            .map(|(index, url)| async move { (index, self.extract(url).await) })
            .buffer_unordered(self.config.concurrency)
            .collect::<Vec<_>>()
            .await;
        reorder(results, urls.len())
    }

    /// Extract the pages behind `hits` concurrently, in search order.
    pub async fn extract_results(&self, hits: &[SearchResult]) -> Vec<ExtractedContent> {
        let results = stream::iter(hits.iter().enumerate())
            .map(|(index, hit)| async move { (index, self.extract_result(hit).await) })
            .buffer_unordered(self.config.concurrency)
            .collect::<Vec<_>>()
            .await;
        let extracted = reorder(results, hits.len());
        tracing::info!(
            requested = hits.len(),
            extracted = extracted.len(),
            "batch extraction finished"
        );
        extracted
    }
}

/// Restore input order from `(index, outcome)` pairs and drop failures.
fn reorder(mut results: Vec<(usize, Option<ExtractedContent>)>, total: usize) -> Vec<ExtractedContent> {
    results.sort_by_key(|(index, _)| *index);
    let extracted: Vec<ExtractedContent> = results.into_iter().filter_map(|(_, c)| c).collect();
    if extracted.len() < total {
        tracing::debug!(
            failed = total - extracted.len(),
            "some URLs yielded no content"
        );
    }
    extracted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExtractionMethod;

    fn content(url: &str) -> ExtractedContent {
        ExtractedContent {
            title: url.to_owned(),
            text: "text".into(),
            summary: String::new(),
            authors: vec![],
            publish_date: None,
            url: url.to_owned(),
            domain: "example.org".into(),
            word_count: 1,
            extraction_method: ExtractionMethod::Raw,
            search_title: None,
            search_snippet: None,
        }
    }

    #[test]
    fn reorder_sorts_by_index_and_drops_failures() {
        let out = reorder(
            vec![
                (2, Some(content("c"))),
                (0, Some(content("a"))),
                (1, None),
                (3, Some(content("d"))),
            ],
            4,
        );
        let urls: Vec<&str> = out.iter().map(|c| c.url.as_str()).collect();
        assert_eq!(urls, vec!["a", "c", "d"]);
    }

    #[test]
    fn invalid_config_rejected() {
        let config = ExtractionConfig {
            concurrency: 0,
            ..ExtractionConfig::default()
        };
        assert!(matches!(Extractor::new(config), Err(SearchError::Config(_))));
    }

    #[tokio::test]
    async fn unreachable_url_yields_none() {
        let extractor = Extractor::new(ExtractionConfig {
            timeout_seconds: 2,
            ..ExtractionConfig::default()
        })
        .expect("extractor");
        assert!(extractor.extract("http://127.0.0.1:9/nothing").await.is_none());
        assert!(extractor.extract("not a url").await.is_none());
    }
}
