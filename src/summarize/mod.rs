//! Topic summaries over the extracted sources.
//!
//! [`Summarizer`] builds one combined buffer from the sources and runs its
//! active strategies in order until one produces a summary. The active list
//! is chosen once at construction: the configured LLM strategy when its key
//! is present, then [`SummaryMethod::RuleBased`], which is always available.
//! Summarization never fails outward; when nothing works the result is a
//! degraded [`Summary`] with `error` set.

mod llm;
mod prepare;
mod rules;

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use chrono::{DateTime, Utc};
use research_search::ExtractedContent;
use serde::{Deserialize, Serialize};

use crate::config::SummaryConfig;
use crate::error::{AgentError, Result};

/// Summarization strategy tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SummaryMethod {
    /// Topic-relevance sentence scoring.
    #[serde(rename = "rule_based")]
    RuleBased,
    /// OpenAI Chat Completions.
    #[serde(rename = "openai")]
    OpenAi,
    /// Anthropic Messages.
    #[serde(rename = "anthropic")]
    Anthropic,
    /// Degraded placeholder; never configured.
    #[serde(rename = "fallback")]
    Fallback,
}

impl SummaryMethod {
    /// Stable lowercase identifier.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::RuleBased => "rule_based",
            Self::OpenAi => "openai",
            Self::Anthropic => "anthropic",
            Self::Fallback => "fallback",
        }
    }
}

impl fmt::Display for SummaryMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for SummaryMethod {
    type Err = AgentError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "rule_based" | "rules" => Ok(Self::RuleBased),
            "openai" => Ok(Self::OpenAi),
            "anthropic" => Ok(Self::Anthropic),
            other => Err(AgentError::Config(format!(
                "unsupported summary method: {other}"
            ))),
        }
    }
}

/// How much to trust a summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Confidence {
    /// Heuristic sentence selection.
    Medium,
    /// Generated by an LLM.
    High,
}

/// Summary of all sources for one topic.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Summary {
    /// Summary prose.
    pub main_summary: String,
    /// Ordered key points.
    pub key_points: Vec<String>,
    /// Strategy that produced this summary.
    pub method: SummaryMethod,
    /// The research topic.
    pub topic: String,
    /// When the summary was produced.
    pub generated_at: DateTime<Utc>,
    /// Number of sources summarized.
    #[serde(default)]
    pub total_sources: usize,
    /// Absent on degraded summaries.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub confidence: Option<Confidence>,
    /// Set on degraded summaries.
    #[serde(default)]
    pub error: bool,
}

impl Summary {
    /// Placeholder summary returned when no strategy can summarize.
    pub fn degraded(topic: &str) -> Self {
        Self {
            main_summary: format!("Unable to generate summary for topic: {topic}"),
            key_points: vec!["Content extraction or summarization failed".to_owned()],
            method: SummaryMethod::Fallback,
            topic: topic.to_owned(),
            generated_at: Utc::now(),
            total_sources: 0,
            confidence: None,
            error: true,
        }
    }
}

/// Why one summarization strategy produced nothing. Recovered by trying
/// the next strategy.
#[derive(Debug, thiserror::Error)]
pub(crate) enum SummaryError {
    #[error("{0} API key not configured")]
    MissingKey(&'static str),

    #[error("{provider} request failed: {source}")]
    Request {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{provider} returned HTTP {status}")]
    Status {
        provider: &'static str,
        status: reqwest::StatusCode,
    },

    #[error("{provider} response could not be decoded: {source}")]
    Response {
        provider: &'static str,
        #[source]
        source: reqwest::Error,
    },

    #[error("{0} response had no text content")]
    EmptyAnswer(&'static str),

    #[error("LLM answer had no summary text")]
    NoSummaryText,

    #[error("no candidate sentences")]
    NoSentences,

    #[error("{0} is not a summarization strategy")]
    NotAStrategy(SummaryMethod),
}

/// Runs summarization strategies in order over the combined sources.
#[derive(Debug, Clone)]
pub struct Summarizer {
    client: reqwest::Client,
    config: SummaryConfig,
    active: Vec<SummaryMethod>,
}

impl Summarizer {
    /// Build a summarizer, probing which strategies are available.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Config`] if the HTTP client cannot be built.
    pub fn new(config: SummaryConfig) -> Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_seconds.max(1)))
            .build()
            .map_err(|e| AgentError::Config(format!("failed to build LLM client: {e}")))?;

        let mut active = Vec::with_capacity(2);
        match config.method {
            SummaryMethod::OpenAi if config.openai.key().is_some() => {
                active.push(SummaryMethod::OpenAi);
            }
            SummaryMethod::Anthropic if config.anthropic.key().is_some() => {
                active.push(SummaryMethod::Anthropic);
            }
            SummaryMethod::OpenAi | SummaryMethod::Anthropic => {
                tracing::warn!(
                    method = %config.method,
                    "summary method has no API key, using rule-based summaries"
                );
            }
            SummaryMethod::RuleBased | SummaryMethod::Fallback => {}
        }
        active.push(SummaryMethod::RuleBased);

        Ok(Self {
            client,
            config,
            active,
        })
    }

    /// Strategies tried, in order.
    pub fn strategies(&self) -> &[SummaryMethod] {
        &self.active
    }

    /// Summarize `contents` for `topic`.
    pub async fn summarize(&self, contents: &[ExtractedContent], topic: &str) -> Summary {
        tracing::info!(sources = contents.len(), "summarizing content");

        let text = prepare::combined_text(
            contents,
            self.config.per_source_chars,
            self.config.max_combined_chars,
        );
        if text.is_empty() {
            tracing::warn!("no source text long enough to summarize");
            return Summary::degraded(topic);
        }

        for &method in &self.active {
            match self.run(method, &text, topic, contents).await {
                Ok(summary) => {
                    tracing::info!(%method, key_points = summary.key_points.len(), "summary generated");
                    return summary;
                }
                Err(reason) => {
                    tracing::warn!(%method, error = %reason, "summarization strategy failed");
                }
            }
        }
        Summary::degraded(topic)
    }

    async fn run(
        &self,
        method: SummaryMethod,
        text: &str,
        topic: &str,
        contents: &[ExtractedContent],
    ) -> std::result::Result<Summary, SummaryError> {
        let max_points = self.config.max_key_points;
        let (main_summary, key_points, confidence) = match method {
            SummaryMethod::RuleBased => {
                let out = rules::summarize(text, topic, contents, max_points)
                    .ok_or(SummaryError::NoSentences)?;
                (out.main_summary, out.key_points, Confidence::Medium)
            }
            SummaryMethod::OpenAi => {
                let answer = llm::openai(&self.client, &self.config.openai, text, topic).await?;
                let out = llm::parse_response(&answer, max_points)?;
                (out.main_summary, out.key_points, Confidence::High)
            }
            SummaryMethod::Anthropic => {
                let answer =
                    llm::anthropic(&self.client, &self.config.anthropic, text, topic).await?;
                let out = llm::parse_response(&answer, max_points)?;
                (out.main_summary, out.key_points, Confidence::High)
            }
            SummaryMethod::Fallback => return Err(SummaryError::NotAStrategy(method)),
        };

        Ok(Summary {
            main_summary,
            key_points,
            method,
            topic: topic.to_owned(),
            generated_at: Utc::now(),
            total_sources: contents.len(),
            confidence: Some(confidence),
            error: false,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_search::ExtractionMethod;

    fn source(title: &str, text: &str) -> ExtractedContent {
        ExtractedContent {
            title: title.into(),
            text: text.into(),
            summary: String::new(),
            authors: vec![],
            publish_date: None,
            url: format!("https://example.org/{}", title.len()),
            domain: "example.org".into(),
            word_count: text.split_whitespace().count(),
            extraction_method: ExtractionMethod::Article,
            search_title: None,
            search_snippet: None,
        }
    }

    #[tokio::test]
    async fn strategy_failures_are_typed() {
        let summarizer = Summarizer::new(SummaryConfig::default()).expect("summarizer");
        let sources = [source("Heat pumps", "Heat pumps move heat rather than making it.")];

        let err = summarizer
            .run(SummaryMethod::Fallback, "Some text here.", "heat pumps", &sources)
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::NotAStrategy(SummaryMethod::Fallback)));

        let err = summarizer
            .run(SummaryMethod::OpenAi, "Some text here.", "heat pumps", &sources)
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::MissingKey("OpenAI")));
        assert_eq!(err.to_string(), "OpenAI API key not configured");

        let err = summarizer
            .run(SummaryMethod::RuleBased, "short. bits. only", "heat pumps", &sources)
            .await
            .unwrap_err();
        assert!(matches!(err, SummaryError::NoSentences));
    }

    #[test]
    fn method_tags_parse_and_serialize() {
        assert_eq!("rule_based".parse::<SummaryMethod>().ok(), Some(SummaryMethod::RuleBased));
        assert_eq!("OpenAI".parse::<SummaryMethod>().ok(), Some(SummaryMethod::OpenAi));
        assert!("fallback".parse::<SummaryMethod>().is_err());
        assert_eq!(
            serde_json::to_value(SummaryMethod::RuleBased).expect("json"),
            "rule_based"
        );
    }

    #[test]
    fn llm_strategy_requires_its_key() {
        let mut config = SummaryConfig {
            method: SummaryMethod::OpenAi,
            ..SummaryConfig::default()
        };
        let summarizer = Summarizer::new(config.clone()).expect("summarizer");
        assert_eq!(summarizer.strategies(), &[SummaryMethod::RuleBased]);

        config.openai.api_key = Some("sk-test".into());
        let summarizer = Summarizer::new(config).expect("summarizer");
        assert_eq!(
            summarizer.strategies(),
            &[SummaryMethod::OpenAi, SummaryMethod::RuleBased]
        );
    }

    #[tokio::test]
    async fn rule_based_summary_is_the_default() {
        let summarizer = Summarizer::new(SummaryConfig::default()).expect("summarizer");
        let sources = [source(
            "Tidal energy potential",
            "Tidal energy converts the rise and fall of the sea into electricity. \
             Tidal streams are highly predictable compared with wind and solar output.",
        )];
        let summary = summarizer.summarize(&sources, "tidal energy").await;
        assert_eq!(summary.method, SummaryMethod::RuleBased);
        assert_eq!(summary.confidence, Some(Confidence::Medium));
        assert_eq!(summary.total_sources, 1);
        assert!(!summary.error);
        assert!(summary.main_summary.contains("Tidal energy converts"));
        assert_eq!(summary.key_points[0], "Source discusses: Tidal energy potential");
    }

    #[tokio::test]
    async fn empty_buffer_degrades() {
        let summarizer = Summarizer::new(SummaryConfig::default()).expect("summarizer");
        let summary = summarizer.summarize(&[source("T", "tiny")], "geothermal").await;
        assert_eq!(summary, Summary {
            generated_at: summary.generated_at,
            ..Summary::degraded("geothermal")
        });
        assert_eq!(summary.main_summary, "Unable to generate summary for topic: geothermal");
        assert!(summary.error);
    }

    #[test]
    fn degraded_summary_serializes_without_confidence() {
        let json = serde_json::to_value(Summary::degraded("x")).expect("json");
        assert_eq!(json["method"], "fallback");
        assert_eq!(json["error"], true);
        assert!(json.get("confidence").is_none());
    }
}
