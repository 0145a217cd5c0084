//! HTML content extraction: four strategies over one fetched page.
//!
//! [`extract_document`] parses the page once and runs the strategies in
//! quality order (article, boilerplate, readability, raw). The first whose
//! cleaned text clears its threshold wins; every attempt is recorded in the
//! returned [`ExtractionReport`].

mod html;
pub mod metadata;
mod strategies;
pub mod text;

use serde::Serialize;

use crate::orchestrator::url_normalize::domain_of;
use crate::types::{ExtractedContent, ExtractionMethod};

pub use metadata::normalize_date;
pub use text::{clean_text, extractive_summary, split_sentences, truncate_chars, word_count};

/// Default maximum characters of cleaned text kept per page.
pub const DEFAULT_MAX_CHARS: usize = 8000;

/// Sentences in the extractive fallback summary.
const SUMMARY_SENTENCES: usize = 3;

/// Why a strategy was not accepted, or that it was.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum AttemptOutcome {
    /// Cleaned text cleared the threshold; this strategy produced the record.
    Accepted {
        /// Characters of cleaned text.
        chars: usize,
    },
    /// Text was found but was not longer than the strategy's minimum.
    TooShort {
        /// Characters of cleaned text.
        chars: usize,
        /// The strategy's threshold.
        min_chars: usize,
    },
    /// The strategy found nothing to work with.
    NotApplicable {
        /// What was missing.
        reason: String,
    },
}

/// One strategy attempt in an extraction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StrategyAttempt {
    /// The strategy tried.
    pub method: ExtractionMethod,
    /// What happened.
    #[serde(flatten)]
    pub outcome: AttemptOutcome,
}

/// Result of running the strategy cascade over one document.
#[derive(Debug, Clone)]
pub struct ExtractionReport {
    /// The accepted record, if any strategy succeeded.
    pub content: Option<ExtractedContent>,
    /// Every attempt in order; the last one is the accepted strategy when
    /// `content` is `Some`.
    pub attempts: Vec<StrategyAttempt>,
}

impl ExtractionReport {
    /// Strategies that were tried and rejected.
    pub fn rejected(&self) -> impl Iterator<Item = &StrategyAttempt> {
        self.attempts
            .iter()
            .filter(|a| !matches!(a.outcome, AttemptOutcome::Accepted { .. }))
    }
}

/// Run the strategy cascade over `html` fetched from `url`.
///
/// Text is cleaned with [`clean_text`] before the threshold check and
/// truncated to `max_chars` characters afterwards.
pub fn extract_document(html: &str, url: &str, max_chars: usize) -> ExtractionReport {
    let page = strategies::Page::parse(html);
    let mut attempts = Vec::with_capacity(ExtractionMethod::all().len());

    for &method in ExtractionMethod::all() {
        let candidate = match strategies::run(method, &page) {
            Ok(candidate) => candidate,
            Err(reason) => {
                tracing::debug!(url, %method, %reason, "strategy not applicable");
                attempts.push(StrategyAttempt {
                    method,
                    outcome: AttemptOutcome::NotApplicable { reason },
                });
                continue;
            }
        };

        let cleaned = clean_text(&candidate.text);
        let chars = cleaned.chars().count();
        let min_chars = method.min_chars();
        if chars <= min_chars {
            tracing::debug!(url, %method, chars, min_chars, "strategy text too short");
            attempts.push(StrategyAttempt {
                method,
                outcome: AttemptOutcome::TooShort { chars, min_chars },
            });
            continue;
        }

        attempts.push(StrategyAttempt {
            method,
            outcome: AttemptOutcome::Accepted { chars },
        });

        let summary = candidate
            .summary
            .filter(|s| !s.is_empty())
            .unwrap_or_else(|| extractive_summary(&cleaned, SUMMARY_SENTENCES));
        let text = truncate_chars(&cleaned, max_chars).to_owned();

        tracing::debug!(url, %method, chars, "strategy accepted");
        return ExtractionReport {
            content: Some(ExtractedContent {
                title: candidate.title,
                word_count: word_count(&text),
                text,
                summary,
                authors: candidate.authors,
                publish_date: candidate.publish_date,
                url: url.to_owned(),
                domain: domain_of(url),
                extraction_method: method,
                search_title: None,
                search_snippet: None,
            }),
            attempts,
        };
    }

    ExtractionReport {
        content: None,
        attempts,
    }
}
