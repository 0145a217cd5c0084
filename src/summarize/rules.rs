//! Rule-based summarization: topic-relevance sentence scoring.

use std::collections::HashSet;

use research_search::ExtractedContent;
use research_search::content::split_sentences;

/// Only the first sentences of the buffer are scored.
const MAX_SCORED_SENTENCES: usize = 50;
/// Sentences joined into the main summary.
const SUMMARY_SENTENCES: usize = 5;
/// Sources whose titles become key points.
const TITLE_SOURCES: usize = 5;
/// Titles this short or shorter are not key points.
const MIN_TITLE_CHARS: usize = 10;
/// Top sentences considered as key points.
const SENTENCE_POINTS: usize = 3;
/// Sentences this short or shorter are not key points.
const MIN_POINT_CHARS: usize = 30;
/// Sentence length (in words) that earns the full length score.
const PREFERRED_WORDS: usize = 30;

/// Output of the rule-based scorer.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct RuleSummary {
    pub main_summary: String,
    pub key_points: Vec<String>,
}

/// Score of one sentence at `index` against `topic_words`.
///
/// `2 * shared words + min(words, 30) / 30 + max(0, 1 - 0.1 * index)`
pub(crate) fn score_sentence(sentence: &str, index: usize, topic_words: &HashSet<String>) -> f64 {
    let words: HashSet<String> = sentence
        .split_whitespace()
        .map(str::to_lowercase)
        .collect();
    let relevance = topic_words.intersection(&words).count() as f64;
    let length = sentence.split_whitespace().count().min(PREFERRED_WORDS) as f64
        / PREFERRED_WORDS as f64;
    let position = (1.0 - index as f64 * 0.1).max(0.0);
    relevance * 2.0 + length + position
}

/// Summarize `text` for `topic`. Returns `None` when the buffer has no
/// candidate sentences.
///
/// Equal scores rank by sentence text, descending.
pub(crate) fn summarize(
    text: &str,
    topic: &str,
    contents: &[ExtractedContent],
    max_key_points: usize,
) -> Option<RuleSummary> {
    let topic_words: HashSet<String> = topic.split_whitespace().map(str::to_lowercase).collect();

    let mut scored: Vec<(f64, String)> = split_sentences(text)
        .into_iter()
        .take(MAX_SCORED_SENTENCES)
        .enumerate()
        .map(|(i, s)| (score_sentence(&s, i, &topic_words), s))
        .collect();
    if scored.is_empty() {
        return None;
    }
    scored.sort_by(|a, b| b.0.total_cmp(&a.0).then_with(|| b.1.cmp(&a.1)));

    let top: Vec<String> = scored
        .into_iter()
        .take(SUMMARY_SENTENCES)
        .map(|(_, s)| s)
        .collect();

    let mut key_points: Vec<String> = contents
        .iter()
        .take(TITLE_SOURCES)
        .filter(|c| c.title.chars().count() > MIN_TITLE_CHARS)
        .map(|c| format!("Source discusses: {}", c.title))
        .collect();
    key_points.extend(
        top.iter()
            .take(SENTENCE_POINTS)
            .filter(|s| s.chars().count() > MIN_POINT_CHARS)
            .cloned(),
    );
    key_points.truncate(max_key_points);

    Some(RuleSummary {
        main_summary: format!("{}.", top.join(". ")),
        key_points,
    })
}
