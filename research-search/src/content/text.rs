//! Text cleaning, sentence splitting and the extractive fallback summary.

/// Lines this short or shorter are treated as navigation chrome.
const MIN_LINE_CHARS: usize = 10;

/// Notices stripped from extracted text, matched ASCII case-insensitively.
const NOISE_PHRASES: &[&str] = &[
    "cookie policy",
    "privacy policy",
    "terms of service",
    "subscribe to newsletter",
    "follow us on",
    "share this article",
];

/// Sentences this short or shorter are not summary candidates.
const MIN_SENTENCE_CHARS: usize = 20;

/// Clean extracted text the same way for every strategy.
///
/// Each line is whitespace-collapsed and lines of ten characters or fewer
/// are dropped. The survivors are joined with single spaces and known
/// notice phrases are removed.
pub fn clean_text(text: &str) -> String {
    let joined = text
        .lines()
        .map(|line| line.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| line.chars().count() > MIN_LINE_CHARS)
        .collect::<Vec<_>>()
        .join(" ");

    let stripped = NOISE_PHRASES
        .iter()
        .fold(joined, |acc, phrase| remove_ascii_case_insensitive(&acc, phrase));

    stripped.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove every ASCII case-insensitive occurrence of `needle`.
fn remove_ascii_case_insensitive(haystack: &str, needle: &str) -> String {
    let lower = haystack.to_ascii_lowercase();
    let mut out = String::with_capacity(haystack.len());
    let mut pos = 0;
    while let Some(offset) = lower[pos..].find(needle) {
        out.push_str(&haystack[pos..pos + offset]);
        pos += offset + needle.len();
    }
    out.push_str(&haystack[pos..]);
    out
}

/// Split on runs of `.`, `!` and `?`, keeping trimmed sentences longer
/// than 20 characters.
pub fn split_sentences(text: &str) -> Vec<String> {
    text.split(['.', '!', '?'])
        .map(str::trim)
        .filter(|s| s.chars().count() > MIN_SENTENCE_CHARS)
        .map(str::to_owned)
        .collect()
}

/// Build a short extractive summary of `text`.
///
/// With `max_sentences` or fewer candidates all of them are used. Otherwise
/// the first ten are ranked by word count weighted by position
/// (`words * (1 - 0.1 * index)`) and the best are kept in rank order.
/// Returns an empty string when there are no candidates.
pub fn extractive_summary(text: &str, max_sentences: usize) -> String {
    let sentences = split_sentences(text);
    if sentences.is_empty() {
        return String::new();
    }
    if sentences.len() <= max_sentences {
        return format!("{}.", sentences.join(". "));
    }

    let mut ranked: Vec<(f64, &str)> = sentences
        .iter()
        .take(10)
        .enumerate()
        .map(|(i, s)| {
            let words = s.split_whitespace().count() as f64;
            (words * (1.0 - i as f64 * 0.1), s.as_str())
        })
        .collect();
    ranked.sort_by(|a, b| b.0.total_cmp(&a.0));

    let top: Vec<&str> = ranked
        .into_iter()
        .take(max_sentences)
        .map(|(_, s)| s)
        .collect();
    format!("{}.", top.join(". "))
}

/// Truncate to at most `max_chars` characters, on a char boundary.
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((end, _)) => &text[..end],
        None => text,
    }
}

/// Number of whitespace-separated words.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}
