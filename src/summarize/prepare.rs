//! Combined source buffer fed to every summarization strategy.

use research_search::ExtractedContent;
use research_search::content::truncate_chars;

/// Sources with this much text or less are left out of the buffer.
const MIN_SOURCE_CHARS: usize = 50;

/// Build the combined buffer: per source a `Title:` line, a `Content:` line
/// with the first `per_source_chars` characters, and a `---` separator.
/// The whole buffer is cut at `max_chars` with a trailing `...`.
///
/// Returns an empty string when no source has enough text.
pub(crate) fn combined_text(
    contents: &[ExtractedContent],
    per_source_chars: usize,
    max_chars: usize,
) -> String {
    let mut parts: Vec<String> = Vec::new();
    for item in contents {
        if item.text.trim().chars().count() <= MIN_SOURCE_CHARS {
            continue;
        }
        if !item.title.is_empty() {
            parts.push(format!("Title: {}", item.title));
        }
        parts.push(format!(
            "Content: {}...",
            truncate_chars(&item.text, per_source_chars)
        ));
        parts.push("---".to_owned());
    }

    let combined = parts.join("\n");
    if combined.chars().count() > max_chars {
        format!("{}...", truncate_chars(&combined, max_chars))
    } else {
        combined
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_search::ExtractionMethod;

    fn item(title: &str, text: &str) -> ExtractedContent {
        ExtractedContent {
            title: title.into(),
            text: text.into(),
            summary: String::new(),
            authors: vec![],
            publish_date: None,
            url: "https://example.org".into(),
            domain: "example.org".into(),
            word_count: text.split_whitespace().count(),
            extraction_method: ExtractionMethod::Article,
            search_title: None,
            search_snippet: None,
        }
    }

    #[test]
    fn formats_each_source_block() {
        let text = "Offshore wind capacity doubled across the North Sea in five years.";
        let out = combined_text(&[item("Offshore wind", text)], 1000, 8000);
        assert_eq!(out, format!("Title: Offshore wind\nContent: {text}...\n---"));
    }

    #[test]
    fn skips_short_sources_and_missing_titles() {
        let long = "x".repeat(60);
        let out = combined_text(
            &[item("Short", "too short to matter"), item("", &long)],
            1000,
            8000,
        );
        assert_eq!(out, format!("Content: {long}...\n---"));
    }

    #[test]
    fn truncates_per_source_and_overall() {
        let long = "y".repeat(3000);
        let per_source = combined_text(&[item("T", &long)], 1000, 8000);
        assert!(per_source.contains(&format!("Content: {}...", "y".repeat(1000))));

        let many: Vec<ExtractedContent> = (0..20).map(|_| item("T", &long)).collect();
        let bounded = combined_text(&many, 1000, 8000);
        assert_eq!(bounded.chars().count(), 8003);
        assert!(bounded.ends_with("..."));
    }

    #[test]
    fn nothing_usable_is_empty() {
        assert!(combined_text(&[item("T", "tiny")], 1000, 8000).is_empty());
        assert!(combined_text(&[], 1000, 8000).is_empty());
    }
}
