//! Citations and bibliographies for extracted sources.
//!
//! Metadata is derived once per source, then rendered by the selected
//! [`CitationStyle`]. A source whose metadata cannot be derived is logged
//! and skipped; the rest keep their input-order index.

pub mod metadata;
pub mod reliability;
pub mod style;

use chrono::NaiveDate;
use research_search::ExtractedContent;
use serde::{Deserialize, Serialize};

pub use metadata::CitationMetadata;
pub use reliability::{TrustTier, reliability_score, trust_tier};
pub use style::CitationStyle;

/// One formatted citation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Citation {
    /// 1-based position of the source in the input list.
    pub index: usize,
    /// Style used for `formatted`.
    pub style: CitationStyle,
    /// Rendered citation text.
    pub formatted: String,
    /// Metadata the citation was rendered from.
    pub metadata: CitationMetadata,
    /// Source URL.
    pub url: String,
    /// Heuristic reliability in `[0.5, 1.0]`.
    pub reliability_score: f64,
}

/// Cite every source in `contents` in `style`, accessed on `accessed`.
pub fn generate_citations(
    contents: &[ExtractedContent],
    style: CitationStyle,
    accessed: NaiveDate,
) -> Vec<Citation> {
    let citations: Vec<Citation> = contents
        .iter()
        .enumerate()
        .filter_map(|(i, content)| {
            match CitationMetadata::from_content(content, accessed) {
                Ok(metadata) => Some(Citation {
                    index: i + 1,
                    style,
                    formatted: style.format(&metadata),
                    url: metadata.url.clone(),
                    metadata,
                    reliability_score: reliability_score(content),
                }),
                Err(reason) => {
                    tracing::warn!(index = i + 1, error = %reason, "skipping citation");
                    None
                }
            }
        })
        .collect();
    tracing::debug!(%style, count = citations.len(), "citations generated");
    citations
}

/// Plain-text bibliography of the citations rendered in `style`.
pub fn bibliography(citations: &[Citation], style: CitationStyle, generated_on: NaiveDate) -> String {
    let generated = generated_on.format("%B %d, %Y");
    if citations.is_empty() {
        return format!("No citations available.\n\nGenerated on {generated}");
    }

    let mut lines = vec![
        format!("Bibliography ({} Style)", style.tag().to_uppercase()),
        "=".repeat(40),
        String::new(),
    ];
    for citation in citations.iter().filter(|c| c.style == style) {
        lines.push(format!("{}. {}", citation.index, citation.formatted));
        lines.push(String::new());
    }
    lines.push(String::new());
    lines.push(format!("Generated on {generated} by research-agent"));
    lines.join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use research_search::ExtractionMethod;

    fn source(url: &str, title: &str) -> ExtractedContent {
        ExtractedContent {
            title: title.into(),
            text: "Body text.".into(),
            summary: String::new(),
            authors: vec![],
            publish_date: Some("2024-06-01".into()),
            url: url.into(),
            domain: research_search::orchestrator::url_normalize::domain_of(url),
            word_count: 2,
            extraction_method: ExtractionMethod::Article,
            search_title: None,
            search_snippet: None,
        }
    }

    fn day() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 3, 5).expect("date")
    }

    #[test]
    fn citations_keep_input_order_and_skip_bad_items() {
        let sources = [
            source("https://en.wikipedia.org/wiki/Heat_pump", "Heat pump"),
            source("", "No URL"),
            source("https://www.mit.edu/heat", "MIT on heat"),
        ];
        let citations = generate_citations(&sources, CitationStyle::Apa, day());
        assert_eq!(citations.len(), 2);
        assert_eq!(citations[0].index, 1);
        assert_eq!(citations[1].index, 3);
        assert_eq!(citations[0].metadata.publisher, "Wikipedia");
        assert_eq!(citations[0].reliability_score, 0.8);
        assert_eq!(citations[1].reliability_score, 0.9);
        assert!(citations[0].formatted.starts_with("Wikipedia. (2024). Heat pump."));
    }

    #[test]
    fn citation_serializes_with_stable_field_names() {
        let citations = generate_citations(
            &[source("https://example.org/a", "Example")],
            CitationStyle::Mla,
            day(),
        );
        let json = serde_json::to_value(&citations[0]).expect("json");
        assert_eq!(json["style"], "mla");
        assert_eq!(json["index"], 1);
        assert_eq!(json["metadata"]["access_date"], "March 05, 2025");
        assert!(json["reliability_score"].is_f64());
    }

    #[test]
    fn bibliography_layout() {
        let citations = generate_citations(
            &[source("https://example.org/a", "Example")],
            CitationStyle::Apa,
            day(),
        );
        let text = bibliography(&citations, CitationStyle::Apa, day());
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines[0], "Bibliography (APA Style)");
        assert_eq!(lines[1], "=".repeat(40));
        assert!(lines[3].starts_with("1. Example. (2024). Example."));
        assert_eq!(lines.last().copied(), Some("Generated on March 05, 2025 by research-agent"));
    }

    #[test]
    fn empty_bibliography() {
        assert_eq!(
            bibliography(&[], CitationStyle::Harvard, day()),
            "No citations available.\n\nGenerated on March 05, 2025"
        );
    }
}
