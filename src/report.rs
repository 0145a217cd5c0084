//! The research report record.

use chrono::{DateTime, Utc};
use research_search::ExtractedContent;
use serde::{Deserialize, Serialize};

use crate::citation::Citation;
use crate::summarize::Summary;

/// A completed research request. Immutable once built; identified by
/// `session_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Report {
    /// Unique id of the request (UUID v4).
    pub session_id: String,
    /// The validated topic.
    pub topic: String,
    /// When the report was completed.
    pub timestamp: DateTime<Utc>,
    /// Summary of all sources.
    pub summary: Summary,
    /// Extracted sources in search order.
    pub sources: Vec<ExtractedContent>,
    /// Citations in source order.
    pub citations: Vec<Citation>,
    /// Number of sources.
    pub total_sources: usize,
}

impl Report {
    /// Assemble a report under a fresh session id.
    pub fn new(
        topic: &str,
        summary: Summary,
        sources: Vec<ExtractedContent>,
        citations: Vec<Citation>,
    ) -> Self {
        Self {
            session_id: new_session_id(),
            topic: topic.to_owned(),
            timestamp: Utc::now(),
            total_sources: sources.len(),
            summary,
            sources,
            citations,
        }
    }

    /// The citation for the source at `url`, if any.
    pub fn citation_for(&self, url: &str) -> Option<&Citation> {
        self.citations.iter().find(|c| c.url == url)
    }
}

/// A new globally unique session id.
pub fn new_session_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Whether `id` is a well-formed session id.
pub fn is_session_id(id: &str) -> bool {
    uuid::Uuid::parse_str(id).is_ok()
}
