//! Citation styles. Each renderer is a pure function of the metadata.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use super::metadata::CitationMetadata;
use crate::error::AgentError;

/// Supported citation styles.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CitationStyle {
    /// American Psychological Association.
    Apa,
    /// Modern Language Association.
    Mla,
    /// Chicago Manual of Style (notes-bibliography web entry).
    Chicago,
    /// Harvard author-date.
    Harvard,
}

impl CitationStyle {
    /// All styles.
    pub fn all() -> &'static [Self] {
        &[Self::Apa, Self::Mla, Self::Chicago, Self::Harvard]
    }

    /// Stable lowercase identifier.
    pub fn tag(&self) -> &'static str {
        match self {
            Self::Apa => "apa",
            Self::Mla => "mla",
            Self::Chicago => "chicago",
            Self::Harvard => "harvard",
        }
    }

    /// Parse a style name, case-insensitively.
    pub fn parse(name: &str) -> Option<Self> {
        let name = name.trim();
        Self::all()
            .iter()
            .copied()
            .find(|s| s.tag().eq_ignore_ascii_case(name))
    }

    /// Parse a style name, falling back to APA for unknown names.
    pub fn resolve(name: &str) -> Self {
        Self::parse(name).unwrap_or_else(|| {
            tracing::warn!(style = name, "unknown citation style, using apa");
            Self::Apa
        })
    }

    /// Render `meta` in this style.
    pub fn format(&self, meta: &CitationMetadata) -> String {
        match self {
            Self::Apa => apa(meta),
            Self::Mla => mla(meta),
            Self::Chicago => chicago(meta),
            Self::Harvard => harvard(meta),
        }
    }
}

impl fmt::Display for CitationStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.tag())
    }
}

impl FromStr for CitationStyle {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| AgentError::Config(format!("unsupported citation style: {s}")))
    }
}

/// `Authors. (Year). Title. Publisher. Retrieved Access, from URL`
///
/// The publisher takes the author position when there are no authors.
fn apa(meta: &CitationMetadata) -> String {
    let mut parts = Vec::with_capacity(5);
    if meta.authors.is_empty() {
        parts.push(format!("{}.", meta.publisher));
    } else {
        parts.push(format!("{}.", meta.authors));
    }
    parts.push(format!("({}).", meta.date));
    if !meta.title.is_empty() {
        parts.push(format!("{}.", meta.title));
    }
    if !meta.authors.is_empty() && !meta.publisher.is_empty() {
        parts.push(format!("{}.", meta.publisher));
    }
    parts.push(format!("Retrieved {}, from {}", meta.access_date, meta.url));
    parts.join(" ")
}

/// `Authors. "Title." Publisher, Year, URL. Accessed Access.`
fn mla(meta: &CitationMetadata) -> String {
    let mut parts = Vec::with_capacity(6);
    if !meta.authors.is_empty() {
        parts.push(format!("{}.", meta.authors));
    }
    if !meta.title.is_empty() {
        parts.push(format!("\"{}.\"", meta.title));
    }
    if !meta.publisher.is_empty() {
        parts.push(format!("{},", meta.publisher));
    }
    parts.push(format!("{},", meta.date));
    parts.push(format!("{}.", meta.url));
    parts.push(format!("Accessed {}.", meta.access_date));
    parts.join(" ")
}

fn chicago(meta: &CitationMetadata) -> String {
    let mut parts = Vec::with_capacity(5);
    if !meta.authors.is_empty() {
        parts.push(format!("{}.", meta.authors));
    }
    if !meta.title.is_empty() {
        parts.push(format!("\"{}.\"", meta.title));
    }
    if !meta.publisher.is_empty() {
        parts.push(format!("{}.", meta.publisher));
    }
    parts.push(format!("Last modified {}.", meta.date));
    parts.push(format!("Accessed {}. {}.", meta.access_date, meta.url));
    parts.join(" ")
}

fn harvard(meta: &CitationMetadata) -> String {
    let mut parts = Vec::with_capacity(4);
    if meta.authors.is_empty() {
        parts.push(format!("{} {}.", meta.publisher, meta.date));
    } else {
        parts.push(format!("{} {}.", meta.authors, meta.date));
    }
    if !meta.title.is_empty() {
        parts.push(format!("{}.", meta.title));
    }
    if !meta.authors.is_empty() && !meta.publisher.is_empty() {
        parts.push(format!("{}.", meta.publisher));
    }
    parts.push(format!(
        "Available at: {} (Accessed: {}).",
        meta.url, meta.access_date
    ));
    parts.join(" ")
}
