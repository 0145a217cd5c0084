//! Markdown and JSON rendering of reports, and the export directory.
//!
//! Rendering is a pure function of the [`Report`]; the same report always
//! renders to the same bytes.

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;
use std::time::{Duration, SystemTime};

use serde::Serialize;

use crate::error::{AgentError, Result};
use crate::report::Report;

/// Title characters shown in the source analysis table.
const TABLE_TITLE_CHARS: usize = 50;

/// File name prefix of every export.
const EXPORT_PREFIX: &str = "research_report_";

/// Export file format.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExportFormat {
    /// Markdown report.
    Markdown,
    /// Pretty-printed JSON of the full report.
    Json,
}

impl ExportFormat {
    /// File extension without the dot.
    pub fn extension(&self) -> &'static str {
        match self {
            Self::Markdown => "md",
            Self::Json => "json",
        }
    }

    /// The format an export file name was written in, if it is one of ours.
    fn of_export_file(name: &str) -> Option<Self> {
        let stem = name.strip_prefix(EXPORT_PREFIX)?;
        let (id, ext) = stem.rsplit_once('.')?;
        if id.is_empty() {
            return None;
        }
        match ext {
            "md" => Some(Self::Markdown),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

impl fmt::Display for ExportFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Markdown => "markdown",
            Self::Json => "json",
        })
    }
}

impl FromStr for ExportFormat {
    type Err = AgentError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "markdown" | "md" => Ok(Self::Markdown),
            "json" => Ok(Self::Json),
            other => Err(AgentError::Export(format!("unsupported export format: {other}"))),
        }
    }
}

/// Reliability label for a score: High at 0.8, Medium at 0.6, else Low.
pub fn reliability_label(score: f64) -> &'static str {
    if score >= 0.8 {
        "High"
    } else if score >= 0.6 {
        "Medium"
    } else {
        "Low"
    }
}

fn table_cell(text: &str) -> String {
    text.replace('|', "\\|")
}

/// Render `report` as Markdown.
pub fn render_markdown(report: &Report) -> String {
    let generated = report.timestamp.format("%B %d, %Y at %I:%M %p").to_string();
    let sources = &report.sources;

    let mut md = vec![
        format!("# Research Report: {}", report.topic),
        String::new(),
        format!("**Generated:** {generated}"),
        format!("**Sources:** {} articles analyzed", sources.len()),
        String::new(),
        "---".to_owned(),
        String::new(),
        "## Executive Summary".to_owned(),
        String::new(),
    ];

    if !report.summary.main_summary.is_empty() {
        md.push(report.summary.main_summary.clone());
        md.push(String::new());
    }

    if !report.summary.key_points.is_empty() {
        md.push("## Key Findings".to_owned());
        md.push(String::new());
        for (i, point) in report.summary.key_points.iter().enumerate() {
            md.push(format!("{}. {point}", i + 1));
        }
        md.push(String::new());
    }

    if !sources.is_empty() {
        md.push("## Source Analysis".to_owned());
        md.push(String::new());
        md.push("| Source | Domain | Date | Reliability |".to_owned());
        md.push("|--------|--------|------|-------------|".to_owned());
        for source in sources {
            let title: String = source.title.chars().take(TABLE_TITLE_CHARS).collect();
            let date: String = match source.publish_date.as_deref() {
                Some(d) if !d.is_empty() => d.chars().take(10).collect(),
                _ => "N/A".to_owned(),
            };
            let reliability = report
                .citation_for(&source.url)
                .map_or("Medium", |c| reliability_label(c.reliability_score));
            md.push(format!(
                "| {}... | {} | {} | {} |",
                table_cell(&title),
                table_cell(&source.domain),
                date,
                reliability
            ));
        }
        md.push(String::new());

        md.push("## Detailed Sources".to_owned());
        md.push(String::new());
        for (i, source) in sources.iter().enumerate() {
            md.push(format!("### {}. {}", i + 1, source.title));
            md.push(String::new());
            md.push(format!("**URL:** [{0}]({0})", source.url));
            md.push(String::new());
            if !source.summary.is_empty() {
                md.push(format!("**Summary:** {}", source.summary));
                md.push(String::new());
            }
        }
    }

    if !report.citations.is_empty() {
        md.push("## Bibliography".to_owned());
        md.push(String::new());
        for citation in &report.citations {
            md.push(format!("{}. {}", citation.index, citation.formatted));
            md.push(String::new());
        }
    }

    md.push("---".to_owned());
    md.push(String::new());
    md.push(format!("*This report was generated by research-agent on {generated}*"));
    md.push(String::new());
    md.push(format!("*Total sources analyzed: {}*", sources.len()));

    md.join("\n")
}

/// Render `report` as pretty JSON.
///
/// # Errors
///
/// Returns [`AgentError::Export`] if serialization fails.
pub fn render_json(report: &Report) -> Result<String> {
    serde_json::to_string_pretty(report)
        .map_err(|e| AgentError::Export(format!("failed to serialize report: {e}")))
}

/// Render `report` in `format`.
///
/// # Errors
///
/// Returns [`AgentError::Export`] if rendering fails.
pub fn render(report: &Report, format: ExportFormat) -> Result<String> {
    match format {
        ExportFormat::Markdown => Ok(render_markdown(report)),
        ExportFormat::Json => render_json(report),
    }
}

/// Writes export files into one directory.
#[derive(Debug, Clone)]
pub struct Exporter {
    dir: PathBuf,
}

impl Exporter {
    /// Export into `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The export directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path an export of `session_id` in `format` is written to.
    pub fn path_for(&self, session_id: &str, format: ExportFormat) -> PathBuf {
        self.dir
            .join(format!("{EXPORT_PREFIX}{session_id}.{}", format.extension()))
    }

    /// Write `report` as `research_report_<session_id>.<ext>`, replacing any
    /// earlier export of the same report.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Export`] if rendering fails or
    /// [`AgentError::Io`] if the file cannot be written.
    pub fn export(&self, report: &Report, format: ExportFormat) -> Result<PathBuf> {
        let content = render(report, format)?;
        std::fs::create_dir_all(&self.dir)?;
        let path = self.path_for(&report.session_id, format);
        std::fs::write(&path, content)?;
        tracing::info!(session_id = %report.session_id, %format, path = %path.display(), "report exported");
        Ok(path)
    }

    /// Delete exports last modified more than `days` days ago.
    /// Returns how many were deleted; a missing directory deletes nothing.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Io`] if the directory cannot be listed.
    pub fn cleanup_older_than(&self, days: u64) -> Result<usize> {
        let max_age = Duration::from_secs(days.saturating_mul(24 * 60 * 60));
        self.cleanup_before(SystemTime::now().checked_sub(max_age).unwrap_or(SystemTime::UNIX_EPOCH))
    }

    /// Delete exports last modified before `cutoff`. Files not named like
    /// an export are never touched.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Io`] if the directory cannot be listed.
    pub fn cleanup_before(&self, cutoff: SystemTime) -> Result<usize> {
        let mut deleted = 0;
        for (path, _, meta) in self.export_files()? {
            let stale = meta.modified().is_ok_and(|modified| modified < cutoff);
            if !stale {
                continue;
            }
            match std::fs::remove_file(&path) {
                Ok(()) => {
                    tracing::info!(file = %path.display(), "deleted old export");
                    deleted += 1;
                }
                Err(e) => {
                    tracing::warn!(file = %path.display(), error = %e, "failed to delete export");
                }
            }
        }
        Ok(deleted)
    }

    /// Count and size of the exports in the directory.
    ///
    /// # Errors
    ///
    /// Returns [`AgentError::Io`] if the directory cannot be listed.
    pub fn stats(&self) -> Result<ExportStats> {
        let mut stats = ExportStats {
            export_dir: self.dir.clone(),
            total_files: 0,
            md_files: 0,
            json_files: 0,
            total_size_bytes: 0,
        };
        for (_, format, meta) in self.export_files()? {
            stats.total_files += 1;
            stats.total_size_bytes += meta.len();
            match format {
                ExportFormat::Markdown => stats.md_files += 1,
                ExportFormat::Json => stats.json_files += 1,
            }
        }
        Ok(stats)
    }

    /// Regular files in the directory named like an export.
    fn export_files(&self) -> Result<Vec<(PathBuf, ExportFormat, std::fs::Metadata)>> {
        let entries = match std::fs::read_dir(&self.dir) {
            Ok(entries) => entries,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(e.into()),
        };

        let mut files = Vec::new();
        for entry in entries {
            let entry = entry?;
            let Some(format) = entry.file_name().to_str().and_then(ExportFormat::of_export_file)
            else {
                continue;
            };
            let Ok(meta) = entry.metadata() else {
                continue;
            };
            if meta.is_file() {
                files.push((entry.path(), format, meta));
            }
        }
        Ok(files)
    }
}

/// Summary of an export directory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportStats {
    /// Directory the counts describe.
    pub export_dir: PathBuf,
    /// Export files of any format.
    pub total_files: usize,
    /// Markdown exports.
    pub md_files: usize,
    /// JSON exports.
    pub json_files: usize,
    /// Combined size of all exports.
    pub total_size_bytes: u64,
}

impl ExportStats {
    /// Combined size in mebibytes.
    pub fn total_size_mb(&self) -> f64 {
        self.total_size_bytes as f64 / (1024.0 * 1024.0)
    }
}
