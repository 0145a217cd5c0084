//! Report storage and export tests over a fixed report.

use chrono::{NaiveDate, TimeZone, Utc};
use research_agent::citation::{CitationStyle, generate_citations};
use research_agent::export::{render_json, render_markdown};
use research_agent::summarize::Confidence;
use research_agent::{
    AgentError, ExportFormat, Exporter, FileReportStore, Report, ReportStore, Summary,
    SummaryMethod,
};
use research_search::{ExtractedContent, ExtractionMethod};

fn source(url: &str, domain: &str, title: &str, date: Option<&str>) -> ExtractedContent {
    ExtractedContent {
        title: title.into(),
        text: "Offshore wind capacity doubled between 2019 and 2023 across northern Europe."
            .into(),
        summary: "Offshore wind capacity doubled.".into(),
        authors: vec!["Lena Fischer".into()],
        publish_date: date.map(str::to_owned),
        url: url.into(),
        domain: domain.into(),
        word_count: 12,
        extraction_method: ExtractionMethod::Article,
        search_title: None,
        search_snippet: None,
    }
}

fn fixed_report() -> Report {
    let sources = vec![
        source(
            "https://www.nature.com/articles/offshore-wind",
            "nature.com",
            "Offshore wind growth in the North Sea | A decade of capacity additions",
            Some("2023-04-02T10:00:00+00:00"),
        ),
        source("https://blog.example.org/wind", "blog.example.org", "Wind notes", None),
    ];
    let accessed = NaiveDate::from_ymd_opt(2025, 3, 5).expect("date");
    let citations = generate_citations(&sources, CitationStyle::Apa, accessed);
    let timestamp = Utc.with_ymd_and_hms(2025, 3, 5, 14, 30, 0).single().expect("timestamp");

    Report {
        session_id: "6f1c2a4e-8d3b-4c6a-9e0f-1a2b3c4d5e6f".into(),
        topic: "offshore wind expansion".into(),
        timestamp,
        summary: Summary {
            main_summary: "Offshore wind capacity doubled across northern Europe.".into(),
            key_points: vec![
                "Source discusses: Offshore wind growth".into(),
                "Capacity doubled between 2019 and 2023".into(),
            ],
            method: SummaryMethod::RuleBased,
            topic: "offshore wind expansion".into(),
            generated_at: timestamp,
            total_sources: 2,
            confidence: Some(Confidence::Medium),
            error: false,
        },
        total_sources: sources.len(),
        sources,
        citations,
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Store
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn file_store_round_trips_reports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileReportStore::new(dir.path().join("reports"));
    let report = fixed_report();

    store.put(&report).expect("put");
    assert!(store.contains(&report.session_id));
    assert_eq!(store.get(&report.session_id).expect("get"), report);

    let err = store.put(&report).unwrap_err();
    assert!(matches!(err, AgentError::Store(_)));
}

#[test]
fn unknown_session_is_not_found() {
    let dir = tempfile::tempdir().expect("tempdir");
    let store = FileReportStore::new(dir.path());
    let err = store.get("0d5c1c8e-0000-4000-8000-000000000000").unwrap_err();
    assert!(matches!(err, AgentError::NotFound(_)));
}

// ────────────────────────────────────────────────────────────────────────────
// Markdown
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn markdown_is_deterministic() {
    let report = fixed_report();
    let first = render_markdown(&report);
    let second = render_markdown(&report.clone());
    assert_eq!(first, second);
}

#[test]
fn markdown_layout() {
    let md = render_markdown(&fixed_report());
    let lines: Vec<&str> = md.lines().collect();

    assert_eq!(lines[0], "# Research Report: offshore wind expansion");
    assert_eq!(lines[2], "**Generated:** March 05, 2025 at 02:30 PM");
    assert_eq!(lines[3], "**Sources:** 2 articles analyzed");
    assert!(md.contains("## Executive Summary\n\nOffshore wind capacity doubled across northern Europe.\n"));
    assert!(md.contains("## Key Findings\n\n1. Source discusses: Offshore wind growth\n2. Capacity doubled"));

    assert!(md.contains("| Source | Domain | Date | Reliability |"));
    assert!(md.contains(
        "| Offshore wind growth in the North Sea \\| A decade o... | nature.com | 2023-04-02 | High |"
    ));
    assert!(md.contains("| Wind notes... | blog.example.org | N/A | Medium |"));

    assert!(md.contains("### 1. Offshore wind growth in the North Sea | A decade of capacity additions"));
    assert!(md.contains(
        "**URL:** [https://blog.example.org/wind](https://blog.example.org/wind)"
    ));
    assert!(md.contains("**Summary:** Offshore wind capacity doubled."));
    assert!(md.contains("## Bibliography\n\n1. Lena Fischer. (2023)."));

    assert_eq!(lines.last().copied(), Some("*Total sources analyzed: 2*"));
    assert!(md.contains("*This report was generated by research-agent on March 05, 2025 at 02:30 PM*"));
}

#[test]
fn json_export_parses_back() {
    let report = fixed_report();
    let json = render_json(&report).expect("json");
    let back: Report = serde_json::from_str(&json).expect("parse");
    assert_eq!(back.session_id, report.session_id);
    assert_eq!(back.citations.len(), 2);
}

// ────────────────────────────────────────────────────────────────────────────
// Exporter
// ────────────────────────────────────────────────────────────────────────────

#[test]
fn exporter_writes_named_files() {
    let dir = tempfile::tempdir().expect("tempdir");
    let exporter = Exporter::new(dir.path().join("exports"));
    let report = fixed_report();

    let md_path = exporter.export(&report, ExportFormat::Markdown).expect("markdown");
    let json_path = exporter.export(&report, ExportFormat::Json).expect("json");

    assert_eq!(
        md_path.file_name().and_then(|n| n.to_str()),
        Some("research_report_6f1c2a4e-8d3b-4c6a-9e0f-1a2b3c4d5e6f.md")
    );
    assert_eq!(json_path.extension().and_then(|e| e.to_str()), Some("json"));
    assert_eq!(
        std::fs::read_to_string(&md_path).expect("read"),
        render_markdown(&report)
    );

    // Re-exporting replaces the previous file.
    exporter.export(&report, ExportFormat::Markdown).expect("again");
    assert_eq!(std::fs::read_dir(exporter.dir()).expect("dir").count(), 2);
}

#[test]
fn cleanup_keeps_fresh_exports() {
    let dir = tempfile::tempdir().expect("tempdir");
    let exporter = Exporter::new(dir.path());
    exporter
        .export(&fixed_report(), ExportFormat::Json)
        .expect("export");

    assert_eq!(exporter.cleanup_older_than(7).expect("cleanup"), 0);
    assert_eq!(std::fs::read_dir(dir.path()).expect("dir").count(), 1);
}
