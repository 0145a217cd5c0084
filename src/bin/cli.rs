//! Command-line front end for the research agent.

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use research_agent::export::render_markdown;
use research_agent::{
    CitationStyle, ExportFormat, Exporter, FileReportStore, ReportStore, ResearchAgent,
    ResearchConfig, ResearchRequest,
};
use research_search::SearchEngine;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// Research a topic on the web and produce a cited report.
#[derive(Parser)]
#[command(name = "research", version, about)]
struct Cli {
    /// Path to TOML configuration file.
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Subcommand to run.
    #[command(subcommand)]
    command: Command,
}

/// Available commands.
#[derive(Subcommand)]
enum Command {
    /// Research a topic, store the report and print it as Markdown.
    Search {
        /// The topic to research.
        topic: String,

        /// Search provider tried first (serpapi, bing, brave).
        #[arg(short, long)]
        engine: Option<SearchEngine>,

        /// Citation style (apa, mla, chicago, harvard).
        #[arg(short, long)]
        style: Option<CitationStyle>,

        /// Number of search results to request.
        #[arg(short = 'n', long)]
        results: Option<usize>,
    },

    /// Write a stored report to the exports directory.
    Export {
        /// Session id printed by `search`.
        session_id: String,

        /// Export format (markdown, json).
        #[arg(short, long, default_value = "markdown")]
        format: ExportFormat,
    },

    /// Print a stored report as Markdown.
    Show {
        /// Session id printed by `search`.
        session_id: String,
    },

    /// Delete exports older than a number of days.
    Cleanup {
        /// Age in days; defaults to `storage.export_cleanup_days`.
        #[arg(short, long)]
        days: Option<u64>,
    },

    /// Print export directory statistics as JSON.
    Stats,

    /// Print the configuration path, or write a default file.
    Config {
        /// Write the default configuration if none exists.
        #[arg(long)]
        init: bool,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr; stdout carries report output only.
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("research_agent=info,research_search=info")),
        )
        .init();

    let cli = Cli::parse();
    if let Command::Config { init: true } = cli.command {
        return init_config(cli.config);
    }
    let config = ResearchConfig::load(cli.config.as_deref()).context("failed to load config")?;

    match cli.command {
        Command::Search {
            topic,
            engine,
            style,
            results,
        } => {
            let request = ResearchRequest {
                topic,
                engine,
                style,
                max_results: results,
            };
            run_search(&config, &request).await
        }
        Command::Export { session_id, format } => run_export(&config, &session_id, format),
        Command::Show { session_id } => run_show(&config, &session_id),
        Command::Cleanup { days } => run_cleanup(&config, days),
        Command::Stats => run_stats(&config),
        Command::Config { .. } => show_config(&config, cli.config),
    }
}

async fn run_search(config: &ResearchConfig, request: &ResearchRequest) -> anyhow::Result<()> {
    for issue in config.issues() {
        warn!("{issue}");
    }

    let agent = ResearchAgent::new(config)?;
    let report = agent.research_with(request).await?;

    let store = FileReportStore::new(config.storage.reports_dir());
    store.put(&report)?;
    info!(session_id = %report.session_id, dir = %store.dir().display(), "report stored");

    println!("Session: {}", report.session_id);
    println!();
    println!("{}", render_markdown(&report));
    Ok(())
}

fn run_export(config: &ResearchConfig, session_id: &str, format: ExportFormat) -> anyhow::Result<()> {
    let store = FileReportStore::new(config.storage.reports_dir());
    let report = store.get(session_id)?;
    let path = Exporter::new(config.storage.exports_dir()).export(&report, format)?;
    println!("{}", path.display());
    Ok(())
}

fn run_show(config: &ResearchConfig, session_id: &str) -> anyhow::Result<()> {
    let store = FileReportStore::new(config.storage.reports_dir());
    let report = store.get(session_id)?;
    println!("{}", render_markdown(&report));
    Ok(())
}

fn run_cleanup(config: &ResearchConfig, days: Option<u64>) -> anyhow::Result<()> {
    let days = days.unwrap_or(config.storage.export_cleanup_days);
    let exporter = Exporter::new(config.storage.exports_dir());
    let deleted = exporter.cleanup_older_than(days)?;
    println!("Deleted {deleted} export(s) older than {days} day(s)");
    Ok(())
}

fn run_stats(config: &ResearchConfig) -> anyhow::Result<()> {
    let stats = Exporter::new(config.storage.exports_dir()).stats()?;
    println!("{}", serde_json::to_string_pretty(&stats)?);
    Ok(())
}

fn init_config(path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(ResearchConfig::default_config_path);
    if path.exists() {
        anyhow::bail!("config already exists at {}", path.display());
    }
    ResearchConfig::default()
        .save_to_file(&path)
        .with_context(|| format!("failed to write {}", path.display()))?;
    println!("Wrote default config to {}", path.display());
    Ok(())
}

fn show_config(config: &ResearchConfig, path: Option<PathBuf>) -> anyhow::Result<()> {
    let path = path.unwrap_or_else(ResearchConfig::default_config_path);
    println!("{}", path.display());
    let issues = config.issues();
    if issues.is_empty() {
        println!("Configuration OK");
    }
    for issue in issues {
        println!("warning: {issue}");
    }
    Ok(())
}
