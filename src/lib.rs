//! Research assistant: turns a topic into a cited research report.
//!
//! A request flows through four stages:
//!
//! 1. **Search**: web search through SerpApi, Bing or Brave with provider
//!    fallback ([`research_search::Searcher`])
//! 2. **Extract**: page fetch and readable-content extraction
//!    ([`research_search::Extractor`])
//! 3. **Summarize**: LLM summaries when a key is configured, with a
//!    rule-based extractive fallback ([`summarize::Summarizer`])
//! 4. **Cite**: per-source metadata, reliability and formatted citations
//!    ([`citation`])
//!
//! The result is a [`Report`], stored by session id ([`store`]) and
//! exported as Markdown or JSON ([`export`]).

pub mod agent;
pub mod citation;
pub mod config;
pub mod error;
pub mod export;
pub mod report;
pub mod research_dirs;
pub mod store;
pub mod summarize;
pub mod topic;

pub use agent::{ResearchAgent, ResearchRequest};
pub use citation::{Citation, CitationStyle};
pub use config::ResearchConfig;
pub use error::{AgentError, Result};
pub use export::{ExportFormat, Exporter};
pub use report::Report;
pub use store::{FileReportStore, MemoryReportStore, ReportStore};
pub use summarize::{Summarizer, Summary, SummaryMethod};
pub use topic::{is_valid_topic, validate_topic};
