//! Configuration types for the research pipeline.
//!
//! [`ResearchConfig`] is loaded from TOML with every section optional, then
//! credentials and a few defaults are overridden from the environment.

use std::fmt;
use std::path::{Path, PathBuf};

use research_search::{ExtractionConfig, SearchConfig, SearchEngine};
use serde::{Deserialize, Serialize};

use crate::citation::CitationStyle;
use crate::error::{AgentError, Result};
use crate::summarize::SummaryMethod;

/// Top-level configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ResearchConfig {
    /// Search providers, result count and pacing.
    pub search: SearchConfig,
    /// Page fetching and batch extraction.
    pub extraction: ExtractionConfig,
    /// Summarization strategy and LLM credentials.
    pub summary: SummaryConfig,
    /// Citation formatting.
    pub citation: CitationConfig,
    /// Report store and export locations.
    pub storage: StorageConfig,
}

/// Credentials and model selection for one LLM summarization API.
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmSettings {
    /// API key. The strategy is unavailable without one.
    pub api_key: Option<String>,
    /// Model name sent with each request.
    pub model: String,
    /// API base URL.
    pub endpoint: String,
}

impl LlmSettings {
    fn openai() -> Self {
        Self {
            api_key: None,
            model: "gpt-3.5-turbo".to_owned(),
            endpoint: "https://api.openai.com/v1".to_owned(),
        }
    }

    fn anthropic() -> Self {
        Self {
            api_key: None,
            model: "claude-3-haiku-20240307".to_owned(),
            endpoint: "https://api.anthropic.com".to_owned(),
        }
    }

    /// The configured key, ignoring blank strings.
    pub fn key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|k| !k.is_empty())
    }
}

impl fmt::Debug for LlmSettings {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LlmSettings")
            .field("api_key", &self.key().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("endpoint", &self.endpoint)
            .finish()
    }
}

/// Summarization configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummaryConfig {
    /// Preferred strategy; rule-based is always the final fallback.
    pub method: SummaryMethod,
    /// Upper bound on the combined source buffer, in characters.
    pub max_combined_chars: usize,
    /// Characters of each source's text included in the buffer.
    pub per_source_chars: usize,
    /// Maximum key points in a summary.
    pub max_key_points: usize,
    /// Per-request timeout for LLM APIs in seconds.
    pub timeout_seconds: u64,
    /// OpenAI Chat Completions settings.
    pub openai: LlmSettings,
    /// Anthropic Messages settings.
    pub anthropic: LlmSettings,
}

impl Default for SummaryConfig {
    fn default() -> Self {
        Self {
            method: SummaryMethod::RuleBased,
            max_combined_chars: 8000,
            per_source_chars: 1000,
            max_key_points: 8,
            timeout_seconds: 60,
            openai: LlmSettings::openai(),
            anthropic: LlmSettings::anthropic(),
        }
    }
}

/// Citation configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CitationConfig {
    /// Style name (`apa`, `mla`, `chicago`, `harvard`). Unknown names fall
    /// back to APA.
    pub default_style: String,
}

impl Default for CitationConfig {
    fn default() -> Self {
        Self {
            default_style: CitationStyle::Apa.tag().to_owned(),
        }
    }
}

impl CitationConfig {
    /// The configured style, resolved leniently.
    pub fn style(&self) -> CitationStyle {
        CitationStyle::resolve(&self.default_style)
    }
}

/// Report store and export configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageConfig {
    /// Directory for stored reports; `data_dir()/reports` when unset.
    pub reports_dir: Option<PathBuf>,
    /// Directory for exports; `data_dir()/exports` when unset.
    pub exports_dir: Option<PathBuf>,
    /// Intended lifetime of stored reports in seconds.
    pub cache_duration_secs: u64,
    /// Exports older than this many days are removed by `cleanup`.
    pub export_cleanup_days: u64,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            reports_dir: None,
            exports_dir: None,
            cache_duration_secs: 3600,
            export_cleanup_days: 7,
        }
    }
}

impl StorageConfig {
    /// Resolved report store directory.
    pub fn reports_dir(&self) -> PathBuf {
        self.reports_dir
            .clone()
            .unwrap_or_else(crate::research_dirs::reports_dir)
    }

    /// Resolved export directory.
    pub fn exports_dir(&self) -> PathBuf {
        self.exports_dir
            .clone()
            .unwrap_or_else(crate::research_dirs::exports_dir)
    }
}

impl ResearchConfig {
    /// Load configuration from a TOML file, falling back to defaults for missing fields.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)?;
        toml::from_str(&content).map_err(|e| AgentError::Config(e.to_string()))
    }

    /// Save configuration to a TOML file, creating parent directories as needed.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written or the config cannot be serialized.
    pub fn save_to_file(&self, path: &Path) -> Result<()> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content =
            toml::to_string_pretty(self).map_err(|e| AgentError::Config(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Returns the default config file path: `config_dir()/config.toml`.
    pub fn default_config_path() -> PathBuf {
        crate::research_dirs::config_file()
    }

    /// Load from `path`, or from the default path when it exists, then
    /// apply environment overrides.
    ///
    /// # Errors
    ///
    /// Returns an error if an explicitly given or existing default file
    /// cannot be read or parsed.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        let mut config = match path {
            Some(path) => Self::from_file(path)?,
            None => {
                let default_path = Self::default_config_path();
                if default_path.is_file() {
                    Self::from_file(&default_path)?
                } else {
                    Self::default()
                }
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// Override credentials and defaults from the process environment.
    pub fn apply_env_overrides(&mut self) {
        self.apply_overrides(|name| std::env::var(name).ok());
    }

    /// Override credentials and defaults from `lookup`.
    ///
    /// Recognised names: `SERPAPI_KEY`, `BING_API_KEY`, `BRAVE_API_KEY`,
    /// `OPENAI_API_KEY`, `ANTHROPIC_API_KEY`, `DEFAULT_SEARCH_ENGINE`,
    /// `DEFAULT_CITATION_STYLE`, `DEFAULT_SUMMARY_METHOD`. Blank values are
    /// ignored.
    pub fn apply_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) {
        let get = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        for (name, engine) in [
            ("SERPAPI_KEY", SearchEngine::SerpApi),
            ("BING_API_KEY", SearchEngine::Bing),
            ("BRAVE_API_KEY", SearchEngine::Brave),
        ] {
            if let Some(key) = get(name) {
                self.search.provider_mut(engine).api_key = Some(key);
            }
        }
        if let Some(key) = get("OPENAI_API_KEY") {
            self.summary.openai.api_key = Some(key);
        }
        if let Some(key) = get("ANTHROPIC_API_KEY") {
            self.summary.anthropic.api_key = Some(key);
        }

        if let Some(engine) = get("DEFAULT_SEARCH_ENGINE") {
            match engine.parse::<SearchEngine>() {
                Ok(engine) => self.search.default_engine = engine,
                Err(e) => tracing::warn!(error = %e, "ignoring DEFAULT_SEARCH_ENGINE"),
            }
        }
        if let Some(style) = get("DEFAULT_CITATION_STYLE") {
            self.citation.default_style = style.trim().to_ascii_lowercase();
        }
        if let Some(method) = get("DEFAULT_SUMMARY_METHOD") {
            match method.parse::<SummaryMethod>() {
                Ok(method) => self.summary.method = method,
                Err(e) => tracing::warn!(error = %e, "ignoring DEFAULT_SUMMARY_METHOD"),
            }
        }
    }

    /// Human-readable problems worth warning about at startup.
    pub fn issues(&self) -> Vec<String> {
        let mut issues = Vec::new();
        if self.search.available_engines().is_empty() {
            issues.push(
                "No search API keys configured. Please set SERPAPI_KEY, BING_API_KEY, or BRAVE_API_KEY"
                    .to_owned(),
            );
        }
        match self.summary.method {
            SummaryMethod::OpenAi if self.summary.openai.key().is_none() => issues.push(
                "Summary method is openai but OPENAI_API_KEY is not set; using rule-based summaries"
                    .to_owned(),
            ),
            SummaryMethod::Anthropic if self.summary.anthropic.key().is_none() => issues.push(
                "Summary method is anthropic but ANTHROPIC_API_KEY is not set; using rule-based summaries"
                    .to_owned(),
            ),
            _ => {}
        }
        if CitationStyle::parse(&self.citation.default_style).is_none() {
            issues.push(format!(
                "Unknown citation style '{}'; APA will be used",
                self.citation.default_style
            ));
        }
        if let Err(e) = self.search.validate() {
            issues.push(e.to_string());
        }
        if let Err(e) = self.extraction.validate() {
            issues.push(e.to_string());
        }
        issues
    }
}
