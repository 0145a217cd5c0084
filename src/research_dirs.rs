//! Application directory paths.
//!
//! Uses the [`dirs`] crate for platform-appropriate locations.
//!
//! | Purpose | Linux | macOS |
//! |---------|-------|-------|
//! | Data | `~/.local/share/research-agent/` | `~/Library/Application Support/research-agent/` |
//! | Config | `~/.config/research-agent/` | `~/Library/Application Support/research-agent/` |
//!
//! # Environment Overrides
//!
//! - `RESEARCH_AGENT_DATA_DIR` overrides [`data_dir`]
//! - `RESEARCH_AGENT_CONFIG_DIR` overrides [`config_dir`]

use std::path::PathBuf;

const APP_DIR: &str = "research-agent";

/// Application data root: stored reports and exports live below it.
#[must_use]
pub fn data_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("RESEARCH_AGENT_DATA_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::data_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("/tmp/research-agent-data"))
}

/// Application config directory.
#[must_use]
pub fn config_dir() -> PathBuf {
    if let Some(override_dir) = std::env::var_os("RESEARCH_AGENT_CONFIG_DIR") {
        return PathBuf::from(override_dir);
    }
    dirs::config_dir()
        .map(|d| d.join(APP_DIR))
        .unwrap_or_else(|| PathBuf::from("/tmp/research-agent-config"))
}

/// Main config file path (`config_dir()/config.toml`).
#[must_use]
pub fn config_file() -> PathBuf {
    config_dir().join("config.toml")
}

/// Completed report store (`data_dir()/reports/`).
#[must_use]
pub fn reports_dir() -> PathBuf {
    data_dir().join("reports")
}

/// Export output directory (`data_dir()/exports/`).
#[must_use]
pub fn exports_dir() -> PathBuf {
    data_dir().join("exports")
}
