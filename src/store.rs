//! Completed-report store keyed by session id.
//!
//! Reports are written once on completion and read back for export.
//! Nothing is evicted.
// TODO: enforce `storage.cache_duration_secs` by evicting reports older than it.

use std::collections::HashMap;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use crate::error::{AgentError, Result};
use crate::report::{Report, is_session_id};

/// Write-once, read-many report storage.
pub trait ReportStore: Send + Sync {
    /// Store a completed report. Fails if its session id is already stored.
    fn put(&self, report: &Report) -> Result<()>;

    /// Load the report for `session_id`.
    fn get(&self, session_id: &str) -> Result<Report>;

    /// Whether a report for `session_id` is stored.
    fn contains(&self, session_id: &str) -> bool;
}

/// One pretty-printed JSON file per report, `<session_id>.json`.
#[derive(Debug, Clone)]
pub struct FileReportStore {
    dir: PathBuf,
}

impl FileReportStore {
    /// Store reports under `dir`, created on first write.
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// The store directory.
    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, session_id: &str) -> Option<PathBuf> {
        is_session_id(session_id).then(|| self.dir.join(format!("{session_id}.json")))
    }
}

impl ReportStore for FileReportStore {
    fn put(&self, report: &Report) -> Result<()> {
        let path = self.path_for(&report.session_id).ok_or_else(|| {
            AgentError::Store(format!("invalid session id: {}", report.session_id))
        })?;
        std::fs::create_dir_all(&self.dir)?;

        let json = serde_json::to_string_pretty(report)
            .map_err(|e| AgentError::Store(format!("failed to serialize report: {e}")))?;

        match create_exclusive(&path, |file| file.write_all(json.as_bytes())) {
            Ok(()) => {}
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {
                return Err(AgentError::Store(format!(
                    "report {} already stored",
                    report.session_id
                )));
            }
            Err(e) => return Err(e.into()),
        }
        tracing::debug!(session_id = %report.session_id, path = %path.display(), "report stored");
        Ok(())
    }

    fn get(&self, session_id: &str) -> Result<Report> {
        let path = self
            .path_for(session_id)
            .ok_or_else(|| AgentError::NotFound(session_id.to_owned()))?;
        let content = match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AgentError::NotFound(session_id.to_owned()));
            }
            Err(e) => return Err(e.into()),
        };
        serde_json::from_str(&content)
            .map_err(|e| AgentError::Store(format!("corrupt report {session_id}: {e}")))
    }

    fn contains(&self, session_id: &str) -> bool {
        self.path_for(session_id).is_some_and(|p| p.is_file())
    }
}

/// Create `path`, which must not exist, and fill it with `write`.
///
/// A failed write removes the partial file so the id stays storable.
fn create_exclusive(
    path: &Path,
    write: impl FnOnce(&mut std::fs::File) -> std::io::Result<()>,
) -> std::io::Result<()> {
    let mut file = std::fs::OpenOptions::new()
        .write(true)
        .create_new(true)
        .open(path)?;
    let written = write(&mut file).and_then(|()| file.sync_all());
    drop(file);
    if let Err(e) = written {
        if let Err(rm) = std::fs::remove_file(path) {
            tracing::warn!(path = %path.display(), error = %rm, "failed to remove partial report");
        }
        return Err(e);
    }
    Ok(())
}

/// In-memory store.
#[derive(Debug, Default)]
pub struct MemoryReportStore {
    reports: Mutex<HashMap<String, Report>>,
}

impl MemoryReportStore {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored reports.
    pub fn len(&self) -> usize {
        self.reports.lock().map(|r| r.len()).unwrap_or(0)
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl ReportStore for MemoryReportStore {
    fn put(&self, report: &Report) -> Result<()> {
        let mut reports = self
            .reports
            .lock()
            .map_err(|_| AgentError::Store("report store lock poisoned".into()))?;
        if reports.contains_key(&report.session_id) {
            return Err(AgentError::Store(format!(
                "report {} already stored",
                report.session_id
            )));
        }
        reports.insert(report.session_id.clone(), report.clone());
        Ok(())
    }

    fn get(&self, session_id: &str) -> Result<Report> {
        let reports = self
            .reports
            .lock()
            .map_err(|_| AgentError::Store("report store lock poisoned".into()))?;
        reports
            .get(session_id)
            .cloned()
            .ok_or_else(|| AgentError::NotFound(session_id.to_owned()))
    }

    fn contains(&self, session_id: &str) -> bool {
        self.reports
            .lock()
            .map(|r| r.contains_key(session_id))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::summarize::Summary;

    fn report() -> Report {
        Report::new("soil carbon", Summary::degraded("soil carbon"), vec![], vec![])
    }

    #[test]
    fn memory_store_is_write_once() {
        let store = MemoryReportStore::new();
        let report = report();
        store.put(&report).expect("put");
        assert!(store.contains(&report.session_id));
        assert_eq!(store.get(&report.session_id).expect("get"), report);
        assert!(matches!(store.put(&report), Err(AgentError::Store(_))));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn memory_store_missing_is_not_found() {
        let store = MemoryReportStore::new();
        assert!(matches!(store.get("nope"), Err(AgentError::NotFound(_))));
        assert!(store.is_empty());
    }

    #[test]
    fn file_store_refuses_overwrite() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileReportStore::new(dir.path().join("reports"));
        let report = report();
        store.put(&report).expect("put");
        assert!(store.contains(&report.session_id));
        assert!(matches!(store.put(&report), Err(AgentError::Store(_))));
    }

    #[test]
    fn file_store_rejects_path_like_ids() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileReportStore::new(dir.path());
        let mut report = report();
        report.session_id = "../escape".into();
        assert!(matches!(store.put(&report), Err(AgentError::Store(_))));
        assert!(matches!(store.get("../escape"), Err(AgentError::NotFound(_))));
        assert!(!store.contains("../escape"));
    }

    #[test]
    fn failed_write_leaves_no_partial_file() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileReportStore::new(dir.path());
        let report = report();
        let path = dir.path().join(format!("{}.json", report.session_id));

        let err = create_exclusive(&path, |file| {
            file.write_all(b"{\"session_id\": ")?;
            Err(std::io::Error::other("disk full"))
        })
        .unwrap_err();
        assert_eq!(err.to_string(), "disk full");
        assert!(!path.exists());

        store.put(&report).expect("id is still storable");
        assert_eq!(store.get(&report.session_id).expect("get"), report);
    }

    #[test]
    fn file_store_missing_and_corrupt() {
        let dir = tempfile::tempdir().expect("tempdir");
        let store = FileReportStore::new(dir.path());
        let id = crate::report::new_session_id();
        assert!(matches!(store.get(&id), Err(AgentError::NotFound(_))));

        std::fs::write(dir.path().join(format!("{id}.json")), "{not json").expect("write");
        assert!(matches!(store.get(&id), Err(AgentError::Store(_))));
    }
}
