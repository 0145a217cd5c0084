//! Shared HTTP plumbing: configured clients and per-provider request pacing.
//!
//! Provider APIs and page fetches use separate [`reqwest::Client`]s because
//! they send different User-Agent strings and have independent timeouts.

use std::time::{Duration, Instant};

use tokio::sync::Mutex;

use crate::config::{ExtractionConfig, SearchConfig};
use crate::error::SearchError;

/// Build a [`reqwest::Client`] for search provider API calls.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_api_client(config: &SearchConfig) -> Result<reqwest::Client, SearchError> {
    build_client(&config.user_agent, config.timeout_seconds)
}

/// Build a [`reqwest::Client`] for fetching pages to extract.
///
/// # Errors
///
/// Returns [`SearchError::Http`] if the client cannot be constructed.
pub fn build_fetch_client(config: &ExtractionConfig) -> Result<reqwest::Client, SearchError> {
    build_client(&config.user_agent, config.timeout_seconds)
}

fn build_client(user_agent: &str, timeout_seconds: u64) -> Result<reqwest::Client, SearchError> {
    reqwest::Client::builder()
        .timeout(Duration::from_secs(timeout_seconds))
        .user_agent(user_agent)
        .redirect(reqwest::redirect::Policy::limited(10))
        .build()
        .map_err(|e| SearchError::Http(format!("failed to build HTTP client: {e}")))
}

/// Minimum-interval guard owned by one provider client.
///
/// [`Pacer::wait`] sleeps until `min_interval` has passed since the previous
/// call, then records the current instant. It is a pacing guard, not a retry:
/// the lock is held only while sleeping, never across the network call.
#[derive(Debug)]
pub struct Pacer {
    min_interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl Pacer {
    /// Create a pacer enforcing `min_interval` between calls.
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_call: Mutex::new(None),
        }
    }

    /// Wait if the previous call was less than `min_interval` ago.
    pub async fn wait(&self) {
        let mut last = self.last_call.lock().await;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                let remaining = self.min_interval - elapsed;
                tracing::trace!(wait_ms = remaining.as_millis() as u64, "pacing provider call");
                tokio::time::sleep(remaining).await;
            }
        }
        *last = Some(Instant::now());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn build_clients_with_default_config() {
        assert!(build_api_client(&SearchConfig::default()).is_ok());
        assert!(build_fetch_client(&ExtractionConfig::default()).is_ok());
    }

    #[tokio::test]
    async fn first_call_does_not_wait() {
        let pacer = Pacer::new(Duration::from_secs(5));
        let start = Instant::now();
        pacer.wait().await;
        assert!(start.elapsed() < Duration::from_secs(1));
    }

    #[tokio::test]
    async fn consecutive_calls_are_spaced() {
        let pacer = Pacer::new(Duration::from_millis(60));
        let start = Instant::now();
        pacer.wait().await;
        pacer.wait().await;
        assert!(start.elapsed() >= Duration::from_millis(60));
    }

    #[tokio::test]
    async fn zero_interval_never_waits() {
        let pacer = Pacer::new(Duration::ZERO);
        let start = Instant::now();
        for _ in 0..5 {
            pacer.wait().await;
        }
        assert!(start.elapsed() < Duration::from_secs(1));
    }
}
