//! Backing source for raw character records.
//!
//! The external character database is simulated by [MockCharacterSource]; the
//! repository only talks to the [CharacterSource] trait, so a real HTTP client can be
//! dropped in later without touching cache or fallback logic.

use std::future::Future;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use serde_json::Value;
use thiserror::Error;

use crate::data::samples::mock_records;

/// Latency the mock source sleeps before answering, mimicking a network round trip.
pub const SIMULATED_LATENCY: Duration = Duration::from_millis(100);

#[derive(Debug, Clone, PartialEq, Error)]
pub enum SourceError {
    #[error("character source timed out after {0:?}")]
    Timeout(Duration),

    #[error("character source unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait CharacterSource: Send + Sync {
    /// Fetch every raw character record.
    async fn fetch_all(&self) -> Result<Vec<Value>, SourceError>;

    /// Fetch one raw record by id. The default scans [fetch_all](CharacterSource::fetch_all),
    /// which is fine while the source is small.
    async fn fetch_one(&self, id: &str) -> Result<Option<Value>, SourceError> {
        let records = self.fetch_all().await?;
        Ok(records
            .into_iter()
            .find(|record| record.get("id").and_then(Value::as_str) == Some(id)))
    }

    /// Release the underlying client. Called once on shutdown.
    async fn close(&self) {}
}

/// Stand-in for the external character API.
#[derive(Debug)]
pub struct MockCharacterSource {
    base_url: String,
    latency: Duration,
    closed: AtomicBool,
    requests: AtomicUsize,
}

impl MockCharacterSource {
    pub fn new(base_url: impl Into<String>, latency: Duration) -> Self {
        Self {
            base_url: base_url.into(),
            latency,
            closed: AtomicBool::new(false),
            requests: AtomicUsize::new(0),
        }
    }

    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    /// Number of `fetch_all` calls served so far.
    pub fn request_count(&self) -> usize {
        self.requests.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl CharacterSource for MockCharacterSource {
    async fn fetch_all(&self) -> Result<Vec<Value>, SourceError> {
        if self.is_closed() {
            return Err(SourceError::Unavailable(format!(
                "client for {} is closed",
                self.base_url
            )));
        }
        self.requests.fetch_add(1, Ordering::SeqCst);
        tracing::debug!(base_url = %self.base_url, "fetching characters from external API");
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        Ok(mock_records())
    }

    async fn close(&self) {
        if !self.closed.swap(true, Ordering::SeqCst) {
            tracing::info!(base_url = %self.base_url, "character source client closed");
        }
    }
}

/// Run `op` with a per-attempt `timeout`, retrying up to `retries` more times.
/// Returns the last error once every attempt has failed.
pub async fn fetch_with_retry<T, F, Fut>(
    label: &str,
    timeout: Duration,
    retries: u32,
    mut op: F,
) -> Result<T, SourceError>
where
    F: FnMut() -> Fut,
    Fut: Future<Output = Result<T, SourceError>>,
{
    let attempts = retries.saturating_add(1);
    let mut last_error = SourceError::Unavailable("no attempt made".to_string());

    for attempt in 1..=attempts {
        match tokio::time::timeout(timeout, op()).await {
            Ok(Ok(value)) => return Ok(value),
            Ok(Err(err)) => {
                tracing::warn!(label, attempt, attempts, error = %err, "source fetch failed");
                last_error = err;
            }
            Err(_) => {
                tracing::warn!(label, attempt, attempts, ?timeout, "source fetch timed out");
                last_error = SourceError::Timeout(timeout);
            }
        }
    }

    Err(last_error)
}
