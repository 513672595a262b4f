//! Consume-once response store
//!
//! Workers publish fetch outcomes keyed by request path; the orchestrator
//! blocks on `retrieve` until the outcome for the path it needs arrives. A
//! successful retrieve removes the entry, which keeps memory bounded over a
//! long run and matches the one-shot-per-URL access pattern of the pipeline.

use chrono::{DateTime, Utc};
use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::Notify;

use crate::StageError;

/// The outcome of fetching one page.
///
/// HTTP error statuses are valid outcomes: a 404 page is delivered here like
/// any other, and only the orchestrator decides what a non-2xx means.
#[derive(Debug, Clone)]
pub struct FetchOutcome {
    /// HTTP status code of the response
    pub status: u16,

    /// Response body
    pub body: String,

    /// When the fetch completed
    pub fetched_at: DateTime<Utc>,
}

impl FetchOutcome {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
            fetched_at: Utc::now(),
        }
    }

    /// Whether the status is in the 2xx range
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Thread-safe blocking map from request path to fetch outcome
///
/// At most one live entry exists per path, and each entry is consumed by
/// exactly one retrieve. Paths are expected to be published at most once per
/// run; retrieving a path a second time finds nothing and parks until the
/// timeout fires.
#[derive(Debug, Default)]
pub struct ResponseStore {
    entries: Mutex<HashMap<String, FetchOutcome>>,
    notify: Notify,
}

impl ResponseStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts the outcome for `path` and wakes all parked retrievers.
    pub fn publish(&self, path: impl Into<String>, outcome: FetchOutcome) {
        self.entries.lock().unwrap().insert(path.into(), outcome);
        self.notify.notify_waiters();
    }

    /// Parks until an outcome for `path` is published, then removes and
    /// returns it.
    pub async fn retrieve(&self, path: &str) -> FetchOutcome {
        loop {
            let notified = self.notify.notified();

            if let Some(outcome) = self.entries.lock().unwrap().remove(path) {
                return outcome;
            }

            notified.await;
        }
    }

    /// Like [`retrieve`](Self::retrieve) but gives up after `timeout`,
    /// mapping the missed outcome to a [`StageError`].
    ///
    /// The orchestrator only ever uses this variant: a worker that exhausted
    /// its fetch retries publishes nothing, and the timeout here is how that
    /// failure reaches the control flow as a typed stage failure instead of
    /// an infinite wait.
    pub async fn retrieve_timeout(
        &self,
        path: &str,
        timeout: Duration,
    ) -> Result<FetchOutcome, StageError> {
        tokio::time::timeout(timeout, self.retrieve(path))
            .await
            .map_err(|_| StageError::Timeout {
                path: path.to_string(),
            })
    }

    /// Number of unconsumed outcomes
    pub fn len(&self) -> usize {
        self.entries.lock().unwrap().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
