//! Fixed-size fetch worker pool
//!
//! Each worker loops: dequeue a request from the scheduler, fetch it, publish
//! the outcome to the response store, write one audit line, sleep the fixed
//! per-worker delay. Workers share only the scheduler and the store, both
//! self-synchronized, and observe a cancellation token between fetches.

use crate::audit::AuditLog;
use crate::config::{CrawlerConfig, SiteConfig};
use crate::crawler::fetcher::fetch_page;
use crate::crawler::scheduler::Scheduler;
use crate::crawler::store::ResponseStore;
use reqwest::Client;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio_util::sync::CancellationToken;

/// Handle to the spawned pool of fetch workers
pub struct WorkerPool {
    handles: Vec<JoinHandle<()>>,
}

impl WorkerPool {
    /// Spawns `config.workers` fetch tasks.
    ///
    /// The pool does not own the cancellation token; the orchestrator
    /// cancels it when the run is over and then awaits [`shutdown`].
    ///
    /// [`shutdown`]: Self::shutdown
    pub fn spawn(
        scheduler: Arc<Scheduler>,
        store: Arc<ResponseStore>,
        audit: Arc<AuditLog>,
        client: Client,
        site: SiteConfig,
        config: CrawlerConfig,
        cancel: CancellationToken,
    ) -> Self {
        let handles = (0..config.workers)
            .map(|worker_id| {
                let scheduler = scheduler.clone();
                let store = store.clone();
                let audit = audit.clone();
                let client = client.clone();
                let site = site.clone();
                let config = config.clone();
                let cancel = cancel.clone();
                tokio::spawn(async move {
                    worker_loop(worker_id, scheduler, store, audit, client, site, config, cancel)
                        .await;
                })
            })
            .collect();

        Self { handles }
    }

    /// Waits for every worker to observe cancellation and exit.
    pub async fn shutdown(self) {
        for handle in self.handles {
            if let Err(e) = handle.await {
                tracing::error!("Worker task panicked: {}", e);
            }
        }
    }
}

#[allow(clippy::too_many_arguments)]
async fn worker_loop(
    worker_id: usize,
    scheduler: Arc<Scheduler>,
    store: Arc<ResponseStore>,
    audit: Arc<AuditLog>,
    client: Client,
    site: SiteConfig,
    config: CrawlerConfig,
    cancel: CancellationToken,
) {
    tracing::debug!(worker_id, "Worker started");
    let delay = Duration::from_millis(config.fetch_delay_ms);
    let backoff = Duration::from_millis(config.retry_backoff_ms);

    loop {
        // The scheduler blocks indefinitely on an empty queue, so
        // cancellation is checked at the dequeue itself.
        let request = tokio::select! {
            request = scheduler.dequeue() => request,
            () = cancel.cancelled() => break,
        };

        let url = format!("{}{}", site.host, request.path);
        tracing::debug!(worker_id, %url, stage = ?request.stage, "Fetching");

        match fetch_page(&client, &url, config.retry_attempts, backoff).await {
            Ok(outcome) => {
                audit.record_fetch(&request.path, outcome.status);
                store.publish(request.path, outcome);
            }
            Err(e) => {
                // No outcome is published; the orchestrator's retrieve
                // timeout turns this into a stage failure. The worker
                // itself keeps serving the queue.
                tracing::error!(worker_id, "Transport failure: {}", e);
                audit.record_transport_failure(&request.path, &e.to_string());
            }
        }

        tokio::select! {
            () = tokio::time::sleep(delay) => {}
            () = cancel.cancelled() => break,
        }
    }

    tracing::debug!(worker_id, "Worker stopped");
}
