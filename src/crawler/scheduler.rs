//! Stage-priority scheduler for pending page requests
//!
//! The scheduler is the shared pending queue between the orchestrator (the
//! single producer of requests) and the fetch workers (many consumers). It
//! orders requests by pipeline stage so that sub-pages of an already-started
//! entity are always fetched before brand-new top-level pages.

use std::cmp::Ordering;
use std::collections::BinaryHeap;
use std::sync::Mutex;
use tokio::sync::Notify;

/// Pipeline stage of a page request.
///
/// The numeric value encodes scheduling urgency: **the highest value is
/// dequeued first**. Stages closer to completing an in-flight entity carry
/// higher values, so dequeuing by descending stage finishes started branches
/// before opening new ones (depth-first). This bounds the number of
/// half-processed teams without an explicit queue limit.
///
/// Note the direction: `TeamSubpage` beats `Team` beats `Ranking`. The
/// derived `Ord` follows the discriminants; `dequeue_prefers_later_stages`
/// pins the direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StagePriority {
    /// Top-level ranking index and per-region ranking pages
    Ranking = 1,
    /// Team profile pages discovered from a ranking
    Team = 2,
    /// Matchlist and stats sub-pages of a team being assembled
    TeamSubpage = 3,
}

/// A host-relative page request created by the orchestrator
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// URL path without the host, e.g. `/rankings/europe`
    pub path: String,

    /// Pipeline stage, used only for dequeue ordering
    pub stage: StagePriority,
}

impl PageRequest {
    pub fn new(path: impl Into<String>, stage: StagePriority) -> Self {
        Self {
            path: path.into(),
            stage,
        }
    }
}

/// Heap entry: a request stamped with its arrival sequence number
#[derive(Debug)]
struct QueuedRequest {
    request: PageRequest,
    seq: u64,
}

impl Ord for QueuedRequest {
    fn cmp(&self, other: &Self) -> Ordering {
        // Max-heap: higher stage value wins; among equal stages the lower
        // sequence number (earlier enqueue) wins, keeping ties FIFO.
        self.request
            .stage
            .cmp(&other.request.stage)
            .then_with(|| other.seq.cmp(&self.seq))
    }
}

impl PartialOrd for QueuedRequest {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl PartialEq for QueuedRequest {
    fn eq(&self, other: &Self) -> bool {
        self.seq == other.seq
    }
}

impl Eq for QueuedRequest {}

#[derive(Debug, Default)]
struct QueueInner {
    heap: BinaryHeap<QueuedRequest>,
    next_seq: u64,
}

/// Thread-safe blocking priority queue of pending page requests
///
/// `enqueue` is O(log n) and always succeeds; `dequeue` parks the caller
/// until a request is available and removes exactly one. The scheduler has
/// no timeout or cancellation of its own; callers that need either compose
/// `dequeue` with `tokio::select!`.
#[derive(Debug, Default)]
pub struct Scheduler {
    inner: Mutex<QueueInner>,
    notify: Notify,
}

impl Scheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a request to the queue and wakes one parked consumer, if any.
    pub fn enqueue(&self, request: PageRequest) {
        {
            let mut inner = self.inner.lock().unwrap();
            let seq = inner.next_seq;
            inner.next_seq += 1;
            inner.heap.push(QueuedRequest { request, seq });
        }
        self.notify.notify_one();
    }

    /// Removes and returns the pending request with the highest stage value,
    /// parking until one exists.
    ///
    /// Among requests of equal stage the earliest-enqueued one is returned.
    /// Each queued request is handed to exactly one caller.
    pub async fn dequeue(&self) -> PageRequest {
        loop {
            // Register for notification before checking the queue so a
            // publish between the check and the await is not lost.
            let notified = self.notify.notified();

            if let Some(queued) = self.inner.lock().unwrap().heap.pop() {
                return queued.request;
            }

            notified.await;
        }
    }

    /// Non-blocking variant, used by tests and shutdown diagnostics.
    pub fn try_dequeue(&self) -> Option<PageRequest> {
        self.inner.lock().unwrap().heap.pop().map(|q| q.request)
    }

    /// Number of requests currently pending
    pub fn len(&self) -> usize {
        self.inner.lock().unwrap().heap.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
