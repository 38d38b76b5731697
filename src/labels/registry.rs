//! Background label reindexing.
//!
//! The [`LabelRegistry`] owns a worker thread that scans project snapshots for
//! detected labels. Each request is tagged with a generation number; a newer
//! request makes every older one stale. The worker abandons a stale scan as
//! soon as it notices, and [`LabelRegistry::poll`] only ever applies the
//! result of the latest request.

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::mpsc::{self, Receiver, RecvTimeoutError, Sender, TryRecvError};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use web_time::Instant;

use super::index_labels;
use crate::constants::NO_LABEL;
use crate::model::{PhotoAnnotation, Project};

/// Copy of the label-relevant project state handed to the worker.
#[derive(Debug, Clone, Default)]
pub struct LabelSnapshot {
    pub objects: Vec<PhotoAnnotation>,
    pub custom_labels: Vec<String>,
}

impl LabelSnapshot {
    pub fn capture(project: &Project) -> Self {
        Self {
            objects: project.objects.clone(),
            custom_labels: project.custom_labels.clone(),
        }
    }
}

struct ReindexRequest {
    generation: u64,
    snapshot: LabelSnapshot,
}

struct ReindexResult {
    generation: u64,
    labels: Vec<String>,
}

/// Message sent to the indexer thread.
enum ThreadMessage {
    /// Scan a snapshot
    Reindex(ReindexRequest),
    /// Shutdown the thread
    Shutdown,
}

/// Keeps `Project::labels` in sync with annotation usage.
///
/// Requests are cheap to issue; only the most recent one is ever applied.
/// If the worker thread cannot be spawned, requests are served inline.
pub struct LabelRegistry {
    /// Sender for requests to the background thread
    request_tx: Option<Sender<ThreadMessage>>,
    /// Sender kept for the inline fallback
    result_tx: Sender<ReindexResult>,
    /// Receiver for results from the background thread
    result_rx: Receiver<ReindexResult>,
    /// Generation of the most recent request
    latest: Arc<AtomicU64>,
    /// Handle to the background thread (for joining on drop)
    thread_handle: Option<JoinHandle<()>>,
}

impl Default for LabelRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl LabelRegistry {
    /// Spawn the indexer thread.
    pub fn new() -> Self {
        let (request_tx, request_rx) = mpsc::channel::<ThreadMessage>();
        let (result_tx, result_rx) = mpsc::channel::<ReindexResult>();
        let latest = Arc::new(AtomicU64::new(0));

        let worker_latest = Arc::clone(&latest);
        let worker_tx = result_tx.clone();
        let spawned = thread::Builder::new()
            .name("label-indexer".to_string())
            .spawn(move || {
                log::debug!("Label indexer thread started");
                Self::thread_loop(request_rx, worker_tx, worker_latest);
                log::debug!("Label indexer thread exiting");
            });

        let (request_tx, thread_handle) = match spawned {
            Ok(handle) => (Some(request_tx), Some(handle)),
            Err(e) => {
                log::warn!("Failed to spawn label indexer thread, indexing inline: {}", e);
                (None, None)
            }
        };

        Self {
            request_tx,
            result_tx,
            result_rx,
            latest,
            thread_handle,
        }
    }

    /// Background thread main loop.
    fn thread_loop(
        request_rx: Receiver<ThreadMessage>,
        result_tx: Sender<ReindexResult>,
        latest: Arc<AtomicU64>,
    ) {
        loop {
            match request_rx.recv() {
                Ok(ThreadMessage::Reindex(request)) => {
                    let Some(result) = Self::scan(request, &latest) else {
                        continue;
                    };
                    if result_tx.send(result).is_err() {
                        log::warn!("Result channel closed, label indexer exiting");
                        break;
                    }
                }
                Ok(ThreadMessage::Shutdown) => {
                    log::debug!("Received shutdown signal");
                    break;
                }
                Err(_) => {
                    log::debug!("Request channel closed, label indexer exiting");
                    break;
                }
            }
        }
    }

    /// Index one snapshot, giving up between photos if a newer request arrived.
    fn scan(request: ReindexRequest, latest: &AtomicU64) -> Option<ReindexResult> {
        let start = Instant::now();
        let generation = request.generation;
        let is_stale = || latest.load(Ordering::Acquire) != generation;

        let custom = &request.snapshot.custom_labels;
        let mut labels: Vec<String> = Vec::new();
        for photo in &request.snapshot.objects {
            if is_stale() {
                log::debug!("🏷️ Reindex #{} superseded, abandoning scan", generation);
                return None;
            }
            // Index one photo at a time so the staleness check stays cheap.
            for label in index_labels(std::slice::from_ref(photo), custom) {
                if !labels.contains(&label) {
                    labels.push(label);
                }
            }
        }

        log::debug!(
            "🏷️ Reindex #{} found {} labels in {:.2?}",
            generation,
            labels.len(),
            start.elapsed()
        );
        Some(ReindexResult { generation, labels })
    }

    /// Queue a reindex of `snapshot`, superseding any request still in flight.
    pub fn request_reindex(&mut self, snapshot: LabelSnapshot) -> u64 {
        let generation = self.latest.fetch_add(1, Ordering::AcqRel) + 1;
        let request = ReindexRequest {
            generation,
            snapshot,
        };

        let unsent = match &self.request_tx {
            Some(tx) => tx.send(ThreadMessage::Reindex(request)).err().map(|e| e.0),
            None => Some(ThreadMessage::Reindex(request)),
        };
        if let Some(ThreadMessage::Reindex(request)) = unsent {
            if self.request_tx.take().is_some() {
                log::warn!("Label indexer channel closed, indexing inline");
            }
            self.scan_inline(request);
        }
        generation
    }

    fn scan_inline(&self, request: ReindexRequest) {
        if let Some(result) = Self::scan(request, &self.latest) {
            // The receiver lives in self, so this cannot fail.
            let _ = self.result_tx.send(result);
        }
    }

    /// Generation of the most recent request.
    pub fn latest_generation(&self) -> u64 {
        self.latest.load(Ordering::Acquire)
    }

    /// Drain finished results and apply the current one, if any.
    ///
    /// Returns true if `project.labels` changed. Non-blocking.
    pub fn poll(&mut self, project: &mut Project) -> bool {
        let mut changed = false;
        loop {
            match self.result_rx.try_recv() {
                Ok(result) => changed |= self.apply(result, project),
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => {
                    log::warn!("Label indexer disconnected");
                    break;
                }
            }
        }
        changed
    }

    /// Wait up to `timeout` for the latest request to complete and apply it.
    ///
    /// Returns true once the latest result has been applied (even if it left
    /// the labels unchanged), false on timeout.
    pub fn poll_blocking(&mut self, project: &mut Project, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            let remaining = deadline.saturating_duration_since(Instant::now());
            match self.result_rx.recv_timeout(remaining) {
                Ok(result) => {
                    let current = result.generation == self.latest_generation();
                    self.apply(result, project);
                    if current {
                        return true;
                    }
                }
                Err(RecvTimeoutError::Timeout) | Err(RecvTimeoutError::Disconnected) => {
                    return false;
                }
            }
        }
    }

    /// Reindex synchronously, superseding anything in flight.
    pub fn reindex_now(&mut self, project: &mut Project) -> bool {
        self.latest.fetch_add(1, Ordering::AcqRel);
        let labels = index_labels(&project.objects, &project.custom_labels);
        Self::store(labels, project)
    }

    fn apply(&self, result: ReindexResult, project: &mut Project) -> bool {
        if result.generation != self.latest_generation() {
            log::debug!(
                "🏷️ Dropping stale reindex #{} (latest #{})",
                result.generation,
                self.latest_generation()
            );
            return false;
        }
        Self::store(result.labels, project)
    }

    fn store(mut labels: Vec<String>, project: &mut Project) -> bool {
        // Custom labels may have changed since the snapshot was taken.
        labels.retain(|l| l != NO_LABEL && !project.custom_labels.contains(l));
        if project.labels == labels {
            return false;
        }
        project.labels = labels;
        true
    }
}

impl Drop for LabelRegistry {
    fn drop(&mut self) {
        log::debug!("Shutting down label indexer thread");

        if let Some(tx) = self.request_tx.take() {
            let _ = tx.send(ThreadMessage::Shutdown);
        }

        if let Some(handle) = self.thread_handle.take() {
            if let Err(e) = handle.join() {
                log::warn!("Label indexer thread panicked: {:?}", e);
            }
        }
    }
}
