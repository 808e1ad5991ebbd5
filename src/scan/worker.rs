//! Worker pool for the concurrent scan
//!
//! Each worker:
//! - Pulls tasks from the shared bounded work queue
//! - Walks directories, submitting one task per discovered child
//! - Scans `.txt` files, adding matches to the shared counter
//! - Reports per-task failures to the error sink and keeps going
//!
//! Backpressure: when the queue is full at submit time the child task is
//! processed inline by the submitting worker, so the number of alive
//! tasks never exceeds queue capacity plus the pool size.

use crate::error::{ScanError, WorkerError};
use crate::scan::counter::OccurrenceCounter;
use crate::scan::matcher;
use crate::scan::queue::{Task, TaskGuard, TaskReceiver, TaskSender};
use crate::scan::sink::ErrorSink;
use std::fs;
use std::path::Path;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::Duration;
use tracing::{debug, trace, warn};

/// How long a worker waits for a task before re-checking shutdown
const POLL_INTERVAL: Duration = Duration::from_millis(50);

/// State shared by every worker of one scan session
pub struct ScanContext {
    /// Target word, already trimmed and case-folded
    pub word: String,

    /// Shared occurrence counter
    pub counter: Arc<OccurrenceCounter>,
}

/// Statistics collected by a worker
#[derive(Debug, Default)]
pub struct WorkerStats {
    /// Directories enumerated
    pub dirs_walked: AtomicU64,

    /// Text files scanned
    pub files_scanned: AtomicU64,

    /// Files skipped (not recognized as text)
    pub files_skipped: AtomicU64,

    /// Errors reported to the sink
    pub errors: AtomicU64,
}

impl WorkerStats {
    fn record_dir(&self) {
        self.dirs_walked.fetch_add(1, Ordering::Relaxed);
    }

    fn record_scan(&self) {
        self.files_scanned.fetch_add(1, Ordering::Relaxed);
    }

    fn record_skip(&self) {
        self.files_skipped.fetch_add(1, Ordering::Relaxed);
    }

    fn record_error(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }
}

/// Aggregated statistics for a finished scan
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanStats {
    pub dirs_walked: u64,
    pub files_scanned: u64,
    pub files_skipped: u64,
    pub errors: u64,
}

/// Aggregate statistics from multiple workers
pub fn aggregate_stats(stats: &[Arc<WorkerStats>]) -> ScanStats {
    let mut total = ScanStats::default();

    for s in stats {
        total.dirs_walked += s.dirs_walked.load(Ordering::Relaxed);
        total.files_scanned += s.files_scanned.load(Ordering::Relaxed);
        total.files_skipped += s.files_skipped.load(Ordering::Relaxed);
        total.errors += s.errors.load(Ordering::Relaxed);
    }

    total
}

/// A worker thread that processes scan tasks
pub struct Worker {
    id: usize,
    handle: Option<JoinHandle<()>>,
    stats: Arc<WorkerStats>,
}

impl Worker {
    /// Spawn a new worker thread
    pub fn spawn(
        id: usize,
        ctx: Arc<ScanContext>,
        queue_rx: TaskReceiver,
        queue_tx: TaskSender,
        sink: ErrorSink,
        shutdown: Arc<AtomicBool>,
    ) -> Result<Self, WorkerError> {
        let stats = Arc::new(WorkerStats::default());
        let stats_clone = Arc::clone(&stats);

        let handle = thread::Builder::new()
            .name(format!("scan-{}", id))
            .spawn(move || {
                worker_loop(id, ctx, queue_rx, queue_tx, sink, shutdown, stats_clone);
            })
            .map_err(|e| WorkerError::SpawnFailed {
                id,
                reason: e.to_string(),
            })?;

        Ok(Self {
            id,
            handle: Some(handle),
            stats,
        })
    }

    /// Get worker ID
    pub fn id(&self) -> usize {
        self.id
    }

    /// Get worker statistics
    pub fn stats(&self) -> Arc<WorkerStats> {
        Arc::clone(&self.stats)
    }

    /// Wait for the worker to finish
    pub fn join(mut self) -> Result<(), WorkerError> {
        if let Some(handle) = self.handle.take() {
            handle.join().map_err(|_| WorkerError::Panicked { id: self.id })?;
        }
        Ok(())
    }
}

/// Main worker loop
fn worker_loop(
    id: usize,
    ctx: Arc<ScanContext>,
    queue_rx: TaskReceiver,
    queue_tx: TaskSender,
    sink: ErrorSink,
    shutdown: Arc<AtomicBool>,
    stats: Arc<WorkerStats>,
) {
    debug!(worker = id, "Worker starting");

    while !shutdown.load(Ordering::Relaxed) {
        let task = match queue_rx.recv_timeout(POLL_INTERVAL) {
            Some(task) => task,
            None => continue, // Timeout - check shutdown and retry
        };

        // The task was registered at submit time; finish it once the
        // payload (and any inline children) has run
        let _guard = TaskGuard::new(queue_tx.join_counter());
        run_task(id, task, &ctx, &queue_tx, &sink, &stats);
    }

    debug!(
        worker = id,
        dirs = stats.dirs_walked.load(Ordering::Relaxed),
        files = stats.files_scanned.load(Ordering::Relaxed),
        "Worker shutting down"
    );
}

/// Execute one task's payload
fn run_task(
    worker_id: usize,
    task: Task,
    ctx: &ScanContext,
    queue_tx: &TaskSender,
    sink: &ErrorSink,
    stats: &WorkerStats,
) {
    match task {
        Task::WalkDir(path) => walk_directory(worker_id, &path, ctx, queue_tx, sink, stats),
        Task::ScanFile(path) => scan_file_task(worker_id, &path, ctx, sink, stats),
    }
}

/// Enumerate one directory, submitting a task per child.
///
/// An enumeration failure stops this subtree only: sibling subtrees were
/// submitted as their own tasks and are unaffected.
fn walk_directory(
    worker_id: usize,
    path: &Path,
    ctx: &ScanContext,
    queue_tx: &TaskSender,
    sink: &ErrorSink,
    stats: &WorkerStats,
) {
    let entries = match fs::read_dir(path) {
        Ok(entries) => entries,
        Err(e) => {
            stats.record_error();
            sink.report(ScanError::ReadDirFailed {
                path: path.to_path_buf(),
                reason: e.to_string(),
            });
            return;
        }
    };

    stats.record_dir();
    trace!(worker = worker_id, path = %path.display(), "Walking directory");

    for entry in entries {
        let entry = match entry {
            Ok(entry) => entry,
            Err(e) => {
                stats.record_error();
                sink.report(ScanError::ReadDirFailed {
                    path: path.to_path_buf(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let file_type = match entry.file_type() {
            Ok(file_type) => file_type,
            Err(e) => {
                stats.record_error();
                sink.report(ScanError::ReadDirFailed {
                    path: entry.path(),
                    reason: e.to_string(),
                });
                continue;
            }
        };

        let task = if file_type.is_dir() {
            Task::WalkDir(entry.path())
        } else if file_type.is_file() {
            Task::ScanFile(entry.path())
        } else {
            continue; // Symlinks and special files are not scanned
        };

        submit_or_run(worker_id, task, ctx, queue_tx, sink, stats);
    }
}

/// Submit a child task, falling back to inline processing when the queue
/// is full. The child is already registered either way.
fn submit_or_run(
    worker_id: usize,
    task: Task,
    ctx: &ScanContext,
    queue_tx: &TaskSender,
    sink: &ErrorSink,
    stats: &WorkerStats,
) {
    match queue_tx.submit(task) {
        Ok(None) => {}
        Ok(Some(task)) => {
            trace!(
                worker = worker_id,
                path = %task.path().display(),
                "Queue full - processing task inline"
            );
            let _guard = TaskGuard::new(queue_tx.join_counter());
            run_task(worker_id, task, ctx, queue_tx, sink, stats);
        }
        Err(e) => {
            // Only happens when the session is torn down mid-scan
            warn!(worker = worker_id, error = %e, "Failed to submit task");
        }
    }
}

/// Scan a single file if it is a recognized text file
fn scan_file_task(
    worker_id: usize,
    path: &Path,
    ctx: &ScanContext,
    sink: &ErrorSink,
    stats: &WorkerStats,
) {
    if !matcher::is_text_file(path) {
        stats.record_skip();
        return;
    }

    match matcher::scan_file(path, &ctx.word, &ctx.counter) {
        Ok(matches) => {
            stats.record_scan();
            trace!(worker = worker_id, path = %path.display(), matches, "File scanned");
        }
        Err(e) => {
            stats.record_error();
            warn!(worker = worker_id, path = %path.display(), error = %e, "File scan failed");
            sink.report(e);
        }
    }
}
