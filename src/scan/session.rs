//! Scan session orchestration
//!
//! A [`WordCounter`] captures the target word and scan root immutably at
//! construction. [`WordCounter::count`] spawns the worker pool, seeds the
//! queue with the root walk, and returns a [`ScanHandle`] immediately; a
//! drain watcher observes the join counter reach zero, stops the pool,
//! and closes the error sink exactly once. The caller must drain the
//! handle's error stream before reading the final count - the stream
//! closing is the sole signal that every increment has been applied.

use crate::config::ScanConfig;
use crate::error::{Result, ScanError, ValidationError};
use crate::scan::counter::OccurrenceCounter;
use crate::scan::queue::WorkQueue;
use crate::scan::sink::{error_sink, ErrorStream};
use crate::scan::worker::{aggregate_stats, ScanContext, ScanStats, Worker, WorkerStats};
use std::path::Path;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use tracing::{debug, info, warn};

/// How often the drain watcher polls the join counter
const DRAIN_POLL: Duration = Duration::from_millis(10);

/// Final report for one completed scan
#[derive(Debug)]
pub struct ScanSummary {
    /// Total occurrences found (partial when `errors` is non-empty)
    pub count: u64,

    /// Aggregated worker statistics
    pub stats: ScanStats,

    /// Every failure reported during the scan
    pub errors: Vec<ScanError>,

    /// Wall-clock time from submission to drain
    pub duration: Duration,
}

impl ScanSummary {
    /// True when the scan finished without any per-task failure
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Live handle to an in-flight scan
pub struct ScanHandle {
    errors: ErrorStream,
    stats: Vec<Arc<WorkerStats>>,
    counter: Arc<OccurrenceCounter>,
    started: Instant,
}

impl ScanHandle {
    /// Block until the next error arrives, or `None` once the scan has
    /// drained and the sink is closed
    pub fn next_error(&self) -> Option<ScanError> {
        self.errors.next_error()
    }

    /// Drain any remaining errors and build the final summary.
    ///
    /// Returns only after the task graph has fully drained, so the count
    /// read here is final.
    pub fn finish(self) -> ScanSummary {
        let errors = self.errors.drain();

        ScanSummary {
            count: self.counter.get(),
            stats: aggregate_stats(&self.stats),
            errors,
            duration: self.started.elapsed(),
        }
    }
}

/// A counting session over one root directory
pub struct WordCounter {
    config: ScanConfig,
    folded_word: String,
    counter: Arc<OccurrenceCounter>,
}

impl WordCounter {
    /// Create a session, validating the configuration and target word
    pub fn new(config: ScanConfig) -> Result<Self> {
        ScanConfig::validate_word(&config.word)?;
        config.validate()?;

        let folded_word = config.word.trim().to_lowercase();

        Ok(Self {
            config,
            folded_word,
            counter: Arc::new(OccurrenceCounter::new()),
        })
    }

    /// Target word as given by the caller
    pub fn word(&self) -> &str {
        &self.config.word
    }

    /// Scan root, fixed for the lifetime of the session
    pub fn root(&self) -> &Path {
        &self.config.root
    }

    /// Current count. Persists across scans until [`WordCounter::reset`].
    pub fn get_count(&self) -> u64 {
        self.counter.get()
    }

    /// Reset the count to zero. Must not race an in-flight scan.
    pub fn reset(&self) {
        self.counter.reset();
    }

    /// Manually add to the count, rejecting negative amounts
    pub fn increment(&self, amount: i64) -> std::result::Result<(), ValidationError> {
        self.counter.increment(amount)
    }

    /// Start a scan and return a handle to its error stream.
    ///
    /// The count accumulates on top of the session's current value; call
    /// [`WordCounter::reset`] first for a fresh count.
    pub fn count(&self) -> Result<ScanHandle> {
        let started = Instant::now();
        let queue = WorkQueue::new(self.config.queue_size);
        let (sink, stream) = error_sink(self.config.sink_capacity);
        let shutdown = Arc::new(AtomicBool::new(false));

        let ctx = Arc::new(ScanContext {
            word: self.folded_word.clone(),
            counter: Arc::clone(&self.counter),
        });

        // Register the root walk before any worker or watcher exists, so
        // the join counter can never be observed at zero with work pending
        queue.seed(self.config.root.clone())?;

        let mut workers = Vec::with_capacity(self.config.worker_count);
        for id in 0..self.config.worker_count {
            match Worker::spawn(
                id,
                Arc::clone(&ctx),
                queue.receiver(),
                queue.sender(),
                sink.clone(),
                Arc::clone(&shutdown),
            ) {
                Ok(worker) => workers.push(worker),
                Err(e) => {
                    shutdown.store(true, Ordering::SeqCst);
                    for worker in workers {
                        let _ = worker.join();
                    }
                    return Err(e.into());
                }
            }
        }

        debug!(
            workers = workers.len(),
            root = %self.config.root.display(),
            word = %self.config.word,
            "Scan started"
        );

        let stats: Vec<_> = workers.iter().map(|w| w.stats()).collect();
        let join = queue.join_counter();
        let watcher_shutdown = Arc::clone(&shutdown);

        // Drain watcher: once the task graph empties, stop the pool and
        // close the sink by dropping the last writer handle
        let spawned = thread::Builder::new().name("scan-drain".into()).spawn(move || {
            while !join.is_drained() {
                thread::sleep(DRAIN_POLL);
            }

            watcher_shutdown.store(true, Ordering::SeqCst);

            for worker in workers {
                if let Err(e) = worker.join() {
                    warn!(error = %e, "Worker failed to join cleanly");
                }
            }

            drop(sink);
            debug!("Scan drained");
        });

        if let Err(e) = spawned {
            // The closure never ran; workers were dropped with it, but
            // they still observe the shutdown flag and exit
            shutdown.store(true, Ordering::SeqCst);
            return Err(e.into());
        }

        Ok(ScanHandle {
            errors: stream,
            stats,
            counter: Arc::clone(&self.counter),
            started,
        })
    }

    /// Run a scan to completion, draining every error into the summary
    pub fn run_to_completion(&self) -> Result<ScanSummary> {
        let handle = self.count()?;
        let summary = handle.finish();

        info!(
            word = %self.config.word,
            count = summary.count,
            dirs = summary.stats.dirs_walked,
            files = summary.stats.files_scanned,
            errors = summary.errors.len(),
            duration_ms = summary.duration.as_millis() as u64,
            "Finished counting"
        );

        Ok(summary)
    }
}
