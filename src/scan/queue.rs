//! Work queue with completion tracking and backpressure support
//!
//! This module provides a bounded queue of scan tasks plus the join
//! counter that tracks membership of the dynamically growing task graph.
//! When the queue is full, backpressure is applied by handing the task
//! back to the submitting worker for inline processing rather than
//! blocking, so the number of alive tasks stays bounded by the pool.

use crate::error::WorkerError;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

/// One discrete unit of scheduled work
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Task {
    /// Enumerate the direct children of a directory
    WalkDir(PathBuf),

    /// Count word occurrences in a single file
    ScanFile(PathBuf),
}

impl Task {
    /// Path of the filesystem entry this task refers to
    pub fn path(&self) -> &Path {
        match self {
            Task::WalkDir(path) => path,
            Task::ScanFile(path) => path,
        }
    }
}

/// Join counter tracking the not-yet-completed tasks of a scan.
///
/// A task is registered strictly *before* it becomes visible to workers
/// and finished strictly *after* its payload has run. Children are always
/// registered while their parent task is still outstanding, so a drain
/// racing a not-yet-enqueued child can never observe zero.
#[derive(Debug, Default)]
pub struct JoinCounter {
    outstanding: AtomicUsize,
}

impl JoinCounter {
    /// Add a task to the graph. Must happen before the task is enqueued.
    pub fn register(&self) {
        self.outstanding.fetch_add(1, Ordering::SeqCst);
    }

    /// Remove a task from the graph. Must happen after its payload ran.
    pub fn finish(&self) {
        self.outstanding.fetch_sub(1, Ordering::SeqCst);
    }

    /// Number of registered tasks that have not finished
    pub fn outstanding(&self) -> usize {
        self.outstanding.load(Ordering::SeqCst)
    }

    /// True once every registered task has finished
    pub fn is_drained(&self) -> bool {
        self.outstanding() == 0
    }
}

/// RAII guard marking one registered task as finished on drop
pub struct TaskGuard<'a> {
    counter: &'a JoinCounter,
}

impl<'a> TaskGuard<'a> {
    /// Guard a task that was already registered via submit/seed
    pub fn new(counter: &'a JoinCounter) -> Self {
        Self { counter }
    }
}

impl Drop for TaskGuard<'_> {
    fn drop(&mut self) {
        self.counter.finish();
    }
}

/// Statistics for the work queue
#[derive(Debug, Default)]
pub struct QueueStats {
    /// Total tasks enqueued
    pub enqueued: AtomicU64,

    /// Total tasks dequeued
    pub dequeued: AtomicU64,

    /// Tasks processed inline due to backpressure
    pub inline_processed: AtomicU64,
}

impl QueueStats {
    /// Get number of inline-processed tasks
    pub fn inline_count(&self) -> u64 {
        self.inline_processed.load(Ordering::Relaxed)
    }
}

/// Bounded work queue shared by the scan worker pool
pub struct WorkQueue {
    sender: Sender<Task>,
    receiver: Receiver<Task>,
    capacity: usize,
    join: Arc<JoinCounter>,
    stats: Arc<QueueStats>,
}

impl WorkQueue {
    /// Create a new work queue with the specified capacity
    pub fn new(capacity: usize) -> Self {
        let (sender, receiver) = bounded(capacity);

        Self {
            sender,
            receiver,
            capacity,
            join: Arc::new(JoinCounter::default()),
            stats: Arc::new(QueueStats::default()),
        }
    }

    /// Get a sender for this queue (clone for each worker)
    pub fn sender(&self) -> TaskSender {
        TaskSender {
            sender: self.sender.clone(),
            join: Arc::clone(&self.join),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get a receiver for this queue (clone for each worker)
    pub fn receiver(&self) -> TaskReceiver {
        TaskReceiver {
            receiver: self.receiver.clone(),
            stats: Arc::clone(&self.stats),
        }
    }

    /// Get the join counter tracking outstanding tasks
    pub fn join_counter(&self) -> Arc<JoinCounter> {
        Arc::clone(&self.join)
    }

    /// Get queue statistics
    pub fn stats(&self) -> Arc<QueueStats> {
        Arc::clone(&self.stats)
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }

    /// Get current queue length
    pub fn len(&self) -> usize {
        self.receiver.len()
    }

    /// Get queue capacity
    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Seed the queue with the initial walk of the scan root.
    ///
    /// Registers the task before it is enqueued, same as `submit`.
    pub fn seed(&self, root: PathBuf) -> Result<(), WorkerError> {
        self.join.register();
        self.sender.send(Task::WalkDir(root)).map_err(|_| {
            self.join.finish();
            WorkerError::QueueClosed
        })?;
        self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
        Ok(())
    }
}

/// Handle for submitting tasks to the queue
#[derive(Clone)]
pub struct TaskSender {
    sender: Sender<Task>,
    join: Arc<JoinCounter>,
    stats: Arc<QueueStats>,
}

impl TaskSender {
    /// Register a task with the scan and try to enqueue it.
    ///
    /// Returns `Ok(None)` if the task was enqueued. Returns `Ok(Some(task))`
    /// when the queue is full: the task is already registered and the caller
    /// must execute it inline under its own [`TaskGuard`].
    pub fn submit(&self, task: Task) -> Result<Option<Task>, WorkerError> {
        self.join.register();

        match self.sender.try_send(task) {
            Ok(()) => {
                self.stats.enqueued.fetch_add(1, Ordering::Relaxed);
                Ok(None)
            }
            Err(TrySendError::Full(task)) => {
                self.stats.inline_processed.fetch_add(1, Ordering::Relaxed);
                Ok(Some(task))
            }
            Err(TrySendError::Disconnected(_)) => {
                self.join.finish();
                Err(WorkerError::QueueClosed)
            }
        }
    }

    /// Get the join counter shared with this sender
    pub fn join_counter(&self) -> &JoinCounter {
        &self.join
    }
}

/// Handle for receiving tasks from the queue
#[derive(Clone)]
pub struct TaskReceiver {
    receiver: Receiver<Task>,
    stats: Arc<QueueStats>,
}

impl TaskReceiver {
    /// Receive with timeout so workers can poll the shutdown flag
    pub fn recv_timeout(&self, timeout: Duration) -> Option<Task> {
        match self.receiver.recv_timeout(timeout) {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(task)
            }
            Err(_) => None,
        }
    }

    /// Try to receive a task without blocking
    pub fn try_recv(&self) -> Option<Task> {
        match self.receiver.try_recv() {
            Ok(task) => {
                self.stats.dequeued.fetch_add(1, Ordering::Relaxed);
                Some(task)
            }
            Err(_) => None,
        }
    }

    /// Check if the queue is empty
    pub fn is_empty(&self) -> bool {
        self.receiver.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_queue_seed_and_receive() {
        let queue = WorkQueue::new(16);

        queue.seed("/corpus".into()).unwrap();
        assert!(!queue.is_empty());
        assert_eq!(queue.len(), 1);
        assert_eq!(queue.join_counter().outstanding(), 1);

        let receiver = queue.receiver();
        let task = receiver.try_recv().unwrap();
        assert_eq!(task, Task::WalkDir("/corpus".into()));

        // Dequeuing does not finish the task - its payload has not run
        assert_eq!(queue.join_counter().outstanding(), 1);
    }

    #[test]
    fn test_submit_registers_before_enqueue() {
        let queue = WorkQueue::new(16);
        let sender = queue.sender();
        let join = queue.join_counter();

        assert!(join.is_drained());
        let outcome = sender.submit(Task::ScanFile("/corpus/a.txt".into())).unwrap();
        assert!(outcome.is_none());
        assert_eq!(join.outstanding(), 1);
    }

    #[test]
    fn test_full_queue_hands_task_back() {
        let queue = WorkQueue::new(16);
        let sender = queue.sender();

        for i in 0..16 {
            let outcome = sender
                .submit(Task::ScanFile(format!("/corpus/{i}.txt").into()))
                .unwrap();
            assert!(outcome.is_none());
        }

        // Queue is full - the task comes back for inline processing,
        // but it is already part of the graph
        let overflow = sender.submit(Task::ScanFile("/corpus/x.txt".into())).unwrap();
        assert_eq!(overflow, Some(Task::ScanFile("/corpus/x.txt".into())));
        assert_eq!(queue.join_counter().outstanding(), 17);
        assert_eq!(queue.stats().inline_count(), 1);
    }

    #[test]
    fn test_task_guard_finishes_on_drop() {
        let join = JoinCounter::default();

        join.register();
        assert!(!join.is_drained());

        {
            let _guard = TaskGuard::new(&join);
        }
        assert!(join.is_drained());
    }

    #[test]
    fn test_drain_not_observable_while_parent_outstanding() {
        let queue = WorkQueue::new(16);
        let sender = queue.sender();
        let receiver = queue.receiver();
        let join = queue.join_counter();

        queue.seed("/corpus".into()).unwrap();
        let _parent = receiver.try_recv().unwrap();

        {
            // Parent payload running under its guard submits a child
            let _guard = TaskGuard::new(&join);
            sender.submit(Task::ScanFile("/corpus/a.txt".into())).unwrap();
            assert_eq!(join.outstanding(), 2);
        }

        // Parent finished, child still registered
        assert_eq!(join.outstanding(), 1);
    }
}
