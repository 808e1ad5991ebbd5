//! Error sink - many-writer/one-reader failure aggregation
//!
//! Every task in the scan graph reports failures through a single bounded
//! channel. The sink closes exactly once, when the session has observed
//! the task graph drain and every writer handle has been dropped.
//!
//! Over-capacity policy: a reporting worker blocks until the consumer
//! frees space. The receiving stream is handed to the caller before any
//! task executes, so the consumer is always draining concurrently and no
//! error is ever dropped.

use crate::error::ScanError;
use crossbeam_channel::{bounded, Receiver, Sender};
use tracing::warn;

/// Create a connected sink/stream pair with the given capacity
pub fn error_sink(capacity: usize) -> (ErrorSink, ErrorStream) {
    let (sender, receiver) = bounded(capacity);
    (ErrorSink { sender }, ErrorStream { receiver })
}

/// Writer handle, cloned into every worker
#[derive(Clone)]
pub struct ErrorSink {
    sender: Sender<ScanError>,
}

impl ErrorSink {
    /// Report a task failure, blocking while the sink is full
    pub fn report(&self, error: ScanError) {
        if self.sender.send(error).is_err() {
            // Reader dropped the stream without draining it
            warn!("Error sink closed before scan finished; error discarded");
        }
    }
}

/// Reader handle held by the scan's caller
pub struct ErrorStream {
    receiver: Receiver<ScanError>,
}

impl ErrorStream {
    /// Block until the next error arrives, or `None` once the sink closes
    pub fn next_error(&self) -> Option<ScanError> {
        self.receiver.recv().ok()
    }

    /// Drain the stream to completion, collecting every reported error
    pub fn drain(self) -> Vec<ScanError> {
        self.into_iter().collect()
    }
}

impl Iterator for ErrorStream {
    type Item = ScanError;

    fn next(&mut self) -> Option<ScanError> {
        self.receiver.recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_error(path: &str) -> ScanError {
        ScanError::OpenFailed {
            path: path.into(),
            reason: "permission denied".into(),
        }
    }

    #[test]
    fn test_stream_closes_after_last_sink_drops() {
        let (sink, stream) = error_sink(4);
        let second = sink.clone();

        sink.report(sample_error("/corpus/a.txt"));
        second.report(sample_error("/corpus/b.txt"));
        drop(sink);
        drop(second);

        let errors = stream.drain();
        assert_eq!(errors.len(), 2);
    }

    #[test]
    fn test_empty_sink_drains_empty() {
        let (sink, stream) = error_sink(4);
        drop(sink);
        assert!(stream.drain().is_empty());
    }

    #[test]
    fn test_full_sink_blocks_until_consumer_reads() {
        let (sink, mut stream) = error_sink(1);

        let writer = std::thread::spawn(move || {
            sink.report(sample_error("/corpus/a.txt"));
            // Second report must wait for the consumer
            sink.report(sample_error("/corpus/b.txt"));
        });

        assert!(stream.next().is_some());
        assert!(stream.next().is_some());
        writer.join().unwrap();
        assert!(stream.next().is_none());
    }
}
