//! word-walker: concurrent word-occurrence counting for text corpora
//!
//! Recursively walks a directory tree with a bounded pool of worker
//! threads, counting case-insensitive substring occurrences of a target
//! word in every `.txt` file. Per-file failures flow through an error
//! sink without aborting the rest of the scan.
//!
//! # Components
//!
//! - [`scan`] - the counting engine: work queue, worker pool, matcher,
//!   shared counter, error sink, and session orchestration
//! - [`server`] - axum HTTP interface (`POST /counter`)
//! - [`config`] - CLI parsing and validated scan configuration
//! - [`error`] - error hierarchy
//!
//! # Example
//!
//! ```no_run
//! use word_walker::config::ScanConfig;
//! use word_walker::scan::WordCounter;
//!
//! # fn main() -> word_walker::error::Result<()> {
//! let counter = WordCounter::new(ScanConfig::new("corpus", "john"))?;
//! let summary = counter.run_to_completion()?;
//! println!("{} occurrences", summary.count);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod scan;
pub mod server;

pub use config::{CliArgs, ScanConfig};
pub use error::{CounterError, Result};
pub use scan::{locate, OccurrenceCounter, ScanSummary, WordCounter};
