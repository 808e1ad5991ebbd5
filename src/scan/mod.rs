//! Concurrent word-counting engine
//!
//! # Architecture
//!
//! ```text
//!                    ┌──────────────────────────┐
//!                    │       WordCounter        │
//!                    │  seed root → wait drain  │
//!                    └────────────┬─────────────┘
//!                                 │
//!                    ┌────────────▼─────────────┐
//!                    │       Work Queue         │
//!                    │   (crossbeam bounded)    │
//!                    │  + join counter (drain)  │
//!                    └────────────┬─────────────┘
//!                                 │
//!        ┌────────────────────────┼────────────────────────┐
//!        │                        │                        │
//!  ┌─────▼─────┐            ┌─────▼─────┐            ┌─────▼─────┐
//!  │  Worker 1 │            │  Worker 2 │    ...     │  Worker N │
//!  │ walk/scan │            │ walk/scan │            │ walk/scan │
//!  └─────┬─────┘            └─────┬─────┘            └─────┬─────┘
//!        │  matches (atomic add)  │    errors (sink)       │
//!        └────────────────────────┴────────────────────────┘
//! ```
//!
//! Workers discover subdirectories and files, submitting new tasks back
//! into the queue; the join counter tracks the dynamically growing graph
//! so completion is detected exactly when the last task finishes.

pub mod counter;
pub mod locate;
pub mod matcher;
pub mod queue;
pub mod session;
pub mod sink;
pub mod worker;

pub use counter::OccurrenceCounter;
pub use locate::locate;
pub use session::{ScanHandle, ScanSummary, WordCounter};
pub use sink::{ErrorSink, ErrorStream};
pub use worker::ScanStats;
