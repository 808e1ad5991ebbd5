//! Process-wide occurrence counter
//!
//! The count is an unsigned 64-bit atomic: it can get very large and never
//! goes below zero. Atomic addition is preferred over a mutex because the
//! matcher increments from many workers at once and addition commutes, so
//! no ordering between writers is needed.

use crate::error::ValidationError;
use std::sync::atomic::{AtomicU64, Ordering};

/// Lock-free accumulator for word occurrences
#[derive(Debug, Default)]
pub struct OccurrenceCounter {
    count: AtomicU64,
}

impl OccurrenceCounter {
    /// Create a counter starting at zero
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the current count
    pub fn get(&self) -> u64 {
        self.count.load(Ordering::Relaxed)
    }

    /// Reset the counter to zero.
    ///
    /// Must not be called while a scan is in flight.
    pub fn reset(&self) {
        self.count.store(0, Ordering::Relaxed);
    }

    /// Add occurrences found by the matcher
    pub fn add(&self, amount: u64) {
        self.count.fetch_add(amount, Ordering::Relaxed);
    }

    /// Increment the count by a given amount.
    ///
    /// Negative amounts are rejected: converted to u64 they would wrap
    /// into a very large value instead of decrementing.
    pub fn increment(&self, amount: i64) -> Result<(), ValidationError> {
        if amount < 0 {
            return Err(ValidationError::NegativeAmount { amount });
        }

        self.count.fetch_add(amount as u64, Ordering::Relaxed);
        Ok(())
    }
}
