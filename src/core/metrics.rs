//! Logger metrics for observability
//!
//! Logging calls never report failures to the caller beyond a `false`
//! return, so these counters are where dropped records show up.

use std::sync::atomic::{AtomicU64, Ordering};

/// Metrics for logger observability
///
/// # Example
///
/// ```
/// use rust_context_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
///
/// metrics.record_failed();
/// metrics.record_emitted();
///
/// assert_eq!(metrics.failed_count(), 1);
/// assert_eq!(metrics.emitted_count(), 1);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Records accepted by the sink
    emitted: AtomicU64,

    /// Calls short-circuited because the sink disabled the level
    filtered: AtomicU64,

    /// Records lost to a sink error or panic
    failed: AtomicU64,
}

impl LoggerMetrics {
    /// Create a new metrics instance with all counters at zero
    pub const fn new() -> Self {
        Self {
            emitted: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            failed: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn emitted_count(&self) -> u64 {
        self.emitted.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered_count(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn failed_count(&self) -> u64 {
        self.failed.load(Ordering::Relaxed)
    }

    /// Record an emitted entry, returning the previous count
    #[inline]
    pub fn record_emitted(&self) -> u64 {
        self.emitted.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_failed(&self) -> u64 {
        self.failed.fetch_add(1, Ordering::Relaxed)
    }

    /// Get failure rate as a percentage (0.0 - 100.0) of dispatched records
    ///
    /// Filtered calls are not dispatched and do not count. Returns 0.0 if
    /// nothing has been dispatched.
    pub fn failure_rate(&self) -> f64 {
        let failed = self.failed_count() as f64;
        let total = self.emitted_count() as f64 + failed;
        if total == 0.0 {
            0.0
        } else {
            (failed / total) * 100.0
        }
    }

    pub fn reset(&self) {
        self.emitted.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.failed.store(0, Ordering::Relaxed);
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Create a snapshot of the current metrics values
    fn clone(&self) -> Self {
        Self {
            emitted: AtomicU64::new(self.emitted_count()),
            filtered: AtomicU64::new(self.filtered_count()),
            failed: AtomicU64::new(self.failed_count()),
        }
    }
}
