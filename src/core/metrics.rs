//! Logger metrics for observability
//!
//! Counters shared between the producing threads and the background worker.
//! They only observe delivery; nothing here changes what reaches the sink.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters describing a logger's queue and sink activity
///
/// # Example
///
/// ```
/// use esl_logger::LoggerMetrics;
///
/// let metrics = LoggerMetrics::new();
/// metrics.record_enqueued();
/// metrics.record_written();
///
/// assert_eq!(metrics.enqueued(), 1);
/// assert_eq!(metrics.pending(), 0);
/// ```
#[derive(Debug)]
pub struct LoggerMetrics {
    /// Lines accepted by the queue
    enqueued: AtomicU64,

    /// Lines the sink accepted
    written: AtomicU64,

    /// Lines the sink rejected or panicked on; these are not retried
    write_failures: AtomicU64,

    /// Sends that found the queue full and waited for room
    blocked_sends: AtomicU64,
}

impl LoggerMetrics {
    pub const fn new() -> Self {
        Self {
            enqueued: AtomicU64::new(0),
            written: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            blocked_sends: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn enqueued(&self) -> u64 {
        self.enqueued.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn written(&self) -> u64 {
        self.written.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn blocked_sends(&self) -> u64 {
        self.blocked_sends.load(Ordering::Relaxed)
    }

    /// Lines enqueued but not yet handed to the sink
    pub fn pending(&self) -> u64 {
        self.enqueued()
            .saturating_sub(self.written() + self.write_failures())
    }

    #[inline]
    pub fn record_enqueued(&self) -> u64 {
        self.enqueued.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_written(&self) -> u64 {
        self.written.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_blocked_send(&self) -> u64 {
        self.blocked_sends.fetch_add(1, Ordering::Relaxed)
    }
}

impl Default for LoggerMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for LoggerMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            enqueued: AtomicU64::new(self.enqueued()),
            written: AtomicU64::new(self.written()),
            write_failures: AtomicU64::new(self.write_failures()),
            blocked_sends: AtomicU64::new(self.blocked_sends()),
        }
    }
}
