//! Dispatcher metrics
//!
//! Counters for watching the dispatch path: how many messages were fanned
//! out, filtered, dropped because the dispatcher was closing, and how often
//! a producer had to wait on a full queue.

use std::sync::atomic::{AtomicU64, Ordering};

/// # Example
///
/// ```
/// use rust_log_dispatcher::DispatchMetrics;
///
/// let metrics = DispatchMetrics::new();
/// metrics.record_delivered();
/// metrics.record_write_failure();
///
/// assert_eq!(metrics.delivered(), 1);
/// assert_eq!(metrics.write_failures(), 1);
/// ```
#[derive(Debug)]
pub struct DispatchMetrics {
    /// Messages fanned out to the backend list
    delivered: AtomicU64,

    /// Individual backend write failures (errors and panics)
    write_failures: AtomicU64,

    /// Messages rejected by the dispatcher threshold
    filtered: AtomicU64,

    /// Messages discarded because the dispatcher was closing or closed
    dropped_after_close: AtomicU64,

    /// Times a producer found the async queue full and had to wait
    queue_full_events: AtomicU64,
}

impl DispatchMetrics {
    pub const fn new() -> Self {
        Self {
            delivered: AtomicU64::new(0),
            write_failures: AtomicU64::new(0),
            filtered: AtomicU64::new(0),
            dropped_after_close: AtomicU64::new(0),
            queue_full_events: AtomicU64::new(0),
        }
    }

    #[inline]
    pub fn delivered(&self) -> u64 {
        self.delivered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn write_failures(&self) -> u64 {
        self.write_failures.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn filtered(&self) -> u64 {
        self.filtered.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn dropped_after_close(&self) -> u64 {
        self.dropped_after_close.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn queue_full_events(&self) -> u64 {
        self.queue_full_events.load(Ordering::Relaxed)
    }

    #[inline]
    pub fn record_delivered(&self) -> u64 {
        self.delivered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_write_failure(&self) -> u64 {
        self.write_failures.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_filtered(&self) -> u64 {
        self.filtered.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_dropped_after_close(&self) -> u64 {
        self.dropped_after_close.fetch_add(1, Ordering::Relaxed)
    }

    #[inline]
    pub fn record_queue_full(&self) -> u64 {
        self.queue_full_events.fetch_add(1, Ordering::Relaxed)
    }

    /// Reset all counters to zero
    pub fn reset(&self) {
        self.delivered.store(0, Ordering::Relaxed);
        self.write_failures.store(0, Ordering::Relaxed);
        self.filtered.store(0, Ordering::Relaxed);
        self.dropped_after_close.store(0, Ordering::Relaxed);
        self.queue_full_events.store(0, Ordering::Relaxed);
    }
}

impl Default for DispatchMetrics {
    fn default() -> Self {
        Self::new()
    }
}

impl Clone for DispatchMetrics {
    /// Snapshot of the current values
    fn clone(&self) -> Self {
        Self {
            delivered: AtomicU64::new(self.delivered()),
            write_failures: AtomicU64::new(self.write_failures()),
            filtered: AtomicU64::new(self.filtered()),
            dropped_after_close: AtomicU64::new(self.dropped_after_close()),
            queue_full_events: AtomicU64::new(self.queue_full_events()),
        }
    }
}
