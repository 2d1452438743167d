//! Message envelope and the pool that recycles envelopes in async mode

use super::severity::Severity;
use chrono::{DateTime, Local};
use parking_lot::Mutex;
use std::fmt;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Buffers that grew past this are not kept in the pool
const MAX_RETAINED_CAPACITY: usize = 4 * 1024;

/// One log event: level, rendered text and the time it was emitted
#[derive(Debug, Clone, PartialEq)]
pub struct Envelope {
    level: Severity,
    text: String,
    timestamp: DateTime<Local>,
}

impl Envelope {
    pub fn new(level: Severity, text: impl Into<String>, timestamp: DateTime<Local>) -> Self {
        Self {
            level,
            text: text.into(),
            timestamp,
        }
    }

    pub fn level(&self) -> Severity {
        self.level
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn timestamp(&self) -> DateTime<Local> {
        self.timestamp
    }

    /// Only used while the dispatcher renders into a freshly acquired envelope
    pub(crate) fn text_buf(&mut self) -> &mut String {
        &mut self.text
    }
}

/// Free list of envelopes shared by producers (acquire) and the delivery
/// worker (release). Every `acquire` must be paired with one `release`.
pub struct EnvelopePool {
    free: Mutex<Vec<Envelope>>,
    max_idle: usize,
    allocated: AtomicUsize,
    in_flight: AtomicUsize,
}

impl EnvelopePool {
    pub fn new(max_idle: usize) -> Self {
        Self {
            free: Mutex::new(Vec::with_capacity(max_idle.min(1024))),
            max_idle,
            allocated: AtomicUsize::new(0),
            in_flight: AtomicUsize::new(0),
        }
    }

    /// Take an envelope with an empty text buffer
    pub fn acquire(&self, level: Severity, timestamp: DateTime<Local>) -> Envelope {
        self.in_flight.fetch_add(1, Ordering::AcqRel);
        let recycled = self.free.lock().pop();
        match recycled {
            Some(mut envelope) => {
                envelope.level = level;
                envelope.timestamp = timestamp;
                envelope
            }
            None => {
                self.allocated.fetch_add(1, Ordering::Relaxed);
                Envelope::new(level, String::new(), timestamp)
            }
        }
    }

    /// Return an envelope after its last consumer is done with it
    pub fn release(&self, mut envelope: Envelope) {
        self.in_flight.fetch_sub(1, Ordering::AcqRel);
        if envelope.text.capacity() > MAX_RETAINED_CAPACITY {
            return;
        }
        envelope.text.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_idle {
            free.push(envelope);
        }
    }

    /// Envelopes handed out and not yet released
    pub fn in_flight(&self) -> usize {
        self.in_flight.load(Ordering::Acquire)
    }

    /// Envelopes ever created by this pool
    pub fn allocated(&self) -> usize {
        self.allocated.load(Ordering::Relaxed)
    }

    pub fn idle(&self) -> usize {
        self.free.lock().len()
    }
}

impl fmt::Debug for EnvelopePool {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EnvelopePool")
            .field("max_idle", &self.max_idle)
            .field("allocated", &self.allocated())
            .field("in_flight", &self.in_flight())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_acquire_release_pairing() {
        let pool = EnvelopePool::new(4);

        let a = pool.acquire(Severity::Info, Local::now());
        let b = pool.acquire(Severity::Error, Local::now());
        assert_eq!(pool.in_flight(), 2);
        assert_eq!(pool.allocated(), 2);

        pool.release(a);
        pool.release(b);
        assert_eq!(pool.in_flight(), 0);
        assert_eq!(pool.idle(), 2);
    }

    #[test]
    fn test_reuse_does_not_leak_stale_text() {
        let pool = EnvelopePool::new(1);

        let mut first = pool.acquire(Severity::Error, Local::now());
        first.text_buf().push_str("[E] disk on fire");
        pool.release(first);

        let second = pool.acquire(Severity::Debug, Local::now());
        assert_eq!(pool.allocated(), 1, "envelope should have been recycled");
        assert_eq!(second.text(), "");
        assert_eq!(second.level(), Severity::Debug);
        assert!(second.text.capacity() >= "[E] disk on fire".len());
        pool.release(second);
    }

    #[test]
    fn test_idle_is_bounded() {
        let pool = EnvelopePool::new(2);
        let held: Vec<_> = (0..5)
            .map(|_| pool.acquire(Severity::Info, Local::now()))
            .collect();
        for envelope in held {
            pool.release(envelope);
        }
        assert_eq!(pool.idle(), 2);
        assert_eq!(pool.in_flight(), 0);
    }

    #[test]
    fn test_oversized_buffers_are_discarded() {
        let pool = EnvelopePool::new(2);
        let mut big = pool.acquire(Severity::Info, Local::now());
        big.text_buf().push_str(&"x".repeat(MAX_RETAINED_CAPACITY + 1));
        pool.release(big);
        assert_eq!(pool.idle(), 0);
    }
}
