//! State guarded by the dispatcher lock, and the fan-out over it
//!
//! Every backend call goes through here. Each call is isolated with
//! `catch_unwind`, so one failing or panicking backend never keeps the
//! message from the backends attached after it.

use super::{
    backend::BackendEntry, error::DispatchError, metrics::DispatchMetrics, severity::Severity,
};
use chrono::{DateTime, Local};
use std::any::Any;
use std::fmt;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::Arc;

/// Receives per-backend failures: the backend name and what went wrong
pub type ErrorHandler = Arc<dyn Fn(&str, &DispatchError) + Send + Sync>;

/// Default diagnostic channel: stderr
pub fn stderr_error_handler() -> ErrorHandler {
    Arc::new(|name: &str, err: &DispatchError| {
        eprintln!("[DISPATCH ERROR] backend '{}' failed: {}", name, err);
    })
}

/// Lifecycle of a dispatcher. `Open -> Closing -> Closed`, never back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Lifecycle {
    Open = 0,
    Closing = 1,
    Closed = 2,
}

impl Lifecycle {
    pub(crate) fn from_u8(value: u8) -> Self {
        match value {
            0 => Lifecycle::Open,
            1 => Lifecycle::Closing,
            _ => Lifecycle::Closed,
        }
    }
}

/// Failure bookkeeping shared by producers and the delivery worker
pub(crate) struct Reporter {
    pub(crate) metrics: DispatchMetrics,
    on_error: ErrorHandler,
}

impl Reporter {
    pub(crate) fn new(on_error: ErrorHandler) -> Self {
        Self {
            metrics: DispatchMetrics::new(),
            on_error,
        }
    }

    pub(crate) fn report(&self, name: &str, err: &DispatchError) {
        (self.on_error)(name, err);
    }
}

pub(crate) struct State {
    pub(crate) backends: Vec<BackendEntry>,
    pub(crate) queue_capacity: usize,
}

impl State {
    pub(crate) fn new(queue_capacity: usize) -> Self {
        Self {
            backends: Vec::new(),
            queue_capacity,
        }
    }

    pub(crate) fn contains(&self, name: &str) -> bool {
        self.backends.iter().any(|entry| entry.name == name)
    }

    /// Hand one message to every backend, in attachment order
    pub(crate) fn deliver_to_all(
        &mut self,
        when: DateTime<Local>,
        text: &str,
        level: Severity,
        reporter: &Reporter,
    ) {
        for entry in self.backends.iter_mut() {
            if !level.passes(entry.backend.threshold()) {
                continue;
            }

            let backend = &mut entry.backend;
            let result = catch_unwind(AssertUnwindSafe(|| backend.write_msg(when, text, level)));

            let failure = match result {
                Ok(Ok(())) => None,
                Ok(Err(e)) => Some(e),
                Err(panic_info) => Some(DispatchError::backend_panic(
                    &entry.name,
                    panic_message(panic_info.as_ref()),
                )),
            };

            if let Some(err) = failure {
                reporter.metrics.record_write_failure();
                reporter.report(&entry.name, &err);
            }
        }
        reporter.metrics.record_delivered();
    }

    pub(crate) fn flush_all(&mut self, reporter: &Reporter) {
        for entry in self.backends.iter_mut() {
            let backend = &mut entry.backend;
            if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| backend.flush())) {
                let err = DispatchError::backend_panic(
                    &entry.name,
                    format!("during flush: {}", panic_message(panic_info.as_ref())),
                );
                reporter.report(&entry.name, &err);
            }
        }
    }

    /// Flush, then destroy every backend and empty the list
    pub(crate) fn close_all(&mut self, reporter: &Reporter) {
        self.flush_all(reporter);
        for mut entry in self.backends.drain(..) {
            let backend = &mut entry.backend;
            if let Err(panic_info) = catch_unwind(AssertUnwindSafe(|| backend.destroy())) {
                let err = DispatchError::backend_panic(
                    &entry.name,
                    format!("during destroy: {}", panic_message(panic_info.as_ref())),
                );
                reporter.report(&entry.name, &err);
            }
        }
    }
}

impl fmt::Debug for State {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("State")
            .field("backends", &self.backends)
            .field("queue_capacity", &self.queue_capacity)
            .finish()
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}
