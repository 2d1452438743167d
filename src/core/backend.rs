//! Backend trait for log sinks

use super::{error::Result, severity::Severity};
use chrono::{DateTime, Local};

/// A sink that receives rendered messages from a [`Dispatcher`](super::Dispatcher).
///
/// The dispatcher owns each backend behind its state lock, so calls never
/// overlap. In synchronous mode they happen on whichever producer thread
/// logged; in asynchronous mode they all happen on the delivery worker.
pub trait Backend: Send {
    /// Configure the backend from an implementation-defined blob.
    /// An empty string means defaults.
    fn init(&mut self, config: &str) -> Result<()>;

    fn write_msg(&mut self, when: DateTime<Local>, msg: &str, level: Severity) -> Result<()>;

    /// Best effort.
    fn flush(&mut self);

    /// Called exactly once, at dispatcher close. No writes follow.
    fn destroy(&mut self);

    /// Most verbose level this backend accepts.
    fn threshold(&self) -> Severity {
        Severity::Debug
    }
}

/// An attached backend and the name it was attached under
pub struct BackendEntry {
    pub(crate) name: String,
    pub(crate) backend: Box<dyn Backend>,
}

impl BackendEntry {
    pub fn new(name: impl Into<String>, backend: Box<dyn Backend>) -> Self {
        Self {
            name: name.into(),
            backend,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl std::fmt::Debug for BackendEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackendEntry")
            .field("name", &self.name)
            .field("threshold", &self.backend.threshold())
            .finish()
    }
}
