//! Dispatch core: severity, backend contract, registry, envelopes and the
//! dispatcher with its delivery worker

pub mod backend;
pub mod dispatcher;
pub mod envelope;
pub mod error;
pub mod metrics;
pub mod registry;
pub mod severity;
pub mod state;
pub mod timestamp;
mod worker;

pub use backend::{Backend, BackendEntry};
pub use dispatcher::{
    Dispatcher, DispatcherBuilder, DEFAULT_BACKEND, DEFAULT_QUEUE_CAPACITY,
};
pub use envelope::{Envelope, EnvelopePool};
pub use error::{DispatchError, Result};
pub use metrics::DispatchMetrics;
pub use registry::{Constructor, Registry};
pub use severity::Severity;
pub use state::{stderr_error_handler, ErrorHandler, Lifecycle};
pub use timestamp::TimestampFormat;
