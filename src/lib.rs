//! # Rust Log Dispatcher
//!
//! A pluggable logging facade. Application code logs through one
//! [`Dispatcher`]; any number of backends (console, file, your own) receive
//! each message, each configured on its own and failing on its own.
//!
//! ## Features
//!
//! - **Two delivery modes**: synchronous fan-out on the calling thread, or a
//!   single delivery worker fed through a bounded queue
//! - **Strict barriers**: `flush` returns only after every earlier message
//!   reached every backend; `close` drains, then tears backends down
//! - **Isolated backends**: a failing or panicking backend is reported and
//!   skipped, the others keep receiving
//! - **Pluggable**: backends are built by name from a [`Registry`]
//!
//! ```
//! use rust_log_dispatcher::prelude::*;
//! use rust_log_dispatcher::{error, info};
//!
//! let dispatcher = Dispatcher::new();
//! info!(dispatcher, "x={}", 5);
//!
//! dispatcher.go_async(None);
//! error!(dispatcher, "delivered by the worker");
//! dispatcher.close();
//! ```

pub mod backends;
pub mod color;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::backends::{ConsoleBackend, FileBackend};
    pub use crate::core::{
        Backend, DispatchError, DispatchMetrics, Dispatcher, DispatcherBuilder, Envelope,
        ErrorHandler, Lifecycle, Registry, Result, Severity, TimestampFormat,
    };
}

pub use backends::{ConsoleBackend, ConsoleConfig, FileBackend, FileConfig};
pub use core::{
    Backend, BackendEntry, DispatchError, DispatchMetrics, Dispatcher, DispatcherBuilder,
    Envelope, EnvelopePool, ErrorHandler, Lifecycle, Registry, Result, Severity,
    TimestampFormat, DEFAULT_QUEUE_CAPACITY,
};
