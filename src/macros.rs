//! Logging macros with `format!`-style arguments.
//!
//! Arguments are captured with `format_args!`, so nothing is rendered
//! unless the message passes the dispatcher threshold.
//!
//! # Examples
//!
//! ```
//! use rust_log_dispatcher::prelude::*;
//! use rust_log_dispatcher::{info, warn};
//!
//! let dispatcher = Dispatcher::new();
//!
//! info!(dispatcher, "Server started");
//!
//! let port = 8080;
//! info!(dispatcher, "Server listening on port {}", port);
//! warn!(dispatcher, "{} of {} workers busy", 7, 8);
//! ```

/// Log at an explicit [`Severity`](crate::Severity).
///
/// ```
/// # use rust_log_dispatcher::prelude::*;
/// # let dispatcher = Dispatcher::new();
/// use rust_log_dispatcher::log;
/// log!(dispatcher, Severity::Info, "Simple message");
/// log!(dispatcher, Severity::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($dispatcher:expr, $level:expr, $($arg:tt)+) => {
        $dispatcher.log($level, ::std::format_args!($($arg)+))
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Error, $($arg)+)
    };
}

/// Log a warning-level message.
#[macro_export]
macro_rules! warn {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Warning, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Info, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// ```
/// # use rust_log_dispatcher::prelude::*;
/// # let dispatcher = Dispatcher::new();
/// use rust_log_dispatcher::debug;
/// debug!(dispatcher, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($dispatcher:expr, $($arg:tt)+) => {
        $crate::log!($dispatcher, $crate::Severity::Debug, $($arg)+)
    };
}
