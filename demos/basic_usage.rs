//! Basic dispatcher usage example
//!
//! Demonstrates synchronous logging to the default console backend and
//! threshold filtering.
//!
//! Run with: cargo run --example basic_usage

use rust_log_dispatcher::prelude::*;
use rust_log_dispatcher::{debug, error, info, warn};

fn main() -> Result<()> {
    println!("=== Rust Log Dispatcher - Basic Usage Example ===\n");

    // Console backend is attached by default
    let dispatcher = Dispatcher::new();

    println!("1. Logging at different levels:");
    debug!(dispatcher, "This is a debug message");
    info!(dispatcher, "This is an info message, x={}", 5);
    warn!(dispatcher, "This is a warning message");
    error!(dispatcher, "This is an error message");

    println!("\n2. Raising the threshold:");
    dispatcher.set_threshold(Severity::Warning);
    println!("   Threshold set to WARN - debug and info won't show:");
    debug!(dispatcher, "Debug message (hidden)");
    info!(dispatcher, "Info message (hidden)");
    warn!(dispatcher, "Warning message (visible)");

    println!("\n3. Prefix and call site:");
    dispatcher.set_threshold(Severity::Debug);
    dispatcher.set_prefix("[demo]");
    dispatcher.set_call_site(true);
    info!(dispatcher, "Tagged with where it was logged");

    println!("\n4. Replacing the console backend with a configured one:");
    dispatcher.detach("console");
    dispatcher.attach("console", r#"{"level": "error", "color": false}"#)?;
    warn!(dispatcher, "Below the backend threshold (hidden)");
    error!(dispatcher, "Plain error line");

    dispatcher.close();
    println!("\n=== Example completed successfully! ===");

    Ok(())
}
