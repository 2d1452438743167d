//! File logging example
//!
//! Demonstrates fan-out to the console and a file, each with its own
//! threshold, and a custom backend registered by name.
//!
//! Run with: cargo run --example file_logging

use chrono::{DateTime, Local};
use rust_log_dispatcher::prelude::*;
use rust_log_dispatcher::{debug, error, info, warn};
use std::sync::Arc;

/// Counts what it receives and prints a summary on destroy
#[derive(Default)]
struct CountingBackend {
    seen: usize,
}

impl Backend for CountingBackend {
    fn init(&mut self, _config: &str) -> Result<()> {
        Ok(())
    }

    fn write_msg(&mut self, _when: DateTime<Local>, _msg: &str, _level: Severity) -> Result<()> {
        self.seen += 1;
        Ok(())
    }

    fn flush(&mut self) {}

    fn destroy(&mut self) {
        println!("   counting backend saw {} messages", self.seen);
    }
}

fn main() -> Result<()> {
    println!("=== Rust Log Dispatcher - File Logging Example ===\n");

    let registry = Registry::with_builtins();
    registry.register("counting", || Box::new(CountingBackend::default()))?;

    let dispatcher = Dispatcher::builder()
        .registry(Arc::new(registry))
        .prefix("[app]")
        .build();

    dispatcher.attach(
        "file",
        r#"{"filename": "application.log", "level": "info", "timestamp": "iso8601"}"#,
    )?;
    dispatcher.attach("counting", "")?;

    println!("1. Logging to console, file and counter:");
    info!(dispatcher, "Application started");
    debug!(dispatcher, "Loading configuration... (console only)");
    info!(dispatcher, "Configuration loaded successfully");
    warn!(dispatcher, "Using default settings for some options");
    error!(dispatcher, "Failed to load optional plugin");

    println!("\n2. Performing some operations:");
    for i in 1..=5 {
        info!(dispatcher, "Processing item {}/5", i);
        if i == 3 {
            warn!(dispatcher, "Item 3 took longer than expected");
        }
    }

    println!("\n3. Closing:");
    dispatcher.close();

    println!("\n=== Example completed successfully! ===");
    println!("Check application.log for file output");

    Ok(())
}
