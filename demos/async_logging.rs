//! Async logging example
//!
//! Demonstrates the delivery worker with several producer threads.
//!
//! Run with: cargo run --example async_logging

use rust_log_dispatcher::info;
use rust_log_dispatcher::prelude::*;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn main() -> Result<()> {
    println!("=== Rust Log Dispatcher - Async Logging Example ===\n");

    let dispatcher = Dispatcher::new();
    dispatcher.attach("file", r#"{"filename": "async_test.log"}"#)?;

    // From here on the calling thread only enqueues
    dispatcher.go_async(Some(1000));

    println!("1. High-throughput async logging:");
    for i in 0..100 {
        info!(dispatcher, "Message #{}", i);
    }
    dispatcher.flush();
    println!("   Logged and flushed 100 messages");

    println!("\n2. Multi-threaded logging:");
    let dispatcher = Arc::new(dispatcher);

    let mut handles = vec![];
    for thread_id in 0..5 {
        let dispatcher = Arc::clone(&dispatcher);
        let handle = thread::spawn(move || {
            for i in 0..20 {
                info!(dispatcher, "Thread {} - Message {}", thread_id, i);
                thread::sleep(Duration::from_millis(10));
            }
        });
        handles.push(handle);
    }

    for handle in handles {
        handle.join().expect("producer thread panicked");
    }

    dispatcher.close();

    let metrics = dispatcher.metrics();
    println!("\n3. Metrics:");
    println!("   delivered:         {}", metrics.delivered());
    println!("   queue full events: {}", metrics.queue_full_events());
    println!("   write failures:    {}", metrics.write_failures());

    println!("\n=== Example completed successfully! ===");
    println!("Check async_test.log for file output");

    Ok(())
}
