//! Criterion benchmarks for rust_log_dispatcher

use criterion::{black_box, criterion_group, criterion_main, Criterion, Throughput};
use rust_log_dispatcher::prelude::*;
use std::sync::Arc;

/// Dispatcher whose `console` backend writes into a sink
fn sink_dispatcher() -> Dispatcher {
    let registry = Registry::new();
    registry
        .register("console", || Box::new(ConsoleBackend::with_writer(std::io::sink())))
        .unwrap();
    Dispatcher::builder().registry(Arc::new(registry)).build()
}

// ============================================================================
// Dispatcher Creation Benchmarks
// ============================================================================

fn bench_dispatcher_creation(c: &mut Criterion) {
    let mut group = c.benchmark_group("dispatcher_creation");
    group.throughput(Throughput::Elements(1));

    group.bench_function("new_sync", |b| {
        b.iter(|| {
            let dispatcher = sink_dispatcher();
            black_box(dispatcher)
        });
    });

    group.bench_function("new_async", |b| {
        b.iter(|| {
            let dispatcher = sink_dispatcher();
            dispatcher.go_async(Some(1000));
            black_box(dispatcher)
        });
    });

    group.finish();
}

// ============================================================================
// Logging Performance Benchmarks
// ============================================================================

fn bench_sync_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("sync_logging");
    group.throughput(Throughput::Elements(1));

    let dispatcher = sink_dispatcher();

    group.bench_function("info", |b| {
        b.iter(|| {
            dispatcher.info(format_args!("{}", black_box("Info message")));
        });
    });

    group.bench_function("error_with_args", |b| {
        b.iter(|| {
            dispatcher.error(format_args!("code={} path={}", black_box(500), black_box("/api")));
        });
    });

    dispatcher.set_call_site(true);
    dispatcher.set_prefix("[bench]");
    group.bench_function("info_with_call_site_and_prefix", |b| {
        b.iter(|| {
            dispatcher.info(format_args!("{}", black_box("Info message")));
        });
    });

    group.finish();
}

fn bench_async_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("async_logging");
    group.throughput(Throughput::Elements(1));

    let dispatcher = sink_dispatcher();
    dispatcher.go_async(Some(10000));

    group.bench_function("info", |b| {
        b.iter(|| {
            dispatcher.info(format_args!("{}", black_box("Info message")));
        });
    });

    group.bench_function("flush", |b| {
        b.iter(|| {
            dispatcher.info(format_args!("{}", black_box("Before flush")));
            dispatcher.flush();
        });
    });

    group.finish();
}

// ============================================================================
// Concurrent Logging Benchmarks
// ============================================================================

fn bench_concurrent_logging(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent_logging");

    let dispatcher = Arc::new(sink_dispatcher());
    dispatcher.go_async(Some(10000));

    group.bench_function("multi_thread_4", |b| {
        let dispatcher = Arc::clone(&dispatcher);
        b.iter(|| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let dispatcher = Arc::clone(&dispatcher);
                    std::thread::spawn(move || {
                        dispatcher.info(format_args!("{}", black_box("Concurrent message")));
                    })
                })
                .collect();

            for handle in handles {
                handle.join().unwrap();
            }
        });
    });

    group.finish();
}

// ============================================================================
// Filtering Benchmarks
// ============================================================================

fn bench_level_filtering(c: &mut Criterion) {
    let mut group = c.benchmark_group("level_filtering");
    group.throughput(Throughput::Elements(1));

    let dispatcher = sink_dispatcher();
    dispatcher.set_threshold(Severity::Warning);

    group.bench_function("below_threshold", |b| {
        b.iter(|| {
            dispatcher.debug(format_args!("{}", black_box("This should be filtered")));
        });
    });

    group.bench_function("above_threshold", |b| {
        b.iter(|| {
            dispatcher.error(format_args!("{}", black_box("This should be logged")));
        });
    });

    group.finish();
}

// ============================================================================
// Criterion Configuration
// ============================================================================

criterion_group!(
    benches,
    bench_dispatcher_creation,
    bench_sync_logging,
    bench_async_logging,
    bench_concurrent_logging,
    bench_level_filtering
);

criterion_main!(benches);
