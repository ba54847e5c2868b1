//! Criterion benchmarks for rust_logkit

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use rust_logkit::core::call_stack;
use rust_logkit::prelude::*;
use std::io;
use std::sync::Arc;
use std::thread;

fn sink_logger(buffer_size: usize, call_stack_depth: usize) -> Logger {
    Logger::builder()
        .buffer_size(buffer_size)
        .call_stack_depth(call_stack_depth)
        .target(ConsoleTarget::new().with_writer(io::sink()).with_colors(false))
        .build()
}

// ============================================================================
// Submit Path Benchmarks
// ============================================================================

fn bench_submit(c: &mut Criterion) {
    let mut group = c.benchmark_group("submit");
    group.throughput(Throughput::Elements(1));

    let logger = sink_logger(1024, 0);
    logger.open().unwrap();

    group.bench_function("info", |b| {
        b.iter(|| logger.info(black_box("Info message")));
    });

    group.bench_function("formatted", |b| {
        b.iter(|| rust_logkit::info!(logger, "request {} took {}ms", black_box(42), black_box(7)));
    });

    group.bench_function("filtered", |b| {
        let filtered = Logger::builder()
            .max_severity(Severity::Error)
            .target(ConsoleTarget::new().with_writer(io::sink()))
            .build();
        filtered.open().unwrap();
        b.iter(|| filtered.debug(black_box("never formatted")));
        filtered.close();
    });

    group.finish();
    logger.close();
}

fn bench_call_stack(c: &mut Criterion) {
    let mut group = c.benchmark_group("call_stack");

    for depth in [1usize, 3, 8] {
        group.bench_with_input(BenchmarkId::new("capture", depth), &depth, |b, &depth| {
            b.iter(|| black_box(call_stack::capture(0, depth, "")));
        });
    }

    group.finish();
}

// ============================================================================
// Formatter Benchmarks
// ============================================================================

fn bench_formatters(c: &mut Criterion) {
    let mut group = c.benchmark_group("formatters");
    group.throughput(Throughput::Elements(1));

    let logger = Logger::builder().build();
    let entry = Entry::new(Severity::Warning, "bench", "disk usage at 91%");

    group.bench_function("default", |b| {
        b.iter(|| black_box(default_formatter(&logger, black_box(&entry))));
    });

    group.bench_function("json", |b| {
        b.iter(|| black_box(json_formatter(&logger, black_box(&entry))));
    });

    group.finish();
}

// ============================================================================
// Concurrent Producer Benchmarks
// ============================================================================

fn bench_concurrent(c: &mut Criterion) {
    let mut group = c.benchmark_group("concurrent");
    const PER_THREAD: usize = 1_000;

    for threads in [1usize, 4, 8] {
        group.throughput(Throughput::Elements((threads * PER_THREAD) as u64));
        group.bench_with_input(BenchmarkId::new("producers", threads), &threads, |b, &threads| {
            let logger = Arc::new(sink_logger(1024, 0));
            logger.open().unwrap();
            b.iter(|| {
                let handles: Vec<_> = (0..threads)
                    .map(|_| {
                        let logger = Arc::clone(&logger);
                        thread::spawn(move || {
                            for i in 0..PER_THREAD {
                                logger.info(format!("message {}", i));
                            }
                        })
                    })
                    .collect();
                for handle in handles {
                    handle.join().unwrap();
                }
            });
            logger.close();
        });
    }

    group.finish();
}

fn bench_buffer_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("buffer_size");
    group.throughput(Throughput::Elements(100));

    for size in [1usize, 64, 1024] {
        group.bench_with_input(BenchmarkId::from_parameter(size), &size, |b, &size| {
            b.iter(|| {
                let logger = sink_logger(size, 0);
                logger.open().unwrap();
                for i in 0..100 {
                    logger.info(format!("message {}", i));
                }
                logger.close();
            });
        });
    }

    group.finish();
}

criterion_group!(
    benches,
    bench_submit,
    bench_call_stack,
    bench_formatters,
    bench_concurrent,
    bench_buffer_sizes,
);
criterion_main!(benches);
