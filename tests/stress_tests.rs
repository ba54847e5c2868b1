//! Stress tests for the dispatch pipeline
//!
//! These tests verify:
//! - Concurrent producers are linearized without loss or reordering per thread
//! - A full queue blocks producers instead of dropping entries
//! - Every active target sees the same sequence
//! - Close racing with producers never loses an accepted entry

use rust_logkit::prelude::*;
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;
use tempfile::TempDir;

fn quiet_builder() -> LoggerBuilder {
    Logger::builder()
        .call_stack_depth(0)
        .formatter(formatter(|_, entry| entry.message.clone()))
}

/// Parse `"<thread>:<seq>"` messages back into their parts
fn thread_and_seq(line: &str) -> (usize, usize) {
    let (thread, seq) = line.split_once(':').expect("malformed message");
    (thread.parse().unwrap(), seq.parse().unwrap())
}

#[test]
fn test_concurrent_producers_keep_per_thread_order() {
    const THREADS: usize = 8;
    const PER_THREAD: usize = 2_000;

    let memory = MemoryTarget::new();
    let logger = quiet_builder().buffer_size(16).target(memory.clone()).build();
    logger.open().unwrap();

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..PER_THREAD {
                    logger.info(format!("{}:{}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.close();

    let lines = memory.lines();
    assert_eq!(lines.len(), THREADS * PER_THREAD);

    let mut next: HashMap<usize, usize> = HashMap::new();
    for line in &lines {
        let (t, seq) = thread_and_seq(line);
        let expected = next.entry(t).or_insert(0);
        assert_eq!(seq, *expected, "thread {} delivered out of order", t);
        *expected += 1;
    }
    assert!(next.values().all(|&n| n == PER_THREAD));

    let metrics = logger.metrics();
    assert_eq!(metrics.submitted(), (THREADS * PER_THREAD) as u64);
    assert_eq!(metrics.dispatched(), (THREADS * PER_THREAD) as u64);
    assert_eq!(metrics.discarded(), 0);
}

#[test]
fn test_full_queue_blocks_instead_of_dropping() {
    let memory = MemoryTarget::new().with_delay(Duration::from_millis(2));
    let logger = quiet_builder().buffer_size(1).target(memory.clone()).build();
    logger.open().unwrap();

    for i in 0..50 {
        logger.warning(format!("0:{}", i));
    }
    logger.close();

    assert_eq!(memory.lines().len(), 50);
    assert!(
        logger.metrics().blocked_submits() > 0,
        "a slow target behind a one-slot queue must block producers"
    );
}

#[test]
fn test_all_targets_see_same_sequence() {
    let temp_dir = TempDir::new().expect("Failed to create temp dir");
    let first = MemoryTarget::named("first");
    let second = MemoryTarget::named("second").with_delay(Duration::from_micros(50));

    let logger = quiet_builder()
        .buffer_size(4)
        .target(first.clone())
        .target(second.clone())
        .target(FileTarget::in_directory(temp_dir.path()))
        .build();
    logger.open().unwrap();

    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = logger.clone();
            thread::spawn(move || {
                for i in 0..250 {
                    logger.notice(format!("{}:{}", t, i));
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }
    logger.close();

    let expected = first.lines();
    assert_eq!(expected.len(), 1_000);
    assert_eq!(second.lines(), expected);

    let path = temp_dir
        .path()
        .join(format!("{}.log", chrono::Local::now().format("%Y%m%d")));
    let content = std::fs::read_to_string(path).expect("Failed to read log file");
    let from_file: Vec<String> = content.lines().map(str::to_string).collect();
    assert_eq!(from_file, expected);
}

#[test]
fn test_close_racing_with_producers() {
    let memory = MemoryTarget::new();
    let logger = quiet_builder().buffer_size(8).target(memory.clone()).build();
    logger.open().unwrap();

    let attempted = Arc::new(AtomicUsize::new(0));
    let handles: Vec<_> = (0..4)
        .map(|t| {
            let logger = logger.clone();
            let attempted = Arc::clone(&attempted);
            thread::spawn(move || {
                for i in 0..5_000 {
                    attempted.fetch_add(1, Ordering::Relaxed);
                    logger.error(format!("{}:{}", t, i));
                }
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(5));
    logger.close();
    for handle in handles {
        handle.join().unwrap();
    }

    let metrics = logger.metrics();
    let delivered = memory.lines().len() as u64;
    assert_eq!(delivered, metrics.submitted());
    assert_eq!(
        metrics.submitted() + metrics.discarded(),
        attempted.load(Ordering::Relaxed) as u64
    );
}

#[test]
fn test_repeated_open_close_cycles() {
    let memory = MemoryTarget::new();
    let logger = quiet_builder().target(memory.clone()).build();

    for cycle in 0..20 {
        logger.open().unwrap();
        logger.info(format!("0:{}", cycle));
        logger.close();
    }

    assert_eq!(memory.lines().len(), 20);
    assert_eq!(memory.open_count(), 20);
    assert_eq!(memory.close_count(), 20);
}
