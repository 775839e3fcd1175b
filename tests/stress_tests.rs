//! Stress tests for concurrent logging
//!
//! These tests verify:
//! - Counters stay unique across threads and loggers
//! - Each thread observes strictly increasing counters
//! - Deeply nested contexts on many threads never leak into each other
//! - The async sink keeps up with concurrent producers

use rust_context_logger::prelude::*;
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use std::thread;

const THREADS: usize = 8;
const MESSAGES_PER_THREAD: usize = 500;

#[test]
fn test_counters_unique_across_threads() {
    let sink = MemorySink::new(LogLevel::Debug);
    let logger = Arc::new(Logger::new(sink.clone()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let _ctx = LoggingContext::open_kv("thread", t, true);
                for i in 0..MESSAGES_PER_THREAD {
                    assert!(logger.info(format!("{}:{}", t, i)));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let entries = sink.take();
    assert_eq!(entries.len(), THREADS * MESSAGES_PER_THREAD);

    let counters: HashSet<u64> = entries.iter().filter_map(LogEntry::counter).collect();
    assert_eq!(counters.len(), entries.len(), "Counters must be unique");

    // Sink order is emission order, so per-thread counters must increase
    let mut last_seen: HashMap<i64, u64> = HashMap::new();
    for entry in &entries {
        let thread_id = entry
            .attribute("thread")
            .and_then(FieldValue::as_i64)
            .unwrap();
        let counter = entry.counter().unwrap();
        if let Some(previous) = last_seen.insert(thread_id, counter) {
            assert!(previous < counter, "Counter went backwards on thread {}", thread_id);
        }
    }
}

#[test]
fn test_counters_shared_between_loggers() {
    let first = MemorySink::new(LogLevel::Debug);
    let second = MemorySink::new(LogLevel::Debug);
    let logger_a = Logger::new(first.clone());
    let logger_b = Logger::new(second.clone());

    for i in 0..100 {
        logger_a.info(format!("a{}", i));
        logger_b.info(format!("b{}", i));
    }

    let mut counters: Vec<u64> = first
        .entries()
        .iter()
        .chain(second.entries().iter())
        .filter_map(LogEntry::counter)
        .collect();
    counters.sort_unstable();
    counters.dedup();
    assert_eq!(counters.len(), 200);
}

#[test]
fn test_nested_contexts_isolated_under_load() {
    let sink = MemorySink::new(LogLevel::Debug);
    let logger = Arc::new(Logger::new(sink.clone()));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                for round in 0..50 {
                    let _outer = LoggingContext::open_kv("owner", t, true);
                    let mut inner = LoggingContext::open_kv("owner", t * 100, false);
                    inner.add("round", round);

                    logger.debug("inner");
                    inner.finish();
                    logger.debug("outer");
                }
                assert_eq!(LoggingContext::open_count(), 0);
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    let entries = sink.take();
    assert_eq!(entries.len(), THREADS * 50 * 2);

    for entry in &entries {
        let owner = entry.attribute("owner").and_then(FieldValue::as_i64).unwrap();
        match entry.message.as_str() {
            "inner" => {
                assert_eq!(owner % 100, 0);
                assert!(entry.attribute("round").is_some());
            }
            _ => {
                assert!(owner < THREADS as i64);
                assert!(entry.attribute("round").is_none());
            }
        }
    }
}

#[test]
fn test_async_sink_concurrent_producers() {
    let memory = MemorySink::new(LogLevel::Debug);
    let logger = Arc::new(Logger::new(AsyncSink::new(memory.clone(), 10_000)));

    let handles: Vec<_> = (0..THREADS)
        .map(|t| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let _ctx = LoggingContext::open_kv("producer", t, true);
                for i in 0..MESSAGES_PER_THREAD {
                    logger.info(format!("{}:{}", t, i));
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }
    logger.flush().unwrap();

    let metrics = logger.metrics();
    assert_eq!(
        metrics.emitted_count() + metrics.failed_count(),
        (THREADS * MESSAGES_PER_THREAD) as u64
    );
    assert_eq!(memory.len() as u64, metrics.emitted_count());
}
