//! Integration tests for the context logger
//!
//! These tests verify:
//! - Nested contexts shadow and restore attributes
//! - Conditional release of non-auto-complete contexts
//! - Disabled levels skip the merge
//! - Sink failures never reach the caller
//! - Global logger installation
//! - Thread isolation

use rust_context_logger::core::{attributes, LogEntry, LoggerError, Sink};
use rust_context_logger::prelude::*;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

fn string_attr<'a>(entry: &'a LogEntry, key: &str) -> Option<&'a str> {
    entry.attribute(key).and_then(FieldValue::as_str)
}

#[test]
fn test_nested_request_scenario() {
    let sink = MemorySink::new(LogLevel::Debug);
    let logger = Logger::new(sink.clone());

    {
        let _outer = LoggingContext::open_kv("requestId", "R1", true);
        assert!(logger.info("start"));

        {
            let _inner =
                LoggingContext::open([("requestId", "R2"), ("step", "validate")], true);
            assert!(logger.info("validating"));
        }

        assert!(logger.info("after inner"));
    }
    assert!(logger.info("after outer"));

    let entries = sink.take();
    assert_eq!(entries.len(), 4);

    assert_eq!(string_attr(&entries[0], "requestId"), Some("R1"));
    assert!(entries[0].counter().is_some());

    assert_eq!(string_attr(&entries[1], "requestId"), Some("R2"));
    assert_eq!(string_attr(&entries[1], "step"), Some("validate"));

    assert_eq!(string_attr(&entries[2], "requestId"), Some("R1"));
    assert!(entries[2].attribute("step").is_none());

    assert!(entries[3].attribute("requestId").is_none());
    assert!(entries[3].attribute("step").is_none());
}

#[test]
fn test_manual_context_outlives_scope_until_outer_closes() {
    let sink = MemorySink::new(LogLevel::Debug);
    let logger = Logger::new(sink.clone());

    {
        let _outer = LoggingContext::open_kv("tenant", "acme", true);
        {
            let _manual = LoggingContext::open_kv("job", "import", false);
        }

        // Not completed, so still live
        logger.info("still tagged");
        assert_eq!(LoggingContext::open_count(), 2);
    }

    logger.info("clean");
    assert_eq!(LoggingContext::open_count(), 0);

    let entries = sink.take();
    assert_eq!(string_attr(&entries[0], "job"), Some("import"));
    assert!(entries[1].attribute("job").is_none());
    assert!(entries[1].attribute("tenant").is_none());
}

#[test]
fn test_complete_then_dispose_releases() {
    let mut ctx = LoggingContext::open_kv("phase", "load", false);
    ctx.dispose();
    assert!(ctx.is_open());

    ctx.complete();
    ctx.dispose();
    assert!(!ctx.is_open());
    assert!(LoggingContext::thread_attributes().is_empty());

    // Second dispose is a no-op
    ctx.dispose();
    assert_eq!(LoggingContext::open_count(), 0);
}

#[test]
fn test_closing_outer_force_closes_inner() {
    let outer = LoggingContext::open_kv("a", 1, true);
    let mut inner = LoggingContext::open_kv("b", 2, true);
    assert_eq!(LoggingContext::open_count(), 2);

    drop(outer);
    assert_eq!(LoggingContext::open_count(), 0);
    assert!(!inner.is_open());

    // The stale guard neither resurrects nor clears anything
    let _sibling = LoggingContext::open_kv("c", 3, true);
    inner.add("b", 20);
    drop(inner);
    assert_eq!(
        LoggingContext::thread_attributes().get("c"),
        Some(&FieldValue::Int(3))
    );
    assert!(LoggingContext::thread_attributes().get("b").is_none());
}

#[test]
fn test_first_write_wins_within_a_context() {
    let mut ctx = LoggingContext::open_kv("user", "alice", true);
    ctx.add("user", "mallory").add("role", "admin");

    let attrs = LoggingContext::thread_attributes();
    assert_eq!(attrs.get("user"), Some(&FieldValue::from("alice")));
    assert_eq!(attrs.get("role"), Some(&FieldValue::from("admin")));
}

/// Counts level checks and emits
struct CountingSink {
    enabled: bool,
    checks: AtomicUsize,
    emits: AtomicUsize,
}

impl Sink for CountingSink {
    fn is_level_enabled(&self, _level: LogLevel) -> bool {
        self.checks.fetch_add(1, Ordering::SeqCst);
        self.enabled
    }

    fn emit(&self, _entry: &LogEntry) -> rust_context_logger::Result<()> {
        self.emits.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "counting"
    }
}

#[test]
fn test_disabled_level_returns_false_without_emit() {
    let sink = Arc::new(CountingSink {
        enabled: false,
        checks: AtomicUsize::new(0),
        emits: AtomicUsize::new(0),
    });
    let logger = Logger::new(Arc::clone(&sink));

    let _ctx = LoggingContext::open_kv("ignored", true, true);
    assert!(!logger.log("quiet", LogLevel::Info));
    assert!(!logger.log_with("quiet", LogLevel::Debug, attributes([("k", "v")])));

    assert_eq!(sink.checks.load(Ordering::SeqCst), 2);
    assert_eq!(sink.emits.load(Ordering::SeqCst), 0);
    assert_eq!(logger.metrics().filtered_count(), 2);
}

struct BrokenSink {
    panic: bool,
}

impl Sink for BrokenSink {
    fn is_level_enabled(&self, _level: LogLevel) -> bool {
        true
    }

    fn emit(&self, _entry: &LogEntry) -> rust_context_logger::Result<()> {
        if self.panic {
            panic!("backend unavailable");
        }
        Err(LoggerError::sink("broken", "backend unavailable"))
    }

    fn name(&self) -> &str {
        "broken"
    }
}

#[test]
fn test_sink_failures_return_false() {
    let failing = Logger::new(BrokenSink { panic: false });
    assert!(!failing.error("lost"));

    let panicking = Logger::new(BrokenSink { panic: true });
    assert!(!panicking.error("lost"));

    assert_eq!(failing.metrics().failed_count(), 1);
    assert_eq!(panicking.metrics().failed_count(), 1);
}

#[test]
fn test_context_survives_failed_emit() {
    let logger = Logger::new(BrokenSink { panic: true });
    let _ctx = LoggingContext::open_kv("order", 42, true);

    assert!(!logger.info("lost"));
    assert_eq!(
        LoggingContext::thread_attributes().get("order"),
        Some(&FieldValue::Int(42))
    );
}

#[test]
fn test_global_logger() {
    // Before installation everything is discarded
    assert!(!rust_context_logger::log("early", LogLevel::Error));

    let sink = MemorySink::new(LogLevel::Debug);
    rust_context_logger::init(Logger::new(sink.clone())).unwrap();
    assert!(rust_context_logger::is_initialized());

    let second = rust_context_logger::init(Logger::null());
    assert!(matches!(
        second,
        Err(LoggerError::InvalidConfiguration { .. })
    ));

    let err = std::io::Error::new(std::io::ErrorKind::NotFound, "config missing");
    assert!(rust_context_logger::log("hello", LogLevel::Info));
    assert!(rust_context_logger::log_with(
        "with attrs",
        LogLevel::Warn,
        attributes([("port", 8080)])
    ));
    assert!(rust_context_logger::log_error("failed", &err, LogLevel::Error));

    let entries = sink.take();
    assert_eq!(entries.len(), 3);
    assert_eq!(entries[1].attribute("port"), Some(&FieldValue::Int(8080)));
    assert_eq!(
        entries[2].error.as_ref().map(|e| e.message.as_str()),
        Some("config missing")
    );
}

#[test]
fn test_async_sink_through_logger() {
    let memory = MemorySink::new(LogLevel::Debug);
    let logger = Logger::new(AsyncSink::new(memory.clone(), 100));

    {
        let _ctx = LoggingContext::open_kv("batch", "nightly", true);
        for i in 0..50 {
            assert!(logger.info(format!("Message {}", i)));
        }
    }
    logger.flush().unwrap();

    let entries = memory.take();
    assert_eq!(entries.len(), 50);
    assert!(entries
        .iter()
        .all(|e| string_attr(e, "batch") == Some("nightly")));
}

#[test]
fn test_threads_do_not_see_each_others_contexts() {
    let sink = MemorySink::new(LogLevel::Debug);
    let logger = Arc::new(Logger::new(sink.clone()));

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let logger = Arc::clone(&logger);
            thread::spawn(move || {
                let _ctx = LoggingContext::open_kv("worker", i, true);
                thread::sleep(Duration::from_millis(10));
                logger.info(format!("from {}", i));
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    for entry in sink.take() {
        let expected: i64 = entry.message["from ".len()..].parse().unwrap();
        assert_eq!(entry.attribute("worker"), Some(&FieldValue::Int(expected)));
    }
    assert!(LoggingContext::thread_attributes().get("worker").is_none());
}

#[test]
fn test_console_sink_end_to_end() {
    let logger = Logger::new(
        ConsoleSink::new()
            .with_colors(false)
            .with_output_format(OutputFormat::Logfmt),
    );

    let _ctx = LoggingContext::open_kv("component", "integration", true);
    assert!(logger.warn("console output"));
    assert!(!logger.debug("below threshold"));
    logger.flush().unwrap();
}
