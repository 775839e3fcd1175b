//! Main logger implementation

use super::{
    attributes::{app_attributes, AttributeMap, FieldValue},
    context::with_current_stack,
    error::Result,
    log_entry::LogEntry,
    log_level::LogLevel,
    metrics::LoggerMetrics,
    sink::{NullSink, Sink},
};
use std::any::Any;
use std::error::Error;
use std::panic::{catch_unwind, AssertUnwindSafe};
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Reserved attribute key carrying the per-record sequence number
pub const LOG_COUNTER_KEY: &str = "logcounter";

/// Failures between console alerts
const ALERT_INTERVAL: u64 = 1000;

/// One sequence for every logger in the process
static LOG_COUNTER: AtomicU64 = AtomicU64::new(0);

fn next_counter() -> u64 {
    LOG_COUNTER.fetch_add(1, Ordering::SeqCst) + 1
}

/// Callback invoked when records are lost
///
/// The parameter is the total count of failed records so far.
pub type FailureCallback = Arc<dyn Fn(u64) + Send + Sync>;

/// Merge-and-dispatch façade in front of a [`Sink`]
///
/// Every record receives, in increasing priority: the process-wide
/// attributes, the attributes of the contexts open on the calling thread,
/// and the attributes passed to the call. A process-wide counter is added
/// under [`LOG_COUNTER_KEY`].
///
/// Logging never fails the caller: a disabled level, a sink error or a
/// panic inside the sink all come back as `false`.
///
/// # Example
///
/// ```
/// use rust_context_logger::prelude::*;
///
/// let sink = MemorySink::new(LogLevel::Debug);
/// let logger = Logger::new(sink.clone());
///
/// let _ctx = LoggingContext::open_kv("request_id", "R1", true);
/// assert!(logger.log("start", LogLevel::Info));
///
/// let entry = &sink.entries()[0];
/// assert_eq!(entry.attribute("request_id"), Some(&FieldValue::from("R1")));
/// assert!(entry.counter().is_some());
/// ```
pub struct Logger {
    sink: Box<dyn Sink>,
    /// Metrics for observability (emitted, filtered, failed)
    metrics: Arc<LoggerMetrics>,
    /// Optional callback for failure notifications
    on_failure: Option<FailureCallback>,
}

impl Logger {
    #[must_use]
    pub fn new<S: Sink + 'static>(sink: S) -> Self {
        Self::from_parts(Box::new(sink), None)
    }

    /// A logger that discards everything
    #[must_use]
    pub fn null() -> Self {
        Self::new(NullSink)
    }

    fn from_parts(sink: Box<dyn Sink>, on_failure: Option<FailureCallback>) -> Self {
        Self {
            sink,
            metrics: Arc::new(LoggerMetrics::new()),
            on_failure,
        }
    }

    /// Create a builder for Logger
    #[must_use]
    pub fn builder() -> LoggerBuilder {
        LoggerBuilder::new()
    }

    pub fn log(&self, message: impl Into<String>, level: LogLevel) -> bool {
        self.dispatch(message, None, level, None)
    }

    pub fn log_with(
        &self,
        message: impl Into<String>,
        level: LogLevel,
        attributes: AttributeMap,
    ) -> bool {
        self.dispatch(message, None, level, Some(attributes))
    }

    pub fn log_error(
        &self,
        message: impl Into<String>,
        error: &(dyn Error + 'static),
        level: LogLevel,
    ) -> bool {
        self.dispatch(message, Some(error), level, None)
    }

    pub fn log_error_with(
        &self,
        message: impl Into<String>,
        error: &(dyn Error + 'static),
        level: LogLevel,
        attributes: AttributeMap,
    ) -> bool {
        self.dispatch(message, Some(error), level, Some(attributes))
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) -> bool {
        self.log(message, LogLevel::Error)
    }

    #[inline]
    pub fn warn(&self, message: impl Into<String>) -> bool {
        self.log(message, LogLevel::Warn)
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) -> bool {
        self.log(message, LogLevel::Info)
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) -> bool {
        self.log(message, LogLevel::Debug)
    }

    /// Whether the sink currently accepts `level`
    pub fn is_level_enabled(&self, level: LogLevel) -> bool {
        catch_unwind(AssertUnwindSafe(|| self.sink.is_level_enabled(level))).unwrap_or(false)
    }

    /// Get the logger metrics for detailed observability
    pub fn metrics(&self) -> &LoggerMetrics {
        &self.metrics
    }

    pub fn flush(&self) -> Result<()> {
        self.sink.flush()
    }

    fn dispatch(
        &self,
        message: impl Into<String>,
        error: Option<&(dyn Error + 'static)>,
        level: LogLevel,
        attributes: Option<AttributeMap>,
    ) -> bool {
        match catch_unwind(AssertUnwindSafe(|| self.sink.is_level_enabled(level))) {
            Ok(true) => {}
            Ok(false) => {
                self.metrics.record_filtered();
                return false;
            }
            Err(panic_info) => {
                self.report_failure(&format!(
                    "Sink '{}' panicked in level check: {}",
                    self.sink.name(),
                    panic_message(&*panic_info)
                ));
                return false;
            }
        }

        // Per-call panic isolation: nothing raised while merging or emitting
        // reaches the caller
        let outcome = catch_unwind(AssertUnwindSafe(|| {
            let entry = LogEntry::new(level, message.into())
                .with_error(error)
                .with_attributes(Self::merge_attributes(attributes));
            self.sink.emit(&entry)
        }));

        match outcome {
            Ok(Ok(())) => {
                self.metrics.record_emitted();
                true
            }
            Ok(Err(e)) => {
                self.report_failure(&format!("Sink '{}' failed: {}", self.sink.name(), e));
                false
            }
            Err(panic_info) => {
                self.report_failure(&format!(
                    "Sink '{}' panicked: {}",
                    self.sink.name(),
                    panic_message(&*panic_info)
                ));
                false
            }
        }
    }

    /// Layer app, thread and call attributes, then stamp the counter
    fn merge_attributes(call: Option<AttributeMap>) -> AttributeMap {
        let mut merged = AttributeMap::new();
        app_attributes().extend_into(&mut merged);

        with_current_stack(|stack| {
            for (key, value) in stack.attributes() {
                merged.insert(key.clone(), value.clone());
            }
        });

        if let Some(call) = call {
            merged.extend(call);
        }

        let counter = i64::try_from(next_counter()).unwrap_or(i64::MAX);
        merged.insert(LOG_COUNTER_KEY.to_string(), FieldValue::Int(counter));
        merged
    }

    /// Count a lost record and alert on the first and every 1000th
    fn report_failure(&self, reason: &str) {
        let failed = self.metrics.record_failed();

        if failed == 0 || (failed + 1) % ALERT_INTERVAL == 0 {
            eprintln!(
                "[LOGGER ERROR] {}. {} records lost so far.",
                reason,
                failed + 1
            );

            if let Some(ref callback) = self.on_failure {
                callback(failed + 1);
            }
        }
    }
}

fn panic_message(panic_info: &(dyn Any + Send)) -> String {
    if let Some(s) = panic_info.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = panic_info.downcast_ref::<String>() {
        s.clone()
    } else {
        "Unknown panic".to_string()
    }
}

impl Default for Logger {
    fn default() -> Self {
        Self::null()
    }
}

impl Drop for Logger {
    fn drop(&mut self) {
        if let Err(e) = self.sink.flush() {
            eprintln!("[LOGGER ERROR] Failed to flush during shutdown: {}", e);
        }

        let failed = self.metrics.failed_count();
        if failed > 0 {
            eprintln!(
                "[LOGGER WARNING] Logger shutting down with {} lost records (failure rate: {:.2}%)",
                failed,
                self.metrics.failure_rate()
            );
        }
    }
}

/// Builder for constructing Logger with a fluent API
///
/// # Example
/// ```
/// use rust_context_logger::prelude::*;
/// use std::sync::Arc;
///
/// let logger = Logger::builder()
///     .sink(ConsoleSink::new().with_max_level(LogLevel::Debug))
///     .on_failure(Arc::new(|count| {
///         eprintln!("ALERT: {} records lost", count);
///     }))
///     .build();
/// ```
pub struct LoggerBuilder {
    sink: Option<Box<dyn Sink>>,
    on_failure: Option<FailureCallback>,
}

impl LoggerBuilder {
    /// Create a new builder with default values
    pub fn new() -> Self {
        Self {
            sink: None,
            on_failure: None,
        }
    }

    /// Set the sink; without one the logger discards everything
    #[must_use = "builder methods return a new value"]
    pub fn sink<S: Sink + 'static>(mut self, sink: S) -> Self {
        self.sink = Some(Box::new(sink));
        self
    }

    /// Set a callback for failure notifications
    ///
    /// Invoked together with the console alert: on the first lost record and
    /// on every 1000th after it.
    #[must_use = "builder methods return a new value"]
    pub fn on_failure(mut self, callback: FailureCallback) -> Self {
        self.on_failure = Some(callback);
        self
    }

    /// Build the Logger
    pub fn build(self) -> Logger {
        let sink = self.sink.unwrap_or_else(|| Box::new(NullSink));
        Logger::from_parts(sink, self.on_failure)
    }
}

impl Default for LoggerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{LoggerError, LoggingContext};
    use crate::sinks::MemorySink;
    use parking_lot::Mutex;
    use std::sync::atomic::AtomicUsize;

    struct FailingSink;

    impl Sink for FailingSink {
        fn is_level_enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn emit(&self, _entry: &LogEntry) -> Result<()> {
            Err(LoggerError::sink("failing", "Simulated failure"))
        }

        fn name(&self) -> &str {
            "failing"
        }
    }

    struct PanickingSink;

    impl Sink for PanickingSink {
        fn is_level_enabled(&self, _level: LogLevel) -> bool {
            true
        }

        fn emit(&self, _entry: &LogEntry) -> Result<()> {
            panic!("sink exploded");
        }

        fn name(&self) -> &str {
            "panicking"
        }
    }

    /// Counts level checks and records whether emit ran
    struct ProbeSink {
        checks: AtomicUsize,
        emitted: Mutex<Vec<String>>,
    }

    impl Sink for ProbeSink {
        fn is_level_enabled(&self, level: LogLevel) -> bool {
            self.checks.fetch_add(1, Ordering::Relaxed);
            level <= LogLevel::Warn
        }

        fn emit(&self, entry: &LogEntry) -> Result<()> {
            self.emitted.lock().push(entry.message.clone());
            Ok(())
        }

        fn name(&self) -> &str {
            "probe"
        }
    }

    #[test]
    fn test_builder_default_discards() {
        let logger = Logger::builder().build();
        assert!(!logger.info("dropped"));
        assert_eq!(logger.metrics().filtered_count(), 1);
    }

    #[test]
    fn test_disabled_level_short_circuits() {
        let probe = Arc::new(ProbeSink {
            checks: AtomicUsize::new(0),
            emitted: Mutex::new(Vec::new()),
        });
        let logger = Logger::new(Arc::clone(&probe));

        assert!(!logger.debug("too verbose"));
        assert!(logger.warn("kept"));

        assert_eq!(probe.checks.load(Ordering::Relaxed), 2);
        assert_eq!(*probe.emitted.lock(), vec!["kept".to_string()]);
        assert_eq!(logger.metrics().filtered_count(), 1);
        assert_eq!(logger.metrics().emitted_count(), 1);
    }

    #[test]
    fn test_sink_error_returns_false() {
        let logger = Logger::new(FailingSink);
        for _ in 0..5 {
            assert!(!logger.info("Test message"));
        }
        assert_eq!(logger.metrics().failed_count(), 5);
    }

    #[test]
    fn test_sink_panic_is_swallowed() {
        let logger = Logger::new(PanickingSink);
        assert!(!logger.error("boom"));
        assert_eq!(logger.metrics().failed_count(), 1);
    }

    #[test]
    fn test_failure_callback_on_first_failure() {
        let calls = Arc::new(AtomicUsize::new(0));
        let calls_clone = Arc::clone(&calls);

        let logger = Logger::builder()
            .sink(FailingSink)
            .on_failure(Arc::new(move |_count| {
                calls_clone.fetch_add(1, Ordering::Relaxed);
            }))
            .build();

        for _ in 0..10 {
            logger.info("lost");
        }
        assert_eq!(calls.load(Ordering::Relaxed), 1);
    }

    #[test]
    fn test_merge_priority() {
        let sink = MemorySink::new(LogLevel::Debug);
        let logger = Logger::new(sink.clone());

        app_attributes().set("merge_priority_app_only", "app");
        app_attributes().set("merge_priority_shared", "app");

        let _ctx = LoggingContext::open(
            [("merge_priority_shared", "thread"), ("merge_priority_thread", "thread")],
            true,
        );

        let call = crate::core::attributes([("merge_priority_thread", "call")]);
        assert!(logger.log_with("merged", LogLevel::Info, call));

        let entry = sink.take().remove(0);
        assert_eq!(entry.attribute("merge_priority_app_only"), Some(&FieldValue::from("app")));
        assert_eq!(entry.attribute("merge_priority_shared"), Some(&FieldValue::from("thread")));
        assert_eq!(entry.attribute("merge_priority_thread"), Some(&FieldValue::from("call")));

        app_attributes().remove("merge_priority_app_only");
        app_attributes().remove("merge_priority_shared");
    }

    #[test]
    fn test_counter_overrides_call_attribute() {
        let sink = MemorySink::new(LogLevel::Debug);
        let logger = Logger::new(sink.clone());

        let call = crate::core::attributes([(LOG_COUNTER_KEY, "spoofed")]);
        logger.log_with("counter", LogLevel::Info, call);

        assert!(sink.take()[0].counter().is_some());
    }

    #[test]
    fn test_log_error_attaches_payload() {
        let sink = MemorySink::new(LogLevel::Debug);
        let logger = Logger::new(sink.clone());

        let err = std::io::Error::new(std::io::ErrorKind::TimedOut, "upstream timed out");
        assert!(logger.log_error("request failed", &err, LogLevel::Error));

        let entry = sink.take().remove(0);
        assert_eq!(entry.error.map(|e| e.message), Some("upstream timed out".to_string()));
    }
}
