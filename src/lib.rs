//! # Rust Context Logger
//!
//! A structured-logging façade with nestable, per-thread logging contexts.
//!
//! ## Features
//!
//! - **Scoped Contexts**: Attributes opened in a [`LoggingContext`] are attached
//!   to every record logged on the same thread until the context closes
//! - **Shadowing**: Inner contexts may override outer keys; closing them restores
//!   the outer values
//! - **Never Fails the Caller**: Sink errors and panics come back as `false`
//! - **Pluggable Sinks**: Console, in-memory and background-thread sinks, or your own
//!
//! ## Example
//!
//! ```
//! use rust_context_logger::prelude::*;
//!
//! let sink = MemorySink::new(LogLevel::Info);
//! let logger = Logger::new(sink.clone());
//!
//! {
//!     let _request = LoggingContext::open_kv("request_id", "R1", true);
//!     logger.info("handling request");
//! }
//! logger.info("idle");
//!
//! let entries = sink.entries();
//! assert!(entries[0].attribute("request_id").is_some());
//! assert!(entries[1].attribute("request_id").is_none());
//! ```

pub mod core;
pub mod macros;
pub mod sinks;

pub mod prelude {
    pub use crate::core::{
        app_attributes, attributes, AttributeMap, ErrorPayload, FieldValue, LogEntry, LogLevel,
        Logger, LoggerBuilder, LoggerError, LoggerMetrics, LoggingContext, OutputFormat, Result,
        TimestampFormat, LOG_COUNTER_KEY,
    };
    pub use crate::sinks::{AsyncSink, ConsoleSink, MemorySink, NullSink, Sink};
}

pub use core::global::{global, init, is_initialized, log, log_error, log_error_with, log_with};
#[cfg(feature = "task-local")]
pub use core::with_task_context;
pub use core::{
    app_attributes, attributes, AttributeMap, ErrorPayload, FieldValue, LogEntry, LogLevel, Logger,
    LoggerBuilder, LoggerError, LoggerMetrics, LoggingContext, OutputFormat, Result, Sink,
    TimestampFormat, LOG_COUNTER_KEY,
};
pub use sinks::{AsyncSink, ConsoleSink, MemorySink, NullSink};
