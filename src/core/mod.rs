//! Core logger types and traits

pub mod attributes;
pub mod context;
pub mod context_stack;
pub mod error;
pub mod global;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod metrics;
pub mod output_format;
pub mod sink;
pub mod timestamp;

pub use attributes::{
    app_attributes, attributes, format_attributes, AppAttributes, AttributeMap, FieldValue,
};
#[cfg(feature = "task-local")]
pub use context::with_task_context;
pub use context::LoggingContext;
pub use context_stack::{ContextId, ContextStack};
pub use error::{LoggerError, Result};
pub use log_entry::{ErrorPayload, LogEntry};
pub use log_level::LogLevel;
pub use logger::{FailureCallback, Logger, LoggerBuilder, LOG_COUNTER_KEY};
pub use metrics::LoggerMetrics;
pub use output_format::OutputFormat;
pub use sink::{NullSink, Sink};
pub use timestamp::TimestampFormat;
