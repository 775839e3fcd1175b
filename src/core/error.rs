//! Error types for the logger system
//!
//! Errors never escape a logging call: sinks report them to the [`Logger`],
//! which records them in its metrics and turns them into a `false` return.
//!
//! [`Logger`]: crate::core::Logger

pub type Result<T> = std::result::Result<T, LoggerError>;

#[derive(Debug, thiserror::Error)]
pub enum LoggerError {
    /// IO error with context
    #[error("IO error while {operation}: {message}")]
    IoOperation {
        operation: String,
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Generic IO error
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    /// Sink queue full with buffer details
    #[error("Sink queue full: {current}/{max} entries buffered")]
    QueueFull { current: usize, max: usize },

    /// Sink already stopped
    #[error("Sink '{name}' already stopped")]
    SinkStopped { name: String },

    /// Sink rejected or failed to write an entry
    #[error("Sink '{name}' failed: {message}")]
    SinkFailure { name: String, message: String },

    /// Invalid configuration with details
    #[error("Invalid configuration for {component}: {message}")]
    InvalidConfiguration { component: String, message: String },
}

impl LoggerError {
    /// Create an IO operation error with context
    pub fn io_operation(
        operation: impl Into<String>,
        message: impl Into<String>,
        source: std::io::Error,
    ) -> Self {
        LoggerError::IoOperation {
            operation: operation.into(),
            message: message.into(),
            source,
        }
    }

    /// Create a queue full error with buffer details
    pub fn queue_full(current: usize, max: usize) -> Self {
        LoggerError::QueueFull { current, max }
    }

    /// Create a stopped-sink error
    pub fn sink_stopped(name: impl Into<String>) -> Self {
        LoggerError::SinkStopped { name: name.into() }
    }

    /// Create a sink failure error
    pub fn sink(name: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::SinkFailure {
            name: name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid configuration error
    pub fn config(component: impl Into<String>, message: impl Into<String>) -> Self {
        LoggerError::InvalidConfiguration {
            component: component.into(),
            message: message.into(),
        }
    }
}
