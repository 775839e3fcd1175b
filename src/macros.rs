//! Logging macros for ergonomic log message formatting.
//!
//! The level macros format their message like `format!` and forward to
//! [`Logger::log`](crate::Logger::log). An optional `{ key => value, .. }`
//! block before the message attaches call-site attributes.
//!
//! # Examples
//!
//! ```
//! use rust_context_logger::prelude::*;
//! use rust_context_logger::{context, info};
//!
//! let logger = Logger::new(MemorySink::default());
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! info!(logger, { "port" => port }, "Server listening on port {}", port);
//!
//! let _request = context!(auto_complete: true; "request_id" => "R1");
//! info!(logger, "Handling request");
//! ```

/// Log a message at the given level.
///
/// Evaluates to `true` if the record reached the sink.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::default());
/// use rust_context_logger::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, { "code" => 500 }, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, { $($key:expr => $value:expr),* $(,)? }, $($arg:tt)+) => {
        $logger.log_with(
            format!($($arg)+),
            $level,
            $crate::core::attributes([$(($key, $crate::FieldValue::from($value))),*]),
        )
    };
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log(format!($($arg)+), $level)
    };
}

/// Log an error-level message.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::default());
/// use rust_context_logger::error;
/// error!(logger, "Failed to connect to database");
/// error!(logger, { "db" => "orders" }, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::default());
/// use rust_context_logger::warn;
/// warn!(logger, "Retry attempt {} of {}", 3, 5);
/// ```
#[macro_export]
macro_rules! warn {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warn, $($arg)+)
    };
}

/// Log an info-level message.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::default());
/// use rust_context_logger::info;
/// info!(logger, "Processing {} items", 100);
/// ```
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a debug-level message.
///
/// # Examples
///
/// ```
/// # use rust_context_logger::prelude::*;
/// # let logger = Logger::new(MemorySink::default());
/// use rust_context_logger::debug;
/// debug!(logger, "Counter value: {}", 10);
/// ```
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Open a [`LoggingContext`](crate::LoggingContext) from `key => value` pairs.
///
/// Without a prefix the context is not auto-completing, the same default as
/// [`LoggingContext::open`](crate::LoggingContext::open).
///
/// ```
/// use rust_context_logger::{context, LoggingContext};
///
/// {
///     let _ctx = context!(auto_complete: true; "tenant" => "acme", "shard" => 3);
///     assert_eq!(LoggingContext::thread_attributes().len(), 2);
/// }
/// assert!(LoggingContext::thread_attributes().is_empty());
/// ```
#[macro_export]
macro_rules! context {
    (auto_complete: $auto:expr) => {
        $crate::LoggingContext::open_empty($auto)
    };
    (auto_complete: $auto:expr; $($key:expr => $value:expr),+ $(,)?) => {
        $crate::LoggingContext::open([$(($key, $crate::FieldValue::from($value))),+], $auto)
    };
    () => {
        $crate::LoggingContext::open_empty(false)
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        $crate::context!(auto_complete: false; $($key => $value),+)
    };
}
