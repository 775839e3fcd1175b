//! Log entry structure

use super::attributes::{AttributeMap, FieldValue};
use super::log_level::LogLevel;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::cell::RefCell;
use std::collections::HashMap;
use std::error::Error;
use std::fmt;

// Thread-local caches for thread information to avoid repeated allocations
thread_local! {
    static THREAD_ID_CACHE: RefCell<Option<String>> = const { RefCell::new(None) };
    static THREAD_NAME_CACHE: RefCell<Option<Option<String>>> = const { RefCell::new(None) };
}

/// Get cached thread ID, computing and caching it on first access
fn get_thread_id() -> String {
    THREAD_ID_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| format!("{:?}", std::thread::current().id()))
            .clone()
    })
}

/// Get cached thread name, computing and caching it on first access
fn get_thread_name() -> Option<String> {
    THREAD_NAME_CACHE.with(|cache| {
        cache
            .borrow_mut()
            .get_or_insert_with(|| std::thread::current().name().map(String::from))
            .clone()
    })
}

/// Captured form of an error attached to a log record
///
/// Holds the error's `Display` text and the `Display` text of each error in
/// its `source()` chain, outermost first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorPayload {
    pub message: String,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub sources: Vec<String>,
}

impl ErrorPayload {
    pub fn from_error(error: &(dyn Error + 'static)) -> Self {
        let mut sources = Vec::new();
        let mut current = error.source();
        while let Some(source) = current {
            sources.push(source.to_string());
            current = source.source();
        }

        Self {
            message: error.to_string(),
            sources,
        }
    }
}

impl fmt::Display for ErrorPayload {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)?;
        for source in &self.sources {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

/// A finished record handed to a [`Sink`](super::Sink)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub level: LogLevel,
    pub message: String,
    pub timestamp: DateTime<Utc>,
    pub thread_id: String,
    pub thread_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<ErrorPayload>,
    pub attributes: AttributeMap,
}

impl LogEntry {
    pub fn new(level: LogLevel, message: String) -> Self {
        Self {
            level,
            message,
            timestamp: Utc::now(),
            thread_id: get_thread_id(),
            thread_name: get_thread_name(),
            error: None,
            attributes: HashMap::new(),
        }
    }

    pub fn with_error(mut self, error: Option<&(dyn Error + 'static)>) -> Self {
        self.error = error.map(ErrorPayload::from_error);
        self
    }

    pub fn with_attributes(mut self, attributes: AttributeMap) -> Self {
        self.attributes = attributes;
        self
    }

    pub fn attribute(&self, key: &str) -> Option<&FieldValue> {
        self.attributes.get(key)
    }

    /// Sequence number assigned by the logger, if present
    pub fn counter(&self) -> Option<u64> {
        self.attributes
            .get(super::logger::LOG_COUNTER_KEY)
            .and_then(FieldValue::as_i64)
            .and_then(|c| u64::try_from(c).ok())
    }
}
