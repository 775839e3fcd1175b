//! In-memory sink
//!
//! Captures finished records instead of writing them anywhere. Useful for
//! tests that assert on the attributes a record carried, and for inspecting
//! output where stdout is unavailable.

use crate::core::{LogEntry, LogLevel, Result, Sink};
use parking_lot::Mutex;
use std::sync::Arc;

/// Sink storing every record at or below a maximum level
///
/// Cloning yields another handle to the same buffer, so a clone can be
/// moved into a [`Logger`](crate::core::Logger) while the test keeps one to
/// read from.
///
/// # Example
///
/// ```
/// use rust_context_logger::prelude::*;
///
/// let sink = MemorySink::new(LogLevel::Info);
/// let logger = Logger::new(sink.clone());
///
/// logger.info("kept");
/// logger.debug("filtered");
///
/// assert_eq!(sink.messages(), vec!["kept".to_string()]);
/// ```
#[derive(Debug, Clone)]
pub struct MemorySink {
    max_level: LogLevel,
    entries: Arc<Mutex<Vec<LogEntry>>>,
}

impl MemorySink {
    pub fn new(max_level: LogLevel) -> Self {
        Self {
            max_level,
            entries: Arc::new(Mutex::new(Vec::new())),
        }
    }

    pub fn max_level(&self) -> LogLevel {
        self.max_level
    }

    /// Copy of every captured entry, in emission order
    pub fn entries(&self) -> Vec<LogEntry> {
        self.entries.lock().clone()
    }

    /// Remove and return every captured entry
    pub fn take(&self) -> Vec<LogEntry> {
        std::mem::take(&mut *self.entries.lock())
    }

    pub fn messages(&self) -> Vec<String> {
        self.entries
            .lock()
            .iter()
            .map(|entry| entry.message.clone())
            .collect()
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new(LogLevel::Debug)
    }
}

impl Sink for MemorySink {
    fn is_level_enabled(&self, level: LogLevel) -> bool {
        level <= self.max_level
    }

    fn emit(&self, entry: &LogEntry) -> Result<()> {
        self.entries.lock().push(entry.clone());
        Ok(())
    }

    fn name(&self) -> &str {
        "memory"
    }
}
