//! Sink trait for log output destinations

use super::{error::Result, log_entry::LogEntry, log_level::LogLevel};

/// Backend that receives finished log records.
///
/// The sink owns level policy, formatting and transport. `emit` may be
/// called concurrently from any thread; implementations that need mutable
/// state guard it themselves.
pub trait Sink: Send + Sync {
    fn is_level_enabled(&self, level: LogLevel) -> bool;
    fn emit(&self, entry: &LogEntry) -> Result<()>;

    fn flush(&self) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str;
}

impl<S: Sink + ?Sized> Sink for std::sync::Arc<S> {
    fn is_level_enabled(&self, level: LogLevel) -> bool {
        (**self).is_level_enabled(level)
    }

    fn emit(&self, entry: &LogEntry) -> Result<()> {
        (**self).emit(entry)
    }

    fn flush(&self) -> Result<()> {
        (**self).flush()
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Sink with every level disabled
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl Sink for NullSink {
    fn is_level_enabled(&self, _level: LogLevel) -> bool {
        false
    }

    fn emit(&self, _entry: &LogEntry) -> Result<()> {
        Ok(())
    }

    fn name(&self) -> &str {
        "null"
    }
}
