//! Process-wide logger
//!
//! [`init`] installs a logger once; the free functions route through it.
//! Before installation they use a logger with every level disabled and
//! return `false`.

use super::{
    attributes::AttributeMap,
    error::{LoggerError, Result},
    log_level::LogLevel,
    logger::Logger,
};
use std::error::Error;
use std::sync::OnceLock;

static GLOBAL_LOGGER: OnceLock<Logger> = OnceLock::new();
static FALLBACK_LOGGER: OnceLock<Logger> = OnceLock::new();

/// Install the process-wide logger.
///
/// Fails if a logger is already installed; the existing one stays in place.
pub fn init(logger: Logger) -> Result<()> {
    GLOBAL_LOGGER
        .set(logger)
        .map_err(|_| LoggerError::config("global logger", "a logger is already installed"))
}

/// The installed logger, or the discarding fallback
pub fn global() -> &'static Logger {
    GLOBAL_LOGGER
        .get()
        .unwrap_or_else(|| FALLBACK_LOGGER.get_or_init(Logger::null))
}

pub fn is_initialized() -> bool {
    GLOBAL_LOGGER.get().is_some()
}

pub fn log(message: impl Into<String>, level: LogLevel) -> bool {
    global().log(message, level)
}

pub fn log_with(message: impl Into<String>, level: LogLevel, attributes: AttributeMap) -> bool {
    global().log_with(message, level, attributes)
}

pub fn log_error(message: impl Into<String>, error: &(dyn Error + 'static), level: LogLevel) -> bool {
    global().log_error(message, error, level)
}

pub fn log_error_with(
    message: impl Into<String>,
    error: &(dyn Error + 'static),
    level: LogLevel,
    attributes: AttributeMap,
) -> bool {
    global().log_error_with(message, error, level, attributes)
}
