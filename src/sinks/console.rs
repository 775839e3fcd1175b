//! Console sink implementation

use crate::core::{LogEntry, LogLevel, LoggerError, OutputFormat, Result, Sink, TimestampFormat};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;

pub struct ConsoleSink {
    max_level: LogLevel,
    use_colors: bool,
    timestamp_format: TimestampFormat,
    output_format: OutputFormat,
}

impl ConsoleSink {
    pub fn new() -> Self {
        Self {
            max_level: LogLevel::Info,
            use_colors: cfg!(feature = "console"),
            timestamp_format: TimestampFormat::default(),
            output_format: OutputFormat::default(),
        }
    }

    /// Enable every level up to and including `level`
    #[must_use]
    pub fn with_max_level(mut self, level: LogLevel) -> Self {
        self.max_level = level;
        self
    }

    /// Colors apply to text output only, and need the `console` feature
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    /// Set the output format for this sink
    ///
    /// # Example
    ///
    /// ```
    /// use rust_context_logger::sinks::ConsoleSink;
    /// use rust_context_logger::OutputFormat;
    ///
    /// let sink = ConsoleSink::new().with_output_format(OutputFormat::Json);
    /// ```
    #[must_use]
    pub fn with_output_format(mut self, format: OutputFormat) -> Self {
        self.output_format = format;
        self
    }

    #[must_use]
    pub fn with_timestamp_format(mut self, format: TimestampFormat) -> Self {
        self.timestamp_format = format;
        self
    }

    /// Render one record as it would be printed
    pub fn render(&self, entry: &LogEntry) -> String {
        let line = self.output_format.format(entry, &self.timestamp_format);
        if self.output_format == OutputFormat::Text && self.use_colors {
            self.colorize_level(entry.level, line)
        } else {
            line
        }
    }

    #[cfg(feature = "console")]
    fn colorize_level(&self, level: LogLevel, line: String) -> String {
        let plain = format!("[{:5}]", level.to_str());
        let colored = format!("[{}]", format!("{:5}", level.to_str()).color(level.color_code()));
        line.replacen(&plain, &colored, 1)
    }

    #[cfg(not(feature = "console"))]
    fn colorize_level(&self, _level: LogLevel, line: String) -> String {
        line
    }
}

impl Default for ConsoleSink {
    fn default() -> Self {
        Self::new()
    }
}

impl Sink for ConsoleSink {
    fn is_level_enabled(&self, level: LogLevel) -> bool {
        level <= self.max_level
    }

    fn emit(&self, entry: &LogEntry) -> Result<()> {
        let output = self.render(entry);

        // Route Error to stderr, others to stdout
        let written = match entry.level {
            LogLevel::Error => writeln!(std::io::stderr().lock(), "{}", output),
            _ => writeln!(std::io::stdout().lock(), "{}", output),
        };
        written.map_err(|e| LoggerError::io_operation("writing to console", "console sink", e))
    }

    fn flush(&self) -> Result<()> {
        // Flush both stdout and stderr since we write to both
        std::io::stdout().flush()?;
        std::io::stderr().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "console"
    }
}
