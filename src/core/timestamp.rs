//! Timestamp formats used by the bundled sinks

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimestampFormat {
    /// `2025-01-08T10:30:45.123Z`
    #[default]
    Iso8601,

    /// `2025-01-08T10:30:45.123456Z`
    Iso8601Micros,

    /// `1736332245123`
    UnixMillis,

    /// Any strftime-compatible format string
    Custom(String),
}

impl TimestampFormat {
    #[must_use]
    pub fn format(&self, datetime: &DateTime<Utc>) -> String {
        match self {
            TimestampFormat::Iso8601 => datetime.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string(),
            TimestampFormat::Iso8601Micros => datetime.format("%Y-%m-%dT%H:%M:%S%.6fZ").to_string(),
            TimestampFormat::UnixMillis => datetime.timestamp_millis().to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }

    /// JSON form: a number for numeric formats, a string otherwise
    #[must_use]
    pub fn to_json_value(&self, datetime: &DateTime<Utc>) -> serde_json::Value {
        match self {
            TimestampFormat::UnixMillis => {
                serde_json::Value::Number(datetime.timestamp_millis().into())
            }
            _ => serde_json::Value::String(self.format(datetime)),
        }
    }
}
