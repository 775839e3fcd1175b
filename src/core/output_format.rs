//! Output format configuration for the bundled sinks
//!
//! - Text: human-readable line (default)
//! - Json: one JSON object per record
//! - Logfmt: `key=value` pairs for log aggregation tools
//!
//! Attributes are written in key order so output is stable.

use super::attributes::{format_attributes, FieldValue};
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    /// `[2025-01-08T10:30:45.123Z] [INFO ] main - Request processed request_id=R1`
    #[default]
    Text,

    /// `{"timestamp":"2025-01-08T10:30:45.123Z","level":"INFO","message":"Request processed"}`
    Json,

    /// `timestamp=2025-01-08T10:30:45.123Z level=INFO message="Request processed"`
    Logfmt,
}

impl OutputFormat {
    pub fn format(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        match self {
            OutputFormat::Text => format_text(entry, timestamp_format),
            OutputFormat::Json => format_json(entry, timestamp_format),
            OutputFormat::Logfmt => format_logfmt(entry, timestamp_format),
        }
    }
}

/// Escape control characters so one record stays on one line
pub fn sanitize_message(message: &str) -> String {
    message
        .replace('\n', "\\n")
        .replace('\r', "\\r")
        .replace('\t', "\\t")
}

fn format_text(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let thread_name = entry.thread_name.as_ref().unwrap_or(&entry.thread_id);

    let mut line = format!(
        "[{}] [{:5}] {} - {}",
        timestamp_format.format(&entry.timestamp),
        entry.level.to_str(),
        thread_name,
        sanitize_message(&entry.message)
    );

    if let Some(ref error) = entry.error {
        line.push_str(&format!(" error=\"{}\"", sanitize_message(&error.to_string())));
    }
    if !entry.attributes.is_empty() {
        line.push(' ');
        line.push_str(&sanitize_message(&format_attributes(&entry.attributes)));
    }
    line
}

fn format_json(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let mut json_obj = serde_json::Map::new();

    // Attributes first so the fixed fields below win on collision
    for (key, value) in &entry.attributes {
        json_obj.insert(key.clone(), value.to_json_value());
    }

    json_obj.insert(
        "timestamp".to_string(),
        timestamp_format.to_json_value(&entry.timestamp),
    );
    json_obj.insert(
        "level".to_string(),
        serde_json::Value::String(entry.level.to_str().to_string()),
    );
    json_obj.insert(
        "message".to_string(),
        serde_json::Value::String(entry.message.clone()),
    );
    json_obj.insert(
        "thread_id".to_string(),
        serde_json::Value::String(entry.thread_id.clone()),
    );
    if let Some(ref name) = entry.thread_name {
        json_obj.insert(
            "thread_name".to_string(),
            serde_json::Value::String(name.clone()),
        );
    }
    if let Some(ref error) = entry.error {
        json_obj.insert(
            "error".to_string(),
            serde_json::to_value(error).unwrap_or(serde_json::Value::Null),
        );
    }

    serde_json::to_string(&serde_json::Value::Object(json_obj)).unwrap_or_default()
}

fn format_logfmt(entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
    let mut parts = vec![
        format!(
            "timestamp={}",
            escape_logfmt_value(&timestamp_format.format(&entry.timestamp))
        ),
        format!("level={}", entry.level.to_str()),
        format!("message={}", quote_logfmt_value(&entry.message)),
        format!("thread_id={}", escape_logfmt_value(&entry.thread_id)),
    ];

    if let Some(ref name) = entry.thread_name {
        parts.push(format!("thread_name={}", escape_logfmt_value(name)));
    }
    if let Some(ref error) = entry.error {
        parts.push(format!("error={}", quote_logfmt_value(&error.to_string())));
    }

    let mut keys: Vec<&String> = entry.attributes.keys().collect();
    keys.sort();
    for key in keys {
        let formatted_value = match &entry.attributes[key] {
            FieldValue::String(s) => quote_logfmt_value(s),
            other => other.to_string(),
        };
        parts.push(format!("{}={}", escape_logfmt_key(key), formatted_value));
    }

    parts.join(" ")
}

/// Keep only characters valid in a logfmt key
fn escape_logfmt_key(key: &str) -> String {
    key.chars()
        .filter(|c| c.is_alphanumeric() || *c == '_' || *c == '-')
        .collect()
}

/// Quote a logfmt value if it contains spaces, quotes or `=`
fn escape_logfmt_value(value: &str) -> String {
    if value.contains(' ') || value.contains('"') || value.contains('=') {
        quote_logfmt_value(value)
    } else {
        value.to_string()
    }
}

fn quote_logfmt_value(value: &str) -> String {
    let escaped = value.replace('\\', "\\\\").replace('"', "\\\"");
    format!("\"{}\"", sanitize_message(&escaped))
}
