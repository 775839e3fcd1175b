//! Attribute values and the process-wide attribute layer
//!
//! This module provides:
//! - `FieldValue`: a single attribute value
//! - `AttributeMap`: the key/value mapping merged into every record
//! - `AppAttributes`: process-wide attributes shared by all threads

use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Mapping from attribute key to value
pub type AttributeMap = HashMap<String, FieldValue>;

/// Value type for structured logging attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FieldValue {
    String(String),
    Int(i64),
    Float(f64),
    Bool(bool),
    Null,
}

impl fmt::Display for FieldValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FieldValue::String(s) => write!(f, "{}", s),
            FieldValue::Int(i) => write!(f, "{}", i),
            FieldValue::Float(fl) => write!(f, "{}", fl),
            FieldValue::Bool(b) => write!(f, "{}", b),
            FieldValue::Null => write!(f, "null"),
        }
    }
}

impl FieldValue {
    /// Convert to serde_json::Value for JSON serialization
    #[must_use]
    pub fn to_json_value(&self) -> serde_json::Value {
        match self {
            FieldValue::String(s) => serde_json::Value::String(s.clone()),
            FieldValue::Int(i) => serde_json::Value::Number((*i).into()),
            FieldValue::Float(f) => serde_json::Number::from_f64(*f)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            FieldValue::Bool(b) => serde_json::Value::Bool(*b),
            FieldValue::Null => serde_json::Value::Null,
        }
    }

    /// Borrow the value as a string slice if it is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get the value as an integer if it is one
    pub fn as_i64(&self) -> Option<i64> {
        match self {
            FieldValue::Int(i) => Some(*i),
            _ => None,
        }
    }
}

impl From<String> for FieldValue {
    fn from(s: String) -> Self {
        FieldValue::String(s)
    }
}

impl From<&str> for FieldValue {
    fn from(s: &str) -> Self {
        FieldValue::String(s.to_string())
    }
}

impl From<&String> for FieldValue {
    fn from(s: &String) -> Self {
        FieldValue::String(s.clone())
    }
}

impl From<i64> for FieldValue {
    fn from(i: i64) -> Self {
        FieldValue::Int(i)
    }
}

impl From<i32> for FieldValue {
    fn from(i: i32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<u32> for FieldValue {
    fn from(i: u32) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<usize> for FieldValue {
    fn from(i: usize) -> Self {
        FieldValue::Int(i as i64)
    }
}

impl From<f64> for FieldValue {
    fn from(f: f64) -> Self {
        FieldValue::Float(f)
    }
}

impl From<bool> for FieldValue {
    fn from(b: bool) -> Self {
        FieldValue::Bool(b)
    }
}

impl<T: Into<FieldValue>> From<Option<T>> for FieldValue {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(FieldValue::Null)
    }
}

/// Build an [`AttributeMap`] from any iterator of key/value pairs
pub fn attributes<I, K, V>(pairs: I) -> AttributeMap
where
    I: IntoIterator<Item = (K, V)>,
    K: Into<String>,
    V: Into<FieldValue>,
{
    pairs
        .into_iter()
        .map(|(k, v)| (k.into(), v.into()))
        .collect()
}

/// Format attributes as space-separated `key=value` pairs, sorted by key
pub fn format_attributes(attributes: &AttributeMap) -> String {
    let mut keys: Vec<&String> = attributes.keys().collect();
    keys.sort();
    keys.into_iter()
        .map(|k| format!("{}={}", k, attributes[k]))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Process-wide attributes merged into every log record
///
/// `AppAttributes` holds fields such as service name, version or
/// environment. Concurrent writers to the same key are last-write-wins.
///
/// Thread-safe: a single `RwLock` guards every mutation.
///
/// # Example
///
/// ```
/// use rust_context_logger::core::AppAttributes;
///
/// let attrs = AppAttributes::new();
/// attrs.set("service", "api-gateway");
/// attrs.set("version", "1.2.3");
///
/// assert_eq!(attrs.snapshot().len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct AppAttributes {
    fields: RwLock<AttributeMap>,
}

impl AppAttributes {
    pub fn new() -> Self {
        Self {
            fields: RwLock::new(HashMap::new()),
        }
    }

    /// Set an attribute, overwriting any previous value
    pub fn set<K, V>(&self, key: K, value: V)
    where
        K: Into<String>,
        V: Into<FieldValue>,
    {
        self.fields.write().insert(key.into(), value.into());
    }

    /// Remove an attribute, returning its previous value
    pub fn remove(&self, key: &str) -> Option<FieldValue> {
        self.fields.write().remove(key)
    }

    pub fn clear(&self) {
        self.fields.write().clear();
    }

    pub fn get(&self, key: &str) -> Option<FieldValue> {
        self.fields.read().get(key).cloned()
    }

    /// Get a clone of all attributes
    pub fn snapshot(&self) -> AttributeMap {
        self.fields.read().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.read().is_empty()
    }

    pub fn len(&self) -> usize {
        self.fields.read().len()
    }

    /// Copy every attribute into `target`, overwriting keys already present
    pub(crate) fn extend_into(&self, target: &mut AttributeMap) {
        let fields = self.fields.read();
        for (key, value) in fields.iter() {
            target.insert(key.clone(), value.clone());
        }
    }
}

static APP_ATTRIBUTES: OnceLock<AppAttributes> = OnceLock::new();

/// The process-wide attribute layer, created on first access
pub fn app_attributes() -> &'static AppAttributes {
    APP_ATTRIBUTES.get_or_init(AppAttributes::new)
}
