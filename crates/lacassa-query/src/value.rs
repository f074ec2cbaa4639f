//! Scalar values bound to statements or embedded in collection literals.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// A tagged scalar understood by the store.
///
/// Only [`Value::Text`] is textual; every other variant renders as a bare
/// literal when embedded in a collection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Text(String),
    Int(i64),
    Boolean(bool),
    Timestamp(DateTime<Utc>),
    Uuid(Uuid),
    Decimal(Decimal),
}

impl Value {
    /// Whether this value is quoted when rendered as a literal
    pub fn is_textual(&self) -> bool {
        match self {
            Value::Text(_) => true,
            Value::Int(_)
            | Value::Boolean(_)
            | Value::Timestamp(_)
            | Value::Uuid(_)
            | Value::Decimal(_) => false,
        }
    }

    /// Short name of the variant, used in diagnostics
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Text(_) => "text",
            Value::Int(_) => "int",
            Value::Boolean(_) => "boolean",
            Value::Timestamp(_) => "timestamp",
            Value::Uuid(_) => "uuid",
            Value::Decimal(_) => "decimal",
        }
    }

    /// Render as a CQL literal.
    ///
    /// Text is single-quoted with embedded quotes doubled. Timestamps render
    /// as milliseconds since the Unix epoch.
    pub fn to_cql_literal(&self) -> String {
        match self {
            Value::Text(s) => format!("'{}'", s.replace('\'', "''")),
            Value::Int(i) => i.to_string(),
            Value::Boolean(b) => b.to_string(),
            Value::Timestamp(ts) => ts.timestamp_millis().to_string(),
            Value::Uuid(id) => id.hyphenated().to_string(),
            Value::Decimal(d) => d.to_string(),
        }
    }

    /// Borrow the text payload, if any
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(s) => Some(s),
            _ => None,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_cql_literal())
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Int(value)
    }
}

impl From<u32> for Value {
    fn from(value: u32) -> Self {
        Value::Int(i64::from(value))
    }
}

impl From<bool> for Value {
    fn from(value: bool) -> Self {
        Value::Boolean(value)
    }
}

impl From<DateTime<Utc>> for Value {
    fn from(value: DateTime<Utc>) -> Self {
        Value::Timestamp(value)
    }
}

impl From<Uuid> for Value {
    fn from(value: Uuid) -> Self {
        Value::Uuid(value)
    }
}

impl From<Decimal> for Value {
    fn from(value: Decimal) -> Self {
        Value::Decimal(value)
    }
}
