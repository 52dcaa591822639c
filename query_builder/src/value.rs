//! Typed query arguments
//!
//! The caller picks the PostgreSQL type of every bound value. Strings are
//! always text; a UUID or timestamp must be passed as one.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use uuid::Uuid;

/// A positional argument and the type it is bound as
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum SqlValue {
    Text(String),
    Integer(i32),
    BigInt(i64),
    Float(f64),
    Boolean(bool),
    Uuid(Uuid),
    Timestamp(DateTime<Utc>),
    Json(Value),
    Null,
}

impl SqlValue {
    /// Map a JSON value by shape: strings stay text, integers pick the
    /// narrowest integer type, arrays and objects become JSON.
    pub fn from_json(value: Value) -> Self {
        match value {
            Value::String(s) => SqlValue::Text(s),
            Value::Number(n) => {
                if let Some(i) = n.as_i64() {
                    match i32::try_from(i) {
                        Ok(small) => SqlValue::Integer(small),
                        Err(_) => SqlValue::BigInt(i),
                    }
                } else if let Some(f) = n.as_f64() {
                    SqlValue::Float(f)
                } else {
                    SqlValue::Json(Value::Number(n))
                }
            }
            Value::Bool(b) => SqlValue::Boolean(b),
            Value::Null => SqlValue::Null,
            other => SqlValue::Json(other),
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, SqlValue::Null)
    }

    /// PostgreSQL type name the value is bound as
    pub fn type_name(&self) -> &'static str {
        match self {
            SqlValue::Text(_) | SqlValue::Null => "TEXT",
            SqlValue::Integer(_) => "INT4",
            SqlValue::BigInt(_) => "INT8",
            SqlValue::Float(_) => "FLOAT8",
            SqlValue::Boolean(_) => "BOOL",
            SqlValue::Uuid(_) => "UUID",
            SqlValue::Timestamp(_) => "TIMESTAMPTZ",
            SqlValue::Json(_) => "JSONB",
        }
    }
}

fn quoted(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    write!(f, "'{}'", text.replace('\'', "''"))
}

/// Literal-style rendering, used for logging and argument-aware cache keys
impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SqlValue::Text(s) => quoted(f, s),
            SqlValue::Integer(i) => write!(f, "{}", i),
            SqlValue::BigInt(i) => write!(f, "{}", i),
            SqlValue::Float(x) => write!(f, "{}::float8", x),
            SqlValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            SqlValue::Uuid(id) => write!(f, "'{}'::uuid", id),
            SqlValue::Timestamp(ts) => write!(f, "'{}'::timestamptz", ts.to_rfc3339()),
            SqlValue::Json(v) => {
                quoted(f, &v.to_string())?;
                write!(f, "::jsonb")
            }
            SqlValue::Null => write!(f, "NULL"),
        }
    }
}

impl From<String> for SqlValue {
    fn from(val: String) -> Self {
        SqlValue::Text(val)
    }
}

impl From<&str> for SqlValue {
    fn from(val: &str) -> Self {
        SqlValue::Text(val.to_string())
    }
}

impl From<i16> for SqlValue {
    fn from(val: i16) -> Self {
        SqlValue::Integer(i32::from(val))
    }
}

impl From<i32> for SqlValue {
    fn from(val: i32) -> Self {
        SqlValue::Integer(val)
    }
}

impl From<i64> for SqlValue {
    fn from(val: i64) -> Self {
        SqlValue::BigInt(val)
    }
}

impl From<f32> for SqlValue {
    fn from(val: f32) -> Self {
        SqlValue::Float(f64::from(val))
    }
}

impl From<f64> for SqlValue {
    fn from(val: f64) -> Self {
        SqlValue::Float(val)
    }
}

impl From<bool> for SqlValue {
    fn from(val: bool) -> Self {
        SqlValue::Boolean(val)
    }
}

impl From<Uuid> for SqlValue {
    fn from(val: Uuid) -> Self {
        SqlValue::Uuid(val)
    }
}

impl From<DateTime<Utc>> for SqlValue {
    fn from(val: DateTime<Utc>) -> Self {
        SqlValue::Timestamp(val)
    }
}

impl From<Value> for SqlValue {
    fn from(val: Value) -> Self {
        SqlValue::Json(val)
    }
}

impl<T> From<Option<T>> for SqlValue
where
    T: Into<SqlValue>,
{
    fn from(val: Option<T>) -> Self {
        match val {
            Some(v) => v.into(),
            None => SqlValue::Null,
        }
    }
}
