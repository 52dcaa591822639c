//! Executor capability
//!
//! The cache only needs two things from the data store: run a statement and
//! hand back rows as column → value maps, or run a statement and hand back a
//! single integer. `PgPool` provides both.

use crate::errors::ExecutorError;
use crate::result::Row;
use async_trait::async_trait;
use query_builder::SqlValue;
use serde_json::Value;
use sqlx::postgres::types::{PgInterval, PgMoney};
use sqlx::postgres::{PgArguments, PgRow, PgValueFormat};
use sqlx::query::Query;
use sqlx::types::ipnetwork::IpNetwork;
use sqlx::types::Decimal;
use sqlx::{Column, PgPool, Postgres, Row as _, TypeInfo, ValueRef};
use std::sync::Arc;

#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Run a data query and scan every returned row
    async fn fetch_rows(&self, sql: &str, arguments: &[SqlValue]) -> Result<Vec<Row>, ExecutorError>;

    /// Run a count query and scan its single integer
    async fn fetch_count(&self, sql: &str, arguments: &[SqlValue]) -> Result<i64, ExecutorError>;
}

#[async_trait]
impl<E: QueryExecutor + ?Sized> QueryExecutor for Arc<E> {
    async fn fetch_rows(&self, sql: &str, arguments: &[SqlValue]) -> Result<Vec<Row>, ExecutorError> {
        (**self).fetch_rows(sql, arguments).await
    }

    async fn fetch_count(&self, sql: &str, arguments: &[SqlValue]) -> Result<i64, ExecutorError> {
        (**self).fetch_count(sql, arguments).await
    }
}

#[async_trait]
impl QueryExecutor for PgPool {
    async fn fetch_rows(&self, sql: &str, arguments: &[SqlValue]) -> Result<Vec<Row>, ExecutorError> {
        let rows = bind_all(sqlx::query(sql), arguments)
            .fetch_all(self)
            .await?;

        rows.iter().map(scan_row).collect()
    }

    async fn fetch_count(&self, sql: &str, arguments: &[SqlValue]) -> Result<i64, ExecutorError> {
        let row = bind_all(sqlx::query(sql), arguments)
            .fetch_one(self)
            .await?;

        row.try_get::<i64, _>(0)
            .map_err(|e| ExecutorError::scan(format!("count column: {}", e)))
    }
}

fn bind_all<'q>(
    mut query: Query<'q, Postgres, PgArguments>,
    arguments: &[SqlValue],
) -> Query<'q, Postgres, PgArguments> {
    for argument in arguments {
        query = bind_param(query, argument.clone());
    }
    query
}

/// Bind a value as the PostgreSQL type its variant names
fn bind_param(
    query: Query<'_, Postgres, PgArguments>,
    param: SqlValue,
) -> Query<'_, Postgres, PgArguments> {
    match param {
        SqlValue::Text(s) => query.bind(s),
        SqlValue::Integer(i) => query.bind(i),
        SqlValue::BigInt(i) => query.bind(i),
        SqlValue::Float(f) => query.bind(f),
        SqlValue::Boolean(b) => query.bind(b),
        SqlValue::Uuid(id) => query.bind(id),
        SqlValue::Timestamp(ts) => query.bind(ts),
        SqlValue::Json(v) => query.bind(sqlx::types::Json(v)),
        SqlValue::Null => query.bind(Option::<String>::None),
    }
}

/// Decode one row into a column → value map, keeping select-list order
fn scan_row(row: &PgRow) -> Result<Row, ExecutorError> {
    let mut scanned = Row::with_capacity(row.len());
    for column in row.columns() {
        let value = scan_column(row, column.ordinal(), column.type_info().name())
            .map_err(|e| match e {
                ExecutorError::Scan(msg) => {
                    ExecutorError::scan(format!("column '{}': {}", column.name(), msg))
                }
                other => other,
            })?;
        scanned.insert(column.name().to_string(), value);
    }
    Ok(scanned)
}

fn strings<T: ToString>(values: Vec<T>) -> Value {
    Value::from(values.iter().map(ToString::to_string).collect::<Vec<_>>())
}

fn scan_column(row: &PgRow, index: usize, type_name: &str) -> Result<Value, ExecutorError> {
    if row.try_get_raw(index)?.is_null() {
        return Ok(Value::Null);
    }

    let value = match type_name {
        "BOOL" => Value::from(row.try_get::<bool, _>(index)?),
        "INT2" => Value::from(row.try_get::<i16, _>(index)?),
        "INT4" => Value::from(row.try_get::<i32, _>(index)?),
        "INT8" => Value::from(row.try_get::<i64, _>(index)?),
        "FLOAT4" => Value::from(row.try_get::<f32, _>(index)?),
        "FLOAT8" => Value::from(row.try_get::<f64, _>(index)?),
        // kept as text so no precision is lost
        "NUMERIC" => Value::from(row.try_get::<Decimal, _>(index)?.to_string()),
        "MONEY" => Value::from(row.try_get::<PgMoney, _>(index)?.to_decimal(2).to_string()),
        "TEXT" | "VARCHAR" | "BPCHAR" | "NAME" | "CITEXT" => {
            Value::from(row.try_get::<String, _>(index)?)
        }
        "UUID" => Value::from(row.try_get::<uuid::Uuid, _>(index)?.to_string()),
        "JSON" | "JSONB" => row.try_get::<Value, _>(index)?,
        "TIMESTAMPTZ" => Value::from(
            row.try_get::<chrono::DateTime<chrono::Utc>, _>(index)?
                .to_rfc3339(),
        ),
        "TIMESTAMP" => Value::from(row.try_get::<chrono::NaiveDateTime, _>(index)?.to_string()),
        "DATE" => Value::from(row.try_get::<chrono::NaiveDate, _>(index)?.to_string()),
        "TIME" => Value::from(row.try_get::<chrono::NaiveTime, _>(index)?.to_string()),
        "INTERVAL" => Value::from(format_interval(&row.try_get::<PgInterval, _>(index)?)),
        "INET" | "CIDR" => Value::from(row.try_get::<IpNetwork, _>(index)?.to_string()),
        "BYTEA" => Value::from(row.try_get::<Vec<u8>, _>(index)?),
        "TEXT[]" | "VARCHAR[]" | "BPCHAR[]" | "NAME[]" => {
            Value::from(row.try_get::<Vec<String>, _>(index)?)
        }
        "BOOL[]" => Value::from(row.try_get::<Vec<bool>, _>(index)?),
        "INT2[]" => Value::from(row.try_get::<Vec<i16>, _>(index)?),
        "INT4[]" => Value::from(row.try_get::<Vec<i32>, _>(index)?),
        "INT8[]" => Value::from(row.try_get::<Vec<i64>, _>(index)?),
        "FLOAT4[]" => Value::from(row.try_get::<Vec<f32>, _>(index)?),
        "FLOAT8[]" => Value::from(row.try_get::<Vec<f64>, _>(index)?),
        "NUMERIC[]" => strings(row.try_get::<Vec<Decimal>, _>(index)?),
        "UUID[]" => strings(row.try_get::<Vec<uuid::Uuid>, _>(index)?),
        "TIMESTAMPTZ[]" => Value::from(
            row.try_get::<Vec<chrono::DateTime<chrono::Utc>>, _>(index)?
                .iter()
                .map(|ts| ts.to_rfc3339())
                .collect::<Vec<_>>(),
        ),
        other => scan_as_text(row, index, other)?,
    };

    Ok(value)
}

/// Read a column of an unmapped type (enums, domains over text) in its text form
fn scan_as_text(row: &PgRow, index: usize, type_name: &str) -> Result<Value, ExecutorError> {
    let unsupported = || ExecutorError::scan(format!("unsupported column type {}", type_name));
    let raw = row.try_get_raw(index)?;

    let text = match raw.format() {
        PgValueFormat::Text => raw.as_str().map_err(|_| unsupported())?,
        PgValueFormat::Binary => {
            let bytes = raw.as_bytes().map_err(|_| unsupported())?;
            std::str::from_utf8(bytes)
                .ok()
                .filter(|text| is_printable(text))
                .ok_or_else(unsupported)?
        }
    };

    Ok(Value::from(text))
}

/// Binary encodings of non-text types show up as control bytes
fn is_printable(text: &str) -> bool {
    !text.chars().any(|c| c.is_control() && !c.is_whitespace())
}

/// ISO 8601 duration, e.g. `P1Y2M3DT4H5M6.5S`
fn format_interval(interval: &PgInterval) -> String {
    let mut out = String::from("P");
    let (years, months) = (interval.months / 12, interval.months % 12);
    if years != 0 {
        out.push_str(&format!("{}Y", years));
    }
    if months != 0 {
        out.push_str(&format!("{}M", months));
    }
    if interval.days != 0 {
        out.push_str(&format!("{}D", interval.days));
    }

    let micros = interval.microseconds;
    if micros != 0 {
        out.push('T');
        let sign = if micros < 0 { "-" } else { "" };
        let abs = micros.unsigned_abs();
        let (hours, rem) = (abs / 3_600_000_000, abs % 3_600_000_000);
        let (minutes, rem) = (rem / 60_000_000, rem % 60_000_000);
        let (seconds, fraction) = (rem / 1_000_000, rem % 1_000_000);

        if hours != 0 {
            out.push_str(&format!("{}{}H", sign, hours));
        }
        if minutes != 0 {
            out.push_str(&format!("{}{}M", sign, minutes));
        }
        if fraction != 0 {
            let digits = format!("{:06}", fraction);
            out.push_str(&format!("{}{}.{}S", sign, seconds, digits.trim_end_matches('0')));
        } else if seconds != 0 {
            out.push_str(&format!("{}{}S", sign, seconds));
        }
    }

    if out == "P" {
        out.push_str("T0S");
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn interval(months: i32, days: i32, microseconds: i64) -> PgInterval {
        PgInterval {
            months,
            days,
            microseconds,
        }
    }

    #[test]
    fn test_format_interval() {
        assert_eq!(format_interval(&interval(14, 3, 3_723_500_000)), "P1Y2M3DT1H2M3.5S");
        assert_eq!(format_interval(&interval(0, 0, 0)), "PT0S");
        assert_eq!(format_interval(&interval(0, 7, 0)), "P7D");
        assert_eq!(format_interval(&interval(0, 0, -90_000_000)), "PT-1M-30S");
        assert_eq!(format_interval(&interval(0, 0, 1)), "PT0.000001S");
    }

    #[test]
    fn test_binary_noise_is_not_printable() {
        assert!(is_printable("happy"));
        assert!(is_printable("line one\nline two"));
        assert!(!is_printable("\u{2}\u{20}\u{0}\u{4}"));
    }
}
