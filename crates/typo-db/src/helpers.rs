//! Row-to-value parsing helpers.
//!
//! Change-log rows are read column by column. These helpers keep the NULL
//! handling and type checks in one place so the history stages only deal with
//! snapshot values.

use chrono::{DateTime, Utc};
use libsql::Value;
use typo_core::entities::FieldValue;

use crate::error::DatabaseError;

/// Read a nullable TEXT column. Returns `None` for both SQL NULL and empty string.
///
/// The column is matched on its storage class. `row.get::<Option<String>>()`
/// panics inside libsql when the stored value is not TEXT, so a mistyped
/// change-log row must come back as an error instead.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the column holds a non-text value.
pub fn get_opt_string(row: &libsql::Row, idx: i32) -> Result<Option<String>, DatabaseError> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Text(s) if s.is_empty() => Ok(None),
        Value::Text(s) => Ok(Some(s)),
        other => Err(type_mismatch(idx, "TEXT", &other)),
    }
}

/// Read a nullable INTEGER column.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the column holds a non-integer value.
pub fn get_opt_i64(row: &libsql::Row, idx: i32) -> Result<Option<i64>, DatabaseError> {
    match row.get_value(idx)? {
        Value::Null => Ok(None),
        Value::Integer(i) => Ok(Some(i)),
        other => Err(type_mismatch(idx, "INTEGER", &other)),
    }
}

/// Read a non-null INTEGER column.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the column is NULL or not an integer.
pub fn get_i64(row: &libsql::Row, idx: i32) -> Result<i64, DatabaseError> {
    get_opt_i64(row, idx)?
        .ok_or_else(|| DatabaseError::InvalidState(format!("column {idx} is NULL")))
}

fn type_mismatch(idx: i32, expected: &str, found: &Value) -> DatabaseError {
    let found = match found {
        Value::Null => "NULL",
        Value::Integer(_) => "INTEGER",
        Value::Real(_) => "REAL",
        Value::Text(_) => "TEXT",
        Value::Blob(_) => "BLOB",
    };
    DatabaseError::InvalidState(format!("column {idx}: expected {expected}, found {found}"))
}

/// Convert a revision registry timestamp (epoch milliseconds) to UTC.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` if the value is out of range.
pub fn parse_epoch_millis(millis: i64) -> Result<DateTime<Utc>, DatabaseError> {
    DateTime::from_timestamp_millis(millis).ok_or_else(|| {
        DatabaseError::InvalidState(format!("Revision timestamp out of range: {millis}"))
    })
}

/// Quote a table or column name for interpolation into SQL.
///
/// Names come from the static table list and validated configuration, but
/// embedded quotes are still doubled.
#[must_use]
pub fn quote_ident(name: &str) -> String {
    format!("\"{}\"", name.replace('"', "\"\""))
}

/// Convert a raw column value into a snapshot value.
///
/// NULL and empty text map to `None`, so unset attributes do not appear in a
/// snapshot.
///
/// # Errors
///
/// Returns `DatabaseError::InvalidState` for BLOB columns, which no snapshot
/// field can hold.
pub fn value_to_field(value: Value) -> Result<Option<FieldValue>, DatabaseError> {
    match value {
        Value::Null => Ok(None),
        Value::Integer(i) => Ok(Some(FieldValue::Integer(i))),
        Value::Real(r) => Ok(Some(FieldValue::Text(r.to_string()))),
        Value::Text(s) if s.is_empty() => Ok(None),
        Value::Text(s) => Ok(Some(FieldValue::Text(s))),
        Value::Blob(_) => Err(DatabaseError::InvalidState(
            "BLOB value in an attribute column".into(),
        )),
    }
}
