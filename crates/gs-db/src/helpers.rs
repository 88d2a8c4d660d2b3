//! Row parsing helpers shared by the repositories.

use chrono::{DateTime, Utc};
use gs_core::enums::GroupSource;
use gs_core::ids::GroupId;

use crate::error::DatabaseError;

/// Parse a TEXT column as `DateTime<Utc>`.
///
/// Handles both RFC 3339 (`"2026-02-09T14:30:00+00:00"`) and `SQLite`'s default
/// format (`"2026-02-09 14:30:00"`), since rows inserted with column defaults
/// use the latter.
///
/// # Errors
///
/// Returns `DatabaseError::CorruptRow` if the string cannot be parsed as either format.
pub fn parse_datetime(s: &str) -> Result<DateTime<Utc>, DatabaseError> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    chrono::NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S")
        .map(|naive| naive.and_utc())
        .map_err(|e| DatabaseError::CorruptRow(format!("timestamp '{s}': {e}")))
}

/// Parse a `groups.source` column.
///
/// # Errors
///
/// Returns `DatabaseError::CorruptRow` for values outside the CHECK constraint.
pub fn parse_source(s: &str) -> Result<GroupSource, DatabaseError> {
    s.parse()
        .map_err(|e: gs_core::errors::CoreError| DatabaseError::CorruptRow(e.to_string()))
}

/// Build `?N, ?N+1, ...` placeholders for an `IN (...)` clause.
#[must_use]
pub fn placeholders(start: usize, count: usize) -> String {
    (start..start + count)
        .map(|i| format!("?{i}"))
        .collect::<Vec<_>>()
        .join(", ")
}

/// Positional parameters `first, ids[0], ids[1], ...` to go with
/// [`placeholders`] starting at 2.
#[must_use]
pub fn positional_ids(first: &str, ids: &[GroupId]) -> libsql::params::Params {
    let mut values = Vec::with_capacity(ids.len() + 1);
    values.push(libsql::Value::Text(first.to_string()));
    values.extend(ids.iter().map(|id| libsql::Value::Text(id.to_string())));
    libsql::params::Params::Positional(values)
}
