// src/repositories/mapping.rs
//
// Row <-> column conversions shared by the SQLite repositories.
// Parse failures are explicit conversion errors, never silent defaults.

use chrono::{DateTime, SecondsFormat, Utc};
use rusqlite::Row;
use uuid::Uuid;

/// Fixed-width RFC 3339 so stored timestamps sort lexically
pub(crate) fn format_timestamp(timestamp: &DateTime<Utc>) -> String {
    timestamp.to_rfc3339_opts(SecondsFormat::Micros, true)
}

pub(crate) fn get_uuid(row: &Row, column: &str) -> rusqlite::Result<Uuid> {
    let raw: String = row.get(column)?;
    parse_uuid(row, column, &raw)
}

pub(crate) fn get_optional_uuid(row: &Row, column: &str) -> rusqlite::Result<Option<Uuid>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|value| parse_uuid(row, column, &value)).transpose()
}

pub(crate) fn get_timestamp(row: &Row, column: &str) -> rusqlite::Result<DateTime<Utc>> {
    let raw: String = row.get(column)?;
    parse_timestamp(row, column, &raw)
}

pub(crate) fn get_optional_timestamp(
    row: &Row,
    column: &str,
) -> rusqlite::Result<Option<DateTime<Utc>>> {
    let raw: Option<String> = row.get(column)?;
    raw.map(|value| parse_timestamp(row, column, &value))
        .transpose()
}

/// Positions and counters are stored as INTEGER
pub(crate) fn get_u32(row: &Row, column: &str) -> rusqlite::Result<u32> {
    let raw: i64 = row.get(column)?;
    u32::try_from(raw).map_err(|e| {
        invalid_data(row, column, format!("Value {} out of range: {}", raw, e))
    })
}

pub(crate) fn get_optional_u32(row: &Row, column: &str) -> rusqlite::Result<Option<u32>> {
    let raw: Option<i64> = row.get(column)?;
    raw.map(|value| {
        u32::try_from(value).map_err(|e| {
            invalid_data(row, column, format!("Value {} out of range: {}", value, e))
        })
    })
    .transpose()
}

/// `?1, ?2, ...` placeholders for an `IN (...)` list
pub(crate) fn placeholders(count: usize) -> String {
    (1..=count)
        .map(|index| format!("?{}", index))
        .collect::<Vec<_>>()
        .join(", ")
}

fn parse_uuid(row: &Row, column: &str, raw: &str) -> rusqlite::Result<Uuid> {
    Uuid::parse_str(raw)
        .map_err(|e| invalid_data(row, column, format!("Invalid UUID '{}': {}", raw, e)))
}

fn parse_timestamp(row: &Row, column: &str, raw: &str) -> rusqlite::Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(raw)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|e| invalid_data(row, column, format!("Invalid {} timestamp '{}': {}", column, raw, e)))
}

pub(crate) fn invalid_data(row: &Row, column: &str, message: String) -> rusqlite::Error {
    let index = row.as_ref().column_index(column).unwrap_or(0);
    rusqlite::Error::FromSqlConversionFailure(
        index,
        rusqlite::types::Type::Text,
        Box::new(std::io::Error::new(std::io::ErrorKind::InvalidData, message)),
    )
}
