// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Conversion between `time` values and the `CURRENT_TIMESTAMP` text form.
//!
//! Every database-written timestamp uses `YYYY-MM-DD HH:MM:SS` in UTC, so
//! expiry columns written from Rust use the same form and compare
//! correctly against `CURRENT_TIMESTAMP` in SQL.

use time::format_description::FormatItem;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::PersistenceError;

const SQL_TIMESTAMP: &[FormatItem<'_>] =
    time::macros::format_description!("[year]-[month]-[day] [hour]:[minute]:[second]");

/// Formats an instant the way `CURRENT_TIMESTAMP` does.
///
/// # Errors
///
/// Returns an error if the instant cannot be formatted.
pub fn format_sql_timestamp(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(SQL_TIMESTAMP)
        .map_err(|e| PersistenceError::SerializationError(format!("Invalid timestamp: {e}")))
}

/// Parses a `CURRENT_TIMESTAMP` string as a UTC instant.
///
/// # Errors
///
/// Returns an error if the value is not in `YYYY-MM-DD HH:MM:SS` form.
pub fn parse_sql_timestamp(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(value, SQL_TIMESTAMP)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::CorruptRecord(format!("Invalid timestamp '{value}': {e}")))
}
