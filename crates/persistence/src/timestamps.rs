// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Timestamp text encoding.
//!
//! Timestamps are stored as fixed-width UTC text with nanosecond precision so
//! lexical order in SQL matches chronological order.

use time::format_description::BorrowedFormatItem;
use time::macros::format_description;
use time::{OffsetDateTime, PrimitiveDateTime, UtcOffset};

use crate::error::PersistenceError;

const STORAGE_FORMAT: &[BorrowedFormatItem<'static>] =
    format_description!("[year]-[month]-[day]T[hour]:[minute]:[second].[subsecond digits:9]Z");

/// Formats a timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in the storage format.
pub fn to_storage(value: OffsetDateTime) -> Result<String, PersistenceError> {
    value
        .to_offset(UtcOffset::UTC)
        .format(STORAGE_FORMAT)
        .map_err(|e| PersistenceError::InvalidTimestamp(e.to_string()))
}

/// Formats an optional timestamp for storage.
///
/// # Errors
///
/// Returns an error if the timestamp cannot be represented in the storage format.
pub fn to_storage_opt(value: Option<OffsetDateTime>) -> Result<Option<String>, PersistenceError> {
    value.map(to_storage).transpose()
}

/// Parses a stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not in the storage format.
pub fn from_storage(value: &str) -> Result<OffsetDateTime, PersistenceError> {
    PrimitiveDateTime::parse(value, STORAGE_FORMAT)
        .map(PrimitiveDateTime::assume_utc)
        .map_err(|e| PersistenceError::InvalidTimestamp(format!("{value}: {e}")))
}

/// Parses an optional stored timestamp.
///
/// # Errors
///
/// Returns an error if the text is not in the storage format.
pub fn from_storage_opt(value: Option<&str>) -> Result<Option<OffsetDateTime>, PersistenceError> {
    value.map(from_storage).transpose()
}
