// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria::CoreError;
use pizzeria_domain::{EntityKey, Version};
use thiserror::Error;

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PersistenceError {
    /// A database error occurred.
    #[error("Database error: {0}")]
    DatabaseError(String),
    /// Database connection failed.
    #[error("Database connection failed: {0}")]
    DatabaseConnectionFailed(String),
    /// Database migration failed.
    #[error("Migration failed: {0}")]
    MigrationFailed(String),
    /// Query execution failed.
    #[error("Query failed: {0}")]
    QueryFailed(String),
    /// Initialization error.
    #[error("Initialization error: {0}")]
    InitializationError(String),
    /// Foreign key enforcement is not enabled.
    #[error("Foreign key enforcement is not enabled")]
    ForeignKeyEnforcementNotEnabled,
    /// The requested resource was not found.
    #[error("Not found: {0}")]
    NotFound(String),
    /// A guarded write matched no row: another writer committed first.
    ///
    /// `expected_version` is `None` for line items, which are guarded by
    /// their order's version.
    #[error("Concurrent modification of {entity} (expected version {})", display_version(*.expected_version))]
    ConcurrencyConflict {
        /// The entity whose write was rejected.
        entity: EntityKey,
        /// The version the writer loaded.
        expected_version: Option<Version>,
    },
    /// A stored row cannot be turned back into a domain object.
    #[error("Corrupt row in {table}: {message}")]
    CorruptRow {
        /// The table the row came from.
        table: &'static str,
        /// What was wrong with it.
        message: String,
    },
    /// A timestamp could not be formatted or parsed.
    #[error("Invalid timestamp: {0}")]
    InvalidTimestamp(String),
    /// The unit of work rejected the operation.
    #[error("Tracking error: {0}")]
    Tracking(#[from] CoreError),
}

fn display_version(version: Option<Version>) -> String {
    version.map_or_else(|| String::from("n/a"), |v| v.to_string())
}

impl From<diesel::result::Error> for PersistenceError {
    fn from(err: diesel::result::Error) -> Self {
        match err {
            diesel::result::Error::NotFound => Self::NotFound("Record not found".to_string()),
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<diesel::ConnectionError> for PersistenceError {
    fn from(err: diesel::ConnectionError) -> Self {
        Self::DatabaseConnectionFailed(err.to_string())
    }
}
