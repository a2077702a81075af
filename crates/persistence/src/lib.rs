// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Persistence layer for the pizzeria store.
//!
//! This crate stores pizzas, orders and their line items in `SQLite` via
//! Diesel. Reads return fully hydrated aggregates; writes go through a
//! [`pizzeria::UnitOfWork`] so the save interceptors stamp audit data and
//! bump aggregate versions before anything reaches the database.
//!
//! ## Concurrency
//!
//! Every aggregate-root update is guarded by its `version` column. Two
//! writers that loaded the same version cannot both commit: the second
//! matches no row and receives [`PersistenceError::ConcurrencyConflict`],
//! and its transaction is rolled back in full.
//!
//! ## Soft deletes
//!
//! Deleted pizzas, orders and line items stay in their tables with
//! `is_deleted` set. All queries exclude them.
//!
//! ## Testing
//!
//! - Tests use [`Persistence::new_in_memory`], one isolated database per call
//! - File-backed databases run in WAL mode

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};

use diesel::SqliteConnection;
use pizzeria::{CommitReceipt, UnitOfWork};
use pizzeria_audit::Actor;
use pizzeria_domain::{Order, Pizza};
use uuid::Uuid;

/// Atomic counter for generating unique in-memory database names.
///
/// Each call to `new_in_memory()` receives a unique sequential ID.
static DB_COUNTER: AtomicU64 = AtomicU64::new(0);

mod backend;
mod data_models;
mod diesel_schema;
mod error;
mod mutations;
mod queries;
mod timestamps;

#[cfg(test)]
mod tests;

pub use error::PersistenceError;

use backend::PersistenceBackend;

/// Persistence adapter for the store's aggregates.
pub struct Persistence {
    conn: SqliteConnection,
}

impl std::fmt::Debug for Persistence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Persistence").finish_non_exhaustive()
    }
}

impl Persistence {
    /// Creates a new persistence adapter with an in-memory `SQLite` database.
    ///
    /// Each call receives a unique shared-cache database, so adapters never
    /// see each other's data.
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be initialized.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let db_id: u64 = DB_COUNTER.fetch_add(1, Ordering::SeqCst);
        let shared_memory_url: String = format!("file:memdb_test_{db_id}?mode=memory&cache=shared");

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(&shared_memory_url)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Creates a new persistence adapter with a file-based `SQLite` database.
    ///
    /// # Arguments
    ///
    /// * `path` - The path to the `SQLite` database file
    ///
    /// # Errors
    ///
    /// Returns an error if the database cannot be opened or initialized.
    pub fn new_with_file<P: AsRef<Path>>(path: P) -> Result<Self, PersistenceError> {
        let path_str: &str = path.as_ref().to_str().ok_or_else(|| {
            PersistenceError::InitializationError("Invalid database path".to_string())
        })?;

        let mut conn: SqliteConnection = backend::sqlite::initialize_database(path_str)?;
        backend::sqlite::enable_wal_mode(&mut conn)?;
        backend::sqlite::verify_foreign_key_enforcement(&mut conn)?;

        Ok(Self { conn })
    }

    /// Verifies that foreign key enforcement is enabled.
    ///
    /// # Errors
    ///
    /// Returns an error if foreign key enforcement is not enabled.
    pub fn verify_foreign_key_enforcement(&mut self) -> Result<(), PersistenceError> {
        self.conn.verify_foreign_key_enforcement()
    }

    // ========================================================================
    // Menu
    // ========================================================================

    /// Inserts any catalog pizzas that are not stored yet.
    ///
    /// Returns the number of pizzas inserted.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails.
    pub fn seed_menu(&mut self, actor: &Actor) -> Result<usize, PersistenceError> {
        mutations::seed::seed_menu(&mut self.conn, actor)
    }

    /// Lists every live pizza.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn list_pizzas(&mut self) -> Result<Vec<Pizza>, PersistenceError> {
        queries::pizzas::list_pizzas(&mut self.conn)
    }

    /// Finds a live pizza by id.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn find_pizza(&mut self, pizza_id: Uuid) -> Result<Option<Pizza>, PersistenceError> {
        queries::pizzas::find_pizza(&mut self.conn, pizza_id)
    }

    // ========================================================================
    // Orders
    // ========================================================================

    /// Loads a live order with its live line items.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_order(&mut self, order_id: Uuid) -> Result<Option<Order>, PersistenceError> {
        queries::orders::load_order(&mut self.conn, order_id)
    }

    /// Loads the most recently started live order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn load_latest_order(&mut self) -> Result<Option<Order>, PersistenceError> {
        queries::orders::load_latest_order(&mut self.conn)
    }

    // ========================================================================
    // Saving
    // ========================================================================

    /// Commits everything `uow` tracks as changed, attributed to `actor`.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrencyConflict` if an aggregate was committed by
    /// another writer since it was loaded. Nothing is written in that case.
    pub fn save_changes(
        &mut self,
        uow: &mut UnitOfWork,
        actor: &Actor,
    ) -> Result<CommitReceipt, PersistenceError> {
        mutations::commit::save_unit_of_work(&mut self.conn, uow, actor)
    }
}
