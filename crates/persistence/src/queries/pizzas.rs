// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use diesel::prelude::*;
use diesel::SqliteConnection;
use pizzeria_domain::Pizza;
use tracing::debug;
use uuid::Uuid;

use crate::data_models::PizzaRow;
use crate::diesel_schema::pizzas;
use crate::error::PersistenceError;

/// Lists every live pizza, ordered by id.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
pub fn list_pizzas(conn: &mut SqliteConnection) -> Result<Vec<Pizza>, PersistenceError> {
    let rows: Vec<PizzaRow> = pizzas::table
        .filter(pizzas::is_deleted.eq(false))
        .order(pizzas::id.asc())
        .select(PizzaRow::as_select())
        .load(conn)?;

    debug!(count = rows.len(), "Loaded pizzas");
    rows.into_iter().map(PizzaRow::into_domain).collect()
}

/// Finds a live pizza by id.
///
/// # Errors
///
/// Returns an error if the query fails or the row is corrupt.
/// Returns `Ok(None)` if no live pizza has that id.
pub fn find_pizza(
    conn: &mut SqliteConnection,
    pizza_id: Uuid,
) -> Result<Option<Pizza>, PersistenceError> {
    pizzas::table
        .filter(pizzas::id.eq(pizza_id.to_string()))
        .filter(pizzas::is_deleted.eq(false))
        .select(PizzaRow::as_select())
        .first::<PizzaRow>(conn)
        .optional()?
        .map(PizzaRow::into_domain)
        .transpose()
}

/// Returns the ids of every stored pizza, soft-deleted ones included.
///
/// # Errors
///
/// Returns an error if the query fails or an id is corrupt.
pub fn all_pizza_ids_including_deleted(
    conn: &mut SqliteConnection,
) -> Result<HashSet<Uuid>, PersistenceError> {
    let ids: Vec<String> = pizzas::table.select(pizzas::id).load(conn)?;

    ids.iter()
        .map(|id| {
            Uuid::parse_str(id).map_err(|e| PersistenceError::CorruptRow {
                table: "pizzas",
                message: format!("invalid id '{id}': {e}"),
            })
        })
        .collect()
}
