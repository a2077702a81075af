// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pizzeria_domain::Order;
use tracing::debug;
use uuid::Uuid;

use crate::data_models::{OrderPizzaRow, OrderRow};
use crate::diesel_schema::{order_pizzas, orders};
use crate::error::PersistenceError;

/// Loads a live order and its live line items.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
/// Returns `Ok(None)` if no live order has that id.
pub fn load_order(
    conn: &mut SqliteConnection,
    order_id: Uuid,
) -> Result<Option<Order>, PersistenceError> {
    let row: Option<OrderRow> = orders::table
        .filter(orders::id.eq(order_id.to_string()))
        .filter(orders::is_deleted.eq(false))
        .select(OrderRow::as_select())
        .first::<OrderRow>(conn)
        .optional()?;

    row.map(|row| hydrate(conn, row)).transpose()
}

/// Loads the most recently started live order.
///
/// # Errors
///
/// Returns an error if the query fails or a row is corrupt.
/// Returns `Ok(None)` if there are no orders.
pub fn load_latest_order(conn: &mut SqliteConnection) -> Result<Option<Order>, PersistenceError> {
    let row: Option<OrderRow> = orders::table
        .filter(orders::is_deleted.eq(false))
        .order((orders::started_at_utc.desc(), orders::created_at_utc.desc()))
        .select(OrderRow::as_select())
        .first::<OrderRow>(conn)
        .optional()?;

    row.map(|row| hydrate(conn, row)).transpose()
}

fn hydrate(conn: &mut SqliteConnection, row: OrderRow) -> Result<Order, PersistenceError> {
    let lines: Vec<OrderPizzaRow> = order_pizzas::table
        .filter(order_pizzas::order_id.eq(&row.id))
        .filter(order_pizzas::is_deleted.eq(false))
        .order((order_pizzas::created_at_utc.asc(), order_pizzas::id.asc()))
        .select(OrderPizzaRow::as_select())
        .load(conn)?;

    debug!(order_id = %row.id, lines = lines.len(), "Loaded order");
    row.into_domain(lines)
}
