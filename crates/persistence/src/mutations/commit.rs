// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Atomic commit of a unit of work.
//!
//! Aggregate-root updates are compare-and-swap writes on the `version`
//! column: the row is only updated if it still carries the version the
//! writer loaded, and the version is incremented in the same statement. A
//! write that matches no row aborts the whole transaction.

use diesel::prelude::*;
use diesel::SqliteConnection;
use pizzeria::{CommitReceipt, PendingChanges, PendingWrite, UnitOfWork};
use pizzeria_audit::Actor;
use pizzeria_domain::{Entity, EntityKey, EntityKind, Version};
use tracing::{debug, info, warn};

use crate::data_models::{OrderPizzaRow, OrderRow, PizzaRow};
use crate::diesel_schema::{order_pizzas, orders, pizzas};
use crate::error::PersistenceError;

/// Prepares, commits and accepts the changes tracked by `uow`.
///
/// On failure nothing is written and `uow` keeps its pre-save snapshot; the
/// caller should discard it and retry from a fresh read.
///
/// # Errors
///
/// Returns `ConcurrencyConflict` if another writer committed one of the
/// aggregates first, or any database error raised while writing.
pub fn save_unit_of_work(
    conn: &mut SqliteConnection,
    uow: &mut UnitOfWork,
    actor: &Actor,
) -> Result<CommitReceipt, PersistenceError> {
    let pending: PendingChanges = uow.prepare_save(actor);
    if pending.is_empty() {
        debug!("No pending changes to save");
        return Ok(CommitReceipt::new());
    }

    let receipt: CommitReceipt = match apply_pending_changes(conn, &pending) {
        Ok(receipt) => receipt,
        Err(err @ PersistenceError::ConcurrencyConflict { .. }) => {
            warn!(error = %err, actor = %actor, "Rejected write from a stale unit of work");
            return Err(err);
        }
        Err(err) => return Err(err),
    };

    uow.accept_changes(&receipt)?;
    info!(
        rows = receipt.rows_written(),
        actor = %actor,
        "Committed unit of work"
    );
    Ok(receipt)
}

/// Applies every pending write inside one transaction.
///
/// # Errors
///
/// Returns an error, after rolling back, if any write fails or matches no row.
pub fn apply_pending_changes(
    conn: &mut SqliteConnection,
    pending: &PendingChanges,
) -> Result<CommitReceipt, PersistenceError> {
    debug!(writes = pending.len(), "Applying pending changes");
    conn.transaction::<_, PersistenceError, _>(|conn| {
        let mut receipt: CommitReceipt = CommitReceipt::new();
        for write in pending.writes() {
            apply_write(conn, write, &mut receipt)?;
            receipt.record_row();
        }
        Ok(receipt)
    })
}

fn apply_write(
    conn: &mut SqliteConnection,
    write: &PendingWrite,
    receipt: &mut CommitReceipt,
) -> Result<(), PersistenceError> {
    match write {
        PendingWrite::InsertPizza(pizza) => {
            let row: PizzaRow = PizzaRow::from_domain(pizza, Version::INITIAL)?;
            diesel::insert_into(pizzas::table)
                .values(&row)
                .execute(conn)?;
            receipt.record_version(pizza.key(), Version::INITIAL);
        }
        PendingWrite::UpdatePizza {
            pizza,
            expected_version,
        } => {
            let row: PizzaRow = PizzaRow::from_domain(pizza, *expected_version)?;
            let updated: usize = diesel::update(
                pizzas::table
                    .filter(pizzas::id.eq(&row.id))
                    .filter(pizzas::version.eq(row.version)),
            )
            .set((
                pizzas::name.eq(&row.name),
                pizzas::description.eq(&row.description),
                pizzas::price_cents.eq(row.price_cents),
                pizzas::modified_by.eq(&row.modified_by),
                pizzas::modified_at_utc.eq(&row.modified_at_utc),
                pizzas::is_deleted.eq(row.is_deleted),
                pizzas::version.eq(pizzas::version + 1_i64),
            ))
            .execute(conn)?;
            ensure_matched(updated, pizza.key(), Some(*expected_version))?;
            receipt.record_version(pizza.key(), expected_version.next());
        }
        PendingWrite::InsertOrder(order) => {
            let row: OrderRow = OrderRow::from_domain(order, Version::INITIAL)?;
            diesel::insert_into(orders::table)
                .values(&row)
                .execute(conn)?;
            receipt.record_version(order.key(), Version::INITIAL);
        }
        PendingWrite::UpdateOrder {
            order,
            expected_version,
        } => {
            let row: OrderRow = OrderRow::from_domain(order, *expected_version)?;
            let updated: usize = diesel::update(
                orders::table
                    .filter(orders::id.eq(&row.id))
                    .filter(orders::version.eq(row.version)),
            )
            .set((
                orders::user_id.eq(&row.user_id),
                orders::delivery_address.eq(&row.delivery_address),
                orders::submitted_at_utc.eq(&row.submitted_at_utc),
                orders::prepared_at_utc.eq(&row.prepared_at_utc),
                orders::completed_at_utc.eq(&row.completed_at_utc),
                orders::modified_by.eq(&row.modified_by),
                orders::modified_at_utc.eq(&row.modified_at_utc),
                orders::is_deleted.eq(row.is_deleted),
                orders::version.eq(orders::version + 1_i64),
            ))
            .execute(conn)?;
            ensure_matched(updated, order.key(), Some(*expected_version))?;
            receipt.record_version(order.key(), expected_version.next());
        }
        PendingWrite::InsertOrderPizza(line) => {
            let row: OrderPizzaRow = OrderPizzaRow::from_domain(line)?;
            diesel::insert_into(order_pizzas::table)
                .values(&row)
                .execute(conn)?;
        }
        PendingWrite::UpdateOrderPizza(line) => {
            let row: OrderPizzaRow = OrderPizzaRow::from_domain(line)?;
            let updated: usize =
                diesel::update(order_pizzas::table.filter(order_pizzas::id.eq(&row.id)))
                    .set((
                        order_pizzas::quantity.eq(row.quantity),
                        order_pizzas::modified_by.eq(&row.modified_by),
                        order_pizzas::modified_at_utc.eq(&row.modified_at_utc),
                        order_pizzas::is_deleted.eq(row.is_deleted),
                    ))
                    .execute(conn)?;
            ensure_matched(updated, line.key(), None)?;
        }
        PendingWrite::DeleteOrderPizza { id } => {
            let deleted: usize = diesel::delete(
                order_pizzas::table.filter(order_pizzas::id.eq(id.to_string())),
            )
            .execute(conn)?;
            ensure_matched(
                deleted,
                EntityKey::new(EntityKind::OrderPizza, *id),
                None,
            )?;
        }
    }
    Ok(())
}

fn ensure_matched(
    rows: usize,
    entity: EntityKey,
    expected_version: Option<Version>,
) -> Result<(), PersistenceError> {
    if rows == 0 {
        return Err(PersistenceError::ConcurrencyConflict {
            entity,
            expected_version,
        });
    }
    Ok(())
}
