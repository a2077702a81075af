// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use diesel::SqliteConnection;
use pizzeria::UnitOfWork;
use pizzeria_audit::Actor;
use pizzeria_domain::{Entity, Menu};
use tracing::info;
use uuid::Uuid;

use crate::error::PersistenceError;
use crate::mutations::commit::save_unit_of_work;
use crate::queries::pizzas::all_pizza_ids_including_deleted;

/// Inserts every catalog pizza whose id is not stored yet.
///
/// Soft-deleted pizzas count as stored and are left alone. Returns the
/// number of pizzas inserted, so a second run returns 0.
///
/// # Errors
///
/// Returns an error if the existing ids cannot be read or the insert fails.
pub fn seed_menu(conn: &mut SqliteConnection, actor: &Actor) -> Result<usize, PersistenceError> {
    let existing: HashSet<Uuid> = all_pizza_ids_including_deleted(conn)?;
    let mut uow: UnitOfWork = UnitOfWork::new();
    let mut inserted: usize = 0;

    for pizza in Menu::pizzas()
        .iter()
        .filter(|pizza| !existing.contains(&pizza.id()))
    {
        uow.add_pizza(pizza.clone())?;
        inserted += 1;
    }

    if inserted == 0 {
        info!("Menu already seeded");
        return Ok(0);
    }

    save_unit_of_work(conn, &mut uow, actor)?;
    info!(count = inserted, "Seeded menu pizzas");
    Ok(inserted)
}
