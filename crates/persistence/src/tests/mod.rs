// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![allow(clippy::expect_used, clippy::unwrap_used)]

mod concurrency_tests;
mod initialization_tests;
mod order_tests;

use pizzeria::UnitOfWork;
use pizzeria_audit::Actor;
use pizzeria_domain::{Entity, Order};
use uuid::Uuid;

use crate::Persistence;

pub fn create_test_actor() -> Actor {
    Actor::new("test-actor")
}

/// Returns an in-memory store with the menu already seeded.
pub fn create_seeded_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("in-memory database");
    persistence
        .seed_menu(&Actor::system())
        .expect("menu seeds");
    persistence
}

/// Starts and saves an empty order for `user_id`, returning its id.
pub fn save_new_order(persistence: &mut Persistence, user_id: &str) -> Uuid {
    let order: Order = Order::start_new(user_id).expect("valid order");
    let order_id: Uuid = order.id();
    let mut uow: UnitOfWork = UnitOfWork::new();
    uow.add_order(order).unwrap();
    persistence
        .save_changes(&mut uow, &create_test_actor())
        .expect("order saves");
    order_id
}

/// Loads an order into a fresh unit of work.
pub fn attach_stored_order(persistence: &mut Persistence, order_id: Uuid) -> UnitOfWork {
    let order: Order = persistence
        .load_order(order_id)
        .unwrap()
        .expect("order exists");
    let mut uow: UnitOfWork = UnitOfWork::new();
    uow.attach_order(order).unwrap();
    uow
}
