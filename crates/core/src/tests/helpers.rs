// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria_audit::{Actor, AuditTrail};
use pizzeria_domain::{EntityCore, Order, OrderDetails, OrderPizza, Version};
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

use crate::{ChangeEntry, EntityState};

pub const CREATED_AT: OffsetDateTime = datetime!(2026-02-01 12:00 UTC);

pub fn create_test_actor() -> Actor {
    Actor::new("clerk-7")
}

pub fn create_stored_trail() -> AuditTrail {
    AuditTrail::rehydrate(
        String::from("creator"),
        CREATED_AT,
        String::from("creator"),
        CREATED_AT,
    )
}

/// Builds an order as it would come back from storage, with one line item
/// per entry in `lines` (pizza id, quantity).
pub fn create_stored_order(version: u64, lines: &[(Uuid, u32)]) -> Order {
    let order_id: Uuid = Uuid::new_v4();
    let pizzas: Vec<OrderPizza> = lines
        .iter()
        .map(|(pizza_id, quantity)| {
            OrderPizza::rehydrate(
                EntityCore::rehydrate(Uuid::new_v4(), create_stored_trail(), false),
                order_id,
                *pizza_id,
                *quantity,
            )
            .unwrap()
        })
        .collect();
    let details: OrderDetails =
        OrderDetails::new(String::from("user-1"), None, CREATED_AT, None, None, None).unwrap();

    Order::rehydrate(
        EntityCore::rehydrate(order_id, create_stored_trail(), false),
        Version::new(version),
        details,
        pizzas,
    )
    .unwrap()
}

pub fn state_of(entries: &[ChangeEntry], id: Uuid) -> EntityState {
    entries
        .iter()
        .find(|entry| entry.key.id == id)
        .map(|entry| entry.state)
        .unwrap()
}
