// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{Entity, EntityKey, EntityKind, Menu, Order, OrderPizza, Reference, pizza_ids};

#[test]
fn test_only_orders_and_pizzas_are_roots() {
    assert!(EntityKind::Pizza.is_aggregate_root());
    assert!(EntityKind::Order.is_aggregate_root());
    assert!(!EntityKind::OrderPizza.is_aggregate_root());
}

#[test]
fn test_roots_declare_no_foreign_keys() {
    assert!(EntityKind::Pizza.foreign_keys().is_empty());
    assert!(EntityKind::Order.foreign_keys().is_empty());
}

#[test]
fn test_line_item_references_its_order_and_pizza() {
    let mut order: Order = Order::start_new("user-1").unwrap();
    let line: OrderPizza = order
        .add_pizza(Menu::find(pizza_ids::MARINARA).unwrap())
        .clone();

    let references: Vec<Reference> = line.references();

    assert_eq!(references.len(), 2);
    assert!(references.iter().any(|r| r.is_child_of(order.key())));

    let pizza_key: EntityKey = EntityKey::new(EntityKind::Pizza, pizza_ids::MARINARA);
    let pizza_ref: &Reference = references
        .iter()
        .find(|r| r.target == pizza_key)
        .unwrap();
    assert!(!pizza_ref.is_child_of(pizza_key));
}

#[test]
fn test_kind_display_uses_type_name() {
    assert_eq!(EntityKind::OrderPizza.to_string(), "OrderPizza");
}
