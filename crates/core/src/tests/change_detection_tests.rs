// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria_domain::{Entity, Menu, Order, pizza_ids};
use uuid::Uuid;

use super::helpers::{create_stored_order, state_of};
use crate::{ChangeEntry, CoreError, EntityState, UnitOfWork};

#[test]
fn test_new_order_and_lines_are_added() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    let mut order: Order = Order::start_new("user-1").unwrap();
    let line_id: Uuid = order.add_pizza(Menu::find(pizza_ids::CRUDO).unwrap()).id();
    let order_id: Uuid = order.id();
    uow.add_order(order).unwrap();

    let entries: Vec<ChangeEntry> = uow.detect_changes();

    assert_eq!(entries.len(), 2);
    assert_eq!(state_of(&entries, order_id), EntityState::Added);
    assert_eq!(state_of(&entries, line_id), EntityState::Added);
}

#[test]
fn test_attached_order_is_unchanged() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    uow.attach_order(create_stored_order(1, &[(pizza_ids::CRUDO, 2)]))
        .unwrap();

    assert!(!uow.has_changes());
}

#[test]
fn test_child_change_leaves_root_unchanged_before_interceptors() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    let order: Order = create_stored_order(1, &[]);
    let order_id: Uuid = order.id();
    uow.attach_order(order).unwrap();

    let line_id: Uuid = uow
        .order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::MARINARA).unwrap())
        .id();
    let entries: Vec<ChangeEntry> = uow.detect_changes();

    assert_eq!(state_of(&entries, order_id), EntityState::Unchanged);
    assert_eq!(state_of(&entries, line_id), EntityState::Added);
    assert!(uow.has_changes());
}

#[test]
fn test_quantity_change_is_modified() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    let order: Order = create_stored_order(4, &[(pizza_ids::CARBONARA, 1)]);
    let order_id: Uuid = order.id();
    let line_id: Uuid = order.pizzas()[0].id();
    uow.attach_order(order).unwrap();

    uow.order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::CARBONARA).unwrap());

    assert_eq!(
        state_of(&uow.detect_changes(), line_id),
        EntityState::Modified
    );
}

#[test]
fn test_removed_line_is_deleted() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    let order: Order = create_stored_order(1, &[(pizza_ids::CRUDO, 1)]);
    let order_id: Uuid = order.id();
    let line_id: Uuid = order.pizzas()[0].id();
    uow.attach_order(order).unwrap();

    assert!(uow.order_mut(order_id).unwrap().remove_pizza(pizza_ids::CRUDO));

    let entries: Vec<ChangeEntry> = uow.detect_changes();
    assert_eq!(state_of(&entries, line_id), EntityState::Deleted);
}

#[test]
fn test_soft_delete_is_modified() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    let order: Order = create_stored_order(1, &[]);
    let order_id: Uuid = order.id();
    uow.attach_order(order).unwrap();

    uow.order_mut(order_id).unwrap().delete();

    assert_eq!(
        state_of(&uow.detect_changes(), order_id),
        EntityState::Modified
    );
}

#[test]
fn test_tracking_same_order_twice_fails() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    let order: Order = create_stored_order(1, &[]);
    uow.attach_order(order.clone()).unwrap();

    let result = uow.attach_order(order.clone());

    assert!(matches!(result, Err(CoreError::AlreadyTracked { key }) if key == order.key()));
}

#[test]
fn test_attached_menu_pizza_is_unchanged() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    uow.attach_pizza(Menu::find(pizza_ids::PUGLIESE).unwrap().clone())
        .unwrap();

    assert!(!uow.has_changes());
    assert!(uow.pizza(pizza_ids::PUGLIESE).is_some());
}
