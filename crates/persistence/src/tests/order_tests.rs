// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria::{CommitReceipt, UnitOfWork};
use pizzeria_audit::Actor;
use pizzeria_domain::{AggregateRoot, Entity, Menu, Order, OrderPizza, Version, pizza_ids};
use time::OffsetDateTime;
use time::macros::datetime;
use uuid::Uuid;

use super::{attach_stored_order, create_seeded_persistence, create_test_actor, save_new_order};
use crate::Persistence;

fn add_pizza_and_save(persistence: &mut Persistence, order_id: Uuid, pizza_id: Uuid, actor: &Actor) {
    let mut uow: UnitOfWork = attach_stored_order(persistence, order_id);
    uow.order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_id).unwrap());
    persistence.save_changes(&mut uow, actor).unwrap();
}

#[test]
fn test_new_order_round_trips_with_initial_version() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-42");

    let order: Order = persistence.load_order(order_id).unwrap().unwrap();

    assert_eq!(order.user_id(), "user-42");
    assert_eq!(order.version(), Version::INITIAL);
    assert!(order.pizzas().is_empty());
    assert!(order.delivery_address().is_none());
    assert!(!order.is_submitted());
    assert_eq!(order.created_by(), "test-actor");
    assert_eq!(order.modified_by(), "test-actor");
}

#[test]
fn test_load_order_returns_none_for_unknown_id() {
    let mut persistence: Persistence = create_seeded_persistence();

    assert!(persistence.load_order(Uuid::new_v4()).unwrap().is_none());
}

#[test]
fn test_adding_pizza_bumps_order_version_and_stores_line() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");

    add_pizza_and_save(
        &mut persistence,
        order_id,
        pizza_ids::MARGHERITA,
        &create_test_actor(),
    );
    let order: Order = persistence.load_order(order_id).unwrap().unwrap();

    assert_eq!(order.version(), Version::new(2));
    assert_eq!(order.pizzas().len(), 1);
    let line: &OrderPizza = order.line_for(pizza_ids::MARGHERITA).unwrap();
    assert_eq!(line.quantity(), 1);
    assert_eq!(line.order_id(), order_id);
}

#[test]
fn test_adding_same_pizza_twice_increments_quantity() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");

    add_pizza_and_save(&mut persistence, order_id, pizza_ids::CRUDO, &create_test_actor());
    add_pizza_and_save(&mut persistence, order_id, pizza_ids::CRUDO, &create_test_actor());
    let order: Order = persistence.load_order(order_id).unwrap().unwrap();

    assert_eq!(order.version(), Version::new(3));
    assert_eq!(order.pizzas().len(), 1);
    assert_eq!(order.line_for(pizza_ids::CRUDO).unwrap().quantity(), 2);
}

#[test]
fn test_child_change_stamps_order_modification_only() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");
    let stored: Order = persistence.load_order(order_id).unwrap().unwrap();

    add_pizza_and_save(
        &mut persistence,
        order_id,
        pizza_ids::MARINARA,
        &Actor::new("clerk-9"),
    );
    let order: Order = persistence.load_order(order_id).unwrap().unwrap();

    assert_eq!(order.created_by(), "test-actor");
    assert_eq!(order.created_at_utc(), stored.created_at_utc());
    assert_eq!(order.modified_by(), "clerk-9");
    assert!(order.modified_at_utc() >= stored.modified_at_utc());
    let line: &OrderPizza = order.line_for(pizza_ids::MARINARA).unwrap();
    assert_eq!(line.created_by(), "clerk-9");
    assert_eq!(line.modified_by(), "clerk-9");
}

#[test]
fn test_removed_pizza_is_deleted_from_storage() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");
    add_pizza_and_save(&mut persistence, order_id, pizza_ids::CARBONARA, &create_test_actor());
    add_pizza_and_save(&mut persistence, order_id, pizza_ids::MONTANARA, &create_test_actor());

    let mut uow: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    assert!(uow.order_mut(order_id).unwrap().remove_pizza(pizza_ids::CARBONARA));
    persistence.save_changes(&mut uow, &create_test_actor()).unwrap();
    let order: Order = persistence.load_order(order_id).unwrap().unwrap();

    assert_eq!(order.version(), Version::new(4));
    assert!(order.line_for(pizza_ids::CARBONARA).is_none());
    assert_eq!(order.line_for(pizza_ids::MONTANARA).unwrap().quantity(), 1);
}

#[test]
fn test_delivery_address_round_trips() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");

    let mut uow: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    uow.order_mut(order_id)
        .unwrap()
        .set_delivery_address(Some(String::from("1 Via Roma")))
        .unwrap();
    persistence.save_changes(&mut uow, &create_test_actor()).unwrap();
    let order: Order = persistence.load_order(order_id).unwrap().unwrap();

    assert_eq!(order.delivery_address(), Some("1 Via Roma"));
    assert!(order.is_delivery_order());
    assert_eq!(order.version(), Version::new(2));
}

#[test]
fn test_saving_without_changes_writes_nothing() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");

    let mut uow: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    let receipt: CommitReceipt = persistence
        .save_changes(&mut uow, &create_test_actor())
        .unwrap();

    assert_eq!(receipt.rows_written(), 0);
    assert_eq!(
        persistence.load_order(order_id).unwrap().unwrap().version(),
        Version::INITIAL
    );
}

#[test]
fn test_latest_order_is_most_recently_started() {
    const EARLIER: OffsetDateTime = datetime!(2026-03-01 18:00 UTC);
    const LATER: OffsetDateTime = datetime!(2026-03-01 19:30 UTC);
    let mut persistence: Persistence = create_seeded_persistence();
    let later: Order = Order::start_new_at("user-2", LATER).unwrap();
    let earlier: Order = Order::start_new_at("user-1", EARLIER).unwrap();
    let later_id: Uuid = later.id();

    let mut uow: UnitOfWork = UnitOfWork::new();
    uow.add_order(later).unwrap();
    uow.add_order(earlier).unwrap();
    persistence.save_changes(&mut uow, &create_test_actor()).unwrap();

    let latest: Order = persistence.load_latest_order().unwrap().unwrap();
    assert_eq!(latest.id(), later_id);
    assert_eq!(latest.started_at(), LATER);
}

#[test]
fn test_soft_deleted_order_is_not_loaded() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");

    let mut uow: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    assert!(uow.order_mut(order_id).unwrap().delete());
    persistence.save_changes(&mut uow, &create_test_actor()).unwrap();

    assert!(persistence.load_order(order_id).unwrap().is_none());
    assert!(persistence.load_latest_order().unwrap().is_none());
}
