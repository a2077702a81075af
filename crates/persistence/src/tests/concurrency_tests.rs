// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria::UnitOfWork;
use pizzeria_domain::{AggregateRoot, Entity, EntityKey, Menu, Order, Pizza, Version, pizza_ids};
use uuid::Uuid;

use super::{attach_stored_order, create_seeded_persistence, create_test_actor, save_new_order};
use crate::{Persistence, PersistenceError};

#[test]
fn test_stale_order_write_is_rejected() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");
    let mut first: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    let mut second: UnitOfWork = attach_stored_order(&mut persistence, order_id);

    first
        .order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::MARGHERITA).unwrap());
    persistence.save_changes(&mut first, &create_test_actor()).unwrap();

    second
        .order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::FRUTTI_DI_MARE).unwrap());
    let result: Result<_, PersistenceError> =
        persistence.save_changes(&mut second, &create_test_actor());

    let Err(PersistenceError::ConcurrencyConflict {
        entity,
        expected_version,
    }) = result
    else {
        panic!("expected a concurrency conflict, got {result:?}");
    };
    let order: Order = persistence.load_order(order_id).unwrap().unwrap();
    assert_eq!(entity, order.key());
    assert_eq!(expected_version, Some(Version::INITIAL));
    assert_eq!(order.version(), Version::new(2));
    assert_eq!(order.pizzas().len(), 1);
    assert!(order.line_for(pizza_ids::FRUTTI_DI_MARE).is_none());
}

#[test]
fn test_conflict_rolls_back_earlier_writes_in_same_save() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");
    let mut stale: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    let pizza: Pizza = persistence
        .find_pizza(pizza_ids::QUATTRO_STAGIONI)
        .unwrap()
        .unwrap();
    stale.attach_pizza(pizza).unwrap();

    let mut winner: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    winner
        .order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::CRUDO).unwrap());
    persistence.save_changes(&mut winner, &create_test_actor()).unwrap();

    assert!(stale.pizza_mut(pizza_ids::QUATTRO_STAGIONI).unwrap().delete());
    stale
        .order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::CRUDO).unwrap());
    let result = persistence.save_changes(&mut stale, &create_test_actor());

    assert!(matches!(
        result,
        Err(PersistenceError::ConcurrencyConflict { .. })
    ));
    assert!(persistence
        .find_pizza(pizza_ids::QUATTRO_STAGIONI)
        .unwrap()
        .is_some());
    assert_eq!(
        persistence
            .load_order(order_id)
            .unwrap()
            .unwrap()
            .line_for(pizza_ids::CRUDO)
            .unwrap()
            .quantity(),
        1
    );
}

#[test]
fn test_retry_from_fresh_read_succeeds_after_conflict() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");
    let mut first: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    let mut second: UnitOfWork = attach_stored_order(&mut persistence, order_id);

    first
        .order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::PUGLIESE).unwrap());
    persistence.save_changes(&mut first, &create_test_actor()).unwrap();
    second
        .order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::PUGLIESE).unwrap());
    assert!(persistence.save_changes(&mut second, &create_test_actor()).is_err());

    let mut retry: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    retry
        .order_mut(order_id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::PUGLIESE).unwrap());
    persistence.save_changes(&mut retry, &create_test_actor()).unwrap();

    let order: Order = persistence.load_order(order_id).unwrap().unwrap();
    assert_eq!(order.version(), Version::new(3));
    assert_eq!(order.line_for(pizza_ids::PUGLIESE).unwrap().quantity(), 2);
    assert_eq!(retry.order(order_id).unwrap().version(), Version::new(3));
}

#[test]
fn test_conflict_reports_order_key() {
    let mut persistence: Persistence = create_seeded_persistence();
    let order_id: Uuid = save_new_order(&mut persistence, "user-1");
    let mut first: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    let mut second: UnitOfWork = attach_stored_order(&mut persistence, order_id);
    let expected_key: EntityKey = first.order(order_id).unwrap().key();

    first
        .order_mut(order_id)
        .unwrap()
        .set_delivery_address(Some(String::from("2 Via Po")))
        .unwrap();
    second
        .order_mut(order_id)
        .unwrap()
        .set_delivery_address(Some(String::from("3 Via Po")))
        .unwrap();
    persistence.save_changes(&mut first, &create_test_actor()).unwrap();
    let err: PersistenceError = persistence
        .save_changes(&mut second, &create_test_actor())
        .unwrap_err();

    assert_eq!(
        err.to_string(),
        format!("Concurrent modification of {expected_key} (expected version 1)")
    );
}
