// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria_domain::{AggregateRoot, Entity, EntityKey, EntityKind, Menu, Order, Version, pizza_ids};
use uuid::Uuid;

use super::helpers::{create_stored_order, create_test_actor};
use crate::{CommitReceipt, CoreError, PendingChanges, UnitOfWork};

#[test]
fn test_accept_changes_adopts_versions_and_snapshots() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    let mut order: Order = Order::start_new("user-1").unwrap();
    order.add_pizza(Menu::find(pizza_ids::MARGHERITA).unwrap());
    let order_key: EntityKey = order.key();
    uow.add_order(order).unwrap();
    let _ = uow.prepare_save(&create_test_actor());

    let mut receipt: CommitReceipt = CommitReceipt::new();
    receipt.record_version(order_key, Version::INITIAL);
    uow.accept_changes(&receipt).unwrap();

    assert_eq!(uow.order(order_key.id).unwrap().version(), Version::INITIAL);
    assert!(!uow.has_changes());
    assert!(uow.prepare_save(&create_test_actor()).is_empty());
}

#[test]
fn test_changes_after_accept_are_relative_to_new_snapshot() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    let order: Order = create_stored_order(1, &[(pizza_ids::CRUDO, 1)]);
    let order_key: EntityKey = order.key();
    uow.attach_order(order).unwrap();

    uow.order_mut(order_key.id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::CRUDO).unwrap());
    let _ = uow.prepare_save(&create_test_actor());
    let mut receipt: CommitReceipt = CommitReceipt::new();
    receipt.record_version(order_key, Version::new(2));
    uow.accept_changes(&receipt).unwrap();

    uow.order_mut(order_key.id)
        .unwrap()
        .add_pizza(Menu::find(pizza_ids::CRUDO).unwrap());
    let changes: PendingChanges = uow.prepare_save(&create_test_actor());

    assert_eq!(changes.len(), 2);
    assert_eq!(
        uow.order(order_key.id).unwrap().line_for(pizza_ids::CRUDO).unwrap().quantity(),
        3
    );
    assert_eq!(uow.order(order_key.id).unwrap().version(), Version::new(2));
}

#[test]
fn test_accept_changes_rejects_unknown_roots() {
    let mut uow: UnitOfWork = UnitOfWork::new();
    uow.attach_order(create_stored_order(1, &[])).unwrap();
    let unknown: EntityKey = EntityKey::new(EntityKind::Order, Uuid::new_v4());

    let mut receipt: CommitReceipt = CommitReceipt::new();
    receipt.record_version(unknown, Version::new(2));

    assert_eq!(
        uow.accept_changes(&receipt),
        Err(CoreError::NotTracked { key: unknown })
    );
}

#[test]
fn test_receipt_lookup() {
    let key: EntityKey = EntityKey::new(EntityKind::Order, Uuid::new_v4());
    let mut receipt: CommitReceipt = CommitReceipt::new();
    receipt.record_version(key, Version::new(7));
    receipt.record_row();
    receipt.record_row();

    assert_eq!(receipt.versions(), &[(key, Version::new(7))]);
    assert_eq!(receipt.rows_written(), 2);
}
