// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria_domain::{Entity, EntityKey, EntityKind, Order, OrderPizza, Pizza, Version};
use uuid::Uuid;

/// A single row-level write, in the order the store must apply it.
#[derive(Debug, Clone)]
pub enum PendingWrite {
    InsertPizza(Pizza),
    /// Update guarded by the version the pizza was loaded with.
    UpdatePizza {
        pizza: Pizza,
        expected_version: Version,
    },
    /// Insert of the order row only. Line items follow as separate writes.
    InsertOrder(Order),
    /// Update of the order row guarded by the version it was loaded with.
    UpdateOrder {
        order: Order,
        expected_version: Version,
    },
    InsertOrderPizza(OrderPizza),
    UpdateOrderPizza(OrderPizza),
    DeleteOrderPizza {
        id: Uuid,
    },
}

impl PendingWrite {
    /// Returns the key of the entity this write touches.
    #[must_use]
    pub fn key(&self) -> EntityKey {
        match self {
            Self::InsertPizza(pizza) | Self::UpdatePizza { pizza, .. } => pizza.key(),
            Self::InsertOrder(order) | Self::UpdateOrder { order, .. } => order.key(),
            Self::InsertOrderPizza(line) | Self::UpdateOrderPizza(line) => line.key(),
            Self::DeleteOrderPizza { id } => EntityKey::new(EntityKind::OrderPizza, *id),
        }
    }

    /// Aggregate-root writes come first so line items never reference a
    /// missing order.
    pub(crate) const fn rank(&self) -> u8 {
        match self {
            Self::InsertPizza(_) | Self::UpdatePizza { .. } => 0,
            Self::InsertOrder(_) | Self::UpdateOrder { .. } => 1,
            Self::InsertOrderPizza(_) | Self::UpdateOrderPizza(_) => 2,
            Self::DeleteOrderPizza { .. } => 3,
        }
    }
}

/// The writes produced by one save.
#[derive(Debug, Clone, Default)]
pub struct PendingChanges {
    writes: Vec<PendingWrite>,
}

impl PendingChanges {
    pub(crate) fn new(mut writes: Vec<PendingWrite>) -> Self {
        writes.sort_by_key(PendingWrite::rank);
        Self { writes }
    }

    #[must_use]
    pub fn writes(&self) -> &[PendingWrite] {
        &self.writes
    }

    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.writes.is_empty()
    }

    #[must_use]
    pub const fn len(&self) -> usize {
        self.writes.len()
    }
}

/// What the store committed: the new version of every aggregate root it wrote.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CommitReceipt {
    versions: Vec<(EntityKey, Version)>,
    rows_written: usize,
}

impl CommitReceipt {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            versions: Vec::new(),
            rows_written: 0,
        }
    }

    /// Records the version an aggregate root now has in storage.
    pub fn record_version(&mut self, key: EntityKey, version: Version) {
        self.versions.push((key, version));
    }

    pub const fn record_row(&mut self) {
        self.rows_written += 1;
    }

    #[must_use]
    pub fn versions(&self) -> &[(EntityKey, Version)] {
        &self.versions
    }

    #[must_use]
    pub const fn rows_written(&self) -> usize {
        self.rows_written
    }
}
