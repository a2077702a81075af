// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Static registry of persisted entity types.
//!
//! Every persisted type declares here whether it is an aggregate root and
//! which of its columns reference another entity. Change tracking uses this
//! table to find the aggregate roots affected by a child change.

use uuid::Uuid;

/// The persisted entity types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum EntityKind {
    Pizza,
    Order,
    OrderPizza,
}

/// A column on one entity that holds the id of another entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ForeignKey {
    /// The entity type the column points at.
    pub target: EntityKind,
    /// The column holding the target id.
    pub column: &'static str,
    /// Whether the referencing row is part of the target's aggregate.
    ///
    /// Only changes to rows inside an aggregate advance the root's version.
    /// A line item referencing a menu pizza does not make the pizza dirty.
    pub within_aggregate: bool,
}

const ORDER_PIZZA_FOREIGN_KEYS: &[ForeignKey] = &[
    ForeignKey {
        target: EntityKind::Order,
        column: "order_id",
        within_aggregate: true,
    },
    ForeignKey {
        target: EntityKind::Pizza,
        column: "pizza_id",
        within_aggregate: false,
    },
];

impl EntityKind {
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Pizza => "Pizza",
            Self::Order => "Order",
            Self::OrderPizza => "OrderPizza",
        }
    }

    /// Returns `true` if rows of this kind carry a concurrency version.
    #[must_use]
    pub const fn is_aggregate_root(self) -> bool {
        match self {
            Self::Pizza | Self::Order => true,
            Self::OrderPizza => false,
        }
    }

    #[must_use]
    pub const fn foreign_keys(self) -> &'static [ForeignKey] {
        match self {
            Self::Pizza | Self::Order => &[],
            Self::OrderPizza => ORDER_PIZZA_FOREIGN_KEYS,
        }
    }
}

impl std::fmt::Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

/// Identifies a single tracked entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityKey {
    pub kind: EntityKind,
    pub id: Uuid,
}

impl EntityKey {
    #[must_use]
    pub const fn new(kind: EntityKind, id: Uuid) -> Self {
        Self { kind, id }
    }
}

impl std::fmt::Display for EntityKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.kind, self.id)
    }
}

/// A resolved foreign key value on a concrete entity.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Reference {
    pub foreign_key: ForeignKey,
    pub target: EntityKey,
}

impl Reference {
    /// Returns `true` if this reference places the holder inside `root`'s aggregate.
    #[must_use]
    pub fn is_child_of(&self, root: EntityKey) -> bool {
        self.foreign_key.within_aggregate && self.target == root
    }
}
