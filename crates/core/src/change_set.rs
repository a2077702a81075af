// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria_domain::{EntityCore, EntityKey, Reference};

use crate::state::EntityState;

/// A detected change, detached from the tracked entity.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeEntry {
    pub key: EntityKey,
    pub state: EntityState,
    pub references: Vec<Reference>,
}

/// A tracked entity as seen by save interceptors.
///
/// `core` is `None` for entities in the [`EntityState::Deleted`] state, which
/// no longer exist in their aggregate.
#[derive(Debug)]
pub struct TrackedEntry<'a> {
    key: EntityKey,
    state: EntityState,
    references: Vec<Reference>,
    core: Option<&'a mut EntityCore>,
}

impl<'a> TrackedEntry<'a> {
    pub(crate) const fn new(
        key: EntityKey,
        state: EntityState,
        references: Vec<Reference>,
        core: Option<&'a mut EntityCore>,
    ) -> Self {
        Self {
            key,
            state,
            references,
            core,
        }
    }

    #[must_use]
    pub const fn key(&self) -> EntityKey {
        self.key
    }

    #[must_use]
    pub const fn state(&self) -> EntityState {
        self.state
    }

    #[must_use]
    pub fn references(&self) -> &[Reference] {
        &self.references
    }

    /// Overrides the detected state. The store writes whatever state the
    /// entry has once all interceptors have run.
    pub const fn set_state(&mut self, state: EntityState) {
        self.state = state;
    }

    pub fn core_mut(&mut self) -> Option<&mut EntityCore> {
        self.core.as_deref_mut()
    }

    /// Returns `true` if this entry's changes belong to `root`'s aggregate.
    #[must_use]
    pub fn is_changed_child_of(&self, root: EntityKey) -> bool {
        self.state.is_changed() && self.references.iter().any(|r| r.is_child_of(root))
    }

    pub(crate) fn summary(&self) -> ChangeEntry {
        ChangeEntry {
            key: self.key,
            state: self.state,
            references: self.references.clone(),
        }
    }
}

/// Every entity tracked by a unit of work, with its pending state.
#[derive(Debug, Default)]
pub struct ChangeSet<'a> {
    entries: Vec<TrackedEntry<'a>>,
}

impl<'a> ChangeSet<'a> {
    pub(crate) const fn new(entries: Vec<TrackedEntry<'a>>) -> Self {
        Self { entries }
    }

    #[must_use]
    pub fn entries(&self) -> &[TrackedEntry<'a>] {
        &self.entries
    }

    pub fn entries_mut(&mut self) -> &mut [TrackedEntry<'a>] {
        &mut self.entries
    }

    #[must_use]
    pub fn state_of(&self, key: EntityKey) -> Option<EntityState> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(TrackedEntry::state)
    }

    /// Aggregate roots that have at least one added, modified or deleted child.
    ///
    /// Children are found by scanning every tracked entry for a foreign key
    /// into the root, so a line item counts even though it is stored in its
    /// own table.
    #[must_use]
    pub fn roots_with_changed_children(&self) -> Vec<EntityKey> {
        self.entries
            .iter()
            .filter(|root| root.key.kind.is_aggregate_root())
            .filter(|root| {
                self.entries
                    .iter()
                    .any(|child| child.is_changed_child_of(root.key))
            })
            .map(TrackedEntry::key)
            .collect()
    }

    pub(crate) fn summaries(&self) -> Vec<ChangeEntry> {
        self.entries.iter().map(TrackedEntry::summary).collect()
    }
}
