// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria_audit::{Actor, AuditTrail};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::kind::{EntityKey, EntityKind, Reference};

/// Identity, soft-delete flag and audit trail shared by every persisted type.
#[derive(Debug, Clone)]
pub struct EntityCore {
    id: Uuid,
    audit: AuditTrail,
    is_deleted: bool,
}

impl EntityCore {
    /// Creates a core with a freshly generated id.
    #[must_use]
    pub fn new() -> Self {
        Self::with_id(Uuid::new_v4())
    }

    /// Creates a core with a pre-assigned id.
    #[must_use]
    pub fn with_id(id: Uuid) -> Self {
        Self {
            id,
            audit: AuditTrail::new(),
            is_deleted: false,
        }
    }

    /// Reconstructs a core from stored values.
    #[must_use]
    pub const fn rehydrate(id: Uuid, audit: AuditTrail, is_deleted: bool) -> Self {
        Self {
            id,
            audit,
            is_deleted,
        }
    }

    #[must_use]
    pub const fn id(&self) -> Uuid {
        self.id
    }

    #[must_use]
    pub const fn audit(&self) -> &AuditTrail {
        &self.audit
    }

    #[must_use]
    pub const fn is_deleted(&self) -> bool {
        self.is_deleted
    }

    /// Marks the entity deleted. Returns `false` if it already was.
    pub const fn delete(&mut self) -> bool {
        if self.is_deleted {
            return false;
        }
        self.is_deleted = true;
        true
    }

    /// Clears the deleted flag. Returns `false` if it was not set.
    pub const fn undelete(&mut self) -> bool {
        if !self.is_deleted {
            return false;
        }
        self.is_deleted = false;
        true
    }

    pub fn apply_creation_tracking_data(&mut self, actor: Option<&Actor>) {
        self.audit.apply_creation_tracking_data(actor);
    }

    pub fn apply_creation_tracking_data_at(&mut self, actor: Option<&Actor>, at: OffsetDateTime) {
        self.audit.apply_creation_tracking_data_at(actor, at);
    }

    pub fn apply_modification_tracking_data(&mut self, actor: Option<&Actor>) {
        self.audit.apply_modification_tracking_data(actor);
    }

    pub fn apply_modification_tracking_data_at(
        &mut self,
        actor: Option<&Actor>,
        at: OffsetDateTime,
    ) {
        self.audit.apply_modification_tracking_data_at(actor, at);
    }
}

impl Default for EntityCore {
    fn default() -> Self {
        Self::new()
    }
}

/// A persisted object.
///
/// Implementors only supply access to their [`EntityCore`]; identity,
/// soft delete and audit stamping are shared.
pub trait Entity {
    const KIND: EntityKind;

    fn core(&self) -> &EntityCore;

    fn core_mut(&mut self) -> &mut EntityCore;

    /// Returns the value of a foreign key column declared by [`EntityKind::foreign_keys`].
    fn foreign_key_value(&self, _column: &str) -> Option<Uuid> {
        None
    }

    fn id(&self) -> Uuid {
        self.core().id()
    }

    fn key(&self) -> EntityKey {
        EntityKey::new(Self::KIND, self.id())
    }

    fn is_deleted(&self) -> bool {
        self.core().is_deleted()
    }

    fn delete(&mut self) -> bool {
        self.core_mut().delete()
    }

    fn undelete(&mut self) -> bool {
        self.core_mut().undelete()
    }

    fn created_by(&self) -> &str {
        self.core().audit().created_by()
    }

    fn created_at_utc(&self) -> OffsetDateTime {
        self.core().audit().created_at_utc()
    }

    fn modified_by(&self) -> &str {
        self.core().audit().modified_by()
    }

    fn modified_at_utc(&self) -> OffsetDateTime {
        self.core().audit().modified_at_utc()
    }

    fn apply_creation_tracking_data(&mut self, actor: Option<&Actor>) {
        self.core_mut().apply_creation_tracking_data(actor);
    }

    fn apply_modification_tracking_data(&mut self, actor: Option<&Actor>) {
        self.core_mut().apply_modification_tracking_data(actor);
    }

    /// Resolves every declared foreign key to the entity it points at.
    fn references(&self) -> Vec<Reference> {
        Self::KIND
            .foreign_keys()
            .iter()
            .filter_map(|fk| {
                self.foreign_key_value(fk.column).map(|id| Reference {
                    foreign_key: *fk,
                    target: EntityKey::new(fk.target, id),
                })
            })
            .collect()
    }
}

/// Optimistic concurrency token carried by aggregate roots.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Version(u64);

impl Version {
    /// The version of an aggregate that has never been written.
    pub const UNSAVED: Self = Self(0);
    /// The version assigned by the first insert.
    pub const INITIAL: Self = Self(1);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0.saturating_add(1))
    }
}

impl std::fmt::Display for Version {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// An entity that is the unit of consistency and concurrency control.
///
/// The version is owned by the store: it is advanced atomically with every
/// committed write and handed back through [`AggregateRoot::accept_committed_version`].
pub trait AggregateRoot: Entity {
    fn version(&self) -> Version;

    fn accept_committed_version(&mut self, version: Version);
}

/// Implements identity equality for an entity type: same type and same id.
macro_rules! entity_identity {
    ($ty:ty) => {
        impl PartialEq for $ty {
            fn eq(&self, other: &Self) -> bool {
                std::ptr::eq(self, other) || self.core.id() == other.core.id()
            }
        }

        impl Eq for $ty {}

        impl std::hash::Hash for $ty {
            fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
                self.core.id().hash(state);
            }
        }
    };
}

pub(crate) use entity_identity;
