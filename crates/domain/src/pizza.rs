// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use uuid::Uuid;

use crate::entity::{AggregateRoot, Entity, EntityCore, Version, entity_identity};
use crate::error::{DomainError, validate_length, validate_required};
use crate::kind::EntityKind;
use crate::price::Price;

pub const PIZZA_NAME_MAX_LEN: usize = 25;
pub const PIZZA_DESCRIPTION_MAX_LEN: usize = 500;

/// A menu item.
#[derive(Debug, Clone)]
pub struct Pizza {
    core: EntityCore,
    version: Version,
    name: String,
    description: String,
    price: Price,
}

entity_identity!(Pizza);

impl Pizza {
    /// Creates a new, unsaved pizza with a generated id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or too long, or the description
    /// is too long.
    pub fn new(
        name: impl Into<String>,
        description: impl Into<String>,
        price: Price,
    ) -> Result<Self, DomainError> {
        Self::with_id(Uuid::new_v4(), name, description, price)
    }

    /// Creates a new, unsaved pizza with a pre-assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if the name is empty or too long, or the description
    /// is too long.
    pub fn with_id(
        id: Uuid,
        name: impl Into<String>,
        description: impl Into<String>,
        price: Price,
    ) -> Result<Self, DomainError> {
        let name: String = name.into();
        let description: String = description.into();
        validate_fields(&name, &description)?;

        Ok(Self {
            core: EntityCore::with_id(id),
            version: Version::UNSAVED,
            name,
            description,
            price,
        })
    }

    pub(crate) fn catalog_entry(
        id: Uuid,
        name: &'static str,
        description: &'static str,
        price: Price,
    ) -> Self {
        Self {
            core: EntityCore::with_id(id),
            version: Version::UNSAVED,
            name: String::from(name),
            description: String::from(description),
            price,
        }
    }

    /// Reconstructs a pizza from stored values.
    ///
    /// # Errors
    ///
    /// Returns an error if the stored text no longer satisfies the field limits.
    pub fn rehydrate(
        core: EntityCore,
        version: Version,
        name: String,
        description: String,
        price: Price,
    ) -> Result<Self, DomainError> {
        validate_fields(&name, &description)?;
        Ok(Self {
            core,
            version,
            name,
            description,
            price,
        })
    }

    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[must_use]
    pub fn description(&self) -> &str {
        &self.description
    }

    #[must_use]
    pub const fn price(&self) -> Price {
        self.price
    }

    /// Returns `true` if the persisted columns of both pizzas match.
    #[must_use]
    pub fn same_state_as(&self, other: &Self) -> bool {
        self.name == other.name
            && self.description == other.description
            && self.price == other.price
            && self.core.is_deleted() == other.core.is_deleted()
    }
}

fn validate_fields(name: &str, description: &str) -> Result<(), DomainError> {
    validate_required("name", name, PIZZA_NAME_MAX_LEN)?;
    validate_length("description", description, PIZZA_DESCRIPTION_MAX_LEN)
}

impl Entity for Pizza {
    const KIND: EntityKind = EntityKind::Pizza;

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

impl AggregateRoot for Pizza {
    fn version(&self) -> Version {
        self.version
    }

    fn accept_committed_version(&mut self, version: Version) {
        self.version = version;
    }
}
