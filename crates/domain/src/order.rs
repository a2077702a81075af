// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use time::OffsetDateTime;
use uuid::Uuid;

use crate::entity::{AggregateRoot, Entity, EntityCore, Version, entity_identity};
use crate::error::{DomainError, validate_length, validate_required};
use crate::kind::EntityKind;
use crate::pizza::Pizza;

pub const USER_ID_MAX_LEN: usize = 100;
pub const DELIVERY_ADDRESS_MAX_LEN: usize = 200;

// Any actor can start an order.
const _: () = assert!(pizzeria_audit::ACTOR_ID_MAX_LEN <= USER_ID_MAX_LEN);

/// The scalar columns of an order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderDetails {
    user_id: String,
    delivery_address: Option<String>,
    started_at: OffsetDateTime,
    submitted_at: Option<OffsetDateTime>,
    prepared_at: Option<OffsetDateTime>,
    completed_at: Option<OffsetDateTime>,
}

impl OrderDetails {
    /// Builds and validates order details.
    ///
    /// # Errors
    ///
    /// Returns an error if the user id is empty or too long, or the delivery
    /// address is too long.
    pub fn new(
        user_id: String,
        delivery_address: Option<String>,
        started_at: OffsetDateTime,
        submitted_at: Option<OffsetDateTime>,
        prepared_at: Option<OffsetDateTime>,
        completed_at: Option<OffsetDateTime>,
    ) -> Result<Self, DomainError> {
        validate_required("user_id", &user_id, USER_ID_MAX_LEN)?;
        if let Some(address) = &delivery_address {
            validate_length("delivery_address", address, DELIVERY_ADDRESS_MAX_LEN)?;
        }

        Ok(Self {
            user_id,
            delivery_address,
            started_at,
            submitted_at,
            prepared_at,
            completed_at,
        })
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        &self.user_id
    }

    #[must_use]
    pub fn delivery_address(&self) -> Option<&str> {
        self.delivery_address.as_deref()
    }

    #[must_use]
    pub const fn started_at(&self) -> OffsetDateTime {
        self.started_at
    }

    #[must_use]
    pub const fn submitted_at(&self) -> Option<OffsetDateTime> {
        self.submitted_at
    }

    #[must_use]
    pub const fn prepared_at(&self) -> Option<OffsetDateTime> {
        self.prepared_at
    }

    #[must_use]
    pub const fn completed_at(&self) -> Option<OffsetDateTime> {
        self.completed_at
    }
}

/// A customer order and its line items.
#[derive(Debug, Clone)]
pub struct Order {
    core: EntityCore,
    version: Version,
    details: OrderDetails,
    pizzas: Vec<OrderPizza>,
}

entity_identity!(Order);

impl Order {
    /// Starts a new, empty order for `user_id`.
    ///
    /// # Errors
    ///
    /// Returns an error if the user id is empty or longer than
    /// [`USER_ID_MAX_LEN`] characters.
    pub fn start_new(user_id: impl Into<String>) -> Result<Self, DomainError> {
        Self::start_new_at(user_id, OffsetDateTime::now_utc())
    }

    /// Starts a new, empty order with an explicit start time.
    ///
    /// # Errors
    ///
    /// Returns an error if the user id is empty or longer than
    /// [`USER_ID_MAX_LEN`] characters.
    pub fn start_new_at(
        user_id: impl Into<String>,
        started_at: OffsetDateTime,
    ) -> Result<Self, DomainError> {
        let details: OrderDetails =
            OrderDetails::new(user_id.into(), None, started_at, None, None, None)?;

        Ok(Self {
            core: EntityCore::new(),
            version: Version::UNSAVED,
            details,
            pizzas: Vec::new(),
        })
    }

    /// Reconstructs an order and its line items from stored values.
    ///
    /// # Errors
    ///
    /// Returns an error if any line item belongs to a different order.
    pub fn rehydrate(
        core: EntityCore,
        version: Version,
        details: OrderDetails,
        pizzas: Vec<OrderPizza>,
    ) -> Result<Self, DomainError> {
        if let Some(stray) = pizzas.iter().find(|line| line.order_id != core.id()) {
            return Err(DomainError::LineItemOrderMismatch {
                line_item_id: stray.id(),
                order_id: core.id(),
                actual_order_id: stray.order_id,
            });
        }

        Ok(Self {
            core,
            version,
            details,
            pizzas,
        })
    }

    /// Adds one unit of `pizza` to the order.
    ///
    /// If a live line item for the pizza exists its quantity is incremented,
    /// otherwise a new line item with quantity 1 is created. Catalog
    /// membership is checked by the caller.
    pub fn add_pizza(&mut self, pizza: &Pizza) -> &OrderPizza {
        let pizza_id: Uuid = pizza.id();
        let index: usize = if let Some(index) = self.live_line_index(pizza_id) {
            self.pizzas[index].increase_quantity();
            index
        } else {
            self.pizzas
                .push(OrderPizza::create_for_order(self.core.id(), pizza_id));
            self.pizzas.len() - 1
        };
        &self.pizzas[index]
    }

    /// Removes the line item for `pizza_id`. Returns `false` if there was none.
    pub fn remove_pizza(&mut self, pizza_id: Uuid) -> bool {
        match self.live_line_index(pizza_id) {
            Some(index) => {
                self.pizzas.remove(index);
                true
            }
            None => false,
        }
    }

    /// Sets or clears the delivery address.
    ///
    /// # Errors
    ///
    /// Returns an error if the address is longer than
    /// [`DELIVERY_ADDRESS_MAX_LEN`] characters.
    pub fn set_delivery_address(&mut self, address: Option<String>) -> Result<(), DomainError> {
        if let Some(address) = &address {
            validate_length("delivery_address", address, DELIVERY_ADDRESS_MAX_LEN)?;
        }
        self.details.delivery_address = address;
        Ok(())
    }

    /// Returns the live line item for `pizza_id`, if any.
    #[must_use]
    pub fn line_for(&self, pizza_id: Uuid) -> Option<&OrderPizza> {
        self.live_line_index(pizza_id).map(|index| &self.pizzas[index])
    }

    #[must_use]
    pub fn pizzas(&self) -> &[OrderPizza] {
        &self.pizzas
    }

    /// Splits the order into its own core and its line items for stamping.
    ///
    /// Only the unit of work's save pipeline calls this. Business code
    /// changes an order through its own methods, which never touch audit data.
    #[doc(hidden)]
    pub fn split_for_tracking(&mut self) -> (&mut EntityCore, &mut [OrderPizza]) {
        (&mut self.core, &mut self.pizzas)
    }

    #[must_use]
    pub const fn details(&self) -> &OrderDetails {
        &self.details
    }

    #[must_use]
    pub fn user_id(&self) -> &str {
        self.details.user_id()
    }

    #[must_use]
    pub fn delivery_address(&self) -> Option<&str> {
        self.details.delivery_address()
    }

    #[must_use]
    pub const fn started_at(&self) -> OffsetDateTime {
        self.details.started_at
    }

    #[must_use]
    pub const fn is_delivery_order(&self) -> bool {
        self.details.delivery_address.is_some()
    }

    #[must_use]
    pub const fn is_submitted(&self) -> bool {
        self.details.submitted_at.is_some()
    }

    #[must_use]
    pub const fn is_prepared(&self) -> bool {
        self.details.prepared_at.is_some()
    }

    #[must_use]
    pub const fn is_completed(&self) -> bool {
        self.details.completed_at.is_some()
    }

    /// Returns `true` if the order's own columns match, ignoring line items.
    #[must_use]
    pub fn same_state_as(&self, other: &Self) -> bool {
        self.details == other.details && self.core.is_deleted() == other.core.is_deleted()
    }

    fn live_line_index(&self, pizza_id: Uuid) -> Option<usize> {
        self.pizzas
            .iter()
            .position(|line| line.pizza_id == pizza_id && !line.is_deleted())
    }
}

impl Entity for Order {
    const KIND: EntityKind = EntityKind::Order;

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }
}

impl AggregateRoot for Order {
    fn version(&self) -> Version {
        self.version
    }

    fn accept_committed_version(&mut self, version: Version) {
        self.version = version;
    }
}

/// A line item: some quantity of one pizza within one order.
#[derive(Debug, Clone)]
pub struct OrderPizza {
    core: EntityCore,
    order_id: Uuid,
    pizza_id: Uuid,
    quantity: u32,
}

entity_identity!(OrderPizza);

impl OrderPizza {
    fn create_for_order(order_id: Uuid, pizza_id: Uuid) -> Self {
        Self {
            core: EntityCore::new(),
            order_id,
            pizza_id,
            quantity: 1,
        }
    }

    /// Reconstructs a line item from stored values.
    ///
    /// # Errors
    ///
    /// Returns an error if `quantity` is zero.
    pub fn rehydrate(
        core: EntityCore,
        order_id: Uuid,
        pizza_id: Uuid,
        quantity: u32,
    ) -> Result<Self, DomainError> {
        if quantity == 0 {
            return Err(DomainError::InvalidQuantity { quantity });
        }
        Ok(Self {
            core,
            order_id,
            pizza_id,
            quantity,
        })
    }

    const fn increase_quantity(&mut self) {
        self.quantity = self.quantity.saturating_add(1);
    }

    #[must_use]
    pub const fn order_id(&self) -> Uuid {
        self.order_id
    }

    #[must_use]
    pub const fn pizza_id(&self) -> Uuid {
        self.pizza_id
    }

    #[must_use]
    pub const fn quantity(&self) -> u32 {
        self.quantity
    }

    /// Returns `true` if the persisted columns of both line items match.
    #[must_use]
    pub fn same_state_as(&self, other: &Self) -> bool {
        self.order_id == other.order_id
            && self.pizza_id == other.pizza_id
            && self.quantity == other.quantity
            && self.core.is_deleted() == other.core.is_deleted()
    }
}

impl Entity for OrderPizza {
    const KIND: EntityKind = EntityKind::OrderPizza;

    fn core(&self) -> &EntityCore {
        &self.core
    }

    fn core_mut(&mut self) -> &mut EntityCore {
        &mut self.core
    }

    fn foreign_key_value(&self, column: &str) -> Option<Uuid> {
        match column {
            "order_id" => Some(self.order_id),
            "pizza_id" => Some(self.pizza_id),
            _ => None,
        }
    }
}
