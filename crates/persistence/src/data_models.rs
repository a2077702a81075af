// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Row types and their conversions to and from domain objects.

use diesel::prelude::*;
use pizzeria_audit::AuditTrail;
use pizzeria_domain::{
    DomainError, Entity, EntityCore, Order, OrderDetails, OrderPizza, Pizza, Price, Version,
};
use uuid::Uuid;

use crate::diesel_schema::{order_pizzas, orders, pizzas};
use crate::error::PersistenceError;
use crate::timestamps::{from_storage, from_storage_opt, to_storage, to_storage_opt};

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct PizzaRow {
    pub id: String,
    pub name: String,
    pub description: String,
    pub price_cents: i32,
    pub version: i64,
    pub created_by: String,
    pub created_at_utc: String,
    pub modified_by: String,
    pub modified_at_utc: String,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = orders)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderRow {
    pub id: String,
    pub user_id: String,
    pub delivery_address: Option<String>,
    pub started_at_utc: String,
    pub submitted_at_utc: Option<String>,
    pub prepared_at_utc: Option<String>,
    pub completed_at_utc: Option<String>,
    pub version: i64,
    pub created_by: String,
    pub created_at_utc: String,
    pub modified_by: String,
    pub modified_at_utc: String,
    pub is_deleted: bool,
}

#[derive(Debug, Clone, Queryable, Selectable, Insertable)]
#[diesel(table_name = order_pizzas)]
#[diesel(check_for_backend(diesel::sqlite::Sqlite))]
pub struct OrderPizzaRow {
    pub id: String,
    pub order_id: String,
    pub pizza_id: String,
    pub quantity: i32,
    pub created_by: String,
    pub created_at_utc: String,
    pub modified_by: String,
    pub modified_at_utc: String,
    pub is_deleted: bool,
}

/// Audit columns shared by every table, already encoded for storage.
pub struct AuditColumns {
    pub created_by: String,
    pub created_at_utc: String,
    pub modified_by: String,
    pub modified_at_utc: String,
    pub is_deleted: bool,
}

impl AuditColumns {
    /// Encodes the audit trail and deleted flag of an entity.
    ///
    /// # Errors
    ///
    /// Returns an error if a timestamp cannot be formatted.
    pub fn from_core(core: &EntityCore) -> Result<Self, PersistenceError> {
        let audit: &AuditTrail = core.audit();
        Ok(Self {
            created_by: audit.created_by().to_string(),
            created_at_utc: to_storage(audit.created_at_utc())?,
            modified_by: audit.modified_by().to_string(),
            modified_at_utc: to_storage(audit.modified_at_utc())?,
            is_deleted: core.is_deleted(),
        })
    }
}

fn parse_id(table: &'static str, value: &str) -> Result<Uuid, PersistenceError> {
    Uuid::parse_str(value).map_err(|e| PersistenceError::CorruptRow {
        table,
        message: format!("invalid id '{value}': {e}"),
    })
}

fn version_to_storage(version: Version) -> Result<i64, PersistenceError> {
    i64::try_from(version.value())
        .map_err(|_| PersistenceError::DatabaseError(format!("version {version} out of range")))
}

fn version_from_storage(table: &'static str, value: i64) -> Result<Version, PersistenceError> {
    u64::try_from(value)
        .map(Version::new)
        .map_err(|_| PersistenceError::CorruptRow {
            table,
            message: format!("negative version {value}"),
        })
}

fn rehydrate_core(
    table: &'static str,
    id: &str,
    created_by: String,
    created_at_utc: &str,
    modified_by: String,
    modified_at_utc: &str,
    is_deleted: bool,
) -> Result<EntityCore, PersistenceError> {
    let audit: AuditTrail = AuditTrail::rehydrate(
        created_by,
        from_storage(created_at_utc)?,
        modified_by,
        from_storage(modified_at_utc)?,
    );
    Ok(EntityCore::rehydrate(parse_id(table, id)?, audit, is_deleted))
}

fn corrupt(table: &'static str) -> impl Fn(DomainError) -> PersistenceError {
    move |e| PersistenceError::CorruptRow {
        table,
        message: e.to_string(),
    }
}

impl PizzaRow {
    /// Encodes a pizza as it will be stored at `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if a column cannot be encoded.
    pub fn from_domain(pizza: &Pizza, version: Version) -> Result<Self, PersistenceError> {
        let audit: AuditColumns = AuditColumns::from_core(pizza.core())?;
        Ok(Self {
            id: pizza.id().to_string(),
            name: pizza.name().to_string(),
            description: pizza.description().to_string(),
            price_cents: i32::try_from(pizza.price().cents()).map_err(|_| {
                PersistenceError::DatabaseError(format!("price {} out of range", pizza.price()))
            })?,
            version: version_to_storage(version)?,
            created_by: audit.created_by,
            created_at_utc: audit.created_at_utc,
            modified_by: audit.modified_by,
            modified_at_utc: audit.modified_at_utc,
            is_deleted: audit.is_deleted,
        })
    }

    /// Decodes a stored pizza.
    ///
    /// # Errors
    ///
    /// Returns an error if any column fails validation.
    pub fn into_domain(self) -> Result<Pizza, PersistenceError> {
        const TABLE: &str = "pizzas";
        let core: EntityCore = rehydrate_core(
            TABLE,
            &self.id,
            self.created_by,
            &self.created_at_utc,
            self.modified_by,
            &self.modified_at_utc,
            self.is_deleted,
        )?;
        let cents: u32 =
            u32::try_from(self.price_cents).map_err(|_| PersistenceError::CorruptRow {
                table: TABLE,
                message: format!("negative price {}", self.price_cents),
            })?;
        let price: Price = Price::from_cents(cents).map_err(corrupt(TABLE))?;

        Pizza::rehydrate(
            core,
            version_from_storage(TABLE, self.version)?,
            self.name,
            self.description,
            price,
        )
        .map_err(corrupt(TABLE))
    }
}

impl OrderRow {
    /// Encodes the order's own columns as they will be stored at `version`.
    ///
    /// # Errors
    ///
    /// Returns an error if a column cannot be encoded.
    pub fn from_domain(order: &Order, version: Version) -> Result<Self, PersistenceError> {
        let audit: AuditColumns = AuditColumns::from_core(order.core())?;
        let details: &OrderDetails = order.details();
        Ok(Self {
            id: order.id().to_string(),
            user_id: details.user_id().to_string(),
            delivery_address: details.delivery_address().map(str::to_string),
            started_at_utc: to_storage(details.started_at())?,
            submitted_at_utc: to_storage_opt(details.submitted_at())?,
            prepared_at_utc: to_storage_opt(details.prepared_at())?,
            completed_at_utc: to_storage_opt(details.completed_at())?,
            version: version_to_storage(version)?,
            created_by: audit.created_by,
            created_at_utc: audit.created_at_utc,
            modified_by: audit.modified_by,
            modified_at_utc: audit.modified_at_utc,
            is_deleted: audit.is_deleted,
        })
    }

    /// Decodes a stored order together with its line items.
    ///
    /// # Errors
    ///
    /// Returns an error if any column fails validation or a line item
    /// belongs to another order.
    pub fn into_domain(self, lines: Vec<OrderPizzaRow>) -> Result<Order, PersistenceError> {
        const TABLE: &str = "orders";
        let core: EntityCore = rehydrate_core(
            TABLE,
            &self.id,
            self.created_by,
            &self.created_at_utc,
            self.modified_by,
            &self.modified_at_utc,
            self.is_deleted,
        )?;
        let details: OrderDetails = OrderDetails::new(
            self.user_id,
            self.delivery_address,
            from_storage(&self.started_at_utc)?,
            from_storage_opt(self.submitted_at_utc.as_deref())?,
            from_storage_opt(self.prepared_at_utc.as_deref())?,
            from_storage_opt(self.completed_at_utc.as_deref())?,
        )
        .map_err(corrupt(TABLE))?;
        let pizzas: Vec<OrderPizza> = lines
            .into_iter()
            .map(OrderPizzaRow::into_domain)
            .collect::<Result<_, _>>()?;

        Order::rehydrate(
            core,
            version_from_storage(TABLE, self.version)?,
            details,
            pizzas,
        )
        .map_err(corrupt(TABLE))
    }
}

impl OrderPizzaRow {
    /// Encodes a line item.
    ///
    /// # Errors
    ///
    /// Returns an error if a column cannot be encoded.
    pub fn from_domain(line: &OrderPizza) -> Result<Self, PersistenceError> {
        let audit: AuditColumns = AuditColumns::from_core(line.core())?;
        Ok(Self {
            id: line.id().to_string(),
            order_id: line.order_id().to_string(),
            pizza_id: line.pizza_id().to_string(),
            quantity: i32::try_from(line.quantity()).map_err(|_| {
                PersistenceError::DatabaseError(format!(
                    "quantity {} out of range",
                    line.quantity()
                ))
            })?,
            created_by: audit.created_by,
            created_at_utc: audit.created_at_utc,
            modified_by: audit.modified_by,
            modified_at_utc: audit.modified_at_utc,
            is_deleted: audit.is_deleted,
        })
    }

    /// Decodes a stored line item.
    ///
    /// # Errors
    ///
    /// Returns an error if any column fails validation.
    pub fn into_domain(self) -> Result<OrderPizza, PersistenceError> {
        const TABLE: &str = "order_pizzas";
        let core: EntityCore = rehydrate_core(
            TABLE,
            &self.id,
            self.created_by,
            &self.created_at_utc,
            self.modified_by,
            &self.modified_at_utc,
            self.is_deleted,
        )?;
        let quantity: u32 =
            u32::try_from(self.quantity).map_err(|_| PersistenceError::CorruptRow {
                table: TABLE,
                message: format!("negative quantity {}", self.quantity),
            })?;

        OrderPizza::rehydrate(
            core,
            parse_id(TABLE, &self.order_id)?,
            parse_id(TABLE, &self.pizza_id)?,
            quantity,
        )
        .map_err(corrupt(TABLE))
    }
}
