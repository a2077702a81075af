// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API request and response data transfer objects.

use pizzeria_domain::{AggregateRoot, Entity, Order, OrderPizza, Pizza};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

/// A menu item.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PizzaResponse {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    /// Serialized as a JSON number with two places, e.g. `5.00`.
    #[serde(with = "rust_decimal::serde::arbitrary_precision")]
    pub price: Decimal,
}

impl From<&Pizza> for PizzaResponse {
    fn from(pizza: &Pizza) -> Self {
        Self {
            id: pizza.id(),
            name: pizza.name().to_string(),
            description: pizza.description().to_string(),
            price: pizza.price().amount(),
        }
    }
}

/// API response for a started order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StartOrderResponse {
    /// The new order's identifier.
    pub order_id: Uuid,
}

/// API request to add one unit of a pizza to an order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AddPizzaToOrderRequest {
    /// The order to change.
    pub order_id: Uuid,
    /// The catalog pizza to add.
    pub pizza_id: Uuid,
}

/// A line item of an order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderPizzaResponse {
    pub id: Uuid,
    pub pizza_id: Uuid,
    pub quantity: u32,
}

impl From<&OrderPizza> for OrderPizzaResponse {
    fn from(line: &OrderPizza) -> Self {
        Self {
            id: line.id(),
            pizza_id: line.pizza_id(),
            quantity: line.quantity(),
        }
    }
}

/// An order with its line items.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderResponse {
    pub id: Uuid,
    pub user_id: String,
    #[serde(with = "time::serde::rfc3339")]
    pub started_date_time: OffsetDateTime,
    pub delivery_address: Option<String>,
    pub is_delivery_order: bool,
    pub is_submitted: bool,
    pub is_prepared: bool,
    pub is_completed: bool,
    /// The committed version, used to detect concurrent changes.
    pub version: u64,
    pub pizzas: Vec<OrderPizzaResponse>,
}

impl From<&Order> for OrderResponse {
    fn from(order: &Order) -> Self {
        Self {
            id: order.id(),
            user_id: order.user_id().to_string(),
            started_date_time: order.started_at(),
            delivery_address: order.delivery_address().map(str::to_string),
            is_delivery_order: order.is_delivery_order(),
            is_submitted: order.is_submitted(),
            is_prepared: order.is_prepared(),
            is_completed: order.is_completed(),
            version: order.version().value(),
            pizzas: order.pizzas().iter().map(OrderPizzaResponse::from).collect(),
        }
    }
}
