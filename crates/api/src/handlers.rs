// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Application handlers.
//!
//! Every write loads its aggregate into a fresh unit of work, mutates it and
//! saves it within the same call, so one request touches exactly one order.

use pizzeria::UnitOfWork;
use pizzeria_audit::Actor;
use pizzeria_domain::{Entity, Menu, Order, Pizza};
use pizzeria_persistence::Persistence;
use tracing::info;
use uuid::Uuid;

use crate::error::{
    ApiError, translate_core_error, translate_domain_error, translate_persistence_error,
};
use crate::request_response::{
    AddPizzaToOrderRequest, OrderResponse, PizzaResponse, StartOrderResponse,
};

/// Lists every pizza on the menu.
///
/// # Errors
///
/// Returns an error if the pizzas cannot be read.
pub fn list_pizzas(persistence: &mut Persistence) -> Result<Vec<PizzaResponse>, ApiError> {
    let pizzas: Vec<Pizza> = persistence
        .list_pizzas()
        .map_err(translate_persistence_error)?;

    Ok(pizzas.iter().map(PizzaResponse::from).collect())
}

/// Starts a new, empty order for the acting user.
///
/// The order's user id is the actor's id.
///
/// # Errors
///
/// Returns an error if the actor id is not a valid user id or the order
/// cannot be saved.
pub fn start_order(
    persistence: &mut Persistence,
    actor: &Actor,
) -> Result<StartOrderResponse, ApiError> {
    info!(actor = %actor, "Starting order");

    let order: Order = Order::start_new(actor.id()).map_err(translate_domain_error)?;
    let order_id: Uuid = order.id();

    let mut uow: UnitOfWork = UnitOfWork::new();
    uow.add_order(order).map_err(translate_core_error)?;
    persistence
        .save_changes(&mut uow, actor)
        .map_err(translate_persistence_error)?;

    info!(order_id = %order_id, "Order started");
    Ok(StartOrderResponse { order_id })
}

/// Adds one unit of a catalog pizza to an existing order.
///
/// The pizza id is validated against the menu before the order is loaded.
///
/// # Errors
///
/// - `InvalidInput` if the pizza id is not on the menu
/// - `ResourceNotFound` if the order does not exist
/// - `Conflict` if another request changed the order first
pub fn add_pizza_to_order(
    persistence: &mut Persistence,
    request: &AddPizzaToOrderRequest,
    actor: &Actor,
) -> Result<OrderResponse, ApiError> {
    info!(
        order_id = %request.order_id,
        pizza_id = %request.pizza_id,
        actor = %actor,
        "Adding pizza to order"
    );

    let pizza: &Pizza = Menu::find(request.pizza_id).ok_or_else(|| ApiError::InvalidInput {
        field: String::from("pizza_id"),
        message: String::from("Invalid pizza ID."),
    })?;

    let order: Order = persistence
        .load_order(request.order_id)
        .map_err(translate_persistence_error)?
        .ok_or_else(order_not_found)?;

    let mut uow: UnitOfWork = UnitOfWork::new();
    uow.attach_order(order).map_err(translate_core_error)?;
    let quantity: u32 = uow
        .order_mut(request.order_id)
        .ok_or_else(order_not_found)?
        .add_pizza(pizza)
        .quantity();

    persistence
        .save_changes(&mut uow, actor)
        .map_err(translate_persistence_error)?;

    info!(
        order_id = %request.order_id,
        pizza_id = %request.pizza_id,
        quantity,
        "Pizza added to order"
    );
    uow.order(request.order_id)
        .map(OrderResponse::from)
        .ok_or_else(order_not_found)
}

/// Reads an order with its line items.
///
/// # Errors
///
/// Returns `ResourceNotFound` if the order does not exist.
pub fn get_order(persistence: &mut Persistence, order_id: Uuid) -> Result<OrderResponse, ApiError> {
    persistence
        .load_order(order_id)
        .map_err(translate_persistence_error)?
        .as_ref()
        .map(OrderResponse::from)
        .ok_or_else(order_not_found)
}

/// Reads the most recently started order.
///
/// # Errors
///
/// Returns `ResourceNotFound` if there are no orders.
pub fn get_latest_order(persistence: &mut Persistence) -> Result<OrderResponse, ApiError> {
    persistence
        .load_latest_order()
        .map_err(translate_persistence_error)?
        .as_ref()
        .map(OrderResponse::from)
        .ok_or_else(order_not_found)
}

fn order_not_found() -> ApiError {
    ApiError::ResourceNotFound {
        resource_type: String::from("Order"),
        message: String::from("Order not found."),
    }
}
