// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API boundary layer for the pizzeria store.
//!
//! Handlers validate input, run the domain operation through a unit of work,
//! persist it and map the result to response DTOs. Lower-layer errors are
//! translated explicitly so database details never reach a caller.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod error;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use error::{
    ApiError, GENERIC_ERROR_MESSAGE, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use handlers::{add_pizza_to_order, get_latest_order, get_order, list_pizzas, start_order};
pub use request_response::{
    AddPizzaToOrderRequest, OrderPizzaResponse, OrderResponse, PizzaResponse, StartOrderResponse,
};
