// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

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

mod entity;
mod error;
mod kind;
mod menu;
mod order;
mod pizza;
mod price;

#[cfg(test)]
mod tests;

pub use entity::{AggregateRoot, Entity, EntityCore, Version};
pub use error::DomainError;
pub use kind::{EntityKey, EntityKind, ForeignKey, Reference};
pub use menu::{Menu, pizza_ids};
pub use order::{
    DELIVERY_ADDRESS_MAX_LEN, Order, OrderDetails, OrderPizza, USER_ID_MAX_LEN,
};
pub use pizza::{PIZZA_DESCRIPTION_MAX_LEN, PIZZA_NAME_MAX_LEN, Pizza};
pub use price::Price;
