// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only queries.
//!
//! Every query excludes soft-deleted rows unless its name says otherwise.
//!
//! - `pizzas`: menu items
//! - `orders`: orders with their line items

pub mod orders;
pub mod pizzas;
