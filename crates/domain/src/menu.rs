// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The fixed menu.
//!
//! The catalog doubles as seed data and as the source of truth for which
//! pizza ids may be ordered.

use std::sync::LazyLock;

use uuid::Uuid;

use crate::entity::Entity;
use crate::pizza::Pizza;
use crate::price::Price;

/// Stable ids of the catalog pizzas.
pub mod pizza_ids {
    use uuid::Uuid;

    pub const MARGHERITA: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0001);
    pub const MARINARA: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0002);
    pub const QUATTRO_STAGIONI: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0003);
    pub const CARBONARA: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0004);
    pub const FRUTTI_DI_MARE: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0005);
    pub const QUATTRO_FORMAGGI: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0006);
    pub const CRUDO: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0007);
    pub const NAPOLETANA: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0008);
    pub const PUGLIESE: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0009);
    pub const MONTANARA: Uuid = Uuid::from_u128(0x0000_0001_0000_0000_0000_0000_0000_0010);
}

struct CatalogEntry {
    id: Uuid,
    name: &'static str,
    description: &'static str,
    cents: u32,
}

const CATALOG: [CatalogEntry; 10] = [
    CatalogEntry {
        id: pizza_ids::MARGHERITA,
        name: "Margherita",
        description: "Tomato sauce, mozzarella, and oregano",
        cents: 500,
    },
    CatalogEntry {
        id: pizza_ids::MARINARA,
        name: "Marinara",
        description: "Tomato sauce, garlic and basil",
        cents: 550,
    },
    CatalogEntry {
        id: pizza_ids::QUATTRO_STAGIONI,
        name: "Quattro Stagioni",
        description: "Tomato sauce, mozzarella, mushrooms, ham, artichokes, olives, and oregano",
        cents: 800,
    },
    CatalogEntry {
        id: pizza_ids::CARBONARA,
        name: "Carbonara",
        description: "Tomato sauce, mozzarella, parmesan, eggs, and bacon",
        cents: 850,
    },
    CatalogEntry {
        id: pizza_ids::FRUTTI_DI_MARE,
        name: "Frutti di Mare",
        description: "Tomato sauce and seafood",
        cents: 850,
    },
    CatalogEntry {
        id: pizza_ids::QUATTRO_FORMAGGI,
        name: "Quattro Formaggi",
        description: "Tomato sauce, mozzarella, parmesan, gorgonzola cheese, artichokes, and oregano",
        cents: 850,
    },
    CatalogEntry {
        id: pizza_ids::CRUDO,
        name: "Crudo",
        description: "Tomato sauce, mozzarella, Parma ham, parmesan, mushrooms, and oregano",
        cents: 900,
    },
    CatalogEntry {
        id: pizza_ids::NAPOLETANA,
        name: "Napoletana",
        description: "Tomato sauce, mozzarella, oregano, anchovies",
        cents: 900,
    },
    CatalogEntry {
        id: pizza_ids::PUGLIESE,
        name: "Pugliese",
        description: "Tomato sauce, mozzarella, oregano, and onions",
        cents: 900,
    },
    CatalogEntry {
        id: pizza_ids::MONTANARA,
        name: "Montanara",
        description: "Tomato sauce, mozzarella, mushrooms, pepperoni, and oregano",
        cents: 900,
    },
];

static PIZZAS: LazyLock<Vec<Pizza>> = LazyLock::new(|| {
    CATALOG
        .iter()
        .map(|entry| {
            Pizza::catalog_entry(
                entry.id,
                entry.name,
                entry.description,
                Price::from_catalog(entry.cents),
            )
        })
        .collect()
});

/// Process-wide, read-only pizza catalog.
#[derive(Debug, Clone, Copy, Default)]
pub struct Menu;

impl Menu {
    /// Returns every catalog pizza in menu order.
    #[must_use]
    pub fn pizzas() -> &'static [Pizza] {
        &PIZZAS
    }

    #[must_use]
    pub fn find(id: Uuid) -> Option<&'static Pizza> {
        PIZZAS.iter().find(|pizza| pizza.id() == id)
    }

    /// Looks a pizza up by name, ignoring ASCII case.
    #[must_use]
    pub fn pizza_by_name(name: &str) -> Option<&'static Pizza> {
        PIZZAS
            .iter()
            .find(|pizza| pizza.name().eq_ignore_ascii_case(name.trim()))
    }
}
