// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use uuid::Uuid;

use crate::{Entity, Menu, PIZZA_DESCRIPTION_MAX_LEN, PIZZA_NAME_MAX_LEN, Pizza, pizza_ids};

#[test]
fn test_menu_has_ten_distinct_pizzas() {
    let ids: HashSet<Uuid> = Menu::pizzas().iter().map(Entity::id).collect();

    assert_eq!(Menu::pizzas().len(), 10);
    assert_eq!(ids.len(), 10);
}

#[test]
fn test_margherita_costs_five() {
    let margherita: &Pizza = Menu::find(pizza_ids::MARGHERITA).unwrap();

    assert_eq!(margherita.name(), "Margherita");
    assert_eq!(margherita.price().to_string(), "5.00");
}

#[test]
fn test_ids_are_stable() {
    assert_eq!(
        pizza_ids::MARGHERITA.to_string(),
        "00000001-0000-0000-0000-000000000001"
    );
    assert_eq!(
        pizza_ids::MONTANARA.to_string(),
        "00000001-0000-0000-0000-000000000010"
    );
}

#[test]
fn test_lookup_by_name_ignores_case() {
    let pizza: &Pizza = Menu::pizza_by_name("quattro formaggi").unwrap();

    assert_eq!(pizza.id(), pizza_ids::QUATTRO_FORMAGGI);
    assert!(Menu::pizza_by_name("Hawaiian").is_none());
}

#[test]
fn test_unknown_id_is_not_on_menu() {
    assert!(Menu::find(Uuid::new_v4()).is_none());
    assert!(Menu::find(pizza_ids::PUGLIESE).is_some());
}

#[test]
fn test_catalog_fits_column_limits() {
    for pizza in Menu::pizzas() {
        assert!(pizza.name().chars().count() <= PIZZA_NAME_MAX_LEN);
        assert!(pizza.description().chars().count() <= PIZZA_DESCRIPTION_MAX_LEN);
    }
}
