// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria_audit::Actor;
use pizzeria_persistence::Persistence;
use uuid::Uuid;

use crate::{StartOrderResponse, start_order};

pub fn create_test_actor() -> Actor {
    Actor::new("web-user")
}

pub fn create_test_persistence() -> Persistence {
    let mut persistence: Persistence = Persistence::new_in_memory().expect("in-memory database");
    persistence
        .seed_menu(&Actor::system())
        .expect("menu seeds");
    persistence
}

pub fn start_test_order(persistence: &mut Persistence) -> Uuid {
    let response: StartOrderResponse =
        start_order(persistence, &create_test_actor()).expect("order starts");
    response.order_id
}
