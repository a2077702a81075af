// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::path::PathBuf;

use pizzeria_audit::Actor;
use uuid::Uuid;

use crate::Persistence;

#[test]
fn test_in_memory_database_initializes_with_foreign_keys() {
    let mut persistence: Persistence = Persistence::new_in_memory().unwrap();

    assert!(persistence.verify_foreign_key_enforcement().is_ok());
    assert!(persistence.list_pizzas().unwrap().is_empty());
    assert!(persistence.load_latest_order().unwrap().is_none());
}

#[test]
fn test_in_memory_databases_are_isolated() {
    let mut first: Persistence = Persistence::new_in_memory().unwrap();
    let mut second: Persistence = Persistence::new_in_memory().unwrap();

    first.seed_menu(&Actor::system()).unwrap();

    assert_eq!(first.list_pizzas().unwrap().len(), 10);
    assert!(second.list_pizzas().unwrap().is_empty());
}

#[test]
fn test_file_database_persists_across_connections() {
    let path: PathBuf = std::env::temp_dir().join(format!("pizzeria-{}.db", Uuid::new_v4()));

    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        assert_eq!(persistence.seed_menu(&Actor::system()).unwrap(), 10);
    }
    {
        let mut persistence: Persistence = Persistence::new_with_file(&path).unwrap();
        assert_eq!(persistence.seed_menu(&Actor::system()).unwrap(), 0);
        assert_eq!(persistence.list_pizzas().unwrap().len(), 10);
    }

    for suffix in ["", "-wal", "-shm"] {
        let _ = std::fs::remove_file(format!("{}{suffix}", path.display()));
    }
}
