// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria::CoreError;
use pizzeria_domain::{DomainError, EntityKey, EntityKind, Version};
use pizzeria_persistence::PersistenceError;
use uuid::Uuid;

use crate::{
    ApiError, GENERIC_ERROR_MESSAGE, translate_core_error, translate_domain_error,
    translate_persistence_error,
};

#[test]
fn test_concurrency_conflict_translates_to_conflict() {
    let err: ApiError = translate_persistence_error(PersistenceError::ConcurrencyConflict {
        entity: EntityKey::new(EntityKind::Order, Uuid::new_v4()),
        expected_version: Some(Version::INITIAL),
    });

    assert_eq!(
        err,
        ApiError::Conflict {
            message: String::from(
                "The order was changed by another request. Reload it and try again."
            ),
        }
    );
}

#[test]
fn test_database_errors_are_not_exposed() {
    let err: ApiError = translate_persistence_error(PersistenceError::DatabaseError(
        String::from("disk I/O error at /var/lib/pizzeria.db"),
    ));

    assert_eq!(err.message(), GENERIC_ERROR_MESSAGE);
    assert!(!err.to_string().contains("/var/lib"));
}

#[test]
fn test_tracking_errors_pass_through_core_translation() {
    let err: ApiError = translate_persistence_error(PersistenceError::Tracking(
        CoreError::DomainViolation(DomainError::EmptyField { field: "user_id" }),
    ));

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "user_id"
    ));
}

#[test]
fn test_domain_field_errors_become_invalid_input() {
    let err: ApiError = translate_domain_error(DomainError::FieldTooLong {
        field: "delivery_address",
        max: 200,
        actual: 201,
    });

    assert!(matches!(
        err,
        ApiError::InvalidInput { ref field, .. } if field == "delivery_address"
    ));
}

#[test]
fn test_tracking_misuse_is_internal() {
    let err: ApiError = translate_core_error(CoreError::AlreadyTracked {
        key: EntityKey::new(EntityKind::Order, Uuid::new_v4()),
    });

    assert_eq!(
        err,
        ApiError::Internal {
            message: GENERIC_ERROR_MESSAGE.to_string(),
        }
    );
}
