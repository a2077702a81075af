// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use pizzeria::CoreError;
use pizzeria_domain::DomainError;
use pizzeria_persistence::PersistenceError;
use thiserror::Error;
use tracing::error;

/// Message returned for every failure the caller cannot act on.
pub const GENERIC_ERROR_MESSAGE: &str = "An error occurred while processing your request.";

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API contract.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ApiError {
    /// Invalid input was provided.
    #[error("Invalid input for field '{field}': {message}")]
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    #[error("{resource_type} not found: {message}")]
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// Another request changed the resource first. The caller should reload
    /// and retry.
    #[error("Conflict: {message}")]
    Conflict {
        /// A human-readable description of the conflict.
        message: String,
    },
    /// An internal error occurred.
    #[error("Internal error: {message}")]
    Internal {
        /// A description safe to show to the caller.
        message: String,
    },
}

impl ApiError {
    /// The short message shown to the caller.
    #[must_use]
    pub fn message(&self) -> &str {
        match self {
            Self::InvalidInput { message, .. }
            | Self::ResourceNotFound { message, .. }
            | Self::Conflict { message }
            | Self::Internal { message } => message,
        }
    }
}

/// Translates a domain error into an API error.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::FieldTooLong { field, .. } | DomainError::EmptyField { field } => {
            ApiError::InvalidInput {
                field: field.to_string(),
                message: err.to_string(),
            }
        }
        DomainError::InvalidPrice { .. } => ApiError::InvalidInput {
            field: String::from("price"),
            message: err.to_string(),
        },
        DomainError::InvalidQuantity { .. } => ApiError::InvalidInput {
            field: String::from("quantity"),
            message: err.to_string(),
        },
        DomainError::LineItemOrderMismatch { .. } => internal(&err),
    }
}

/// Translates a core error into an API error.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::AlreadyTracked { .. } | CoreError::NotTracked { .. } => internal(&err),
    }
}

/// Translates a persistence error into an API error.
///
/// Infrastructure failures are logged here and replaced with
/// [`GENERIC_ERROR_MESSAGE`].
#[must_use]
pub fn translate_persistence_error(err: PersistenceError) -> ApiError {
    match err {
        PersistenceError::ConcurrencyConflict { entity, .. } => ApiError::Conflict {
            message: format!(
                "The {} was changed by another request. Reload it and try again.",
                entity.kind.name().to_lowercase()
            ),
        },
        PersistenceError::NotFound(message) => ApiError::ResourceNotFound {
            resource_type: String::from("Resource"),
            message,
        },
        PersistenceError::Tracking(core_err) => translate_core_error(core_err),
        other => internal(&other),
    }
}

fn internal(err: &dyn std::error::Error) -> ApiError {
    error!(error = %err, "Request failed");
    ApiError::Internal {
        message: GENERIC_ERROR_MESSAGE.to_string(),
    }
}
