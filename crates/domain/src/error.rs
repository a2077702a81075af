// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use thiserror::Error;
use uuid::Uuid;

/// Errors that can occur during domain validation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DomainError {
    /// A text field exceeds its storage length.
    #[error("{field} must be at most {max} characters (got {actual})")]
    FieldTooLong {
        /// The field name.
        field: &'static str,
        /// The maximum allowed length in characters.
        max: usize,
        /// The actual length in characters.
        actual: usize,
    },
    /// A required text field is empty or whitespace.
    #[error("{field} must not be empty")]
    EmptyField {
        /// The field name.
        field: &'static str,
    },
    /// A price is negative, too precise, or too large.
    #[error("Invalid price: {reason}")]
    InvalidPrice {
        /// Why the price was rejected.
        reason: String,
    },
    /// A line item quantity is not a positive whole number.
    #[error("Invalid quantity {quantity}: must be at least 1")]
    InvalidQuantity {
        /// The rejected quantity.
        quantity: u32,
    },
    /// A line item claims to belong to a different order.
    #[error("Line item {line_item_id} belongs to order {actual_order_id}, not {order_id}")]
    LineItemOrderMismatch {
        /// The line item.
        line_item_id: Uuid,
        /// The order being reconstructed.
        order_id: Uuid,
        /// The order recorded on the line item.
        actual_order_id: Uuid,
    },
}

/// Validates a required text field against its maximum length in characters.
pub(crate) fn validate_required(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), DomainError> {
    if value.trim().is_empty() {
        return Err(DomainError::EmptyField { field });
    }
    validate_length(field, value, max)
}

/// Validates a text field against its maximum length in characters.
pub(crate) fn validate_length(
    field: &'static str,
    value: &str,
    max: usize,
) -> Result<(), DomainError> {
    let actual: usize = value.chars().count();
    if actual > max {
        return Err(DomainError::FieldTooLong { field, max, actual });
    }
    Ok(())
}
