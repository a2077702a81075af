// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use rust_decimal::Decimal;

use crate::error::DomainError;

/// A menu price with five significant digits, two of them after the point.
///
/// Stored as whole cents so arithmetic and storage stay exact.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Price {
    cents: u32,
}

impl Price {
    /// The largest representable price, 999.99.
    pub const MAX_CENTS: u32 = 99_999;

    /// Creates a price from whole cents.
    ///
    /// # Errors
    ///
    /// Returns an error if the value exceeds [`Self::MAX_CENTS`].
    pub fn from_cents(cents: u32) -> Result<Self, DomainError> {
        if cents > Self::MAX_CENTS {
            return Err(DomainError::InvalidPrice {
                reason: format!("{cents} cents exceeds the maximum of 999.99"),
            });
        }
        Ok(Self { cents })
    }

    /// Creates a price from a decimal amount such as `8.50`.
    ///
    /// # Errors
    ///
    /// Returns an error if the amount is negative, has more than two
    /// decimal places, or exceeds 999.99.
    pub fn from_decimal(amount: Decimal) -> Result<Self, DomainError> {
        if amount.is_sign_negative() && !amount.is_zero() {
            return Err(DomainError::InvalidPrice {
                reason: format!("{amount} is negative"),
            });
        }

        let normalized: Decimal = amount.normalize();
        if normalized.scale() > 2 {
            return Err(DomainError::InvalidPrice {
                reason: format!("{amount} has more than two decimal places"),
            });
        }

        let mut scaled: Decimal = normalized;
        scaled.rescale(2);
        let cents: u32 = u32::try_from(scaled.mantissa()).map_err(|_| {
            DomainError::InvalidPrice {
                reason: format!("{amount} exceeds the maximum of 999.99"),
            }
        })?;

        Self::from_cents(cents)
    }

    /// Menu prices are compile-time constants known to be in range.
    pub(crate) const fn from_catalog(cents: u32) -> Self {
        Self { cents }
    }

    #[must_use]
    pub const fn cents(self) -> u32 {
        self.cents
    }

    /// Returns the price as a decimal with exactly two decimal places.
    #[must_use]
    pub fn amount(self) -> Decimal {
        Decimal::new(i64::from(self.cents), 2)
    }
}

impl std::fmt::Display for Price {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.amount())
    }
}
