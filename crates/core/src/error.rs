// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use pizzeria_domain::{DomainError, EntityKey};
use thiserror::Error;

/// Errors raised by the unit of work.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CoreError {
    /// A domain rule was violated.
    #[error("Domain violation: {0}")]
    DomainViolation(#[from] DomainError),
    /// The aggregate is already tracked by this unit of work.
    #[error("{key} is already tracked")]
    AlreadyTracked {
        /// The duplicate entity.
        key: EntityKey,
    },
    /// A commit receipt names an aggregate this unit of work does not track.
    #[error("{key} is not tracked")]
    NotTracked {
        /// The unknown entity.
        key: EntityKey,
    },
}
