// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Storage-agnostic unit of work.
//!
//! A [`UnitOfWork`] tracks loaded and newly created aggregates, detects what
//! changed against the snapshot taken when each aggregate entered the unit,
//! and runs the registered [`SaveChangesInterceptor`]s before handing the
//! store an ordered list of writes. The store owns versioning and atomicity.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

mod change_set;
mod error;
mod interceptor;
mod pending;
mod state;
mod unit_of_work;

#[cfg(test)]
mod tests;

pub use change_set::{ChangeEntry, ChangeSet, TrackedEntry};
pub use error::CoreError;
pub use interceptor::{AuditDetailsInterceptor, SaveChangesInterceptor};
pub use pending::{CommitReceipt, PendingChanges, PendingWrite};
pub use state::EntityState;
pub use unit_of_work::UnitOfWork;
