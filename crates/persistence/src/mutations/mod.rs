// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! State-changing operations.
//!
//! - `commit`: atomic application of a unit of work's pending writes
//! - `seed`: idempotent insertion of the menu catalog
//!
//! Every write goes through a unit of work so the save interceptors run.

pub mod commit;
pub mod seed;
