// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Actor identity and audit trail bookkeeping.
//!
//! Every persisted object carries who created it, when, and who last
//! modified it. Those fields are only ever written through
//! [`AuditTrail::apply_creation_tracking_data`] and
//! [`AuditTrail::apply_modification_tracking_data`].

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::unwrap_used,
    clippy::expect_used
)]
#![allow(clippy::multiple_crate_versions)]

use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Identity recorded when no actor is supplied.
pub const SYSTEM_ACTOR_ID: &str = "System";

/// Maximum length of an actor identifier.
///
/// Kept within the order's user id limit, since a new order is owned by the
/// actor that started it.
pub const ACTOR_ID_MAX_LEN: usize = 100;

/// Represents the identity performing a write.
///
/// Authentication is out of scope; callers construct an actor from whatever
/// identity their boundary provides and thread it through every write.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Actor {
    id: String,
}

impl Actor {
    /// Creates an actor with the given identifier.
    ///
    /// Blank identifiers fall back to the system actor. Identifiers longer
    /// than [`ACTOR_ID_MAX_LEN`] characters are truncated so they always fit
    /// the audit columns.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        let id: String = id.into();
        let trimmed: &str = id.trim();

        if trimmed.is_empty() {
            return Self::system();
        }

        Self {
            id: trimmed.chars().take(ACTOR_ID_MAX_LEN).collect(),
        }
    }

    /// The placeholder actor used when no identity is available.
    #[must_use]
    pub fn system() -> Self {
        Self {
            id: String::from(SYSTEM_ACTOR_ID),
        }
    }

    /// Returns the actor identifier.
    #[must_use]
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Returns `true` if this is the system placeholder.
    #[must_use]
    pub fn is_system(&self) -> bool {
        self.id == SYSTEM_ACTOR_ID
    }
}

impl Default for Actor {
    fn default() -> Self {
        Self::system()
    }
}

impl std::fmt::Display for Actor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.id)
    }
}

/// Creation and modification metadata shared by all persisted objects.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditTrail {
    created_by: String,
    created_at_utc: OffsetDateTime,
    modified_by: String,
    modified_at_utc: OffsetDateTime,
}

impl AuditTrail {
    /// Creates a provisional trail attributed to the system actor.
    ///
    /// The save pipeline overwrites it on first persistence.
    #[must_use]
    pub fn new() -> Self {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        Self {
            created_by: String::from(SYSTEM_ACTOR_ID),
            created_at_utc: now,
            modified_by: String::from(SYSTEM_ACTOR_ID),
            modified_at_utc: now,
        }
    }

    /// Reconstructs a trail from stored values.
    #[must_use]
    pub const fn rehydrate(
        created_by: String,
        created_at_utc: OffsetDateTime,
        modified_by: String,
        modified_at_utc: OffsetDateTime,
    ) -> Self {
        Self {
            created_by,
            created_at_utc,
            modified_by,
            modified_at_utc,
        }
    }

    /// Stamps creation and modification data with the current time.
    pub fn apply_creation_tracking_data(&mut self, actor: Option<&Actor>) {
        self.apply_creation_tracking_data_at(actor, OffsetDateTime::now_utc());
    }

    /// Stamps creation and modification data with an explicit time.
    pub fn apply_creation_tracking_data_at(&mut self, actor: Option<&Actor>, at: OffsetDateTime) {
        self.created_by = actor_id_or_system(actor);
        self.created_at_utc = at;
        self.apply_modification_tracking_data_at(actor, at);
    }

    /// Stamps modification data with the current time.
    pub fn apply_modification_tracking_data(&mut self, actor: Option<&Actor>) {
        self.apply_modification_tracking_data_at(actor, OffsetDateTime::now_utc());
    }

    /// Stamps modification data with an explicit time.
    pub fn apply_modification_tracking_data_at(
        &mut self,
        actor: Option<&Actor>,
        at: OffsetDateTime,
    ) {
        self.modified_by = actor_id_or_system(actor);
        self.modified_at_utc = at;
    }

    #[must_use]
    pub fn created_by(&self) -> &str {
        &self.created_by
    }

    #[must_use]
    pub const fn created_at_utc(&self) -> OffsetDateTime {
        self.created_at_utc
    }

    #[must_use]
    pub fn modified_by(&self) -> &str {
        &self.modified_by
    }

    #[must_use]
    pub const fn modified_at_utc(&self) -> OffsetDateTime {
        self.modified_at_utc
    }
}

impl Default for AuditTrail {
    fn default() -> Self {
        Self::new()
    }
}

fn actor_id_or_system(actor: Option<&Actor>) -> String {
    actor.map_or_else(|| String::from(SYSTEM_ACTOR_ID), |a| a.id().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use time::macros::datetime;

    #[test]
    fn test_actor_defaults_to_system() {
        let actor: Actor = Actor::default();

        assert_eq!(actor.id(), SYSTEM_ACTOR_ID);
        assert!(actor.is_system());
    }

    #[test]
    fn test_blank_actor_falls_back_to_system() {
        assert!(Actor::new("   ").is_system());
        assert!(Actor::new("").is_system());
    }

    #[test]
    fn test_actor_is_trimmed_and_truncated() {
        assert_eq!(Actor::new("  clerk-7 ").id(), "clerk-7");

        let long: String = "x".repeat(ACTOR_ID_MAX_LEN + 20);
        assert_eq!(Actor::new(long).id().len(), ACTOR_ID_MAX_LEN);
    }

    #[test]
    fn test_creation_stamps_both_creation_and_modification() {
        let mut trail: AuditTrail = AuditTrail::new();
        let actor: Actor = Actor::new("clerk-7");
        let at: OffsetDateTime = datetime!(2026-03-01 12:00:00 UTC);

        trail.apply_creation_tracking_data_at(Some(&actor), at);

        assert_eq!(trail.created_by(), "clerk-7");
        assert_eq!(trail.created_at_utc(), at);
        assert_eq!(trail.modified_by(), "clerk-7");
        assert_eq!(trail.modified_at_utc(), at);
    }

    #[test]
    fn test_modification_leaves_creation_untouched() {
        let created: OffsetDateTime = datetime!(2026-03-01 12:00:00 UTC);
        let modified: OffsetDateTime = datetime!(2026-03-02 08:30:00 UTC);
        let mut trail: AuditTrail = AuditTrail::rehydrate(
            String::from("clerk-7"),
            created,
            String::from("clerk-7"),
            created,
        );

        trail.apply_modification_tracking_data_at(Some(&Actor::new("chef-2")), modified);

        assert_eq!(trail.created_by(), "clerk-7");
        assert_eq!(trail.created_at_utc(), created);
        assert_eq!(trail.modified_by(), "chef-2");
        assert_eq!(trail.modified_at_utc(), modified);
    }

    #[test]
    fn test_missing_actor_is_recorded_as_system() {
        let at: OffsetDateTime = datetime!(2026-01-01 0:00 UTC);
        let mut trail: AuditTrail =
            AuditTrail::rehydrate(String::from("a"), at, String::from("a"), at);

        trail.apply_creation_tracking_data(None);

        assert_eq!(trail.created_by(), SYSTEM_ACTOR_ID);
        assert_eq!(trail.modified_by(), SYSTEM_ACTOR_ID);
    }
}
