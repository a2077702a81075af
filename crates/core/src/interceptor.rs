// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use std::collections::HashSet;

use pizzeria_audit::Actor;
use pizzeria_domain::EntityKey;
use time::OffsetDateTime;
use tracing::debug;

use crate::change_set::ChangeSet;
use crate::state::EntityState;

/// A hook that runs before pending changes are handed to the store.
///
/// Interceptors may stamp entity cores and override entry states. They
/// never write to storage themselves.
pub trait SaveChangesInterceptor: Send + Sync {
    fn saving_changes(&self, changes: &mut ChangeSet<'_>, actor: &Actor);
}

/// Stamps audit data and promotes aggregate roots whose children changed.
///
/// For every tracked entry:
/// 1. added entries receive creation data;
/// 2. added or modified entries, and roots with a changed child, receive
///    modification data;
/// 3. an unchanged root with a changed child is promoted to
///    [`EntityState::Modified`] so the store advances its version.
///
/// All entries stamped in one save share the same timestamp.
#[derive(Debug, Clone, Copy, Default)]
pub struct AuditDetailsInterceptor;

impl SaveChangesInterceptor for AuditDetailsInterceptor {
    fn saving_changes(&self, changes: &mut ChangeSet<'_>, actor: &Actor) {
        let now: OffsetDateTime = OffsetDateTime::now_utc();
        let roots_with_changed_children: HashSet<EntityKey> =
            changes.roots_with_changed_children().into_iter().collect();

        for entry in changes.entries_mut() {
            let key: EntityKey = entry.key();
            let state: EntityState = entry.state();
            let has_changed_children: bool = roots_with_changed_children.contains(&key);

            if let Some(core) = entry.core_mut() {
                if state == EntityState::Added {
                    core.apply_creation_tracking_data_at(Some(actor), now);
                }
                if matches!(state, EntityState::Added | EntityState::Modified)
                    || has_changed_children
                {
                    core.apply_modification_tracking_data_at(Some(actor), now);
                }
            }

            if state == EntityState::Unchanged && has_changed_children {
                debug!(entity = %key, "Promoting aggregate root with changed children");
                entry.set_state(EntityState::Modified);
            }
        }
    }
}
