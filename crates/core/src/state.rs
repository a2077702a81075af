// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Lifecycle state of a tracked entity relative to its snapshot.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityState {
    /// Matches the snapshot.
    Unchanged,
    /// Not yet persisted.
    Added,
    /// Persisted columns differ from the snapshot.
    Modified,
    /// Present in the snapshot but removed from the aggregate.
    Deleted,
}

impl EntityState {
    /// Returns `true` for any state that results in a write.
    #[must_use]
    pub const fn is_changed(self) -> bool {
        !matches!(self, Self::Unchanged)
    }
}

impl std::fmt::Display for EntityState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name: &str = match self {
            Self::Unchanged => "unchanged",
            Self::Added => "added",
            Self::Modified => "modified",
            Self::Deleted => "deleted",
        };
        f.write_str(name)
    }
}
