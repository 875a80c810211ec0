// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Authoritative in-memory snapshot of a thermostat.

use std::sync::Arc;

use parking_lot::RwLock;

use super::{ChangeSet, DeviceState, StateUpdate};

/// Holds the current [`DeviceState`] of one thermostat.
///
/// Writers build a complete new state and swap it in, so a reader holding a
/// [`snapshot`](Self::snapshot) never observes a half-applied merge.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::state::{DeviceState, Field, StateCache, StateUpdate};
///
/// let cache = StateCache::new();
/// let changes = cache.replace(DeviceState::new().with_room_temperature(20.0));
/// assert!(changes.room_temperature);
///
/// let before = cache.snapshot();
/// cache.merge_partial(&StateUpdate {
///     room_temperature: Field::Present(21.0),
///     ..StateUpdate::default()
/// });
///
/// assert_eq!(before.room_temperature(), Some(20.0));
/// assert_eq!(cache.snapshot().room_temperature(), Some(21.0));
/// ```
#[derive(Debug, Default)]
pub struct StateCache {
    current: RwLock<Arc<DeviceState>>,
}

impl StateCache {
    /// Creates an empty cache.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current state.
    #[must_use]
    pub fn snapshot(&self) -> Arc<DeviceState> {
        Arc::clone(&self.current.read())
    }

    /// Replaces the whole state, returning the fields that differ.
    pub fn replace(&self, state: DeviceState) -> ChangeSet {
        let mut current = self.current.write();
        let changes = current.diff(&state);
        if changes.any() {
            *current = Arc::new(state);
        }
        changes
    }

    /// Applies the fields present in `update`, returning those that changed.
    pub fn merge_partial(&self, update: &StateUpdate) -> ChangeSet {
        let mut current = self.current.write();
        let mut next = DeviceState::clone(&current);
        let changes = next.apply(update);
        if changes.any() {
            *current = Arc::new(next);
        }
        changes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::Field;
    use crate::types::Source;

    #[test]
    fn replace_identical_state_is_unchanged() {
        let cache = StateCache::new();
        let state = DeviceState::new()
            .with_room_temperature(20.0)
            .with_source(Source::Manual);

        assert!(cache.replace(state.clone()).any());
        let before = cache.snapshot();

        assert!(cache.replace(state).is_empty());
        assert!(Arc::ptr_eq(&before, &cache.snapshot()));
    }

    #[test]
    fn merge_keeps_untouched_fields() {
        let cache = StateCache::new();
        cache.replace(
            DeviceState::new()
                .with_room_temperature(20.0)
                .with_target_temperature(21.0)
                .with_source(Source::Schedule),
        );

        let changes = cache.merge_partial(&StateUpdate {
            target_temperature: Field::Present(17.0),
            ..StateUpdate::default()
        });

        let state = cache.snapshot();
        assert!(changes.target_temperature);
        assert_eq!(state.room_temperature(), Some(20.0));
        assert_eq!(state.target_temperature(), Some(17.0));
        assert_eq!(state.source(), Some(Source::Schedule));
    }

    #[test]
    fn snapshots_are_isolated_from_later_merges() {
        let cache = StateCache::new();
        cache.replace(DeviceState::new().with_source(Source::Schedule));
        let old = cache.snapshot();

        cache.merge_partial(&StateUpdate {
            source: Field::Present(Source::Pause),
            ..StateUpdate::default()
        });

        assert_eq!(old.source(), Some(Source::Schedule));
        assert!(cache.snapshot().is_away());
    }
}
