// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Callback management for thermostat state subscriptions.
//!
//! This module provides the core types for managing subscription callbacks:
//!
//! - [`SubscriptionId`] - Unique identifier for unsubscribing
//! - [`CallbackRegistry`] - Registry for storing and dispatching callbacks

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::state::{BoilerBlock, ChangeSet, DeviceState};
use crate::types::Source;

/// Unique identifier for a subscription.
///
/// This ID is returned when creating a subscription and can be used to
/// unsubscribe later. IDs are unique within a coordinator's lifetime.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

impl SubscriptionId {
    #[must_use]
    pub(crate) fn new(id: u64) -> Self {
        Self(id)
    }

    /// Returns the raw ID value.
    #[must_use]
    pub fn value(&self) -> u64 {
        self.0
    }
}

impl std::fmt::Display for SubscriptionId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Sub({})", self.0)
    }
}

type StateChangedCallback = Arc<dyn Fn(&DeviceState, &ChangeSet) + Send + Sync>;

type SourceCallback = Arc<dyn Fn(Source) + Send + Sync>;

type BoilerCallback = Arc<dyn Fn(&BoilerBlock) + Send + Sync>;

type StoppedCallback = Arc<dyn Fn() + Send + Sync>;

/// Registry for thermostat subscription callbacks.
///
/// Each coordinator owns one registry, so observers of one thermostat never
/// hear about another. Callbacks are cloned out of the registry before they
/// run, which lets a callback subscribe or unsubscribe without deadlocking.
pub struct CallbackRegistry {
    next_id: AtomicU64,
    state_changed_callbacks: RwLock<HashMap<SubscriptionId, StateChangedCallback>>,
    source_callbacks: RwLock<HashMap<SubscriptionId, SourceCallback>>,
    boiler_callbacks: RwLock<HashMap<SubscriptionId, BoilerCallback>>,
    stopped_callbacks: RwLock<HashMap<SubscriptionId, StoppedCallback>>,
}

impl CallbackRegistry {
    /// Creates a new empty callback registry.
    #[must_use]
    pub fn new() -> Self {
        Self {
            next_id: AtomicU64::new(1),
            state_changed_callbacks: RwLock::new(HashMap::new()),
            source_callbacks: RwLock::new(HashMap::new()),
            boiler_callbacks: RwLock::new(HashMap::new()),
            stopped_callbacks: RwLock::new(HashMap::new()),
        }
    }

    fn next_id(&self) -> SubscriptionId {
        SubscriptionId::new(self.next_id.fetch_add(1, Ordering::Relaxed))
    }

    // =========================================================================
    // Registration methods
    // =========================================================================

    /// Registers a callback for any state change.
    ///
    /// The callback receives the committed state and the fields that changed.
    pub fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState, &ChangeSet) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.state_changed_callbacks
            .write()
            .insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for source changes.
    pub fn on_source_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Source) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.source_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for boiler readings updates.
    pub fn on_boiler_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&BoilerBlock) + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.boiler_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    /// Registers a callback for coordinator shutdown.
    pub fn on_stopped<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        let id = self.next_id();
        self.stopped_callbacks.write().insert(id, Arc::new(callback));
        id
    }

    // =========================================================================
    // Unsubscription
    // =========================================================================

    /// Unregisters a callback by its subscription ID.
    ///
    /// Returns `true` if a callback was found and removed.
    pub fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.state_changed_callbacks.write().remove(&id).is_some()
            || self.source_callbacks.write().remove(&id).is_some()
            || self.boiler_callbacks.write().remove(&id).is_some()
            || self.stopped_callbacks.write().remove(&id).is_some()
    }

    /// Clears all callbacks.
    pub fn clear(&self) {
        self.state_changed_callbacks.write().clear();
        self.source_callbacks.write().clear();
        self.boiler_callbacks.write().clear();
        self.stopped_callbacks.write().clear();
    }

    // =========================================================================
    // Dispatch methods
    // =========================================================================

    /// Dispatches one logical update to the relevant callbacks.
    ///
    /// Nothing is called for an empty change set.
    pub fn dispatch(&self, state: &DeviceState, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }

        for callback in snapshot(&self.state_changed_callbacks) {
            callback(state, changes);
        }

        if changes.source
            && let Some(source) = state.source()
        {
            for callback in snapshot(&self.source_callbacks) {
                callback(source);
            }
        }

        if changes.boiler
            && let Some(boiler) = state.boiler()
        {
            for callback in snapshot(&self.boiler_callbacks) {
                callback(boiler);
            }
        }
    }

    /// Dispatches the stopped event.
    pub fn dispatch_stopped(&self) {
        for callback in snapshot(&self.stopped_callbacks) {
            callback();
        }
    }

    // =========================================================================
    // Statistics
    // =========================================================================

    /// Returns the total number of registered callbacks.
    #[must_use]
    pub fn callback_count(&self) -> usize {
        self.state_changed_callbacks.read().len()
            + self.source_callbacks.read().len()
            + self.boiler_callbacks.read().len()
            + self.stopped_callbacks.read().len()
    }

    /// Returns `true` if there are no registered callbacks.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.callback_count() == 0
    }
}

fn snapshot<T: ?Sized>(map: &RwLock<HashMap<SubscriptionId, Arc<T>>>) -> Vec<Arc<T>> {
    map.read().values().cloned().collect()
}

impl Default for CallbackRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Debug for CallbackRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CallbackRegistry")
            .field("callback_count", &self.callback_count())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::AtomicU32;

    fn counter() -> (Arc<AtomicU32>, Arc<AtomicU32>) {
        let c = Arc::new(AtomicU32::new(0));
        (c.clone(), c)
    }

    #[test]
    fn subscription_id_display() {
        let id = SubscriptionId::new(42);
        assert_eq!(id.to_string(), "Sub(42)");
        assert_eq!(id.value(), 42);
    }

    #[test]
    fn registry_new_is_empty() {
        let registry = CallbackRegistry::new();
        assert!(registry.is_empty());
        assert_eq!(registry.callback_count(), 0);
    }

    #[test]
    fn state_changed_called_once_per_update() {
        let registry = CallbackRegistry::new();
        let (counter, counter_clone) = counter();

        let id = registry.on_state_changed(move |_state, _changes| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        let changes = ChangeSet {
            room_temperature: true,
            target_temperature: true,
            ..ChangeSet::default()
        };
        registry.dispatch(&DeviceState::new(), &changes);
        assert_eq!(counter.load(Ordering::SeqCst), 1);

        assert!(registry.unsubscribe(id));
        registry.dispatch(&DeviceState::new(), &changes);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn empty_change_set_is_not_dispatched() {
        let registry = CallbackRegistry::new();
        let (counter, counter_clone) = counter();

        registry.on_state_changed(move |_, _| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        registry.dispatch(&DeviceState::new(), &ChangeSet::default());
        assert_eq!(counter.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn source_callback_receives_new_source() {
        let registry = CallbackRegistry::new();
        let received = Arc::new(RwLock::new(None::<Source>));
        let received_clone = received.clone();

        registry.on_source_changed(move |source| {
            *received_clone.write() = Some(source);
        });

        let state = DeviceState::new().with_source(Source::Pause);
        let changes = ChangeSet {
            source: true,
            ..ChangeSet::default()
        };
        registry.dispatch(&state, &changes);

        assert_eq!(*received.read(), Some(Source::Pause));
    }

    #[test]
    fn boiler_callback_skipped_without_boiler() {
        let registry = CallbackRegistry::new();
        let (counter, counter_clone) = counter();

        registry.on_boiler_updated(move |_| {
            counter_clone.fetch_add(1, Ordering::SeqCst);
        });

        let changes = ChangeSet {
            boiler: true,
            ..ChangeSet::default()
        };
        registry.dispatch(&DeviceState::new(), &changes);
        assert_eq!(counter.load(Ordering::SeqCst), 0);

        registry.dispatch(&DeviceState::new().with_boiler(BoilerBlock::default()), &changes);
        assert_eq!(counter.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn callback_may_unsubscribe_itself() {
        let registry = Arc::new(CallbackRegistry::new());
        let id_slot = Arc::new(RwLock::new(None::<SubscriptionId>));

        let registry_clone = registry.clone();
        let slot_clone = id_slot.clone();
        let id = registry.on_stopped(move || {
            if let Some(id) = *slot_clone.read() {
                registry_clone.unsubscribe(id);
            }
        });
        *id_slot.write() = Some(id);

        registry.dispatch_stopped();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_clear() {
        let registry = CallbackRegistry::new();

        registry.on_state_changed(|_, _| {});
        registry.on_source_changed(|_| {});
        registry.on_stopped(|| {});

        assert_eq!(registry.callback_count(), 3);

        registry.clear();
        assert!(registry.is_empty());
    }

    #[test]
    fn registry_unsubscribe_nonexistent() {
        let registry = CallbackRegistry::new();
        assert!(!registry.unsubscribe(SubscriptionId::new(999)));
    }

    #[test]
    fn registry_unique_ids() {
        let registry = CallbackRegistry::new();

        let id1 = registry.on_state_changed(|_, _| {});
        let id2 = registry.on_boiler_updated(|_| {});
        let id3 = registry.on_stopped(|| {});

        assert_ne!(id1, id2);
        assert_ne!(id2, id3);
        assert_ne!(id1, id3);
    }

    #[test]
    fn registry_debug() {
        let registry = CallbackRegistry::new();
        registry.on_stopped(|| {});

        let debug = format!("{registry:?}");
        assert!(debug.contains("callback_count"));
    }
}
