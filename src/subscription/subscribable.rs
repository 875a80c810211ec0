// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscribable trait for types that publish thermostat updates.

use crate::state::{BoilerBlock, ChangeSet, DeviceState};
use crate::subscription::SubscriptionId;
use crate::types::Source;

/// Trait for types that support update subscriptions.
///
/// Callbacks run after the new state has been committed, once per logical
/// update, whether the update came from a refresh or a webhook.
///
/// # Examples
///
/// ```no_run
/// use thermosmart_lib::coordinator::{CoordinatorConfig, UpdateCoordinator};
/// use thermosmart_lib::protocol::HttpClient;
/// use thermosmart_lib::subscription::Subscribable;
///
/// # async fn example() -> thermosmart_lib::Result<()> {
/// let client = HttpClient::new(String::from("access-token"))?;
/// let coordinator = UpdateCoordinator::builder(client)
///     .config(CoordinatorConfig::poll())
///     .build()
///     .await?;
///
/// let sub_id = coordinator.on_state_changed(|state, changes| {
///     if changes.room_temperature {
///         println!("Room is now {:?}", state.room_temperature());
///     }
/// });
///
/// coordinator.unsubscribe(sub_id);
/// # Ok(())
/// # }
/// ```
pub trait Subscribable {
    /// Subscribes to every committed state change.
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState, &ChangeSet) + Send + Sync + 'static;

    /// Subscribes to source changes.
    ///
    /// Away and HVAC mode are derived from the source, so this is also the
    /// hook for preset and mode changes.
    fn on_source_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Source) + Send + Sync + 'static;

    /// Subscribes to boiler readings updates.
    fn on_boiler_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&BoilerBlock) + Send + Sync + 'static;

    /// Subscribes to shutdown.
    fn on_stopped<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static;

    /// Unsubscribes a callback by its subscription ID.
    ///
    /// Returns `true` if the subscription was found and removed.
    fn unsubscribe(&self, id: SubscriptionId) -> bool;
}
