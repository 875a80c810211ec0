// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Subscription system for thermostat state changes.
//!
//! # Overview
//!
//! - [`SubscriptionId`] - A unique identifier for a subscription, used to unsubscribe
//! - [`CallbackRegistry`] - Per-coordinator registry that stores and dispatches callbacks
//! - [`Subscribable`] - Trait for types that support update subscriptions
//!
//! Consumers that prefer polling a value over callbacks can use the watch
//! channel returned by
//! [`UpdateCoordinator::watch`](crate::coordinator::UpdateCoordinator::watch).

mod callback;
mod subscribable;

pub use callback::{CallbackRegistry, SubscriptionId};
pub use subscribable::Subscribable;
