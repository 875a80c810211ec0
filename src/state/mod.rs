// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat state management types.
//!
//! [`DeviceState`] is the last known state of a thermostat. It lives in a
//! [`StateCache`], which is either replaced by a full refresh or patched with
//! a [`StateUpdate`] built from a webhook. Both paths report the fields they
//! changed as a [`ChangeSet`].
//!
//! # Examples
//!
//! ```
//! use thermosmart_lib::state::{DeviceState, Field, StateCache, StateUpdate};
//! use thermosmart_lib::types::{HvacMode, Source};
//!
//! let cache = StateCache::new();
//! cache.replace(DeviceState::new().with_source(Source::Schedule));
//!
//! let changes = cache.merge_partial(&StateUpdate {
//!     source: Field::Present(Source::Manual),
//!     ..StateUpdate::default()
//! });
//!
//! assert!(changes.source);
//! assert_eq!(cache.snapshot().hvac_mode(), Some(HvacMode::Heat));
//! ```

mod boiler;
mod cache;
mod device_state;
mod state_update;

pub use boiler::BoilerBlock;
pub use cache::StateCache;
pub use device_state::DeviceState;
pub use state_update::{ChangeSet, Field, StateUpdate};
