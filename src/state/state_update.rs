// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Partial state updates.
//!
//! Webhook deliveries only carry the fields that changed. A [`StateUpdate`]
//! holds each of them as a [`Field`], which keeps "not sent", "sent as
//! `null`" and "sent with a value" apart instead of collapsing the first two
//! into a missing key.
//!
//! # Examples
//!
//! ```
//! use thermosmart_lib::state::{DeviceState, Field, StateUpdate};
//! use thermosmart_lib::types::Source;
//!
//! let mut state = DeviceState::new();
//! let update = StateUpdate {
//!     room_temperature: Field::Present(20.5),
//!     source: Field::Present(Source::Manual),
//!     ..StateUpdate::default()
//! };
//!
//! let changes = state.apply(&update);
//! assert!(changes.room_temperature && changes.source);
//! assert!(!changes.target_temperature);
//! ```

use serde::{Deserialize, Deserializer};

use crate::types::{ExceptionEntry, Source};

use super::BoilerBlock;

/// A field of a partial payload.
#[derive(Debug, Clone, Default, PartialEq)]
pub enum Field<T> {
    /// The key was not part of the payload.
    #[default]
    Absent,
    /// The key was present with a `null` value.
    Null,
    /// The key was present with a value.
    Present(T),
}

impl<T> Field<T> {
    /// Returns `true` unless the key was absent.
    #[must_use]
    pub fn is_sent(&self) -> bool {
        !matches!(self, Self::Absent)
    }

    /// Returns the value if one was sent.
    #[must_use]
    pub fn as_present(&self) -> Option<&T> {
        match self {
            Self::Present(v) => Some(v),
            Self::Absent | Self::Null => None,
        }
    }

    /// Maps the contained value, keeping absence and nullness.
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> Field<U> {
        match self {
            Self::Absent => Field::Absent,
            Self::Null => Field::Null,
            Self::Present(v) => Field::Present(f(v)),
        }
    }
}

impl<T> From<Option<T>> for Field<T> {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Self::Present)
    }
}

/// Deserializes an explicit `null` as [`Field::Null`].
///
/// Use together with `#[serde(default)]` so a missing key becomes
/// [`Field::Absent`].
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Self::from)
    }
}

/// A set of fields to patch into a [`DeviceState`](super::DeviceState).
///
/// Merge rules per field:
///
/// | Field | `Present` | `Null` |
/// |-------|-----------|--------|
/// | temperatures | set | clear (reading unknown) |
/// | `source` | set | ignored |
/// | `boiler` | overlay readings | remove block |
/// | `exceptions` | replace whole list | clear list |
#[derive(Debug, Clone, Default, PartialEq)]
pub struct StateUpdate {
    /// Measured room temperature.
    pub room_temperature: Field<f64>,
    /// Current set-point.
    pub target_temperature: Field<f64>,
    /// Origin of the set-point.
    pub source: Field<Source>,
    /// Decoded boiler readings.
    pub boiler: Field<BoilerBlock>,
    /// Full exception list.
    pub exceptions: Field<Vec<ExceptionEntry>>,
}

impl StateUpdate {
    /// Returns `true` if the update carries no field at all.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !(self.room_temperature.is_sent()
            || self.target_temperature.is_sent()
            || self.source.is_sent()
            || self.boiler.is_sent()
            || self.exceptions.is_sent())
    }
}

/// Which observable fields an update changed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[allow(clippy::struct_excessive_bools)]
pub struct ChangeSet {
    /// Room temperature changed.
    pub room_temperature: bool,
    /// Target temperature changed.
    pub target_temperature: bool,
    /// Source changed (and with it the away and HVAC mode views).
    pub source: bool,
    /// Boiler block appeared or one of its readings changed.
    pub boiler: bool,
    /// Exception list changed.
    pub exceptions: bool,
}

impl ChangeSet {
    /// Returns `true` if nothing changed.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        !self.any()
    }

    /// Returns `true` if at least one field changed.
    #[must_use]
    pub fn any(&self) -> bool {
        self.room_temperature
            || self.target_temperature
            || self.source
            || self.boiler
            || self.exceptions
    }
}

impl std::ops::BitOrAssign for ChangeSet {
    fn bitor_assign(&mut self, rhs: Self) {
        self.room_temperature |= rhs.room_temperature;
        self.target_temperature |= rhs.target_temperature;
        self.source |= rhs.source;
        self.boiler |= rhs.boiler;
        self.exceptions |= rhs.exceptions;
    }
}
