// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Device state tracking.

use crate::types::{ExceptionEntry, HvacAction, HvacMode, PresetMode, Source};

use super::{BoilerBlock, ChangeSet, Field, StateUpdate};

/// Last known state of a thermostat.
///
/// A state starts out empty and is filled by the first full refresh. After
/// that it is either replaced wholesale by a later refresh or patched by a
/// webhook [`StateUpdate`].
///
/// `boiler` is only present for installations that talk OpenTherm to the
/// boiler; consumers must check for it.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::state::DeviceState;
/// use thermosmart_lib::types::Source;
///
/// let state = DeviceState::new()
///     .with_room_temperature(19.5)
///     .with_source(Source::Pause);
///
/// assert!(state.is_away());
/// assert_eq!(state.hvac_mode(), None);
/// assert!(state.boiler().is_none());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeviceState {
    room_temperature: Option<f64>,
    target_temperature: Option<f64>,
    source: Option<Source>,
    boiler: Option<BoilerBlock>,
    exceptions: Vec<ExceptionEntry>,
}

impl DeviceState {
    /// Creates a new empty device state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the room temperature.
    #[must_use]
    pub fn with_room_temperature(mut self, celsius: f64) -> Self {
        self.room_temperature = Some(celsius);
        self
    }

    /// Sets the target temperature.
    #[must_use]
    pub fn with_target_temperature(mut self, celsius: f64) -> Self {
        self.target_temperature = Some(celsius);
        self
    }

    /// Sets the target temperature source.
    #[must_use]
    pub fn with_source(mut self, source: Source) -> Self {
        self.source = Some(source);
        self
    }

    /// Sets the boiler block.
    #[must_use]
    pub fn with_boiler(mut self, boiler: BoilerBlock) -> Self {
        self.boiler = Some(boiler);
        self
    }

    /// Sets the exception list.
    #[must_use]
    pub fn with_exceptions(mut self, exceptions: Vec<ExceptionEntry>) -> Self {
        self.exceptions = exceptions;
        self
    }

    /// Measured room temperature in °C.
    #[must_use]
    pub fn room_temperature(&self) -> Option<f64> {
        self.room_temperature
    }

    /// Current set-point in °C.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.target_temperature
    }

    /// Origin of the current set-point.
    #[must_use]
    pub fn source(&self) -> Option<Source> {
        self.source
    }

    /// Boiler readings, if the installation supports OpenTherm.
    #[must_use]
    pub fn boiler(&self) -> Option<&BoilerBlock> {
        self.boiler.as_ref()
    }

    /// Returns `true` if the installation reports boiler data.
    #[must_use]
    pub fn supports_opentherm(&self) -> bool {
        self.boiler.is_some()
    }

    /// Scheduled exceptions, in vendor order.
    #[must_use]
    pub fn exceptions(&self) -> &[ExceptionEntry] {
        &self.exceptions
    }

    // ========== Derived views ==========

    /// Returns `true` when the thermostat is paused.
    #[must_use]
    pub fn is_away(&self) -> bool {
        self.source.is_some_and(|s| s.is_away())
    }

    /// Returns the active preset.
    #[must_use]
    pub fn preset(&self) -> PresetMode {
        self.source.map_or(PresetMode::None, |s| s.preset())
    }

    /// Returns the HVAC mode implied by the source.
    #[must_use]
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        self.source.and_then(|s| s.hvac_mode())
    }

    /// Returns what the boiler is doing, if boiler data is available.
    #[must_use]
    pub fn hvac_action(&self) -> Option<HvacAction> {
        self.boiler.as_ref().map(BoilerBlock::hvac_action)
    }

    // ========== Updates ==========

    /// Compares two snapshots field by field.
    #[must_use]
    pub fn diff(&self, other: &DeviceState) -> ChangeSet {
        ChangeSet {
            room_temperature: self.room_temperature != other.room_temperature,
            target_temperature: self.target_temperature != other.target_temperature,
            source: self.source != other.source,
            boiler: self.boiler != other.boiler,
            exceptions: self.exceptions != other.exceptions,
        }
    }

    /// Applies a partial update and returns the fields that changed.
    ///
    /// Fields absent from the update keep their current value.
    pub fn apply(&mut self, update: &StateUpdate) -> ChangeSet {
        let mut changes = ChangeSet::default();

        changes.room_temperature = apply_reading(&mut self.room_temperature, &update.room_temperature);
        changes.target_temperature =
            apply_reading(&mut self.target_temperature, &update.target_temperature);

        if let Field::Present(source) = update.source
            && self.source != Some(source)
        {
            self.source = Some(source);
            changes.source = true;
        }

        match &update.boiler {
            Field::Present(boiler) => {
                changes.boiler = match &mut self.boiler {
                    Some(current) => current.merge(boiler),
                    None => {
                        self.boiler = Some(boiler.clone());
                        true
                    }
                };
            }
            Field::Null if self.boiler.is_some() => {
                self.boiler = None;
                changes.boiler = true;
            }
            _ => {}
        }

        match &update.exceptions {
            Field::Present(exceptions) if *exceptions != self.exceptions => {
                self.exceptions.clone_from(exceptions);
                changes.exceptions = true;
            }
            Field::Null if !self.exceptions.is_empty() => {
                self.exceptions.clear();
                changes.exceptions = true;
            }
            _ => {}
        }

        changes
    }
}

fn apply_reading(current: &mut Option<f64>, update: &Field<f64>) -> bool {
    let next = match update {
        Field::Absent => return false,
        Field::Null => None,
        Field::Present(v) => Some(*v),
    };

    if *current == next {
        false
    } else {
        *current = next;
        true
    }
}
