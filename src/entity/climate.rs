// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Climate entity.

use chrono::NaiveDateTime;

use crate::coordinator::UpdateCoordinator;
use crate::error::{Result, ValueError};
use crate::protocol::RemoteDeviceClient;
use crate::types::{ExceptionProgram, HvacAction, HvacMode, PresetMode, TargetTemperature};

use super::device::DeviceBacked;

/// The thermostat as a climate entity.
///
/// Attributes are derived from the coordinator snapshot on every call:
///
/// | Attribute | Derived from |
/// |-----------|--------------|
/// | `preset` | `away` while the source is `pause`, `none` otherwise |
/// | `hvac_mode` | `heat` for remote/manual, `auto` for schedule/exception |
/// | `hvac_action` | boiler CH/cooling flags, `None` without boiler data |
#[derive(Debug)]
pub struct ClimateEntity<C> {
    device: DeviceBacked<C>,
}

impl<C> Clone for ClimateEntity<C> {
    fn clone(&self) -> Self {
        Self {
            device: self.device.clone(),
        }
    }
}

impl<C: RemoteDeviceClient> ClimateEntity<C> {
    /// Unique id suffix of the climate entity.
    pub const UNIQUE_ID_SUFFIX: &'static str = "climate";

    /// Creates the climate entity of a thermostat.
    #[must_use]
    pub fn new(coordinator: UpdateCoordinator<C>, name: impl Into<String>) -> Self {
        Self {
            device: DeviceBacked::new(coordinator, name),
        }
    }

    /// Returns the shared device capability.
    #[must_use]
    pub fn device(&self) -> &DeviceBacked<C> {
        &self.device
    }

    /// Entity name, which is also the device name.
    #[must_use]
    pub fn name(&self) -> String {
        self.device.device_info().name
    }

    /// Returns `{thermostat}_climate`.
    #[must_use]
    pub fn unique_id(&self) -> String {
        self.device.unique_id(Self::UNIQUE_ID_SUFFIX)
    }

    /// Returns true while the coordinator is running.
    #[must_use]
    pub fn available(&self) -> bool {
        self.device.available()
    }

    /// Lowest accepted set-point in °C.
    #[must_use]
    pub fn min_temp(&self) -> f64 {
        TargetTemperature::MIN
    }

    /// Highest accepted set-point in °C.
    #[must_use]
    pub fn max_temp(&self) -> f64 {
        TargetTemperature::MAX
    }

    /// Measured room temperature in °C.
    #[must_use]
    pub fn current_temperature(&self) -> Option<f64> {
        self.device.state().room_temperature()
    }

    /// Current set-point in °C.
    #[must_use]
    pub fn target_temperature(&self) -> Option<f64> {
        self.device.state().target_temperature()
    }

    /// Active preset.
    #[must_use]
    pub fn preset_mode(&self) -> PresetMode {
        self.device.state().preset()
    }

    /// Presets the entity accepts.
    #[must_use]
    pub fn preset_modes(&self) -> [PresetMode; 2] {
        [PresetMode::Away, PresetMode::None]
    }

    /// Active HVAC mode, `None` while paused.
    #[must_use]
    pub fn hvac_mode(&self) -> Option<HvacMode> {
        self.device.state().hvac_mode()
    }

    /// HVAC modes the entity accepts. `cool` is only offered when the boiler
    /// reports a cooling configuration.
    #[must_use]
    pub fn hvac_modes(&self) -> Vec<HvacMode> {
        let state = self.device.state();
        let mut modes = vec![HvacMode::Auto, HvacMode::Heat];
        if state.boiler().is_some_and(|b| b.cooling_config()) {
            modes.push(HvacMode::Cool);
        }
        modes
    }

    /// What the boiler is doing, if boiler data is available.
    #[must_use]
    pub fn hvac_action(&self) -> Option<HvacAction> {
        self.device.state().hvac_action()
    }

    /// Sets the target temperature.
    ///
    /// # Errors
    ///
    /// Returns the coordinator error.
    pub async fn set_temperature(&self, celsius: f64) -> Result<()> {
        self.device.coordinator().set_target_temperature(celsius).await
    }

    /// Switches preset. Selecting the active preset does nothing.
    ///
    /// # Errors
    ///
    /// Returns the coordinator error.
    pub async fn set_preset_mode(&self, preset: PresetMode) -> Result<()> {
        if preset == self.preset_mode() {
            tracing::debug!(thermostat = %self.device.thermostat_id(), preset = preset.as_str(), "Preset already active");
            return Ok(());
        }

        self.device
            .coordinator()
            .pause_thermostat(preset == PresetMode::Away)
            .await
    }

    /// Switches HVAC mode.
    ///
    /// `auto` resumes the schedule. `heat` and `cool` hold the current
    /// set-point by sending it back as a remote target.
    ///
    /// # Errors
    ///
    /// Returns `ValueError::UnknownTargetTemperature` for `heat`/`cool` before
    /// any set-point is known, or the coordinator error.
    pub async fn set_hvac_mode(&self, mode: HvacMode) -> Result<()> {
        let coordinator = self.device.coordinator();
        match mode {
            HvacMode::Auto => coordinator.pause_thermostat(false).await,
            HvacMode::Heat | HvacMode::Cool => {
                let target = self
                    .target_temperature()
                    .ok_or(ValueError::UnknownTargetTemperature)?;
                coordinator.set_target_temperature(target).await
            }
        }
    }

    /// Schedules an exception; bounds are rounded down to the quarter hour.
    ///
    /// # Errors
    ///
    /// Returns the coordinator error.
    pub async fn add_exception(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        program: ExceptionProgram,
    ) -> Result<()> {
        self.device
            .coordinator()
            .add_exception(start, end, program)
            .await
    }

    /// Removes every exception.
    ///
    /// # Errors
    ///
    /// Returns the coordinator error.
    pub async fn clear_exceptions(&self) -> Result<()> {
        self.device.coordinator().clear_exceptions().await
    }
}
