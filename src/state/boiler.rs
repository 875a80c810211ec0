// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boiler telemetry block.

use crate::types::HvacAction;

/// Boiler readings obtained over OpenTherm.
///
/// Every reading is optional: a raw block only carries the data words the
/// thermostat last exchanged with the boiler, and a reading that was never
/// reported is unavailable rather than zero.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::state::BoilerBlock;
///
/// let boiler = BoilerBlock::default();
/// assert!(boiler.water_pressure().is_none());
/// assert!(!boiler.ch_enabled());
/// ```
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoilerBlock {
    pub(crate) control_setpoint: Option<f64>,
    pub(crate) modulation_level: Option<f64>,
    pub(crate) water_pressure: Option<f64>,
    pub(crate) hot_water_flow_rate: Option<f64>,
    pub(crate) hot_water_temperature: Option<f64>,
    pub(crate) return_water_temperature: Option<f64>,
    pub(crate) ch_enabled: Option<bool>,
    pub(crate) cooling_enabled: Option<bool>,
    pub(crate) cooling_config: Option<bool>,
}

impl BoilerBlock {
    /// Control setpoint in °C.
    #[must_use]
    pub fn control_setpoint(&self) -> Option<f64> {
        self.control_setpoint
    }

    /// Relative modulation level in %.
    #[must_use]
    pub fn modulation_level(&self) -> Option<f64> {
        self.modulation_level
    }

    /// Central heating water pressure in bar.
    #[must_use]
    pub fn water_pressure(&self) -> Option<f64> {
        self.water_pressure
    }

    /// Hot water flow rate in l/min.
    #[must_use]
    pub fn hot_water_flow_rate(&self) -> Option<f64> {
        self.hot_water_flow_rate
    }

    /// Hot water temperature in °C.
    #[must_use]
    pub fn hot_water_temperature(&self) -> Option<f64> {
        self.hot_water_temperature
    }

    /// Return water temperature in °C.
    #[must_use]
    pub fn return_water_temperature(&self) -> Option<f64> {
        self.return_water_temperature
    }

    /// Returns `true` if central heating is enabled.
    #[must_use]
    pub fn ch_enabled(&self) -> bool {
        self.ch_enabled.unwrap_or(false)
    }

    /// Returns `true` if cooling is enabled.
    #[must_use]
    pub fn cooling_enabled(&self) -> bool {
        self.cooling_enabled.unwrap_or(false)
    }

    /// Returns `true` if the boiler supports cooling.
    #[must_use]
    pub fn cooling_config(&self) -> bool {
        self.cooling_config.unwrap_or(false)
    }

    /// Returns what the boiler is currently doing.
    #[must_use]
    pub fn hvac_action(&self) -> HvacAction {
        if self.ch_enabled() {
            HvacAction::Heating
        } else if self.cooling_enabled() {
            HvacAction::Cooling
        } else {
            HvacAction::Idle
        }
    }

    /// Overlays the readings present in `other` onto this block.
    ///
    /// Returns `true` if any reading changed.
    pub fn merge(&mut self, other: &BoilerBlock) -> bool {
        let mut changed = false;

        macro_rules! overlay {
            ($($field:ident),+ $(,)?) => {
                $(
                    if let Some(v) = other.$field
                        && self.$field != Some(v)
                    {
                        self.$field = Some(v);
                        changed = true;
                    }
                )+
            };
        }

        overlay!(
            control_setpoint,
            modulation_level,
            water_pressure,
            hot_water_flow_rate,
            hot_water_temperature,
            return_water_temperature,
            ch_enabled,
            cooling_enabled,
            cooling_config,
        );

        changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_overlays_present_readings_only() {
        let mut boiler = BoilerBlock {
            control_setpoint: Some(55.0),
            water_pressure: Some(1.5),
            ch_enabled: Some(true),
            ..BoilerBlock::default()
        };
        let update = BoilerBlock {
            water_pressure: Some(1.4),
            ..BoilerBlock::default()
        };

        assert!(boiler.merge(&update));
        assert_eq!(boiler.control_setpoint(), Some(55.0));
        assert_eq!(boiler.water_pressure(), Some(1.4));
        assert!(boiler.ch_enabled());

        assert!(!boiler.merge(&update));
    }

    #[test]
    fn hvac_action_prefers_heating() {
        let mut boiler = BoilerBlock::default();
        assert_eq!(boiler.hvac_action(), HvacAction::Idle);

        boiler.cooling_enabled = Some(true);
        assert_eq!(boiler.hvac_action(), HvacAction::Cooling);

        boiler.ch_enabled = Some(true);
        assert_eq!(boiler.hvac_action(), HvacAction::Heating);
    }
}
