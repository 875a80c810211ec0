// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Boiler telemetry sensors.

use std::fmt;

use crate::config::IntegrationConfig;
use crate::coordinator::UpdateCoordinator;
use crate::protocol::RemoteDeviceClient;
use crate::state::BoilerBlock;

use super::device::{DeviceBacked, DeviceInfo};

/// Device class hint for the platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SensorDeviceClass {
    /// Temperature in °C.
    Temperature,
    /// Pressure in bar.
    Pressure,
}

/// The boiler readings exposed as sensors.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BoilerSensorKind {
    /// Control setpoint.
    ControlSetpoint,
    /// Relative modulation level.
    ModulationLevel,
    /// Central heating water pressure.
    WaterPressure,
    /// Domestic hot water flow rate.
    HotWaterFlowRate,
    /// Domestic hot water temperature.
    HotWaterTemperature,
    /// Return water temperature.
    ReturnWaterTemperature,
}

impl BoilerSensorKind {
    /// Every sensor kind, in registration order.
    pub const ALL: [Self; 6] = [
        Self::ControlSetpoint,
        Self::ModulationLevel,
        Self::WaterPressure,
        Self::HotWaterFlowRate,
        Self::HotWaterTemperature,
        Self::ReturnWaterTemperature,
    ];

    /// Reading name, also used as the unique id suffix.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::ControlSetpoint => "Control setpoint",
            Self::ModulationLevel => "Modulation level",
            Self::WaterPressure => "Water pressure",
            Self::HotWaterFlowRate => "Hot water flow rate",
            Self::HotWaterTemperature => "Hot water temperature",
            Self::ReturnWaterTemperature => "Return water temperature",
        }
    }

    /// Unit of measurement.
    #[must_use]
    pub const fn unit(&self) -> &'static str {
        match self {
            Self::ControlSetpoint | Self::HotWaterTemperature | Self::ReturnWaterTemperature => {
                "°C"
            }
            Self::ModulationLevel => "%",
            Self::WaterPressure => "bar",
            Self::HotWaterFlowRate => "l/min",
        }
    }

    /// Device class, if the platform has one for this reading.
    #[must_use]
    pub const fn device_class(&self) -> Option<SensorDeviceClass> {
        match self {
            Self::ControlSetpoint | Self::HotWaterTemperature | Self::ReturnWaterTemperature => {
                Some(SensorDeviceClass::Temperature)
            }
            Self::WaterPressure => Some(SensorDeviceClass::Pressure),
            Self::ModulationLevel | Self::HotWaterFlowRate => None,
        }
    }

    /// Reads this value from a boiler block.
    #[must_use]
    pub fn read(&self, boiler: &BoilerBlock) -> Option<f64> {
        match self {
            Self::ControlSetpoint => boiler.control_setpoint(),
            Self::ModulationLevel => boiler.modulation_level(),
            Self::WaterPressure => boiler.water_pressure(),
            Self::HotWaterFlowRate => boiler.hot_water_flow_rate(),
            Self::HotWaterTemperature => boiler.hot_water_temperature(),
            Self::ReturnWaterTemperature => boiler.return_water_temperature(),
        }
    }
}

impl fmt::Display for BoilerSensorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One boiler reading as a sensor entity.
///
/// The value is `None` whenever the snapshot has no boiler block or the
/// reading was never reported.
#[derive(Debug)]
pub struct BoilerSensor<C> {
    device: DeviceBacked<C>,
    kind: BoilerSensorKind,
}

impl<C> Clone for BoilerSensor<C> {
    fn clone(&self) -> Self {
        Self {
            device: self.device.clone(),
            kind: self.kind,
        }
    }
}

impl<C: RemoteDeviceClient> BoilerSensor<C> {
    /// Creates one sensor.
    #[must_use]
    pub fn new(coordinator: UpdateCoordinator<C>, kind: BoilerSensorKind) -> Self {
        Self {
            device: DeviceBacked::new(coordinator, IntegrationConfig::DEFAULT_NAME),
            kind,
        }
    }

    /// Creates the six boiler sensors of a thermostat.
    ///
    /// Returns no sensors if the installation does not report OpenTherm data.
    #[must_use]
    pub fn all(coordinator: &UpdateCoordinator<C>) -> Vec<Self> {
        if !coordinator.state().supports_opentherm() {
            tracing::warn!(
                thermostat = %coordinator.thermostat_id(),
                "OpenTherm is not enabled, boiler sensors are not available"
            );
            return Vec::new();
        }

        BoilerSensorKind::ALL
            .into_iter()
            .map(|kind| Self::new(coordinator.clone(), kind))
            .collect()
    }

    /// Returns the reading this sensor exposes.
    #[must_use]
    pub fn kind(&self) -> BoilerSensorKind {
        self.kind
    }

    /// Returns `Boiler, {reading}`.
    #[must_use]
    pub fn name(&self) -> String {
        format!("Boiler, {}", self.kind.key())
    }

    /// Returns `{thermostat}_{reading}`.
    #[must_use]
    pub fn unique_id(&self) -> String {
        self.device.unique_id(self.kind.key())
    }

    /// Registry entry of the boiler device.
    #[must_use]
    pub fn device_info(&self) -> DeviceInfo {
        self.device.boiler_device_info()
    }

    /// Current value.
    #[must_use]
    pub fn value(&self) -> Option<f64> {
        self.device
            .state()
            .boiler()
            .and_then(|boiler| self.kind.read(boiler))
    }

    /// Returns true while the coordinator is running and boiler data is
    /// present.
    #[must_use]
    pub fn available(&self) -> bool {
        self.device.available() && self.device.state().supports_opentherm()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn units_and_classes() {
        assert_eq!(BoilerSensorKind::WaterPressure.unit(), "bar");
        assert_eq!(
            BoilerSensorKind::WaterPressure.device_class(),
            Some(SensorDeviceClass::Pressure)
        );
        assert_eq!(BoilerSensorKind::HotWaterFlowRate.unit(), "l/min");
        assert_eq!(BoilerSensorKind::HotWaterFlowRate.device_class(), None);
        assert_eq!(BoilerSensorKind::ModulationLevel.unit(), "%");
        assert_eq!(BoilerSensorKind::ModulationLevel.device_class(), None);

        for kind in [
            BoilerSensorKind::ControlSetpoint,
            BoilerSensorKind::HotWaterTemperature,
            BoilerSensorKind::ReturnWaterTemperature,
        ] {
            assert_eq!(kind.unit(), "°C");
            assert_eq!(kind.device_class(), Some(SensorDeviceClass::Temperature));
        }
    }

    #[test]
    fn reads_from_block() {
        let boiler = BoilerBlock {
            water_pressure: Some(1.6),
            ..BoilerBlock::default()
        };

        assert_eq!(BoilerSensorKind::WaterPressure.read(&boiler), Some(1.6));
        assert_eq!(BoilerSensorKind::ControlSetpoint.read(&boiler), None);
    }

    #[test]
    fn keys_are_distinct() {
        let keys: std::collections::HashSet<_> =
            BoilerSensorKind::ALL.iter().map(|k| k.key()).collect();
        assert_eq!(keys.len(), 6);
        assert_eq!(BoilerSensorKind::ControlSetpoint.to_string(), "Control setpoint");
    }
}
