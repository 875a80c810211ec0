// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! OpenTherm data identifiers and value encodings.

/// OpenTherm data identifiers read by the thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataId {
    /// Master and slave status flags.
    Status,
    /// Control setpoint (°C, f8.8).
    ControlSetpoint,
    /// Slave configuration flags.
    SlaveConfig,
    /// Relative modulation level (%, f8.8).
    ModulationLevel,
    /// Central heating water pressure (bar, f8.8).
    WaterPressure,
    /// Domestic hot water flow rate (l/min, f8.8).
    HotWaterFlowRate,
    /// Domestic hot water temperature (°C, f8.8).
    HotWaterTemperature,
    /// Return water temperature (°C, f8.8).
    ReturnWaterTemperature,
}

impl DataId {
    /// All identifiers the decoder understands.
    pub const ALL: [Self; 8] = [
        Self::Status,
        Self::ControlSetpoint,
        Self::SlaveConfig,
        Self::ModulationLevel,
        Self::WaterPressure,
        Self::HotWaterFlowRate,
        Self::HotWaterTemperature,
        Self::ReturnWaterTemperature,
    ];

    /// Returns the numeric data identifier.
    #[must_use]
    pub const fn id(&self) -> u8 {
        match self {
            Self::Status => 0,
            Self::ControlSetpoint => 1,
            Self::SlaveConfig => 3,
            Self::ModulationLevel => 17,
            Self::WaterPressure => 18,
            Self::HotWaterFlowRate => 19,
            Self::HotWaterTemperature => 26,
            Self::ReturnWaterTemperature => 28,
        }
    }

    /// Looks up a data identifier by its number.
    #[must_use]
    pub fn from_id(id: u8) -> Option<Self> {
        Self::ALL.into_iter().find(|d| d.id() == id)
    }
}

/// Decodes an f8.8 signed fixed point value.
#[must_use]
pub fn f88(word: u16) -> f64 {
    f64::from(word.cast_signed()) / 256.0
}

/// Returns the high byte of a data word.
#[must_use]
pub const fn high_byte(word: u16) -> u8 {
    word.to_be_bytes()[0]
}

/// Returns `true` if `bit` is set in `byte`.
#[must_use]
pub const fn flag(byte: u8, bit: u8) -> bool {
    byte & (1 << bit) != 0
}
