// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Value types for Thermosmart thermostats.
//!
//! # Types
//!
//! - [`ThermostatId`] - Vendor identifier of a thermostat
//! - [`Source`] - Why the current set-point is what it is
//! - [`HvacMode`], [`HvacAction`], [`PresetMode`] - Views derived for the climate entity
//! - [`TargetTemperature`] - Set-point within the accepted range
//! - [`ExceptionEntry`], [`ExceptionProgram`] - Scheduling exceptions

mod exception;
mod source;
mod temperature;
mod thermostat_id;

pub use exception::{ExceptionEntry, ExceptionProgram};
pub use source::{HvacAction, HvacMode, PresetMode, Source};
pub use temperature::TargetTemperature;
pub use thermostat_id::ThermostatId;
