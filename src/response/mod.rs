// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Response parsing for vendor API JSON bodies.
//!
//! Each response type corresponds to one endpoint. Unknown keys are ignored
//! so new vendor fields never break parsing.

mod me;
mod thermostat;

pub use me::MeResponse;
pub use thermostat::{OtBlock, ThermostatResponse};

pub(crate) use thermostat::parse_source;
