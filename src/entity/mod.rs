// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Platform entities backed by an [`UpdateCoordinator`](crate::coordinator::UpdateCoordinator).
//!
//! Entities never hold state of their own. Every attribute is read from the
//! coordinator's current snapshot, and every command goes through the
//! coordinator. The shared part (coordinator handle, device registry info,
//! availability) lives in [`DeviceBacked`], which [`ClimateEntity`] and
//! [`BoilerSensor`] both wrap.
//!
//! # Examples
//!
//! ```no_run
//! use thermosmart_lib::coordinator::UpdateCoordinator;
//! use thermosmart_lib::entity::{BoilerSensor, ClimateEntity};
//! use thermosmart_lib::protocol::HttpClient;
//!
//! # async fn example() -> thermosmart_lib::Result<()> {
//! let client = HttpClient::new(String::from("access-token"))?;
//! let coordinator = UpdateCoordinator::builder(client).build().await?;
//!
//! let climate = ClimateEntity::new(coordinator.clone(), "Thermosmart");
//! for sensor in BoilerSensor::all(&coordinator) {
//!     println!("{}: {:?} {}", sensor.name(), sensor.value(), sensor.kind().unit());
//! }
//!
//! climate.set_temperature(20.0).await?;
//! # Ok(())
//! # }
//! ```

mod climate;
mod device;
mod sensor;

pub use climate::ClimateEntity;
pub use device::{DEVICE_MANUFACTURER, DEVICE_MODEL, DOMAIN, DeviceBacked, DeviceInfo};
pub use sensor::{BoilerSensor, BoilerSensorKind, SensorDeviceClass};
