// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator handle shared by every entity of a thermostat.

use std::sync::Arc;

use crate::coordinator::UpdateCoordinator;
use crate::protocol::RemoteDeviceClient;
use crate::state::DeviceState;
use crate::types::ThermostatId;

/// Integration domain used in device identifiers.
pub const DOMAIN: &str = "thermosmart";

/// Model reported to the device registry.
pub const DEVICE_MODEL: &str = "V3";

/// Manufacturer reported to the device registry.
pub const DEVICE_MANUFACTURER: &str = "Thermosmart";

/// Device registry entry shared by the entities of one thermostat.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeviceInfo {
    /// `(domain, thermostat id)` pair identifying the device.
    pub identifiers: (String, String),
    /// Device name.
    pub name: String,
    /// Model name.
    pub model: String,
    /// Manufacturer name.
    pub manufacturer: String,
    /// Parent device, for devices attached to the thermostat.
    pub via_device: Option<(String, String)>,
}

/// Entity capability: read state from, and send commands through, a
/// coordinator.
///
/// Concrete entities wrap this value and delegate to it.
pub struct DeviceBacked<C> {
    coordinator: UpdateCoordinator<C>,
    device_name: String,
}

impl<C> std::fmt::Debug for DeviceBacked<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("DeviceBacked")
            .field("coordinator", &self.coordinator)
            .field("device_name", &self.device_name)
            .finish()
    }
}

impl<C> Clone for DeviceBacked<C> {
    fn clone(&self) -> Self {
        Self {
            coordinator: self.coordinator.clone(),
            device_name: self.device_name.clone(),
        }
    }
}

impl<C: RemoteDeviceClient> DeviceBacked<C> {
    /// Binds an entity to a coordinator.
    #[must_use]
    pub fn new(coordinator: UpdateCoordinator<C>, device_name: impl Into<String>) -> Self {
        Self {
            coordinator,
            device_name: device_name.into(),
        }
    }

    /// Returns the coordinator.
    #[must_use]
    pub fn coordinator(&self) -> &UpdateCoordinator<C> {
        &self.coordinator
    }

    /// Returns the thermostat id.
    #[must_use]
    pub fn thermostat_id(&self) -> &ThermostatId {
        self.coordinator.thermostat_id()
    }

    /// Returns the current state snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<DeviceState> {
        self.coordinator.state()
    }

    /// Returns true while the coordinator is running.
    #[must_use]
    pub fn available(&self) -> bool {
        self.coordinator.lifecycle().is_ready()
    }

    /// Builds a unique id of the form `{thermostat}_{suffix}`.
    #[must_use]
    pub fn unique_id(&self, suffix: &str) -> String {
        format!("{}_{suffix}", self.thermostat_id())
    }

    /// Returns the device registry entry.
    #[must_use]
    pub fn device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: (DOMAIN.to_string(), self.thermostat_id().to_string()),
            name: self.device_name.clone(),
            model: DEVICE_MODEL.to_string(),
            manufacturer: DEVICE_MANUFACTURER.to_string(),
            via_device: None,
        }
    }

    /// Returns the registry entry of the boiler behind the thermostat.
    #[must_use]
    pub fn boiler_device_info(&self) -> DeviceInfo {
        DeviceInfo {
            identifiers: (DOMAIN.to_string(), self.unique_id("boiler")),
            name: "Boiler".to_string(),
            model: "n/a".to_string(),
            manufacturer: "Generic".to_string(),
            via_device: Some(self.device_info().identifiers),
        }
    }
}
