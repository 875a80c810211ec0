// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat identifier type.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Vendor identifier of a thermostat.
///
/// Resolved once during setup and used to route webhook deliveries: a
/// coordinator only accepts payloads whose `thermostat` field matches its
/// bound identifier.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::types::ThermostatId;
///
/// let id = ThermostatId::new("ts-0042");
/// assert_eq!(id.as_str(), "ts-0042");
/// assert!(id.matches("ts-0042"));
/// ```
#[derive(Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ThermostatId(String);

impl ThermostatId {
    /// Creates a thermostat identifier.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns `true` if `other` names this thermostat.
    #[must_use]
    pub fn matches(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl fmt::Debug for ThermostatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ThermostatId({})", self.0)
    }
}

impl fmt::Display for ThermostatId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ThermostatId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for ThermostatId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_and_debug() {
        let id = ThermostatId::new("abc");
        assert_eq!(id.to_string(), "abc");
        assert_eq!(format!("{id:?}"), "ThermostatId(abc)");
    }

    #[test]
    fn serde_is_transparent() {
        let id: ThermostatId = serde_json::from_str("\"xyz\"").unwrap();
        assert_eq!(id, ThermostatId::from("xyz"));
        assert_eq!(serde_json::to_string(&id).unwrap(), "\"xyz\"");
    }
}
