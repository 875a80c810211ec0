// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat control commands.

use serde_json::json;

use crate::command::{Command, Method};
use crate::types::{ExceptionEntry, TargetTemperature};

/// Command to change the target temperature.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::command::{Command, TargetTemperatureCommand};
/// use thermosmart_lib::types::TargetTemperature;
///
/// let cmd = TargetTemperatureCommand::new(TargetTemperature::new(20.5).unwrap());
/// assert_eq!(cmd.body(), serde_json::json!({"target_temperature": 20.5}));
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TargetTemperatureCommand {
    temperature: TargetTemperature,
}

impl TargetTemperatureCommand {
    /// Creates a command setting the given temperature.
    #[must_use]
    pub const fn new(temperature: TargetTemperature) -> Self {
        Self { temperature }
    }

    /// Returns the requested temperature.
    #[must_use]
    pub const fn temperature(&self) -> TargetTemperature {
        self.temperature
    }
}

impl Command for TargetTemperatureCommand {
    fn name(&self) -> &'static str {
        "target_temperature"
    }

    fn method(&self) -> Method {
        Method::Put
    }

    fn body(&self) -> serde_json::Value {
        json!({ "target_temperature": self.temperature.celsius() })
    }
}

/// Command to pause or resume the thermostat.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PauseCommand {
    paused: bool,
}

impl PauseCommand {
    /// Creates a command setting the pause flag.
    #[must_use]
    pub const fn new(paused: bool) -> Self {
        Self { paused }
    }

    /// Pauses the thermostat.
    #[must_use]
    pub const fn pause() -> Self {
        Self::new(true)
    }

    /// Resumes the thermostat.
    #[must_use]
    pub const fn resume() -> Self {
        Self::new(false)
    }

    /// Returns the requested pause flag.
    #[must_use]
    pub const fn paused(&self) -> bool {
        self.paused
    }
}

impl Command for PauseCommand {
    fn name(&self) -> &'static str {
        "pause"
    }

    fn method(&self) -> Method {
        Method::Post
    }

    fn path_suffix(&self) -> &'static str {
        "/pause"
    }

    fn body(&self) -> serde_json::Value {
        json!({ "pause": self.paused })
    }
}

/// Command to replace the whole exception list.
///
/// The vendor has no append operation: adding an exception means sending
/// the current list with the new entry at the end.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExceptionsCommand {
    exceptions: Vec<ExceptionEntry>,
}

impl ExceptionsCommand {
    /// Creates a command sending the given list.
    #[must_use]
    pub fn new(exceptions: Vec<ExceptionEntry>) -> Self {
        Self { exceptions }
    }

    /// Creates a command removing every exception.
    #[must_use]
    pub fn clear() -> Self {
        Self::new(Vec::new())
    }

    /// Returns the list that will be sent.
    #[must_use]
    pub fn exceptions(&self) -> &[ExceptionEntry] {
        &self.exceptions
    }
}

impl Command for ExceptionsCommand {
    fn name(&self) -> &'static str {
        "exceptions"
    }

    fn method(&self) -> Method {
        Method::Put
    }

    fn body(&self) -> serde_json::Value {
        json!({ "exceptions": self.exceptions })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::ExceptionProgram;
    use chrono::NaiveDate;

    #[test]
    fn target_temperature_command() {
        let cmd = TargetTemperatureCommand::new(TargetTemperature::new(19.0).unwrap());
        assert_eq!(cmd.method(), Method::Put);
        assert_eq!(cmd.path_suffix(), "");
        assert_eq!(cmd.body(), json!({"target_temperature": 19.0}));
    }

    #[test]
    fn pause_and_resume() {
        assert_eq!(PauseCommand::pause().body(), json!({"pause": true}));
        assert_eq!(PauseCommand::resume().body(), json!({"pause": false}));
        assert_eq!(PauseCommand::resume().path_suffix(), "/pause");
    }

    #[test]
    fn exceptions_use_wire_format() {
        let day = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let entry = ExceptionEntry::new(
            day.and_hms_opt(10, 7, 0).unwrap(),
            day.and_hms_opt(12, 30, 0).unwrap(),
            ExceptionProgram::NotHome,
        )
        .unwrap();

        let cmd = ExceptionsCommand::new(vec![entry]);

        assert_eq!(
            cmd.body(),
            json!({"exceptions": [{
                "start": [2024, 0, 15, 10, 0],
                "end": [2024, 0, 15, 12, 30],
                "temperature": "not_home"
            }]})
        );
    }

    #[test]
    fn clear_sends_empty_list() {
        assert_eq!(ExceptionsCommand::clear().body(), json!({"exceptions": []}));
    }
}
