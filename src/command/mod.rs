// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat command definitions.
//!
//! Commands are typed requests against the vendor API. They only describe
//! what to send; a [`RemoteDeviceClient`](crate::protocol::RemoteDeviceClient)
//! decides how.
//!
//! # Available Commands
//!
//! | Command Type | Purpose | Request |
//! |-------------|---------|---------|
//! | [`TargetTemperatureCommand`] | Change the set-point | `PUT /thermostat/{id}` |
//! | [`PauseCommand`] | Pause or resume the thermostat | `POST /thermostat/{id}/pause` |
//! | [`ExceptionsCommand`] | Replace the exception list | `PUT /thermostat/{id}` |
//!
//! # Examples
//!
//! ```
//! use thermosmart_lib::command::{Command, Method, PauseCommand};
//!
//! let cmd = PauseCommand::pause();
//! assert_eq!(cmd.method(), Method::Post);
//! assert_eq!(cmd.path_suffix(), "/pause");
//! assert_eq!(cmd.body(), serde_json::json!({"pause": true}));
//! ```

mod thermostat;

pub use thermostat::{ExceptionsCommand, PauseCommand, TargetTemperatureCommand};

use std::fmt;

/// HTTP method used by a command.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    /// `GET`
    Get,
    /// `PUT`
    Put,
    /// `POST`
    Post,
}

impl Method {
    /// Returns the method name.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Put => "PUT",
            Self::Post => "POST",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A command that can be sent to a thermostat.
pub trait Command {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// HTTP method of the request.
    fn method(&self) -> Method;

    /// Path below `/thermostat/{id}`, empty for the thermostat resource itself.
    fn path_suffix(&self) -> &'static str {
        ""
    }

    /// JSON request body.
    fn body(&self) -> serde_json::Value;
}
