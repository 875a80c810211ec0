// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Account response parsing.

use serde::Deserialize;

use crate::types::ThermostatId;

/// Response from `GET /me`.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::response::MeResponse;
///
/// let me: MeResponse = serde_json::from_str(r#"{"thermostat": "ab12"}"#).unwrap();
/// assert_eq!(me.thermostat.as_str(), "ab12");
/// ```
#[derive(Debug, Clone, Deserialize)]
pub struct MeResponse {
    /// Thermostat bound to the access token.
    pub thermostat: ThermostatId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ignores_unknown_keys() {
        let me: MeResponse =
            serde_json::from_str(r#"{"thermostat": "x1", "user": "someone"}"#).unwrap();
        assert!(me.thermostat.matches("x1"));
    }

    #[test]
    fn missing_thermostat_is_an_error() {
        assert!(serde_json::from_str::<MeResponse>("{}").is_err());
    }
}
