// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermostat response parsing.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::state::{BoilerBlock, DeviceState};
use crate::types::{ExceptionEntry, Source};

/// OpenTherm section of a thermostat payload.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct OtBlock {
    /// Raw data words keyed by OpenTherm data id.
    #[serde(default)]
    pub raw: Option<Value>,
}

/// Full thermostat state from `GET /thermostat/{id}`.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::opentherm;
/// use thermosmart_lib::response::ThermostatResponse;
/// use thermosmart_lib::types::Source;
///
/// let json = r#"{
///     "room_temperature": 20.1,
///     "target_temperature": 21,
///     "source": "schedule",
///     "ot": {"raw": {"1": "0x3C00"}},
///     "exceptions": []
/// }"#;
/// let response: ThermostatResponse = serde_json::from_str(json).unwrap();
/// let state = response.into_state(opentherm::decode_raw).unwrap();
///
/// assert_eq!(state.source(), Some(Source::Schedule));
/// assert_eq!(state.boiler().unwrap().control_setpoint(), Some(60.0));
/// ```
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ThermostatResponse {
    /// Measured room temperature.
    #[serde(default)]
    pub room_temperature: Option<f64>,
    /// Current set-point.
    #[serde(default)]
    pub target_temperature: Option<f64>,
    /// Origin of the set-point, as reported.
    #[serde(default)]
    pub source: Option<String>,
    /// OpenTherm data, only present for boilers wired over OpenTherm.
    #[serde(default)]
    pub ot: Option<OtBlock>,
    /// Scheduled exceptions.
    #[serde(default)]
    pub exceptions: Option<Vec<ExceptionEntry>>,
}

impl ThermostatResponse {
    /// Converts the response into a [`DeviceState`].
    ///
    /// `decode` turns the raw OpenTherm block into boiler readings. An `ot`
    /// section without a raw block yields an empty [`BoilerBlock`]: the
    /// installation supports OpenTherm but has not reported readings yet.
    ///
    /// # Errors
    ///
    /// Returns the decoder's error if the raw block cannot be decoded.
    pub fn into_state<F>(self, decode: F) -> Result<DeviceState, ParseError>
    where
        F: FnOnce(&Value) -> Result<BoilerBlock, ParseError>,
    {
        let mut state = DeviceState::new();

        if let Some(v) = self.room_temperature {
            state = state.with_room_temperature(v);
        }
        if let Some(v) = self.target_temperature {
            state = state.with_target_temperature(v);
        }
        if let Some(source) = self.source.as_deref().and_then(parse_source) {
            state = state.with_source(source);
        }
        if let Some(ot) = self.ot {
            let boiler = match ot.raw {
                Some(raw) if !raw.is_null() => decode(&raw)?,
                _ => BoilerBlock::default(),
            };
            state = state.with_boiler(boiler);
        }
        if let Some(exceptions) = self.exceptions {
            state = state.with_exceptions(exceptions);
        }

        Ok(state)
    }
}

/// Parses a reported source, skipping values this library does not know.
pub(crate) fn parse_source(raw: &str) -> Option<Source> {
    match raw.parse() {
        Ok(source) => Some(source),
        Err(e) => {
            tracing::debug!(source = %raw, error = %e, "Ignoring unknown source");
            None
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opentherm;

    fn parse(json: &str) -> DeviceState {
        serde_json::from_str::<ThermostatResponse>(json)
            .unwrap()
            .into_state(opentherm::decode_raw)
            .unwrap()
    }

    #[test]
    fn without_ot_has_no_boiler() {
        let state = parse(r#"{"room_temperature": 19.5, "target_temperature": 20, "source": "manual"}"#);
        assert!(state.boiler().is_none());
        assert!(!state.supports_opentherm());
        assert_eq!(state.target_temperature(), Some(20.0));
    }

    #[test]
    fn ot_without_raw_has_empty_boiler() {
        let state = parse(r#"{"source": "pause", "ot": {"readable": {}}}"#);
        assert_eq!(state.boiler(), Some(&BoilerBlock::default()));
    }

    #[test]
    fn unknown_source_is_skipped() {
        let state = parse(r#"{"source": "holiday", "room_temperature": 18}"#);
        assert!(state.source().is_none());
        assert_eq!(state.room_temperature(), Some(18.0));
    }

    #[test]
    fn exceptions_are_parsed_from_wire_format() {
        let state = parse(
            r#"{"exceptions": [{"start": [2024, 11, 24, 18, 0], "end": [2024, 11, 26, 8, 0], "temperature": "comfort"}]}"#,
        );
        let exception = &state.exceptions()[0];
        assert_eq!(exception.start().to_string(), "2024-12-24 18:00:00");
    }

    #[test]
    fn decoder_errors_propagate() {
        let response: ThermostatResponse =
            serde_json::from_str(r#"{"ot": {"raw": [1, 2, 3]}}"#).unwrap();
        assert!(response.into_state(opentherm::decode_raw).is_err());
    }
}
