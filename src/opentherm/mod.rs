// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Decoding of the raw OpenTherm block reported by the thermostat.
//!
//! Thermostats wired to the boiler over OpenTherm forward the last data words
//! they exchanged as an `ot.raw` object, keyed by data identifier:
//!
//! ```json
//! {"0": 769, "1": "0x3C80", "17": 11520, "18": "0x0133"}
//! ```
//!
//! Values are the 16-bit data words, either as integers or as `0x`-prefixed
//! hex strings. Identifiers this library does not read are skipped, and a
//! block that omits an identifier leaves the matching reading unset.
//!
//! # Examples
//!
//! ```
//! use thermosmart_lib::opentherm;
//!
//! let raw = serde_json::json!({"0": 256, "1": "0x3C80", "18": "0x0133"});
//! let boiler = opentherm::decode_raw(&raw).unwrap();
//!
//! assert!(boiler.ch_enabled());
//! assert_eq!(boiler.control_setpoint(), Some(60.5));
//! assert!(boiler.modulation_level().is_none());
//! ```

mod data_id;

pub use data_id::{DataId, f88, flag, high_byte};

use serde_json::Value;

use crate::error::ParseError;
use crate::state::BoilerBlock;

/// Master status bit: central heating enabled.
const STATUS_CH_ENABLE: u8 = 0;
/// Master status bit: cooling enabled.
const STATUS_COOLING_ENABLE: u8 = 2;
/// Slave configuration bit: cooling supported.
const CONFIG_COOLING: u8 = 2;

/// Decodes a raw OpenTherm block into boiler readings.
///
/// # Errors
///
/// Returns `ParseError::UnexpectedFormat` if the block is not an object, and
/// `ParseError::InvalidValue` if a known identifier carries a value that is
/// not a 16-bit data word.
pub fn decode_raw(raw: &Value) -> Result<BoilerBlock, ParseError> {
    let Value::Object(entries) = raw else {
        return Err(ParseError::UnexpectedFormat(format!(
            "OpenTherm raw block must be an object, got {raw}"
        )));
    };

    let mut boiler = BoilerBlock::default();

    for (key, value) in entries {
        let Some(data_id) = key.parse::<u8>().ok().and_then(DataId::from_id) else {
            tracing::trace!(key = %key, "Skipping unknown OpenTherm data id");
            continue;
        };

        let word = data_word(key, value)?;
        apply_word(&mut boiler, data_id, word);
    }

    Ok(boiler)
}

fn apply_word(boiler: &mut BoilerBlock, data_id: DataId, word: u16) {
    match data_id {
        DataId::Status => {
            let master = high_byte(word);
            boiler.ch_enabled = Some(flag(master, STATUS_CH_ENABLE));
            boiler.cooling_enabled = Some(flag(master, STATUS_COOLING_ENABLE));
        }
        DataId::SlaveConfig => {
            boiler.cooling_config = Some(flag(high_byte(word), CONFIG_COOLING));
        }
        DataId::ControlSetpoint => boiler.control_setpoint = Some(f88(word)),
        DataId::ModulationLevel => boiler.modulation_level = Some(f88(word)),
        DataId::WaterPressure => boiler.water_pressure = Some(f88(word)),
        DataId::HotWaterFlowRate => boiler.hot_water_flow_rate = Some(f88(word)),
        DataId::HotWaterTemperature => boiler.hot_water_temperature = Some(f88(word)),
        DataId::ReturnWaterTemperature => boiler.return_water_temperature = Some(f88(word)),
    }
}

fn data_word(key: &str, value: &Value) -> Result<u16, ParseError> {
    let invalid = |message: String| ParseError::InvalidValue {
        field: format!("ot.raw.{key}"),
        message,
    };

    match value {
        Value::Number(n) => n
            .as_u64()
            .and_then(|v| u16::try_from(v).ok())
            .ok_or_else(|| invalid(format!("{n} is not a 16-bit data word"))),
        Value::String(s) => {
            let parsed = match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
                Some(hex) => u16::from_str_radix(hex, 16),
                None => s.parse::<u16>(),
            };
            parsed.map_err(|e| invalid(format!("{s:?}: {e}")))
        }
        other => Err(invalid(format!("unexpected value {other}"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn decodes_full_block() {
        let raw = json!({
            "0": "0x0500",
            "1": "0x3C80",
            "3": "0x0400",
            "17": 11520,
            "18": "0x0133",
            "19": "0x0380",
            "26": "0x2D00",
            "28": "0x2800"
        });

        let boiler = decode_raw(&raw).unwrap();

        assert!(boiler.ch_enabled());
        assert!(boiler.cooling_enabled());
        assert!(boiler.cooling_config());
        assert_eq!(boiler.control_setpoint(), Some(60.5));
        assert_eq!(boiler.modulation_level(), Some(45.0));
        assert_eq!(boiler.water_pressure(), Some(1.199_218_75));
        assert_eq!(boiler.hot_water_flow_rate(), Some(3.5));
        assert_eq!(boiler.hot_water_temperature(), Some(45.0));
        assert_eq!(boiler.return_water_temperature(), Some(40.0));
    }

    #[test]
    fn skips_unknown_ids() {
        let raw = json!({"25": 12345, "vendor": "x", "1": 5120});
        let boiler = decode_raw(&raw).unwrap();
        assert_eq!(boiler.control_setpoint(), Some(20.0));
    }

    #[test]
    fn missing_ids_leave_readings_unset() {
        let boiler = decode_raw(&json!({})).unwrap();
        assert!(boiler.control_setpoint().is_none());
        assert!(!boiler.ch_enabled());
    }

    #[test]
    fn rejects_non_object() {
        assert!(matches!(
            decode_raw(&json!([1, 2])),
            Err(ParseError::UnexpectedFormat(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_word() {
        let err = decode_raw(&json!({"1": 70000})).unwrap_err();
        assert!(matches!(err, ParseError::InvalidValue { ref field, .. } if field == "ot.raw.1"));
    }
}
