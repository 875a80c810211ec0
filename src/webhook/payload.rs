// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Webhook payload parsing.

use serde::Deserialize;
use serde_json::Value;

use crate::error::ParseError;
use crate::response::{OtBlock, parse_source};
use crate::state::{BoilerBlock, ChangeSet, Field, StateUpdate};
use crate::types::ExceptionEntry;

/// Code sent by the vendor when a webhook subscription has expired.
pub const WEBHOOK_EXPIRED_CODE: i64 = 510;

/// Body of a webhook delivery.
///
/// Every state field is a [`Field`] so a key that was not sent is told apart
/// from one sent as `null`. Unknown keys are ignored.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::state::Field;
/// use thermosmart_lib::webhook::WebhookPayload;
///
/// let payload = WebhookPayload::parse(br#"{"thermostat": "t1", "room_temperature": 20.5}"#).unwrap();
///
/// assert_eq!(payload.thermostat.as_deref(), Some("t1"));
/// assert_eq!(payload.room_temperature, Field::Present(20.5));
/// assert_eq!(payload.target_temperature, Field::Absent);
/// assert!(!payload.is_expired());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
pub struct WebhookPayload {
    /// Thermostat the delivery is about.
    #[serde(default)]
    pub thermostat: Option<String>,
    /// Status code; [`WEBHOOK_EXPIRED_CODE`] flags an expired subscription.
    #[serde(default)]
    pub code: Option<i64>,
    /// Measured room temperature.
    #[serde(default)]
    pub room_temperature: Field<f64>,
    /// Current set-point.
    #[serde(default)]
    pub target_temperature: Field<f64>,
    /// Origin of the set-point, as reported.
    #[serde(default)]
    pub source: Field<String>,
    /// OpenTherm data.
    #[serde(default)]
    pub ot: Field<OtBlock>,
    /// Full exception list.
    #[serde(default)]
    pub exceptions: Field<Vec<ExceptionEntry>>,
}

impl WebhookPayload {
    /// Parses a webhook body.
    ///
    /// # Errors
    ///
    /// Returns `ParseError::UnexpectedFormat` if the body is not a JSON
    /// object, or `ParseError::Json` if a known field has the wrong type.
    pub fn parse(body: &[u8]) -> Result<Self, ParseError> {
        let value: Value = serde_json::from_slice(body)?;
        if !value.is_object() {
            return Err(ParseError::UnexpectedFormat(format!(
                "webhook body must be a JSON object, got {value}"
            )));
        }
        Ok(serde_json::from_value(value)?)
    }

    /// Returns true if this is a subscription expiry notification.
    #[must_use]
    pub fn is_expired(&self) -> bool {
        self.code == Some(WEBHOOK_EXPIRED_CODE)
    }

    /// Builds the partial update carried by this payload.
    ///
    /// `decode` turns the raw OpenTherm block into boiler readings. A block
    /// that fails to decode is logged and left out of the update; the other
    /// fields still apply. Unknown source values are left out as well.
    pub fn to_update<F>(&self, decode: F) -> StateUpdate
    where
        F: FnOnce(&Value) -> Result<BoilerBlock, ParseError>,
    {
        let source = match &self.source {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Present(raw) => parse_source(raw).map_or(Field::Absent, Field::Present),
        };

        let boiler = match &self.ot {
            Field::Absent => Field::Absent,
            Field::Null => Field::Null,
            Field::Present(OtBlock { raw: Some(raw) }) if !raw.is_null() => match decode(raw) {
                Ok(boiler) => Field::Present(boiler),
                Err(e) => {
                    tracing::warn!(
                        thermostat = ?self.thermostat,
                        error = %e,
                        "Dropping undecodable OpenTherm block"
                    );
                    Field::Absent
                }
            },
            Field::Present(_) => Field::Absent,
        };

        StateUpdate {
            room_temperature: self.room_temperature.clone(),
            target_temperature: self.target_temperature.clone(),
            source,
            boiler,
            exceptions: self.exceptions.clone(),
        }
    }
}

/// Why a webhook delivery did not change anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IgnoreReason {
    /// The payload is about another thermostat.
    OtherDevice,
    /// The vendor reported that the webhook subscription expired.
    Expired,
    /// The coordinator has not completed its first refresh.
    NotReady,
    /// The coordinator is shut down.
    Stopped,
    /// No coordinator is registered for the webhook id.
    UnknownWebhook,
}

/// Result of processing a webhook delivery.
///
/// Webhook handling never fails towards the sender; this value only tells
/// the caller what happened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WebhookOutcome {
    /// The payload was merged. The change set is empty if nothing changed.
    Applied(ChangeSet),
    /// The payload was valid but not applied.
    Ignored(IgnoreReason),
    /// The payload was malformed.
    Rejected(String),
}

impl WebhookOutcome {
    /// Returns true if the payload changed the cached state.
    #[must_use]
    pub fn changed(&self) -> bool {
        matches!(self, Self::Applied(changes) if changes.any())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::opentherm;
    use crate::types::Source;

    #[test]
    fn tri_state_fields() {
        let payload = WebhookPayload::parse(
            br#"{"thermostat": "t", "room_temperature": null, "target_temperature": 19}"#,
        )
        .unwrap();

        assert_eq!(payload.room_temperature, Field::Null);
        assert_eq!(payload.target_temperature, Field::Present(19.0));
        assert_eq!(payload.source, Field::Absent);
        assert_eq!(payload.exceptions, Field::Absent);
    }

    #[test]
    fn expired_code() {
        let payload = WebhookPayload::parse(br#"{"code": 510}"#).unwrap();
        assert!(payload.is_expired());
    }

    #[test]
    fn rejects_non_object_body() {
        assert!(matches!(
            WebhookPayload::parse(b"[1,2]"),
            Err(ParseError::UnexpectedFormat(_))
        ));
        assert!(matches!(
            WebhookPayload::parse(b"not json"),
            Err(ParseError::Json(_))
        ));
    }

    #[test]
    fn update_parses_source_and_boiler() {
        let payload = WebhookPayload::parse(
            br#"{"thermostat": "t", "source": "exception", "ot": {"raw": {"18": "0x0180"}}}"#,
        )
        .unwrap();

        let update = payload.to_update(opentherm::decode_raw);

        assert_eq!(update.source, Field::Present(Source::Exception));
        let boiler = update.boiler.as_present().unwrap();
        assert_eq!(boiler.water_pressure(), Some(1.5));
        assert!(boiler.control_setpoint().is_none());
    }

    #[test]
    fn undecodable_boiler_is_dropped_but_rest_applies() {
        let payload = WebhookPayload::parse(
            br#"{"thermostat": "t", "room_temperature": 21, "ot": {"raw": "garbage"}}"#,
        )
        .unwrap();

        let update = payload.to_update(opentherm::decode_raw);

        assert_eq!(update.boiler, Field::Absent);
        assert_eq!(update.room_temperature, Field::Present(21.0));
    }

    #[test]
    fn unknown_source_is_left_out() {
        let payload = WebhookPayload::parse(br#"{"thermostat": "t", "source": "boost"}"#).unwrap();
        assert_eq!(payload.to_update(opentherm::decode_raw).source, Field::Absent);
    }

    #[test]
    fn outcome_changed() {
        let changes = ChangeSet {
            source: true,
            ..ChangeSet::default()
        };
        assert!(WebhookOutcome::Applied(changes).changed());
        assert!(!WebhookOutcome::Applied(ChangeSet::default()).changed());
        assert!(!WebhookOutcome::Ignored(IgnoreReason::Expired).changed());
    }
}
