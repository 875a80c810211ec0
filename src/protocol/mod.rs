// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Access to the vendor cloud.
//!
//! The coordinator only talks to the vendor through [`RemoteDeviceClient`].
//! With the `http` feature enabled, [`HttpClient`] implements it over the
//! vendor REST API; tests and alternative transports provide their own.
//!
//! Access tokens come from a [`TokenProvider`]. Acquiring and refreshing
//! OAuth2 tokens is left to the host platform.

#[cfg(feature = "http")]
mod http;

#[cfg(feature = "http")]
pub use http::{HttpClient, HttpConfig};

use std::future::Future;
use std::sync::Arc;

use serde_json::Value;

use crate::command::Command;
use crate::error::{ParseError, ProtocolError};
use crate::opentherm;
use crate::state::{BoilerBlock, DeviceState};
use crate::types::ThermostatId;

/// Remote access to a thermostat.
///
/// Futures returned by the client must be `Send` so the coordinator can run
/// them from background tasks. Implementations may still be written with
/// `async fn`.
pub trait RemoteDeviceClient: Send + Sync + 'static {
    /// Resolves the thermostat bound to the credentials.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor cannot be reached or the answer is
    /// malformed.
    fn thermostat_id(&self) -> impl Future<Output = crate::Result<ThermostatId>> + Send;

    /// Fetches the complete state of a thermostat.
    ///
    /// # Errors
    ///
    /// Returns an error if the vendor cannot be reached or the answer is
    /// malformed.
    fn fetch_full_state(
        &self,
        thermostat: &ThermostatId,
    ) -> impl Future<Output = crate::Result<DeviceState>> + Send;

    /// Sends a command to a thermostat.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails or the vendor rejects it.
    fn send_command<C: Command + Sync>(
        &self,
        thermostat: &ThermostatId,
        command: &C,
    ) -> impl Future<Output = crate::Result<()>> + Send;

    /// Decodes a raw OpenTherm block into boiler readings.
    ///
    /// # Errors
    ///
    /// Returns `ParseError` if the block cannot be decoded.
    fn decode_boiler(&self, raw: &Value) -> Result<BoilerBlock, ParseError> {
        opentherm::decode_raw(raw)
    }
}

/// Supplies bearer tokens for API requests.
pub trait TokenProvider: Send + Sync + 'static {
    /// Returns a currently valid access token.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::MissingToken` if no token is available.
    fn access_token(&self) -> impl Future<Output = Result<String, ProtocolError>> + Send;
}

impl TokenProvider for String {
    async fn access_token(&self) -> Result<String, ProtocolError> {
        if self.is_empty() {
            return Err(ProtocolError::MissingToken);
        }
        Ok(self.clone())
    }
}

impl<T: TokenProvider> TokenProvider for Arc<T> {
    fn access_token(&self) -> impl Future<Output = Result<String, ProtocolError>> + Send {
        (**self).access_token()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn static_token() {
        let token = String::from("abc");
        assert_eq!(token.access_token().await.unwrap(), "abc");
    }

    #[tokio::test]
    async fn empty_token_is_missing() {
        let err = String::new().access_token().await.unwrap_err();
        assert!(matches!(err, ProtocolError::MissingToken));
    }

    #[tokio::test]
    async fn shared_token_provider() {
        let token = Arc::new(String::from("shared"));
        assert_eq!(token.access_token().await.unwrap(), "shared");
    }
}
