// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! HTTP client for the Thermosmart REST API.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use serde_json::Value;

use crate::command::{Command, Method};
use crate::error::{ParseError, ProtocolError};
use crate::protocol::{RemoteDeviceClient, TokenProvider};
use crate::response::{MeResponse, ThermostatResponse};
use crate::state::DeviceState;
use crate::types::ThermostatId;

// ============================================================================
// HttpConfig
// ============================================================================

/// Configuration for the vendor REST client.
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use thermosmart_lib::protocol::HttpConfig;
///
/// let config = HttpConfig::new()
///     .with_base_url("http://127.0.0.1:8080/")
///     .with_timeout(Duration::from_secs(5));
///
/// assert_eq!(config.base_url(), "http://127.0.0.1:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    base_url: String,
    timeout: Duration,
}

impl HttpConfig {
    /// Production API endpoint.
    pub const DEFAULT_BASE_URL: &'static str = "https://api.thermosmart.com";
    /// Default request timeout.
    pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

    /// Creates a configuration pointing at the production API.
    #[must_use]
    pub fn new() -> Self {
        Self {
            base_url: Self::DEFAULT_BASE_URL.to_string(),
            timeout: Self::DEFAULT_TIMEOUT,
        }
    }

    /// Sets a custom API base URL.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    /// Sets the request timeout.
    #[must_use]
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Returns the timeout.
    #[must_use]
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Creates an `HttpClient` from this configuration.
    ///
    /// # Errors
    ///
    /// Returns `ProtocolError::InvalidAddress` if the base URL is not an
    /// `http` or `https` URL, or an HTTP error if the client cannot be
    /// created.
    pub fn into_client<T: TokenProvider>(self, token: T) -> Result<HttpClient<T>, ProtocolError> {
        if !(self.base_url.starts_with("http://") || self.base_url.starts_with("https://")) {
            return Err(ProtocolError::InvalidAddress(self.base_url));
        }

        let client = Client::builder()
            .timeout(self.timeout)
            .build()
            .map_err(ProtocolError::Http)?;

        Ok(HttpClient {
            base_url: self.base_url,
            client,
            token,
        })
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new()
    }
}

// ============================================================================
// HttpClient
// ============================================================================

/// REST client for Thermosmart thermostats.
///
/// Every request carries `Authorization: Bearer <token>`, with the token
/// taken from the [`TokenProvider`] right before sending.
///
/// # Examples
///
/// ```no_run
/// use thermosmart_lib::protocol::{HttpClient, RemoteDeviceClient};
///
/// # async fn example() -> thermosmart_lib::Result<()> {
/// let client = HttpClient::new(String::from("access-token"))?;
/// let id = client.thermostat_id().await?;
/// let state = client.fetch_full_state(&id).await?;
/// println!("{id}: {:?}", state.room_temperature());
/// # Ok(())
/// # }
/// ```
#[derive(Debug, Clone)]
pub struct HttpClient<T = String> {
    base_url: String,
    client: Client,
    token: T,
}

impl<T: TokenProvider> HttpClient<T> {
    /// Creates a client for the production API.
    ///
    /// # Errors
    ///
    /// Returns error if the HTTP client cannot be created.
    pub fn new(token: T) -> Result<Self, ProtocolError> {
        HttpConfig::new().into_client(token)
    }

    /// Returns the API base URL.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn thermostat_url(&self, thermostat: &ThermostatId, suffix: &str) -> String {
        format!(
            "{}/thermostat/{}{suffix}",
            self.base_url,
            urlencoding::encode(thermostat.as_str())
        )
    }

    async fn request(
        &self,
        method: Method,
        url: &str,
        body: Option<&Value>,
    ) -> Result<String, ProtocolError> {
        let token = self.token.access_token().await?;

        tracing::debug!(method = %method, url = %url, "Sending HTTP request");

        let builder = match method {
            Method::Get => self.client.get(url),
            Method::Put => self.client.put(url),
            Method::Post => self.client.post(url),
        };
        let builder = builder.bearer_auth(token);
        let builder = match body {
            Some(body) => builder.json(body),
            None => builder,
        };

        let response = builder.send().await.map_err(ProtocolError::Http)?;
        let status = response.status();

        if status == StatusCode::UNAUTHORIZED || status == StatusCode::FORBIDDEN {
            return Err(ProtocolError::AuthenticationFailed);
        }

        if !status.is_success() {
            return Err(ProtocolError::Status {
                status: status.as_u16(),
                reason: status.canonical_reason().unwrap_or("Unknown").to_string(),
            });
        }

        let body = response.text().await.map_err(ProtocolError::Http)?;

        tracing::trace!(body = %body, "Received HTTP response");

        Ok(body)
    }

    async fn get_json<R: DeserializeOwned>(&self, url: &str) -> crate::Result<R> {
        let body = self.request(Method::Get, url, None).await?;
        serde_json::from_str(&body).map_err(|e| ParseError::Json(e).into())
    }
}

impl<T: TokenProvider> RemoteDeviceClient for HttpClient<T> {
    async fn thermostat_id(&self) -> crate::Result<ThermostatId> {
        let url = format!("{}/me", self.base_url);
        let me: MeResponse = self.get_json(&url).await?;
        Ok(me.thermostat)
    }

    async fn fetch_full_state(&self, thermostat: &ThermostatId) -> crate::Result<DeviceState> {
        let url = self.thermostat_url(thermostat, "");
        let response: ThermostatResponse = self.get_json(&url).await?;
        Ok(response.into_state(|raw| self.decode_boiler(raw))?)
    }

    async fn send_command<C: Command + Sync>(
        &self,
        thermostat: &ThermostatId,
        command: &C,
    ) -> crate::Result<()> {
        let url = self.thermostat_url(thermostat, command.path_suffix());
        let body = command.body();

        tracing::debug!(thermostat = %thermostat, command = command.name(), "Sending command");

        self.request(command.method(), &url, Some(&body)).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.base_url(), HttpConfig::DEFAULT_BASE_URL);
        assert_eq!(config.timeout(), HttpConfig::DEFAULT_TIMEOUT);
    }

    #[test]
    fn rejects_non_http_base_url() {
        let err = HttpConfig::new()
            .with_base_url("ftp://example.com")
            .into_client(String::from("t"))
            .unwrap_err();
        assert!(matches!(err, ProtocolError::InvalidAddress(_)));
    }

    #[test]
    fn thermostat_url_encodes_id() {
        let client = HttpConfig::new()
            .with_base_url("http://localhost:1234")
            .into_client(String::from("t"))
            .unwrap();

        let url = client.thermostat_url(&ThermostatId::new("a b/c"), "/pause");
        assert_eq!(url, "http://localhost:1234/thermostat/a%20b%2Fc/pause");
    }
}
