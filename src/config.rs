// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration configuration.

use serde::Deserialize;

use crate::coordinator::UpdateMode;
use crate::error::ConfigError;

/// User-facing configuration of one Thermosmart integration.
///
/// The client credentials identify the OAuth2 application; acquiring tokens
/// with them is up to the host platform. Configuring a webhook id switches
/// the coordinator to push mode.
///
/// # Examples
///
/// ```
/// use thermosmart_lib::config::IntegrationConfig;
/// use thermosmart_lib::coordinator::UpdateMode;
///
/// let config: IntegrationConfig = serde_json::from_str(
///     r#"{"client_id": "id", "client_secret": "secret", "webhook_id": "hook"}"#,
/// )
/// .unwrap();
///
/// config.validate().unwrap();
/// assert_eq!(
///     config.update_mode(),
///     UpdateMode::Push { webhook_id: "hook".to_string() }
/// );
/// assert_eq!(config.display_name(), "Thermosmart");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct IntegrationConfig {
    /// OAuth2 client id.
    pub client_id: String,
    /// OAuth2 client secret.
    pub client_secret: String,
    /// Optional display name.
    #[serde(default)]
    pub name: Option<String>,
    /// Webhook id under which the vendor pushes updates.
    #[serde(default)]
    pub webhook_id: Option<String>,
}

impl IntegrationConfig {
    /// Default display name.
    pub const DEFAULT_NAME: &'static str = "Thermosmart";

    /// Creates a configuration with the given client credentials.
    #[must_use]
    pub fn new(client_id: impl Into<String>, client_secret: impl Into<String>) -> Self {
        Self {
            client_id: client_id.into(),
            client_secret: client_secret.into(),
            name: None,
            webhook_id: None,
        }
    }

    /// Sets the display name.
    #[must_use]
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Sets the webhook id, enabling push mode.
    #[must_use]
    pub fn with_webhook_id(mut self, webhook_id: impl Into<String>) -> Self {
        self.webhook_id = Some(webhook_id.into());
        self
    }

    /// Checks that the required options are present.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::MissingOption` if the client id or secret is
    /// empty.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.client_id.trim().is_empty() {
            return Err(ConfigError::MissingOption("client_id"));
        }
        if self.client_secret.trim().is_empty() {
            return Err(ConfigError::MissingOption("client_secret"));
        }
        Ok(())
    }

    /// Returns the webhook id, ignoring an empty one.
    #[must_use]
    pub fn webhook_id(&self) -> Option<&str> {
        self.webhook_id.as_deref().filter(|id| !id.is_empty())
    }

    /// Returns how the coordinator should learn about changes.
    #[must_use]
    pub fn update_mode(&self) -> UpdateMode {
        match self.webhook_id() {
            Some(webhook_id) => UpdateMode::Push {
                webhook_id: webhook_id.to_string(),
            },
            None => UpdateMode::Poll,
        }
    }

    /// Returns the configured name or the default one.
    #[must_use]
    pub fn display_name(&self) -> &str {
        self.name.as_deref().unwrap_or(Self::DEFAULT_NAME)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn poll_mode_without_webhook() {
        let config = IntegrationConfig::new("id", "secret");
        assert_eq!(config.update_mode(), UpdateMode::Poll);
    }

    #[test]
    fn empty_webhook_id_means_poll() {
        let config = IntegrationConfig::new("id", "secret").with_webhook_id("");
        assert_eq!(config.update_mode(), UpdateMode::Poll);
    }

    #[test]
    fn validate_rejects_missing_credentials() {
        assert_eq!(
            IntegrationConfig::new("", "secret").validate(),
            Err(ConfigError::MissingOption("client_id"))
        );
        assert_eq!(
            IntegrationConfig::new("id", " ").validate(),
            Err(ConfigError::MissingOption("client_secret"))
        );
    }

    #[test]
    fn deserialize_requires_credentials() {
        assert!(serde_json::from_str::<IntegrationConfig>(r#"{"client_id": "id"}"#).is_err());
    }

    #[test]
    fn custom_name() {
        let config = IntegrationConfig::new("id", "secret").with_name("Living room");
        assert_eq!(config.display_name(), "Living room");
    }
}
