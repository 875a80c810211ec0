// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator configuration types.

use std::time::Duration;

use crate::config::IntegrationConfig;
use crate::error::ConfigError;

/// Default interval between polls.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_secs(300);

/// Poll interval used by early releases of the integration.
pub const LEGACY_POLL_INTERVAL: Duration = Duration::from_secs(30);

/// Default minimum time between two remote fetches through `refresh()`.
pub const DEFAULT_MIN_REFRESH_INTERVAL: Duration = Duration::from_secs(30);

/// Default quiet period before a requested refresh runs.
pub const DEFAULT_DEBOUNCE_COOLDOWN: Duration = Duration::from_secs(1);

/// How the coordinator learns about remote changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UpdateMode {
    /// The vendor pushes changes to a webhook; no periodic fetch.
    Push {
        /// Webhook id the vendor posts to.
        webhook_id: String,
    },
    /// The coordinator fetches the full state periodically.
    Poll,
}

impl UpdateMode {
    /// Returns true in push mode.
    #[must_use]
    pub fn is_push(&self) -> bool {
        matches!(self, Self::Push { .. })
    }

    /// Returns the webhook id in push mode.
    #[must_use]
    pub fn webhook_id(&self) -> Option<&str> {
        match self {
            Self::Push { webhook_id } => Some(webhook_id),
            Self::Poll => None,
        }
    }
}

/// Timing and mode settings of an [`UpdateCoordinator`](super::UpdateCoordinator).
///
/// # Examples
///
/// ```
/// use std::time::Duration;
/// use thermosmart_lib::coordinator::{CoordinatorConfig, LEGACY_POLL_INTERVAL};
///
/// let config = CoordinatorConfig::poll()
///     .with_poll_interval(LEGACY_POLL_INTERVAL)
///     .with_min_refresh_interval(Duration::from_secs(10));
///
/// assert!(!config.mode().is_push());
/// assert_eq!(config.poll_interval(), Duration::from_secs(30));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CoordinatorConfig {
    mode: UpdateMode,
    poll_interval: Duration,
    min_refresh_interval: Duration,
    debounce_cooldown: Duration,
}

impl CoordinatorConfig {
    /// Creates a configuration with default timings for the given mode.
    #[must_use]
    pub fn new(mode: UpdateMode) -> Self {
        Self {
            mode,
            poll_interval: DEFAULT_POLL_INTERVAL,
            min_refresh_interval: DEFAULT_MIN_REFRESH_INTERVAL,
            debounce_cooldown: DEFAULT_DEBOUNCE_COOLDOWN,
        }
    }

    /// Creates a poll mode configuration.
    #[must_use]
    pub fn poll() -> Self {
        Self::new(UpdateMode::Poll)
    }

    /// Creates a push mode configuration.
    #[must_use]
    pub fn push(webhook_id: impl Into<String>) -> Self {
        Self::new(UpdateMode::Push {
            webhook_id: webhook_id.into(),
        })
    }

    /// Sets the interval between polls.
    #[must_use]
    pub fn with_poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = interval;
        self
    }

    /// Sets the minimum time between two throttled refreshes.
    ///
    /// Zero disables throttling.
    #[must_use]
    pub fn with_min_refresh_interval(mut self, interval: Duration) -> Self {
        self.min_refresh_interval = interval;
        self
    }

    /// Sets the debounce cooldown of `request_refresh()`.
    #[must_use]
    pub fn with_debounce_cooldown(mut self, cooldown: Duration) -> Self {
        self.debounce_cooldown = cooldown;
        self
    }

    /// Returns the update mode.
    #[must_use]
    pub fn mode(&self) -> &UpdateMode {
        &self.mode
    }

    /// Returns the poll interval.
    #[must_use]
    pub fn poll_interval(&self) -> Duration {
        self.poll_interval
    }

    /// Returns the minimum refresh interval.
    #[must_use]
    pub fn min_refresh_interval(&self) -> Duration {
        self.min_refresh_interval
    }

    /// Returns the debounce cooldown.
    #[must_use]
    pub fn debounce_cooldown(&self) -> Duration {
        self.debounce_cooldown
    }

    /// Checks the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::ZeroInterval` for a zero poll interval in poll
    /// mode, and `ConfigError::MissingOption` for an empty webhook id in
    /// push mode.
    pub fn validate(&self) -> Result<(), ConfigError> {
        match &self.mode {
            UpdateMode::Poll if self.poll_interval.is_zero() => {
                Err(ConfigError::ZeroInterval("poll_interval"))
            }
            UpdateMode::Push { webhook_id } if webhook_id.is_empty() => {
                Err(ConfigError::MissingOption("webhook_id"))
            }
            _ => Ok(()),
        }
    }
}

impl Default for CoordinatorConfig {
    fn default() -> Self {
        Self::poll()
    }
}

impl From<&IntegrationConfig> for CoordinatorConfig {
    fn from(config: &IntegrationConfig) -> Self {
        Self::new(config.update_mode())
    }
}
