// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! State synchronization for a single thermostat.
//!
//! # Overview
//!
//! The [`UpdateCoordinator`] decides when to talk to the vendor and merges
//! everything it learns into one cached [`DeviceState`](crate::state::DeviceState):
//!
//! - **Poll mode**: the full state is fetched every
//!   [`poll_interval`](CoordinatorConfig::poll_interval)
//!   ([`DEFAULT_POLL_INTERVAL`] by default)
//! - **Push mode**: the vendor posts partial updates to a webhook, which are
//!   merged through [`UpdateCoordinator::apply_webhook`]; nothing is polled
//! - **Throttling**: [`UpdateCoordinator::refresh`] skips the fetch if the
//!   last one succeeded less than
//!   [`min_refresh_interval`](CoordinatorConfig::min_refresh_interval) ago
//! - **Debouncing**: [`UpdateCoordinator::request_refresh`] and commands
//!   collapse bursts into a single fetch after
//!   [`debounce_cooldown`](CoordinatorConfig::debounce_cooldown)
//!
//! Commands go straight to the vendor without touching the cache. The state
//! they cause is picked up by the refresh they request, which is not
//! throttled.
//!
//! # Examples
//!
//! ```no_run
//! use thermosmart_lib::config::IntegrationConfig;
//! use thermosmart_lib::coordinator::{CoordinatorConfig, UpdateCoordinator};
//! use thermosmart_lib::protocol::HttpClient;
//!
//! # async fn example() -> thermosmart_lib::Result<()> {
//! let integration = IntegrationConfig::new("client-id", "client-secret");
//! let client = HttpClient::new(String::from("access-token"))?;
//!
//! let coordinator = UpdateCoordinator::builder(client)
//!     .config(CoordinatorConfig::from(&integration))
//!     .build()
//!     .await?;
//!
//! let mut rx = coordinator.watch();
//! tokio::spawn(async move {
//!     while rx.changed().await.is_ok() {
//!         let state = rx.borrow_and_update().clone();
//!         println!("Source: {:?}", state.source());
//!     }
//! });
//! # Ok(())
//! # }
//! ```

mod config;
mod debounce;
mod lifecycle;
mod throttle;
mod update_coordinator;

pub use config::{
    CoordinatorConfig, DEFAULT_DEBOUNCE_COOLDOWN, DEFAULT_MIN_REFRESH_INTERVAL,
    DEFAULT_POLL_INTERVAL, LEGACY_POLL_INTERVAL, UpdateMode,
};
pub use lifecycle::Lifecycle;
pub use update_coordinator::{CoordinatorBuilder, UpdateCoordinator};
