// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Thermosmart Lib - state synchronization for Thermosmart thermostats.
//!
//! This library keeps a local copy of a Thermosmart thermostat's state in
//! sync with the vendor cloud and exposes it to a home-automation platform
//! as a climate entity and a set of boiler sensors.
//!
//! # Supported Features
//!
//! - **Poll mode**: periodic full refreshes of the thermostat state
//! - **Push mode**: partial updates delivered by the vendor webhook
//! - **Refresh control**: throttled refreshes, debounced refresh requests
//! - **Commands**: target temperature, pause/resume, scheduling exceptions
//! - **Boiler data**: OpenTherm readings decoded into typed values
//! - **Notifications**: change callbacks and a watch channel per thermostat
//!
//! # Quick Start
//!
//! ## Poll Mode
//!
//! ```no_run
//! use thermosmart_lib::{CoordinatorConfig, HttpClient, UpdateCoordinator};
//!
//! #[tokio::main]
//! async fn main() -> thermosmart_lib::Result<()> {
//!     // The first refresh runs before build() returns
//!     let coordinator = UpdateCoordinator::builder(HttpClient::new(String::from("token"))?)
//!         .config(CoordinatorConfig::poll())
//!         .build()
//!         .await?;
//!
//!     println!("Room: {:?}", coordinator.state().room_temperature());
//!
//!     coordinator.set_target_temperature(20.5).await?;
//!     coordinator.shutdown();
//!     Ok(())
//! }
//! ```
//!
//! ## Push Mode with Callbacks
//!
//! ```no_run
//! use thermosmart_lib::subscription::Subscribable;
//! use thermosmart_lib::{CoordinatorConfig, HttpClient, UpdateCoordinator, WebhookIngester};
//!
//! #[tokio::main]
//! async fn main() -> thermosmart_lib::Result<()> {
//!     let coordinator = UpdateCoordinator::builder(HttpClient::new(String::from("token"))?)
//!         .config(CoordinatorConfig::push("webhook-id"))
//!         .build()
//!         .await?;
//!
//!     coordinator.on_source_changed(|source| {
//!         println!("Source is now {source}");
//!     });
//!
//!     let ingester = WebhookIngester::new();
//!     ingester.register_coordinator(&coordinator);
//!
//!     // Call from the platform's webhook handler
//!     ingester
//!         .handle("webhook-id", br#"{"thermostat": "t1", "source": "pause"}"#)
//!         .await;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod config;
pub mod coordinator;
pub mod entity;
pub mod error;
pub mod opentherm;
pub mod protocol;
pub mod response;
pub mod state;
pub mod subscription;
pub mod types;
pub mod webhook;

pub use command::{Command, ExceptionsCommand, Method, PauseCommand, TargetTemperatureCommand};
pub use config::IntegrationConfig;
pub use coordinator::{CoordinatorBuilder, CoordinatorConfig, Lifecycle, UpdateCoordinator, UpdateMode};
pub use entity::{BoilerSensor, BoilerSensorKind, ClimateEntity, DeviceBacked, DeviceInfo};
pub use error::{ConfigError, Error, ParseError, ProtocolError, Result, ValueError};
#[cfg(feature = "http")]
pub use protocol::{HttpClient, HttpConfig};
pub use protocol::{RemoteDeviceClient, TokenProvider};
pub use state::{BoilerBlock, ChangeSet, DeviceState, StateCache};
pub use subscription::{CallbackRegistry, Subscribable, SubscriptionId};
pub use types::{
    ExceptionEntry, ExceptionProgram, HvacAction, HvacMode, PresetMode, Source, TargetTemperature,
    ThermostatId,
};
pub use webhook::{WebhookIngester, WebhookOutcome, WebhookPayload};
