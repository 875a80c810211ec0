// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Scriptable in-memory client shared by the integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::time::Duration;

use parking_lot::Mutex;
use serde_json::Value;
use thermosmart_lib::command::Command;
use thermosmart_lib::error::ProtocolError;
use thermosmart_lib::opentherm;
use thermosmart_lib::protocol::RemoteDeviceClient;
use thermosmart_lib::state::{BoilerBlock, DeviceState};
use thermosmart_lib::types::{ExceptionEntry, Source, ThermostatId};

/// A command as the vendor would have received it.
#[derive(Debug, Clone, PartialEq)]
pub struct SentCommand {
    pub name: &'static str,
    pub path_suffix: &'static str,
    pub body: Value,
}

#[derive(Debug)]
struct MockState {
    thermostat: ThermostatId,
    state: Mutex<DeviceState>,
    fetches: AtomicUsize,
    commands: Mutex<Vec<SentCommand>>,
    fail_fetch: AtomicBool,
    fail_commands: AtomicBool,
    fetch_delay: Mutex<Option<Duration>>,
}

/// In-memory [`RemoteDeviceClient`]. Clones share the same script.
#[derive(Debug, Clone)]
pub struct MockClient {
    inner: Arc<MockState>,
}

impl MockClient {
    pub fn new(thermostat: &str, state: DeviceState) -> Self {
        Self {
            inner: Arc::new(MockState {
                thermostat: ThermostatId::new(thermostat),
                state: Mutex::new(state),
                fetches: AtomicUsize::new(0),
                commands: Mutex::new(Vec::new()),
                fail_fetch: AtomicBool::new(false),
                fail_commands: AtomicBool::new(false),
                fetch_delay: Mutex::new(None),
            }),
        }
    }

    pub fn set_state(&self, state: DeviceState) {
        *self.inner.state.lock() = state;
    }

    pub fn fetch_count(&self) -> usize {
        self.inner.fetches.load(Ordering::SeqCst)
    }

    pub fn commands(&self) -> Vec<SentCommand> {
        self.inner.commands.lock().clone()
    }

    pub fn fail_fetch(&self, fail: bool) {
        self.inner.fail_fetch.store(fail, Ordering::SeqCst);
    }

    pub fn fail_commands(&self, fail: bool) {
        self.inner.fail_commands.store(fail, Ordering::SeqCst);
    }

    pub fn delay_fetch(&self, delay: Duration) {
        *self.inner.fetch_delay.lock() = Some(delay);
    }
}

impl RemoteDeviceClient for MockClient {
    async fn thermostat_id(&self) -> thermosmart_lib::Result<ThermostatId> {
        if self.inner.fail_fetch.load(Ordering::SeqCst) {
            return Err(ProtocolError::ConnectionFailed("mock offline".to_string()).into());
        }
        Ok(self.inner.thermostat.clone())
    }

    async fn fetch_full_state(
        &self,
        _thermostat: &ThermostatId,
    ) -> thermosmart_lib::Result<DeviceState> {
        self.inner.fetches.fetch_add(1, Ordering::SeqCst);

        let delay = *self.inner.fetch_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }

        if self.inner.fail_fetch.load(Ordering::SeqCst) {
            return Err(ProtocolError::ConnectionFailed("mock offline".to_string()).into());
        }
        Ok(self.inner.state.lock().clone())
    }

    async fn send_command<C: Command + Sync>(
        &self,
        _thermostat: &ThermostatId,
        command: &C,
    ) -> thermosmart_lib::Result<()> {
        self.inner.commands.lock().push(SentCommand {
            name: command.name(),
            path_suffix: command.path_suffix(),
            body: command.body(),
        });

        if self.inner.fail_commands.load(Ordering::SeqCst) {
            return Err(ProtocolError::Status {
                status: 500,
                reason: "Internal Server Error".to_string(),
            }
            .into());
        }

        // The vendor stores the exception list as sent.
        if let Some(list) = command.body().get("exceptions") {
            let exceptions: Vec<ExceptionEntry> = serde_json::from_value(list.clone())
                .map_err(thermosmart_lib::error::ParseError::from)?;
            let mut state = self.inner.state.lock();
            *state = state.clone().with_exceptions(exceptions);
        }
        Ok(())
    }
}

/// Boiler block with a few readings set: CH on, 1.5 bar, 60.5 °C setpoint.
pub fn heating_boiler() -> BoilerBlock {
    opentherm::decode_raw(&serde_json::json!({
        "0": "0x0100",
        "1": "0x3C80",
        "18": "0x0180"
    }))
    .unwrap()
}

/// Boiler block advertising cooling support.
pub fn cooling_boiler() -> BoilerBlock {
    opentherm::decode_raw(&serde_json::json!({
        "0": "0x0400",
        "3": "0x0400"
    }))
    .unwrap()
}

/// A thermostat following its schedule.
pub fn scheduled_state() -> DeviceState {
    DeviceState::new()
        .with_room_temperature(19.5)
        .with_target_temperature(20.0)
        .with_source(Source::Schedule)
}
