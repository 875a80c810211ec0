// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Update coordinator for a single thermostat.

use std::sync::{Arc, Weak};

use chrono::NaiveDateTime;
use parking_lot::{Mutex, RwLock};
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::command::{
    Command, ExceptionsCommand, PauseCommand, TargetTemperatureCommand,
};
use crate::error::{Error, Result};
use crate::protocol::RemoteDeviceClient;
use crate::state::{BoilerBlock, ChangeSet, DeviceState, StateCache};
use crate::subscription::{CallbackRegistry, Subscribable, SubscriptionId};
use crate::types::{ExceptionEntry, ExceptionProgram, Source, TargetTemperature, ThermostatId};
use crate::webhook::{IgnoreReason, WebhookOutcome, WebhookPayload};

use super::config::{CoordinatorConfig, UpdateMode};
use super::debounce::Debouncer;
use super::lifecycle::Lifecycle;
use super::throttle::RefreshThrottle;

/// Keeps one thermostat's cached state in sync with the vendor cloud.
///
/// The coordinator owns the [`StateCache`] of its thermostat and is the only
/// writer to it. State arrives through full refreshes (on demand, debounced
/// after commands, and periodically in poll mode) and through webhook
/// deliveries in push mode. Every committed change is published once, to
/// the callbacks registered through [`Subscribable`] and to the
/// [`watch`](Self::watch) channel.
///
/// The handle is cheap to clone; all clones share the same state. Background
/// tasks only hold weak references, so dropping the last handle stops them.
///
/// # Examples
///
/// ```no_run
/// use thermosmart_lib::coordinator::{CoordinatorConfig, UpdateCoordinator};
/// use thermosmart_lib::protocol::HttpClient;
///
/// # async fn example() -> thermosmart_lib::Result<()> {
/// let client = HttpClient::new(String::from("access-token"))?;
/// let coordinator = UpdateCoordinator::builder(client)
///     .config(CoordinatorConfig::poll())
///     .build()
///     .await?;
///
/// println!("Room: {:?}", coordinator.state().room_temperature());
/// coordinator.set_target_temperature(20.5).await?;
///
/// coordinator.shutdown();
/// # Ok(())
/// # }
/// ```
pub struct UpdateCoordinator<C> {
    inner: Arc<Inner<C>>,
}

struct Inner<C> {
    client: C,
    thermostat: ThermostatId,
    config: CoordinatorConfig,
    cache: StateCache,
    callbacks: CallbackRegistry,
    state_tx: watch::Sender<Arc<DeviceState>>,
    lifecycle: RwLock<Lifecycle>,
    /// Serializes remote calls and cache writes.
    update_lock: tokio::sync::Mutex<()>,
    throttle: RefreshThrottle,
    debouncer: Debouncer,
    poll_task: Mutex<Option<JoinHandle<()>>>,
}

/// Builder for an [`UpdateCoordinator`].
#[derive(Debug)]
pub struct CoordinatorBuilder<C> {
    client: C,
    config: CoordinatorConfig,
    thermostat: Option<ThermostatId>,
}

impl<C: RemoteDeviceClient> CoordinatorBuilder<C> {
    /// Sets the coordinator configuration.
    #[must_use]
    pub fn config(mut self, config: CoordinatorConfig) -> Self {
        self.config = config;
        self
    }

    /// Uses a known thermostat id instead of asking the vendor.
    #[must_use]
    pub fn thermostat_id(mut self, thermostat: impl Into<ThermostatId>) -> Self {
        self.thermostat = Some(thermostat.into());
        self
    }

    /// Resolves the thermostat, runs the first full refresh and starts the
    /// coordinator.
    ///
    /// No coordinator exists unless this succeeds.
    ///
    /// # Errors
    ///
    /// Returns `Error::Config` if the configuration is invalid, and
    /// `Error::Setup` wrapping the cause if the thermostat id cannot be
    /// resolved or the first refresh fails.
    pub async fn build(self) -> Result<UpdateCoordinator<C>> {
        self.config.validate()?;

        let thermostat = match self.thermostat {
            Some(id) => id,
            None => self.client.thermostat_id().await.map_err(Error::setup)?,
        };

        let (state_tx, _) = watch::channel(Arc::new(DeviceState::new()));
        let inner = Arc::new(Inner {
            throttle: RefreshThrottle::new(self.config.min_refresh_interval()),
            debouncer: Debouncer::new(self.config.debounce_cooldown()),
            client: self.client,
            thermostat,
            config: self.config,
            cache: StateCache::new(),
            callbacks: CallbackRegistry::new(),
            state_tx,
            lifecycle: RwLock::new(Lifecycle::Uninitialized),
            update_lock: tokio::sync::Mutex::new(()),
            poll_task: Mutex::new(None),
        });

        inner.refresh(true).await.map_err(Error::setup)?;
        inner.transition(Lifecycle::Ready);

        if matches!(inner.config.mode(), UpdateMode::Poll) {
            let task = Inner::spawn_poll_task(&inner);
            *inner.poll_task.lock() = Some(task);
        }

        tracing::info!(
            thermostat = %inner.thermostat,
            push = inner.config.mode().is_push(),
            "Coordinator ready"
        );

        Ok(UpdateCoordinator { inner })
    }
}

impl<C: RemoteDeviceClient> UpdateCoordinator<C> {
    /// Starts building a coordinator around a client.
    #[must_use]
    pub fn builder(client: C) -> CoordinatorBuilder<C> {
        CoordinatorBuilder {
            client,
            config: CoordinatorConfig::default(),
            thermostat: None,
        }
    }

    // ========== Accessors ==========

    /// Returns the thermostat this coordinator tracks.
    #[must_use]
    pub fn thermostat_id(&self) -> &ThermostatId {
        &self.inner.thermostat
    }

    /// Returns the configuration.
    #[must_use]
    pub fn config(&self) -> &CoordinatorConfig {
        &self.inner.config
    }

    /// Returns the client.
    #[must_use]
    pub fn client(&self) -> &C {
        &self.inner.client
    }

    /// Returns the current lifecycle.
    #[must_use]
    pub fn lifecycle(&self) -> Lifecycle {
        self.inner.lifecycle()
    }

    /// Returns the current state snapshot.
    #[must_use]
    pub fn state(&self) -> Arc<DeviceState> {
        self.inner.cache.snapshot()
    }

    /// Creates a watch receiver for state snapshots.
    ///
    /// The receiver is marked changed on every committed update.
    #[must_use]
    pub fn watch(&self) -> watch::Receiver<Arc<DeviceState>> {
        self.inner.state_tx.subscribe()
    }

    /// Returns true if both handles share the same coordinator.
    #[must_use]
    pub fn ptr_eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    // ========== Updates ==========

    /// Fetches the full state unless the last fetch is recent enough.
    ///
    /// Within the minimum refresh interval this returns the cached snapshot
    /// without contacting the vendor. After shutdown it returns the last
    /// snapshot.
    ///
    /// # Errors
    ///
    /// Returns the client error if the fetch fails.
    pub async fn refresh(&self) -> Result<Arc<DeviceState>> {
        self.inner.refresh(false).await
    }

    /// Fetches the full state, ignoring the minimum refresh interval.
    ///
    /// # Errors
    ///
    /// Returns the client error if the fetch fails.
    pub async fn refresh_now(&self) -> Result<Arc<DeviceState>> {
        self.inner.refresh(true).await
    }

    /// Requests a refresh after the debounce cooldown.
    ///
    /// Requests made during the cooldown restart it, so a burst results in a
    /// single refresh. The refresh is throttled like [`refresh`](Self::refresh)
    /// and its errors are logged.
    pub fn request_refresh(&self) {
        self.inner.request_refresh(false);
    }

    /// Merges a webhook delivery into the cached state.
    ///
    /// Deliveries for other thermostats, expiry notifications and deliveries
    /// received before the first refresh or after shutdown are ignored.
    /// Changes are published immediately.
    pub async fn apply_webhook(&self, payload: &WebhookPayload) -> WebhookOutcome {
        self.inner.apply_webhook(payload).await
    }

    // ========== Commands ==========

    /// Sets the target temperature.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the temperature is out of range,
    /// `Error::Stopped` after shutdown, or the client error.
    pub async fn set_target_temperature(&self, celsius: f64) -> Result<()> {
        let temperature = TargetTemperature::new(celsius)?;
        self.send(&TargetTemperatureCommand::new(temperature)).await
    }

    /// Pauses or resumes the thermostat.
    ///
    /// # Errors
    ///
    /// Returns `Error::Stopped` after shutdown, or the client error.
    pub async fn pause_thermostat(&self, paused: bool) -> Result<()> {
        self.send(&PauseCommand::new(paused)).await
    }

    /// Appends an exception to the remote list.
    ///
    /// Both bounds are rounded down to the quarter hour. The current list is
    /// fetched first, so entries sent by earlier commands whose follow-up
    /// refresh has not run yet are kept.
    ///
    /// # Errors
    ///
    /// Returns `Error::Value` if the rounded interval is empty,
    /// `Error::Stopped` after shutdown, or the client error. Nothing is sent
    /// if the current list cannot be fetched.
    pub async fn add_exception(
        &self,
        start: NaiveDateTime,
        end: NaiveDateTime,
        program: ExceptionProgram,
    ) -> Result<()> {
        let entry = ExceptionEntry::new(start, end, program)?;
        self.inner.ensure_running()?;

        let result = {
            let _guard = self.inner.update_lock.lock().await;
            match self.inner.fetch_locked().await {
                Ok(Some(current)) => {
                    let mut exceptions = current.exceptions().to_vec();
                    exceptions.push(entry);
                    self.inner
                        .send_locked(&ExceptionsCommand::new(exceptions))
                        .await
                }
                Ok(None) => Err(Error::Stopped),
                Err(e) => {
                    tracing::warn!(thermostat = %self.inner.thermostat, error = %e, "Cannot read exceptions before adding one");
                    Err(e)
                }
            }
        };

        self.inner.request_refresh(true);
        result
    }

    /// Removes every exception.
    ///
    /// # Errors
    ///
    /// Returns `Error::Stopped` after shutdown, or the client error.
    pub async fn clear_exceptions(&self) -> Result<()> {
        self.send(&ExceptionsCommand::clear()).await
    }

    /// Replaces the exception list.
    ///
    /// # Errors
    ///
    /// Returns `Error::Stopped` after shutdown, or the client error.
    pub async fn set_exceptions(&self, exceptions: Vec<ExceptionEntry>) -> Result<()> {
        self.send(&ExceptionsCommand::new(exceptions)).await
    }

    async fn send<Cmd: Command + Sync>(&self, command: &Cmd) -> Result<()> {
        self.inner.ensure_running()?;

        let result = {
            let _guard = self.inner.update_lock.lock().await;
            self.inner.send_locked(command).await
        };

        self.inner.request_refresh(true);
        result
    }

    // ========== Lifecycle ==========

    /// Stops the coordinator.
    ///
    /// Cancels the poll task and any pending refresh, notifies `on_stopped`
    /// subscribers and drops every callback. Fetches still in flight finish
    /// but their result is discarded. Calling this twice is a no-op.
    pub fn shutdown(&self) {
        if !self.inner.transition(Lifecycle::Stopped) {
            return;
        }

        if let Some(task) = self.inner.poll_task.lock().take() {
            task.abort();
        }
        self.inner.debouncer.cancel();

        self.inner.callbacks.dispatch_stopped();
        self.inner.callbacks.clear();

        tracing::info!(thermostat = %self.inner.thermostat, "Coordinator stopped");
    }
}

impl<C: RemoteDeviceClient> Inner<C> {
    fn lifecycle(&self) -> Lifecycle {
        *self.lifecycle.read()
    }

    fn is_stopped(&self) -> bool {
        self.lifecycle().is_stopped()
    }

    /// Moves to `next`, returning false if the transition is not allowed.
    fn transition(&self, next: Lifecycle) -> bool {
        let mut lifecycle = self.lifecycle.write();
        if !lifecycle.can_transition_to(next) {
            return false;
        }
        tracing::debug!(thermostat = %self.thermostat, from = %*lifecycle, to = %next, "Lifecycle transition");
        *lifecycle = next;
        true
    }

    fn ensure_running(&self) -> Result<()> {
        if self.is_stopped() {
            Err(Error::Stopped)
        } else {
            Ok(())
        }
    }

    async fn refresh(&self, bypass_throttle: bool) -> Result<Arc<DeviceState>> {
        let _guard = self.update_lock.lock().await;

        if self.is_stopped() {
            tracing::trace!(thermostat = %self.thermostat, "Refresh after shutdown ignored");
            return Ok(self.cache.snapshot());
        }

        if !bypass_throttle && self.throttle.is_fresh() {
            tracing::trace!(thermostat = %self.thermostat, "Refresh throttled");
            return Ok(self.cache.snapshot());
        }

        match self.fetch_locked().await? {
            Some(snapshot) => Ok(snapshot),
            None => Ok(self.cache.snapshot()),
        }
    }

    /// Fetches and commits the full state. The caller holds `update_lock`.
    ///
    /// Returns `None` if shutdown happened during the fetch, in which case
    /// nothing was committed.
    async fn fetch_locked(&self) -> Result<Option<Arc<DeviceState>>> {
        tracing::debug!(thermostat = %self.thermostat, "Fetching full state");
        let state = self.client.fetch_full_state(&self.thermostat).await?;

        let (snapshot, changes) = {
            // Held until the commit so shutdown cannot slip in between.
            let lifecycle = self.lifecycle.read();
            if lifecycle.is_stopped() {
                tracing::debug!(thermostat = %self.thermostat, "Discarding fetch completed after shutdown");
                return Ok(None);
            }

            self.throttle.mark();
            let changes = self.cache.replace(state);
            (self.cache.snapshot(), changes)
        };

        self.publish(&snapshot, &changes);
        Ok(Some(snapshot))
    }

    fn request_refresh(self: &Arc<Self>, forced: bool) {
        if self.is_stopped() {
            return;
        }

        let weak: Weak<Self> = Arc::downgrade(self);
        self.debouncer.schedule(forced, move |forced| async move {
            let Some(inner) = weak.upgrade() else {
                return;
            };
            if let Err(e) = inner.refresh(forced).await {
                tracing::warn!(thermostat = %inner.thermostat, error = %e, "Requested refresh failed");
            }
        });
    }

    async fn apply_webhook(&self, payload: &WebhookPayload) -> WebhookOutcome {
        if payload.is_expired() {
            tracing::debug!(thermostat = %self.thermostat, "Webhook subscription expired");
            return WebhookOutcome::Ignored(IgnoreReason::Expired);
        }

        let Some(target) = payload.thermostat.as_deref() else {
            tracing::warn!(thermostat = %self.thermostat, "Webhook payload without thermostat id");
            return WebhookOutcome::Rejected("missing thermostat id".to_string());
        };

        if !self.thermostat.matches(target) {
            tracing::trace!(thermostat = %self.thermostat, other = %target, "Webhook for another thermostat");
            return WebhookOutcome::Ignored(IgnoreReason::OtherDevice);
        }

        let update = payload.to_update(|raw| self.client.decode_boiler(raw));

        let _guard = self.update_lock.lock().await;

        let changes = {
            let lifecycle = self.lifecycle.read();
            match *lifecycle {
                Lifecycle::Ready => {}
                Lifecycle::Uninitialized => return WebhookOutcome::Ignored(IgnoreReason::NotReady),
                Lifecycle::Stopped => return WebhookOutcome::Ignored(IgnoreReason::Stopped),
            }
            self.cache.merge_partial(&update)
        };
        tracing::debug!(thermostat = %self.thermostat, changed = changes.any(), "Webhook applied");

        if changes.any() {
            let snapshot = self.cache.snapshot();
            self.publish(&snapshot, &changes);
        }

        WebhookOutcome::Applied(changes)
    }

    /// Sends a command. The caller holds `update_lock`.
    async fn send_locked<Cmd: Command + Sync>(&self, command: &Cmd) -> Result<()> {
        tracing::debug!(thermostat = %self.thermostat, command = command.name(), "Sending command");

        let result = self.client.send_command(&self.thermostat, command).await;
        if let Err(e) = &result {
            tracing::warn!(thermostat = %self.thermostat, command = command.name(), error = %e, "Command failed");
        }
        result
    }

    fn publish(&self, snapshot: &Arc<DeviceState>, changes: &ChangeSet) {
        if changes.is_empty() {
            return;
        }
        self.state_tx.send_replace(Arc::clone(snapshot));
        self.callbacks.dispatch(snapshot, changes);
    }

    fn spawn_poll_task(inner: &Arc<Self>) -> JoinHandle<()> {
        let weak = Arc::downgrade(inner);
        let period = inner.config.poll_interval();
        let thermostat = inner.thermostat.clone();

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

            loop {
                ticker.tick().await;

                let Some(inner) = weak.upgrade() else {
                    break;
                };
                if inner.is_stopped() {
                    break;
                }
                if let Err(e) = inner.refresh(true).await {
                    tracing::warn!(thermostat = %inner.thermostat, error = %e, "Periodic refresh failed");
                }
            }

            tracing::debug!(thermostat = %thermostat, "Poll task stopped");
        })
    }
}

impl<C> Drop for Inner<C> {
    fn drop(&mut self) {
        if let Some(task) = self.poll_task.get_mut().take() {
            task.abort();
        }
    }
}

impl<C> Clone for UpdateCoordinator<C> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<C> std::fmt::Debug for UpdateCoordinator<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UpdateCoordinator")
            .field("thermostat", &self.inner.thermostat)
            .field("mode", self.inner.config.mode())
            .field("lifecycle", &*self.inner.lifecycle.read())
            .field("callbacks", &self.inner.callbacks)
            .finish_non_exhaustive()
    }
}

impl<C: RemoteDeviceClient> Subscribable for UpdateCoordinator<C> {
    fn on_state_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&DeviceState, &ChangeSet) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_state_changed(callback)
    }

    fn on_source_changed<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(Source) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_source_changed(callback)
    }

    fn on_boiler_updated<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn(&BoilerBlock) + Send + Sync + 'static,
    {
        self.inner.callbacks.on_boiler_updated(callback)
    }

    fn on_stopped<F>(&self, callback: F) -> SubscriptionId
    where
        F: Fn() + Send + Sync + 'static,
    {
        self.inner.callbacks.on_stopped(callback)
    }

    fn unsubscribe(&self, id: SubscriptionId) -> bool {
        self.inner.callbacks.unsubscribe(id)
    }
}
