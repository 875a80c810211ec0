// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Routing of webhook deliveries to coordinators.

use std::collections::HashMap;

use parking_lot::RwLock;

use crate::coordinator::UpdateCoordinator;
use crate::protocol::RemoteDeviceClient;

use super::payload::{IgnoreReason, WebhookOutcome, WebhookPayload};

/// Receives webhook bodies and forwards them to the coordinators registered
/// under the webhook id.
///
/// The ingester never fails towards the HTTP layer: malformed bodies are
/// logged and dropped, and every call returns a [`WebhookOutcome`]. Several
/// coordinators may share a webhook id; each one filters deliveries by
/// thermostat id.
///
/// # Examples
///
/// ```no_run
/// use thermosmart_lib::coordinator::{CoordinatorConfig, UpdateCoordinator};
/// use thermosmart_lib::protocol::HttpClient;
/// use thermosmart_lib::webhook::WebhookIngester;
///
/// # async fn example() -> thermosmart_lib::Result<()> {
/// let client = HttpClient::new(String::from("access-token"))?;
/// let coordinator = UpdateCoordinator::builder(client)
///     .config(CoordinatorConfig::push("my-webhook"))
///     .build()
///     .await?;
///
/// let ingester = WebhookIngester::new();
/// ingester.register_coordinator(&coordinator);
///
/// // From the HTTP handler of the webhook endpoint:
/// let outcome = ingester
///     .handle("my-webhook", br#"{"thermostat": "t1", "room_temperature": 20.5}"#)
///     .await;
/// println!("{outcome:?}");
/// # Ok(())
/// # }
/// ```
pub struct WebhookIngester<C> {
    routes: RwLock<HashMap<String, Vec<UpdateCoordinator<C>>>>,
}

impl<C: RemoteDeviceClient> WebhookIngester<C> {
    /// Creates an ingester without routes.
    #[must_use]
    pub fn new() -> Self {
        Self {
            routes: RwLock::new(HashMap::new()),
        }
    }

    /// Routes deliveries for `webhook_id` to `coordinator`.
    pub fn register(&self, webhook_id: impl Into<String>, coordinator: UpdateCoordinator<C>) {
        let webhook_id = webhook_id.into();
        tracing::debug!(
            webhook_id = %webhook_id,
            thermostat = %coordinator.thermostat_id(),
            "Registering webhook route"
        );
        self.routes
            .write()
            .entry(webhook_id)
            .or_default()
            .push(coordinator);
    }

    /// Registers a push mode coordinator under its configured webhook id.
    ///
    /// Returns false for a poll mode coordinator, which is not registered.
    pub fn register_coordinator(&self, coordinator: &UpdateCoordinator<C>) -> bool {
        match coordinator.config().mode().webhook_id() {
            Some(webhook_id) => {
                self.register(webhook_id, coordinator.clone());
                true
            }
            None => false,
        }
    }

    /// Removes every coordinator registered under `webhook_id`.
    ///
    /// Returns true if the webhook id was known.
    pub fn unregister(&self, webhook_id: &str) -> bool {
        tracing::debug!(webhook_id = %webhook_id, "Unregistering webhook route");
        self.routes.write().remove(webhook_id).is_some()
    }

    /// Removes one coordinator, leaving its siblings under the same webhook
    /// id in place.
    ///
    /// Returns true if the coordinator was registered.
    pub fn unregister_coordinator(&self, coordinator: &UpdateCoordinator<C>) -> bool {
        let mut routes = self.routes.write();
        let mut removed = false;
        routes.retain(|webhook_id, coordinators| {
            let before = coordinators.len();
            coordinators.retain(|c| !c.ptr_eq(coordinator));
            if coordinators.len() != before {
                removed = true;
                tracing::debug!(
                    webhook_id = %webhook_id,
                    thermostat = %coordinator.thermostat_id(),
                    "Unregistering coordinator"
                );
            }
            !coordinators.is_empty()
        });
        removed
    }

    /// Drops stopped coordinators from the route of `webhook_id`.
    fn prune_stopped(&self, webhook_id: &str) {
        let mut routes = self.routes.write();
        let Some(coordinators) = routes.get_mut(webhook_id) else {
            return;
        };
        coordinators.retain(|c| {
            let stopped = c.lifecycle().is_stopped();
            if stopped {
                tracing::debug!(
                    webhook_id = %webhook_id,
                    thermostat = %c.thermostat_id(),
                    "Dropping stopped coordinator"
                );
            }
            !stopped
        });
        if coordinators.is_empty() {
            routes.remove(webhook_id);
        }
    }

    /// Returns true if a coordinator is registered under `webhook_id`.
    #[must_use]
    pub fn is_registered(&self, webhook_id: &str) -> bool {
        self.routes.read().contains_key(webhook_id)
    }

    /// Processes one webhook delivery.
    ///
    /// The outcome is `Applied` if at least one coordinator applied the
    /// payload, with the changes of all of them combined. Coordinators that
    /// have been shut down are unregistered on the way.
    pub async fn handle(&self, webhook_id: &str, body: &[u8]) -> WebhookOutcome {
        let has_stopped = self
            .routes
            .read()
            .get(webhook_id)
            .is_some_and(|c| c.iter().any(|c| c.lifecycle().is_stopped()));
        if has_stopped {
            self.prune_stopped(webhook_id);
        }

        let coordinators = self.routes.read().get(webhook_id).cloned();
        let Some(coordinators) = coordinators.filter(|c| !c.is_empty()) else {
            tracing::debug!(webhook_id = %webhook_id, "Webhook delivery for unknown id");
            return WebhookOutcome::Ignored(IgnoreReason::UnknownWebhook);
        };

        tracing::trace!(webhook_id = %webhook_id, body = %String::from_utf8_lossy(body), "Webhook delivery");

        let payload = match WebhookPayload::parse(body) {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(webhook_id = %webhook_id, error = %e, "Dropping malformed webhook payload");
                return WebhookOutcome::Rejected(e.to_string());
            }
        };

        let mut combined: Option<WebhookOutcome> = None;
        for coordinator in &coordinators {
            let outcome = coordinator.apply_webhook(&payload).await;
            combined = Some(match (combined, outcome) {
                (Some(WebhookOutcome::Applied(mut acc)), WebhookOutcome::Applied(changes)) => {
                    acc |= changes;
                    WebhookOutcome::Applied(acc)
                }
                (Some(applied @ WebhookOutcome::Applied(_)), _) => applied,
                (_, outcome) => outcome,
            });
        }

        combined.unwrap_or(WebhookOutcome::Ignored(IgnoreReason::UnknownWebhook))
    }
}

impl<C: RemoteDeviceClient> Default for WebhookIngester<C> {
    fn default() -> Self {
        Self::new()
    }
}

impl<C> std::fmt::Debug for WebhookIngester<C> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let routes = self.routes.read();
        f.debug_struct("WebhookIngester")
            .field("webhook_ids", &routes.keys().collect::<Vec<_>>())
            .finish()
    }
}
