// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Webhook deliveries from the vendor cloud.
//!
//! In push mode the vendor posts partial state to a webhook URL owned by the
//! host platform. The platform hands each body to a [`WebhookIngester`],
//! which parses it into a [`WebhookPayload`] and forwards it to the
//! coordinators registered under the webhook id.
//!
//! Expiry notifications carry `"code": 510` and are ignored; renewing the
//! subscription is up to the platform.

mod ingester;
mod payload;

pub use ingester::WebhookIngester;
pub use payload::{IgnoreReason, WEBHOOK_EXPIRED_CODE, WebhookOutcome, WebhookPayload};
