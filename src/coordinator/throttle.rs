// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Minimum interval between remote fetches.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::time::Instant;

/// Tracks the last successful fetch.
///
/// Only successful fetches count: a failed refresh leaves the window open
/// so the next call retries immediately.
#[derive(Debug)]
pub(crate) struct RefreshThrottle {
    min_interval: Duration,
    last_success: Mutex<Option<Instant>>,
}

impl RefreshThrottle {
    pub(crate) fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_success: Mutex::new(None),
        }
    }

    /// Returns true if the last fetch is recent enough to skip a new one.
    pub(crate) fn is_fresh(&self) -> bool {
        self.last_success
            .lock()
            .is_some_and(|at| at.elapsed() < self.min_interval)
    }

    /// Records a successful fetch.
    pub(crate) fn mark(&self) {
        *self.last_success.lock() = Some(Instant::now());
    }
}
