// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Coordinator lifecycle.

use std::fmt;

/// Lifecycle of an [`UpdateCoordinator`](super::UpdateCoordinator).
///
/// Transitions only move forward: `Uninitialized → Ready → Stopped`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Lifecycle {
    /// The first full refresh has not completed yet.
    #[default]
    Uninitialized,
    /// State is populated; updates are processed.
    Ready,
    /// Shut down; refreshes and webhooks are no-ops.
    Stopped,
}

impl Lifecycle {
    /// Returns true once the first refresh has completed and before shutdown.
    #[must_use]
    pub fn is_ready(&self) -> bool {
        matches!(self, Self::Ready)
    }

    /// Returns true after shutdown.
    #[must_use]
    pub fn is_stopped(&self) -> bool {
        matches!(self, Self::Stopped)
    }

    /// Returns true if moving to `next` is allowed.
    #[must_use]
    pub fn can_transition_to(&self, next: Lifecycle) -> bool {
        matches!(
            (self, next),
            (Self::Uninitialized, Self::Ready | Self::Stopped) | (Self::Ready, Self::Stopped)
        )
    }
}

impl fmt::Display for Lifecycle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Uninitialized => "uninitialized",
            Self::Ready => "ready",
            Self::Stopped => "stopped",
        };
        f.write_str(s)
    }
}
