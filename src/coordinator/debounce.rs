// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Trailing-edge debouncing of refresh requests.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use parking_lot::Mutex;
use tokio::task::JoinHandle;

#[derive(Debug, Default)]
struct Pending {
    /// Timer task that has not fired yet.
    timer: Option<JoinHandle<()>>,
    /// Set if any request since the last firing asked for a forced refresh.
    forced: bool,
    /// Bumped by every request; a timer only fires if it is the latest.
    generation: u64,
}

/// Collapses bursts of requests into one action.
///
/// Every request restarts the cooldown; the action runs once the cooldown
/// elapses without a new request. An action that has started running is
/// never cancelled by later requests, which schedule a new one instead.
#[derive(Debug)]
pub(crate) struct Debouncer {
    cooldown: Duration,
    pending: Arc<Mutex<Pending>>,
}

impl Debouncer {
    pub(crate) fn new(cooldown: Duration) -> Self {
        Self {
            cooldown,
            pending: Arc::new(Mutex::new(Pending::default())),
        }
    }

    /// Schedules `action`, replacing any timer that has not fired yet.
    ///
    /// `action` receives `true` if any request in the burst was forced.
    pub(crate) fn schedule<F, Fut>(&self, forced: bool, action: F)
    where
        F: FnOnce(bool) -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send + 'static,
    {
        let mut pending = self.pending.lock();
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.forced |= forced;
        pending.generation = pending.generation.wrapping_add(1);

        let generation = pending.generation;
        let cooldown = self.cooldown;
        let shared = Arc::clone(&self.pending);
        pending.timer = Some(tokio::spawn(async move {
            tokio::time::sleep(cooldown).await;

            let forced = {
                let mut pending = shared.lock();
                if pending.generation != generation {
                    return;
                }
                pending.timer = None;
                std::mem::take(&mut pending.forced)
            };

            action(forced).await;
        }));
    }

    /// Cancels a timer that has not fired yet.
    pub(crate) fn cancel(&self) {
        let mut pending = self.pending.lock();
        if let Some(timer) = pending.timer.take() {
            timer.abort();
        }
        pending.forced = false;
        pending.generation = pending.generation.wrapping_add(1);
    }

    /// Returns true if a timer is waiting to fire.
    #[cfg(test)]
    pub(crate) fn is_pending(&self) -> bool {
        self.pending.lock().timer.is_some()
    }
}

impl Drop for Debouncer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicU32, Ordering};

    fn recorder() -> (Arc<AtomicU32>, Arc<Mutex<Vec<bool>>>) {
        (Arc::new(AtomicU32::new(0)), Arc::new(Mutex::new(Vec::new())))
    }

    #[tokio::test(start_paused = true)]
    async fn burst_runs_once_after_last_request() {
        let debouncer = Debouncer::new(Duration::from_secs(1));
        let (count, _) = recorder();

        for _ in 0..5 {
            let count = count.clone();
            debouncer.schedule(false, move |_| async move {
                count.fetch_add(1, Ordering::SeqCst);
            });
            tokio::time::sleep(Duration::from_millis(500)).await;
        }

        assert_eq!(count.load(Ordering::SeqCst), 0);
        assert!(debouncer.is_pending());

        tokio::time::sleep(Duration::from_millis(600)).await;
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert!(!debouncer.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn forced_flag_survives_later_plain_request() {
        let debouncer = Debouncer::new(Duration::from_secs(1));
        let (_, seen) = recorder();

        for forced in [true, false] {
            let seen = seen.clone();
            debouncer.schedule(forced, move |forced| async move {
                seen.lock().push(forced);
            });
        }

        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*seen.lock(), vec![true]);

        let seen_clone = seen.clone();
        debouncer.schedule(false, move |forced| async move {
            seen_clone.lock().push(forced);
        });
        tokio::time::sleep(Duration::from_secs(2)).await;
        assert_eq!(*seen.lock(), vec![true, false]);
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_prevents_firing() {
        let debouncer = Debouncer::new(Duration::from_secs(1));
        let (count, _) = recorder();

        let count_clone = count.clone();
        debouncer.schedule(false, move |_| async move {
            count_clone.fetch_add(1, Ordering::SeqCst);
        });
        debouncer.cancel();

        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(count.load(Ordering::SeqCst), 0);
    }
}
