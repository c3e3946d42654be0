//! Interval-driven polling of the shared channel on a local tokio task.
//!
//! The channel is `!Send`, so the poller runs through `spawn_local` and must be
//! started inside a [`tokio::task::LocalSet`].

use crate::channel::{ChannelPoller, ChannelSnapshot, SharedChannel};
use std::time::Duration;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;
use tracing::debug;

/// Default polling interval for channel consumers
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(50);

/// Running poller. Dropping the handle stops polling.
pub struct PollerHandle {
    task: JoinHandle<()>,
}

impl PollerHandle {
    pub fn stop(self) {}

    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.task.abort();
        debug!("Channel poller stopped");
    }
}

/// Poll `channel` every `interval`, calling `on_change` with each snapshot
/// that differs from the previously observed one.
pub fn spawn_poller<F>(channel: SharedChannel, interval: Duration, mut on_change: F) -> PollerHandle
where
    F: FnMut(&ChannelSnapshot) + 'static,
{
    let mut poller = ChannelPoller::new(channel);
    debug!(interval_ms = interval.as_millis() as u64, "Channel poller started");
    let task = tokio::task::spawn_local(async move {
        let mut ticker = tokio::time::interval(interval);
        ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
        loop {
            ticker.tick().await;
            if let Some(snapshot) = poller.poll() {
                on_change(&snapshot);
            }
        }
    });
    PollerHandle { task }
}
