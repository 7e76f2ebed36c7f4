//! Interval polling for hosts that can only probe for the AI capability.
//!
//! The poller waits one period, probes, and keeps probing on every period
//! until the probe yields a client. The client is installed into the
//! [`CapabilitySlot`] and the poll task exits for good. There is no retry
//! limit; the task only ends early when its handle is cancelled or dropped.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;
use tracing::debug;

use crate::core::capability::{AiClient, CapabilitySlot};
use crate::core::constants::DEFAULT_POLL_INTERVAL_MS;

/// Default period between readiness probes.
pub const DEFAULT_POLL_INTERVAL: Duration = Duration::from_millis(DEFAULT_POLL_INTERVAL_MS);

/// Checks whether the AI capability is currently present and callable.
#[async_trait]
pub trait CapabilityProbe: Send + Sync {
    async fn probe(&self) -> Option<Arc<dyn AiClient>>;
}

pub struct ReadinessPoller;

impl ReadinessPoller {
    pub fn spawn(
        slot: Arc<CapabilitySlot>,
        probe: Arc<dyn CapabilityProbe>,
        period: Duration,
    ) -> PollerHandle {
        let cancel = CancellationToken::new();
        let task_cancel = cancel.clone();

        let task = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut attempts: u64 = 0;

            loop {
                tokio::select! {
                    _ = task_cancel.cancelled() => {
                        debug!(attempts, "readiness polling cancelled");
                        return;
                    }
                    _ = ticker.tick() => {}
                }

                if slot.is_installed() {
                    debug!(attempts, "capability installed elsewhere; polling stopped");
                    return;
                }

                attempts += 1;
                let found = tokio::select! {
                    _ = task_cancel.cancelled() => {
                        debug!(attempts, "readiness polling cancelled mid-probe");
                        return;
                    }
                    found = probe.probe() => found,
                };

                if let Some(client) = found {
                    if slot.install(client).is_err() {
                        debug!(attempts, "capability installed elsewhere; polling stopped");
                    } else {
                        debug!(attempts, "capability detected");
                    }
                    return;
                }
            }
        });

        PollerHandle {
            cancel,
            task: Some(task),
        }
    }
}

/// Owner of a running poll task. Dropping it cancels the task.
pub struct PollerHandle {
    cancel: CancellationToken,
    task: Option<JoinHandle<()>>,
}

impl PollerHandle {
    pub fn cancel(&self) {
        self.cancel.cancel();
    }

    pub fn is_finished(&self) -> bool {
        self.task.as_ref().is_none_or(JoinHandle::is_finished)
    }

    /// Cancels the task and waits for it to exit.
    pub async fn shutdown(mut self) {
        self.cancel.cancel();
        if let Some(task) = self.task.take() {
            let _ = task.await;
        }
    }
}

impl Drop for PollerHandle {
    fn drop(&mut self) {
        self.cancel.cancel();
    }
}
