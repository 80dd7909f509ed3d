//! Background polling of the backend health endpoint.

use crate::backend::BackendClient;
use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Polls `/health` on a fixed interval and publishes reachability.
///
/// The status is `None` until the first check completes, so subscribers
/// always see the first result. Polling stops when the monitor is dropped.
pub struct HealthMonitor {
    status: watch::Receiver<Option<bool>>,
    task: JoinHandle<()>,
}

impl HealthMonitor {
    /// Start polling with the client's configured interval.
    pub fn spawn(client: BackendClient) -> Self {
        let interval = client.config().health_interval;
        Self::spawn_with_interval(client, interval)
    }

    pub fn spawn_with_interval(client: BackendClient, interval: Duration) -> Self {
        let (tx, rx) = watch::channel(None);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            loop {
                ticker.tick().await;
                let reachable = client.health().await;
                tx.send_if_modified(|current| {
                    if *current != Some(reachable) {
                        log::info!(
                            "Backend {}",
                            if reachable { "reachable" } else { "unreachable" }
                        );
                        *current = Some(reachable);
                        true
                    } else {
                        false
                    }
                });
                if tx.is_closed() {
                    break;
                }
            }
        });

        Self { status: rx, task }
    }

    /// Last observed reachability, `None` before the first check.
    pub fn status(&self) -> Option<bool> {
        *self.status.borrow()
    }

    /// Whether the last check succeeded; false before the first check.
    pub fn is_reachable(&self) -> bool {
        self.status() == Some(true)
    }

    /// A receiver that is notified on the first result and every change.
    pub fn subscribe(&self) -> watch::Receiver<Option<bool>> {
        self.status.clone()
    }

    /// Stop polling.
    pub fn stop(self) {
        drop(self);
    }
}

impl Drop for HealthMonitor {
    fn drop(&mut self) {
        self.task.abort();
    }
}
