//! Cancellable periodic tasks

use std::time::Duration;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{self, MissedTickBehavior};
use tracing::{debug, warn};

/// A background task that runs a closure on a fixed period until cancelled.
///
/// Dropping the handle cancels the task.
#[derive(Debug)]
pub struct PeriodicTask {
    name: String,
    cancel_tx: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    /// Spawn `f` to run every `period`, first after one full period.
    ///
    /// Missed ticks are skipped rather than bursted.
    pub fn spawn<F>(name: impl Into<String>, period: Duration, mut f: F) -> Self
    where
        F: FnMut() + Send + 'static,
    {
        let name = name.into();
        let (cancel_tx, mut cancel_rx) = watch::channel(false);
        let task_name = name.clone();

        let handle = tokio::spawn(async move {
            let period = period.max(Duration::from_millis(1));
            let mut ticker = time::interval_at(time::Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    _ = ticker.tick() => f(),
                    changed = cancel_rx.changed() => {
                        if changed.is_err() || *cancel_rx.borrow() {
                            break;
                        }
                    }
                }
            }
            debug!(task = %task_name, "Periodic task stopped");
        });

        debug!(task = %name, period_ms = period.as_millis() as u64, "Periodic task started");
        Self {
            name,
            cancel_tx,
            handle: Some(handle),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Signal the task to stop after its current iteration
    pub fn cancel(&self) {
        let _ = self.cancel_tx.send(true);
    }

    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().map_or(true, JoinHandle::is_finished)
    }

    /// Cancel and wait up to `timeout` for the task to exit, aborting it otherwise
    pub async fn shutdown(mut self, timeout: Duration) {
        self.cancel();
        let Some(mut handle) = self.handle.take() else {
            return;
        };
        if time::timeout(timeout, &mut handle).await.is_err() {
            warn!(task = %self.name, "Periodic task did not stop in time, aborting");
            handle.abort();
        }
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        self.cancel();
    }
}
