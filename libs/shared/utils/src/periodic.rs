use std::future::Future;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tracing::{debug, error};

/// A named, cancellable fixed-cadence task.
///
/// The tick body is awaited to completion before the next tick is
/// processed, so cycles never overlap. The first tick fires one full
/// period after spawn; callers that need an immediate cycle run it
/// themselves before spawning.
pub struct PeriodicTask {
    name: String,
    shutdown: watch::Sender<bool>,
    handle: Option<JoinHandle<()>>,
}

impl PeriodicTask {
    pub fn spawn<F, Fut>(name: &str, period: Duration, mut tick: F) -> Self
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        let (shutdown, mut shutdown_rx) = watch::channel(false);
        let task_name = name.to_string();

        let handle = tokio::spawn(async move {
            let mut timer = interval_at(Instant::now() + period, period);
            timer.set_missed_tick_behavior(MissedTickBehavior::Delay);

            debug!("Periodic task {} started", task_name);
            loop {
                tokio::select! {
                    _ = timer.tick() => {
                        tick().await;
                    }
                    _ = shutdown_rx.changed() => {
                        debug!("Periodic task {} received shutdown signal", task_name);
                        break;
                    }
                }
            }
            debug!("Periodic task {} stopped", task_name);
        });

        Self {
            name: name.to_string(),
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal shutdown and wait for the loop to exit. An in-flight tick
    /// is allowed to finish.
    pub async fn stop(mut self) {
        let _ = self.shutdown.send(true);
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                if !e.is_cancelled() {
                    error!("Periodic task {} panicked: {}", self.name, e);
                }
            }
        }
    }

    pub fn is_finished(&self) -> bool {
        self.handle
            .as_ref()
            .map(JoinHandle::is_finished)
            .unwrap_or(true)
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl Drop for PeriodicTask {
    fn drop(&mut self) {
        // A plain drop means the owner went away without stop(); the loop
        // must not outlive it.
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}
