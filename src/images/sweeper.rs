/// Periodic sweep of stale image entries
///
/// The sweep loop runs on its own task until `stop()` is awaited or the
/// `SweepTask` is dropped (which aborts it).
use super::resolver::ImageResolver;
use crate::logger::{self, LogTag};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

pub struct SweepTask {
    shutdown: Arc<Notify>,
    handle: Option<JoinHandle<()>>,
}

impl SweepTask {
    pub fn start(resolver: ImageResolver, interval: Duration) -> Self {
        let shutdown = Arc::new(Notify::new());
        let handle = tokio::spawn(sweep_loop(resolver, interval, shutdown.clone()));

        logger::info(
            LogTag::Sweep,
            &format!("Image cache sweeper started (interval {}ms)", interval.as_millis()),
        );

        Self {
            shutdown,
            handle: Some(handle),
        }
    }

    /// Signal the loop to exit and wait for it
    pub async fn stop(mut self) {
        // notify_one keeps a permit if the loop is mid-sweep
        self.shutdown.notify_one();
        if let Some(handle) = self.handle.take() {
            if let Err(e) = handle.await {
                logger::error(LogTag::Sweep, &format!("Sweeper task failed: {}", e));
            }
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle
            .as_ref()
            .map(|handle| !handle.is_finished())
            .unwrap_or(false)
    }
}

impl Drop for SweepTask {
    fn drop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }
}

async fn sweep_loop(resolver: ImageResolver, interval: Duration, shutdown: Arc<Notify>) {
    let mut ticker = tokio::time::interval(interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    // First tick completes immediately
    ticker.tick().await;

    loop {
        tokio::select! {
            _ = shutdown.notified() => {
                logger::info(LogTag::Sweep, "Image cache sweeper stopping");
                break;
            }

            _ = ticker.tick() => {
                resolver.sweep();
            }
        }
    }
}
