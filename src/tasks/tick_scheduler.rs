//! One-second tick schedule

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::interval;
use tracing::debug;

/// Fixed tick period; the first tick fires immediately after `start`
pub const TICK_INTERVAL: Duration = Duration::from_secs(1);

/// Handle owning the periodic tick task.
///
/// `start` replaces any schedule already running, so at most one timer
/// exists at a time. `stop` is idempotent; after it returns no further
/// callback invocation begins, though one already executing may finish.
#[derive(Debug, Default)]
pub struct TickScheduler {
    handle: Option<JoinHandle<()>>,
}

impl TickScheduler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin invoking `on_tick` once per second, starting immediately.
    pub fn start<F, Fut>(&mut self, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        // Cancel a prior schedule instead of leaking it.
        self.stop();

        self.handle = Some(tokio::spawn(async move {
            let mut ticker = interval(TICK_INTERVAL);
            loop {
                ticker.tick().await;
                on_tick().await;
            }
        }));
    }

    /// Cancel all pending and future invocations; no-op when not running
    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            debug!("cancelling tick schedule");
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for TickScheduler {
    fn drop(&mut self) {
        self.stop();
    }
}
