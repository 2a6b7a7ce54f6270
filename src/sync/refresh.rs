//! Background poll scheduler: a repeating timer that re-runs the full
//! collection fetch while a session is active. Started on login, aborted on
//! logout; the interval is injected so tests can run it against a paused
//! clock instead of real time.

use std::future::Future;
use std::time::Duration;

use tokio::task::JoinHandle;

#[derive(Debug, Default)]
pub struct Refresher {
    handle: Option<JoinHandle<()>>,
}

impl Refresher {
    pub fn new() -> Self {
        Self::default()
    }

    /// Spawn the repeating fetch task, replacing any previous one. The first
    /// tick fires one full interval after start, not immediately; the
    /// initial load already ran.
    pub fn start<F, Fut>(&mut self, interval: Duration, mut tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ()> + Send,
    {
        self.stop();
        self.handle = Some(tokio::spawn(async move {
            let mut timer = tokio::time::interval(interval);
            timer.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            // interval's first tick completes immediately; swallow it.
            timer.tick().await;
            loop {
                timer.tick().await;
                tick().await;
            }
        }));
    }

    pub fn stop(&mut self) {
        if let Some(handle) = self.handle.take() {
            handle.abort();
        }
    }

    pub fn is_running(&self) -> bool {
        self.handle.as_ref().map(|h| !h.is_finished()).unwrap_or(false)
    }
}

impl Drop for Refresher {
    fn drop(&mut self) {
        self.stop();
    }
}
