use std::future::Future;
use std::ops::ControlFlow;
use std::time::Duration;

use tokio::time::{interval_at, Instant, MissedTickBehavior};
use tokio_util::sync::CancellationToken;

/// Handle to at most one repeating tick task.
///
/// The first tick fires one full period after `start`. A tick that comes due
/// while the previous callback is still running is dropped, not queued.
#[derive(Debug, Default)]
pub(crate) struct PollTimer {
    token: Option<CancellationToken>,
}

impl PollTimer {
    pub(crate) fn is_active(&self) -> bool {
        self.token
            .as_ref()
            .is_some_and(|token| !token.is_cancelled())
    }

    /// Replace any running task with a new one calling `on_tick` every `period`.
    /// Must be called from within a tokio runtime.
    pub(crate) fn start<F, Fut>(&mut self, period: Duration, mut on_tick: F)
    where
        F: FnMut() -> Fut + Send + 'static,
        Fut: Future<Output = ControlFlow<()>> + Send + 'static,
    {
        self.cancel();
        let token = CancellationToken::new();
        let cancelled = token.clone();
        let first_tick = Instant::now() + period;

        tokio::spawn(async move {
            let mut ticks = interval_at(first_tick, period);
            ticks.set_missed_tick_behavior(MissedTickBehavior::Skip);
            loop {
                tokio::select! {
                    biased;
                    _ = cancelled.cancelled() => break,
                    _ = ticks.tick() => {
                        if on_tick().await.is_break() {
                            break;
                        }
                    }
                }
            }
        });

        self.token = Some(token);
    }

    /// Returns whether a task was running.
    pub(crate) fn cancel(&mut self) -> bool {
        match self.token.take() {
            Some(token) => {
                token.cancel();
                true
            }
            None => false,
        }
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}
