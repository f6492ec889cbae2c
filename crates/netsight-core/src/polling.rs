// ── Recurring fetch loop ──
//
// A timer task that fires a fetch immediately and then once per period until
// cancelled. Each fetch runs as its own task, so a slow response never delays
// the next tick; results are full snapshots, so the last write wins.

use std::fmt::Display;
use std::future::Future;
use std::time::Duration;

use tokio::time::MissedTickBehavior;
use tokio_util::sync::CancellationToken;
use tracing::{debug, warn};

const MIN_PERIOD: Duration = Duration::from_millis(1);

/// Builder for a recurring fetch task.
#[derive(Debug, Clone, Copy)]
pub struct PollingLoop {
    period: Duration,
    name: &'static str,
}

impl PollingLoop {
    /// A loop that ticks every `period` (clamped to at least 1 ms).
    pub fn new(period: Duration) -> Self {
        Self {
            period: period.max(MIN_PERIOD),
            name: "poll",
        }
    }

    /// Label used in log lines.
    pub fn named(mut self, name: &'static str) -> Self {
        self.name = name;
        self
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Spawn the loop onto the current tokio runtime.
    ///
    /// `fetch` is called at t=0 and every period after, receiving the loop's
    /// token so it can check liveness before publishing a result. Errors are
    /// logged and swallowed. Overlapping fetches are allowed.
    pub fn start<F, Fut, E>(self, mut fetch: F) -> CancelHandle
    where
        F: FnMut(CancellationToken) -> Fut + Send + 'static,
        Fut: Future<Output = Result<(), E>> + Send + 'static,
        E: Display + Send + 'static,
    {
        let token = CancellationToken::new();
        let task_token = token.clone();
        let Self { period, name } = self;

        tokio::spawn(async move {
            let mut ticker = tokio::time::interval(period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Skip);
            debug!(poll = name, period_ms = period.as_millis(), "polling started");

            loop {
                tokio::select! {
                    biased;
                    () = task_token.cancelled() => break,
                    _ = ticker.tick() => {
                        let in_flight = fetch(task_token.clone());
                        tokio::spawn(async move {
                            if let Err(e) = in_flight.await {
                                warn!(poll = name, error = %e, "poll fetch failed");
                            }
                        });
                    }
                }
            }

            debug!(poll = name, "polling stopped");
        });

        CancelHandle { token }
    }
}

/// Owner of a running [`PollingLoop`]. Dropping it cancels the loop.
#[derive(Debug)]
pub struct CancelHandle {
    token: CancellationToken,
}

impl CancelHandle {
    /// Stop future ticks. In-flight fetches finish, but see a cancelled token.
    pub fn cancel(&self) {
        self.token.cancel();
    }

    pub fn is_cancelled(&self) -> bool {
        self.token.is_cancelled()
    }

    /// A clone of the liveness token handed to every fetch.
    pub fn token(&self) -> CancellationToken {
        self.token.clone()
    }
}

impl Drop for CancelHandle {
    fn drop(&mut self) {
        self.token.cancel();
    }
}
