//! Wall-clock access and the once-a-second tick stream.
//!
//! UI layers subscribe to a [`Ticker`] and re-render the live duration on
//! every tick. The channel is a watch channel: subscribers always observe
//! the latest instant and never queue up stale ticks behind a slow
//! consumer.

use std::time::Duration;

use chrono::{DateTime, Utc};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Current wall-clock time.
pub fn now() -> DateTime<Utc> {
    Utc::now()
}

/// How often a default [`Ticker`] fires.
pub const DEFAULT_TICK_PERIOD: Duration = Duration::from_secs(1);

/// Periodic clock source.
///
/// `subscribe` spawns a background task per subscription; dropping the
/// returned [`ClockSubscription`] aborts it.
#[derive(Debug, Clone)]
pub struct Ticker {
    period: Duration,
}

impl Ticker {
    pub fn new() -> Self {
        Self::with_period(DEFAULT_TICK_PERIOD)
    }

    /// A ticker with a custom period, mainly for tests that cannot wait
    /// out real seconds.
    pub fn with_period(period: Duration) -> Self {
        Self { period }
    }

    /// Start a tick stream seeded with the current instant.
    pub fn subscribe(&self) -> ClockSubscription {
        let (tx, rx) = watch::channel(now());
        // interval() panics on a zero period.
        let period = self.period.max(Duration::from_millis(1));

        let task = tokio::spawn(async move {
            let mut interval = tokio::time::interval(period);
            interval.tick().await;
            loop {
                interval.tick().await;
                if tx.send(now()).is_err() {
                    break;
                }
            }
        });

        ClockSubscription { rx, task }
    }
}

impl Default for Ticker {
    fn default() -> Self {
        Self::new()
    }
}

/// Live handle onto a [`Ticker`]'s tick stream.
pub struct ClockSubscription {
    rx: watch::Receiver<DateTime<Utc>>,
    task: JoinHandle<()>,
}

impl ClockSubscription {
    /// The most recent tick, without waiting for the next one.
    pub fn current(&self) -> DateTime<Utc> {
        *self.rx.borrow()
    }

    /// Wait for the next tick. Returns `None` once the stream has been
    /// cancelled.
    pub async fn tick(&mut self) -> Option<DateTime<Utc>> {
        self.rx.changed().await.ok()?;
        Some(*self.rx.borrow_and_update())
    }

    /// Stop the background task. Subsequent `tick` calls return `None`.
    pub fn cancel(&self) {
        self.task.abort();
    }
}

impl Drop for ClockSubscription {
    fn drop(&mut self) {
        self.task.abort();
    }
}
