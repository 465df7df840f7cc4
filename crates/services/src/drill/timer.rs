use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::MissedTickBehavior;

/// Period of the drill clock.
pub const TICK_PERIOD: Duration = Duration::from_secs(1);

/// How a controller drives its clock.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimerDriver {
    /// Spawn a ticker on the current `LocalSet`.
    #[default]
    LocalTokio,
    /// No background task; the owner calls `tick` itself.
    Manual,
}

/// A periodic local task. Dropping the handle cancels the task.
#[derive(Debug)]
pub struct Ticker {
    handle: JoinHandle<()>,
}

impl Ticker {
    /// Call `on_tick` every `period` until it returns false or the ticker is
    /// dropped. The first call happens one period after spawning.
    ///
    /// # Panics
    ///
    /// Panics if called outside a `tokio::task::LocalSet`.
    pub fn spawn(period: Duration, mut on_tick: impl FnMut() -> bool + 'static) -> Self {
        let handle = tokio::task::spawn_local(async move {
            let mut interval = tokio::time::interval(period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Skip);
            // The first tick resolves immediately.
            interval.tick().await;
            loop {
                interval.tick().await;
                if !on_tick() {
                    break;
                }
            }
        });
        Self { handle }
    }

    #[must_use]
    pub fn is_finished(&self) -> bool {
        self.handle.is_finished()
    }
}

impl Drop for Ticker {
    fn drop(&mut self) {
        self.handle.abort();
    }
}
