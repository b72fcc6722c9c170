//! Repeating tick schedule.
//!
//! The driver only delivers notifications; whoever owns the countdown or the
//! session controller applies them. Dropping the driver aborts the schedule,
//! after which the receiver drains and then yields `None`.

use std::time::Duration;

use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{self, Instant, MissedTickBehavior};

use crate::error::ValidationError;

/// Capacity of the tick channel. A slow consumer loses ticks instead of
/// queueing an unbounded backlog.
const TICK_BUFFER: usize = 4;

/// Handle to a running tick schedule. Must be created inside a tokio runtime.
#[derive(Debug)]
pub struct TickDriver {
    handle: JoinHandle<()>,
    period: Duration,
}

impl TickDriver {
    /// Spawn a schedule that sends the tick sequence number (starting at 1)
    /// every `period`. The first tick fires one period after spawning.
    ///
    /// # Errors
    /// Returns an error if `period` is zero.
    pub fn spawn(period: Duration) -> Result<(Self, mpsc::Receiver<u64>), ValidationError> {
        if period.is_zero() {
            return Err(ValidationError::InvalidValue {
                field: "period".into(),
                message: "must be positive".into(),
            });
        }

        let (tx, rx) = mpsc::channel(TICK_BUFFER);
        let handle = tokio::spawn(async move {
            let mut interval = time::interval_at(Instant::now() + period, period);
            interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
            let mut seq = 0u64;
            loop {
                interval.tick().await;
                seq += 1;
                match tx.try_send(seq) {
                    Ok(()) => {}
                    Err(mpsc::error::TrySendError::Full(_)) => {
                        tracing::debug!(seq, "tick dropped, consumer is behind");
                    }
                    Err(mpsc::error::TrySendError::Closed(_)) => break,
                }
            }
        });

        tracing::debug!(period_ms = period.as_millis() as u64, "tick driver started");
        Ok((Self { handle, period }, rx))
    }

    pub fn period(&self) -> Duration {
        self.period
    }

    /// Stop the schedule. Equivalent to dropping the driver.
    pub fn stop(self) {}
}

impl Drop for TickDriver {
    fn drop(&mut self) {
        self.handle.abort();
        tracing::debug!("tick driver stopped");
    }
}
