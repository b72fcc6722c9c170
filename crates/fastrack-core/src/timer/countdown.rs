//! Countdown engine.
//!
//! A tick-driven state machine. It does not use internal threads - the
//! caller (or a [`TickDriver`](super::TickDriver)) is responsible for calling
//! `tick()` once per interval.
//!
//! ## State Transitions
//!
//! ```text
//! Idle -> Running -> (Paused -> Running)* -> Finished
//!   ^                                           |
//!   +------------------ reset ------------------+
//! ```
//!
//! ## Usage
//!
//! ```ignore
//! let mut countdown = Countdown::new(5_000, 1_000)?;
//! countdown.start();
//! // Once per interval:
//! countdown.tick(); // Returns Some(Event::CountdownFinished) at zero
//! ```

use chrono::Utc;
use serde::{Deserialize, Serialize};

use crate::error::ValidationError;
use crate::events::Event;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CountdownState {
    Idle,
    Running,
    Paused,
    /// Reached zero. Only `reset()` leaves this state.
    Finished,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Countdown {
    duration_ms: u64,
    interval_ms: u64,
    time_left_ms: u64,
    state: CountdownState,
}

impl Countdown {
    /// Create a countdown of `duration_ms` that decrements by `interval_ms`
    /// on every tick.
    ///
    /// # Errors
    /// Returns an error if `interval_ms` is zero.
    pub fn new(duration_ms: u64, interval_ms: u64) -> Result<Self, ValidationError> {
        if interval_ms == 0 {
            return Err(ValidationError::InvalidValue {
                field: "interval".into(),
                message: "must be positive".into(),
            });
        }
        Ok(Self {
            duration_ms,
            interval_ms,
            time_left_ms: duration_ms,
            state: CountdownState::Idle,
        })
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn state(&self) -> CountdownState {
        self.state
    }

    pub fn time_left_ms(&self) -> u64 {
        self.time_left_ms
    }

    pub fn duration_ms(&self) -> u64 {
        self.duration_ms
    }

    pub fn interval_ms(&self) -> u64 {
        self.interval_ms
    }

    pub fn is_running(&self) -> bool {
        self.state == CountdownState::Running
    }

    /// Remaining share of the duration, 100.0 .. 0.0.
    ///
    /// This is the fill of the circular progress ring.
    pub fn percentage(&self) -> f64 {
        if self.duration_ms == 0 {
            return 0.0;
        }
        self.time_left_ms as f64 / self.duration_ms as f64 * 100.0
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Start or resume. Starting an already running countdown is a no-op,
    /// so repeated calls never stack schedules.
    pub fn start(&mut self) -> Option<Event> {
        match self.state {
            CountdownState::Idle | CountdownState::Paused => {
                if self.time_left_ms == 0 {
                    self.state = CountdownState::Finished;
                    return Some(Event::CountdownFinished { at: Utc::now() });
                }
                self.state = CountdownState::Running;
                Some(Event::CountdownStarted {
                    time_left_ms: self.time_left_ms,
                    at: Utc::now(),
                })
            }
            CountdownState::Running | CountdownState::Finished => None,
        }
    }

    pub fn pause(&mut self) -> Option<Event> {
        match self.state {
            CountdownState::Running => {
                self.state = CountdownState::Paused;
                Some(Event::CountdownPaused {
                    time_left_ms: self.time_left_ms,
                    at: Utc::now(),
                })
            }
            _ => None,
        }
    }

    pub fn reset(&mut self) -> Option<Event> {
        self.state = CountdownState::Idle;
        self.time_left_ms = self.duration_ms;
        Some(Event::CountdownReset {
            duration_ms: self.duration_ms,
            at: Utc::now(),
        })
    }

    /// Call once per interval. Returns `Some(Event::CountdownFinished)` on
    /// the tick that reaches zero; the countdown is then stopped.
    pub fn tick(&mut self) -> Option<Event> {
        if self.state != CountdownState::Running {
            return None;
        }
        self.time_left_ms = self.time_left_ms.saturating_sub(self.interval_ms);
        if self.time_left_ms == 0 {
            self.state = CountdownState::Finished;
            return Some(Event::CountdownFinished { at: Utc::now() });
        }
        None
    }
}
