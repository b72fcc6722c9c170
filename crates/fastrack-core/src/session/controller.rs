//! Fasting session controller.
//!
//! Owns the tracker state, applies the session transitions and writes every
//! change back to the injected [`KeyValueStore`] before returning.
//!
//! ## State Transitions
//!
//! ```text
//! Idle --start_fasting--> Fasting --end_fasting / tick at expiry--> Idle
//! ```
//!
//! A transition is staged on a copy of the state and only committed once the
//! store write succeeded, so a failed write leaves the controller unchanged.

use std::fmt;

use chrono::{DateTime, FixedOffset, NaiveTime};
use serde::{Deserialize, Serialize};

use super::record::FastingRecord;
use super::state::TrackerState;
use crate::clock::{Clock, SystemClock};
use crate::error::{Result, SessionError, ValidationError};
use crate::events::Event;
use crate::plan::FastingPlan;
use crate::storage::KeyValueStore;

/// Tunables for session evaluation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionSettings {
    /// A session counts as completed when it ends within this many minutes
    /// of its planned end, early or late.
    pub completion_window_min: i64,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            completion_window_min: 30,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Idle,
    Fasting,
}

/// Time left in the active session.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Remaining {
    pub total_secs: i64,
    pub hours: i64,
    pub minutes: i64,
    pub seconds: i64,
    /// Share of the planned fast already behind, 0.0 .. 100.0.
    pub elapsed_pct: f64,
}

impl Remaining {
    fn between(
        start: DateTime<FixedOffset>,
        planned_end: DateTime<FixedOffset>,
        now: DateTime<FixedOffset>,
    ) -> Self {
        let total_secs = (planned_end - now).num_seconds().max(0);
        let planned_secs = (planned_end - start).num_seconds();
        let elapsed_pct = if planned_secs <= 0 {
            100.0
        } else {
            ((planned_secs - total_secs) as f64 / planned_secs as f64 * 100.0).clamp(0.0, 100.0)
        };
        Self {
            total_secs,
            hours: total_secs / 3600,
            minutes: (total_secs % 3600) / 60,
            seconds: total_secs % 60,
            elapsed_pct,
        }
    }
}

impl fmt::Display for Remaining {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds
        )
    }
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// No session is active.
    Idle,
    /// The session is still running.
    Remaining(Remaining),
    /// The planned end was reached and the session was ended.
    Ended(Event),
}

/// Serializable view of the whole controller.
#[derive(Debug, Clone, Serialize)]
pub struct Snapshot {
    pub status: SessionStatus,
    pub selected_plan: Option<FastingPlan>,
    pub current_fasting: Option<FastingRecord>,
    pub remaining: Option<Remaining>,
    pub consecutive_days: u32,
    pub history_len: usize,
    pub staged_start_time: Option<NaiveTime>,
    pub at: DateTime<FixedOffset>,
}

pub struct FastingController<S, C = SystemClock> {
    store: S,
    clock: C,
    settings: SessionSettings,
    state: TrackerState,
    /// Transient; never persisted.
    staged_start: Option<NaiveTime>,
}

impl<S: KeyValueStore, C: Clock> FastingController<S, C> {
    /// Initialize from whatever the store holds.
    ///
    /// # Errors
    /// Returns an error if the store cannot be read or holds state from a
    /// newer schema. Malformed slots are not errors.
    pub fn load(store: S, clock: C) -> Result<Self> {
        let state = TrackerState::load(&store)?;
        tracing::debug!(
            fasting = state.current_fasting.is_some(),
            records = state.fasting_records.len(),
            streak = state.consecutive_days,
            "tracker state loaded"
        );
        Ok(Self {
            store,
            clock,
            settings: SessionSettings::default(),
            state,
            staged_start: None,
        })
    }

    pub fn with_settings(mut self, settings: SessionSettings) -> Self {
        self.settings = settings;
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn status(&self) -> SessionStatus {
        if self.state.current_fasting.is_some() {
            SessionStatus::Fasting
        } else {
            SessionStatus::Idle
        }
    }

    pub fn selected_plan(&self) -> Option<&FastingPlan> {
        self.state.selected_plan.as_ref()
    }

    pub fn current_fasting(&self) -> Option<&FastingRecord> {
        self.state.current_fasting.as_ref()
    }

    /// Newest first.
    pub fn history(&self) -> &[FastingRecord] {
        &self.state.fasting_records
    }

    pub fn consecutive_days(&self) -> u32 {
        self.state.consecutive_days
    }

    pub fn settings(&self) -> SessionSettings {
        self.settings
    }

    pub fn staged_start_time(&self) -> Option<NaiveTime> {
        self.staged_start
    }

    /// Time left in the active session, without side effects.
    pub fn remaining(&self) -> Option<Remaining> {
        let current = self.state.current_fasting.as_ref()?;
        Some(Remaining::between(
            current.start_time,
            current.end_time,
            self.clock.now(),
        ))
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            status: self.status(),
            selected_plan: self.state.selected_plan.clone(),
            current_fasting: self.state.current_fasting.clone(),
            remaining: self.remaining(),
            consecutive_days: self.state.consecutive_days,
            history_len: self.state.fasting_records.len(),
            staged_start_time: self.staged_start,
            at: self.clock.now(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Stage a start time for the next `start_fasting` call.
    pub fn stage_start_time(&mut self, time: NaiveTime) {
        self.staged_start = Some(time);
    }

    pub fn clear_staged_start_time(&mut self) {
        self.staged_start = None;
    }

    /// Begin a fast on `plan`.
    ///
    /// The start is now, or today's date at `custom_start` (falling back to
    /// the staged start time).
    pub fn start_fasting(
        &mut self,
        plan: &FastingPlan,
        custom_start: Option<NaiveTime>,
    ) -> Result<Event> {
        if let Some(current) = &self.state.current_fasting {
            return Err(SessionError::AlreadyFasting {
                record_id: current.id.clone(),
            }
            .into());
        }
        plan.validate()?;

        let now = self.clock.now();
        let start_time = match custom_start.or(self.staged_start) {
            Some(time) => self.clock.resolve(now.date_naive(), time).ok_or_else(|| {
                SessionError::InvalidStartTime {
                    date: now.date_naive().to_string(),
                    time: time.to_string(),
                }
            })?,
            None => now,
        };
        let planned_end = start_time
            .checked_add_signed(plan.fasting_duration()?)
            .ok_or_else(|| ValidationError::InvalidValue {
                field: "fastingHours".into(),
                message: format!("planned end after {start_time} is out of range"),
            })?;
        let record = FastingRecord::begin(&plan.id, start_time, planned_end);

        let mut next = self.state.clone();
        next.current_fasting = Some(record.clone());
        next.selected_plan = Some(plan.clone());
        self.commit(next)?;
        self.staged_start = None;

        tracing::info!(
            record = %record.id,
            plan = %plan.id,
            start = %start_time,
            planned_end = %planned_end,
            "fast started"
        );
        Ok(Event::FastingStarted {
            record_id: record.id,
            plan_id: plan.id.clone(),
            fasting_ratio: plan.fasting_ratio.clone(),
            start_time,
            planned_end,
            at: now,
        })
    }

    /// End the active fast now.
    pub fn end_fasting(&mut self) -> Result<Event> {
        let Some(current) = self.state.current_fasting.clone() else {
            return Err(SessionError::NotFasting.into());
        };

        let now = self.clock.now();
        let off_target_min = (current.end_time - now).num_minutes().abs();
        let completed = off_target_min <= self.settings.completion_window_min;

        let mut record = current;
        record.end_time = now;
        record.completed = completed;

        let mut next = self.state.clone();
        next.consecutive_days = next_streak(
            next.fasting_records.first(),
            &record,
            next.consecutive_days,
        );
        next.fasting_records.insert(0, record.clone());
        next.current_fasting = None;
        next.selected_plan = None;
        let consecutive_days = next.consecutive_days;
        self.commit(next)?;

        tracing::info!(
            record = %record.id,
            completed,
            off_target_min,
            streak = consecutive_days,
            "fast ended"
        );
        Ok(Event::FastingEnded {
            record_id: record.id,
            completed,
            end_time: now,
            off_target_min,
            consecutive_days,
            at: now,
        })
    }

    /// Remove a record from history. The streak is left as is.
    pub fn delete_record(&mut self, id: &str) -> Result<Event> {
        let Some(index) = self.state.fasting_records.iter().position(|r| r.id == id) else {
            return Err(SessionError::RecordNotFound { id: id.to_string() }.into());
        };

        let mut next = self.state.clone();
        next.fasting_records.remove(index);
        self.commit(next)?;

        tracing::info!(record = %id, "record deleted");
        Ok(Event::RecordDeleted {
            record_id: id.to_string(),
            at: self.clock.now(),
        })
    }

    /// Recompute the time left; ends the fast once the planned end passed.
    pub fn tick(&mut self) -> Result<TickOutcome> {
        let Some(current) = &self.state.current_fasting else {
            return Ok(TickOutcome::Idle);
        };

        let now = self.clock.now();
        let diff = (current.end_time - now).num_seconds();
        if diff <= 0 {
            let event = self.end_fasting()?;
            return Ok(TickOutcome::Ended(event));
        }

        let remaining = Remaining::between(current.start_time, current.end_time, now);
        tracing::trace!(remaining = %remaining, "tick");
        Ok(TickOutcome::Remaining(remaining))
    }

    fn commit(&mut self, next: TrackerState) -> Result<()> {
        next.save(&mut self.store)?;
        self.state = next;
        Ok(())
    }
}

/// Streak after `ended`, given the record that was newest before it.
fn next_streak(previous: Option<&FastingRecord>, ended: &FastingRecord, current: u32) -> u32 {
    let consecutive = match (previous.and_then(FastingRecord::day), ended.day()) {
        (Some(prev), Some(day)) => prev.succ_opt() == Some(day),
        _ => false,
    };
    if consecutive {
        current.saturating_add(1)
    } else {
        1
    }
}
