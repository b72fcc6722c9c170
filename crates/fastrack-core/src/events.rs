use chrono::{DateTime, FixedOffset, Utc};
use serde::{Deserialize, Serialize};

/// Every state change in the system produces an Event.
/// The CLI prints them; a UI would render from them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum Event {
    FastingStarted {
        record_id: String,
        plan_id: String,
        fasting_ratio: String,
        start_time: DateTime<FixedOffset>,
        planned_end: DateTime<FixedOffset>,
        at: DateTime<FixedOffset>,
    },
    FastingEnded {
        record_id: String,
        completed: bool,
        end_time: DateTime<FixedOffset>,
        /// Minutes between the actual and the planned end, always >= 0.
        off_target_min: i64,
        consecutive_days: u32,
        at: DateTime<FixedOffset>,
    },
    RecordDeleted {
        record_id: String,
        at: DateTime<FixedOffset>,
    },
    CountdownStarted {
        time_left_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownPaused {
        time_left_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownReset {
        duration_ms: u64,
        at: DateTime<Utc>,
    },
    CountdownFinished {
        at: DateTime<Utc>,
    },
}
