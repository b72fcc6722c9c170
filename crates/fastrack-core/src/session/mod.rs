mod controller;
mod dashboard;
mod record;
pub mod state;

pub use controller::{
    FastingController, Remaining, SessionSettings, SessionStatus, Snapshot, TickOutcome,
};
pub use dashboard::DashboardSummary;
pub use record::{FastingRecord, RECORD_DATE_FORMAT};
pub use state::TrackerState;
