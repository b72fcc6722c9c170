//! # Fastrack Core Library
//!
//! This library provides the core logic for the Fastrack intermittent-fasting
//! tracker. Every operation is available through the `fastrack` CLI binary,
//! which is a thin layer over this crate.
//!
//! ## Architecture
//!
//! - **Session Controller**: the Idle/Fasting state machine with history and
//!   day streak, persisted slot by slot into a key-value store
//! - **Countdown Engine**: a tick-driven countdown plus a tokio tick driver
//!   that stops when dropped
//! - **Storage**: SQLite or in-memory key-value stores and TOML configuration
//!
//! ## Key Components
//!
//! - [`FastingController`]: Session state machine
//! - [`Countdown`]: Countdown state machine
//! - [`TickDriver`]: Repeating tick schedule
//! - [`KeyValueStore`]: Persistence seam
//! - [`Config`]: Application configuration management

pub mod clock;
pub mod error;
pub mod events;
pub mod plan;
pub mod session;
pub mod storage;
pub mod timer;

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{ConfigError, CoreError, SessionError, StoreError, ValidationError};
pub use events::Event;
pub use plan::FastingPlan;
pub use session::{
    DashboardSummary, FastingController, FastingRecord, Remaining, SessionSettings,
    SessionStatus, Snapshot, TickOutcome,
};
pub use storage::{Config, KeyValueStore, MemoryStore, SqliteStore};
pub use timer::{Countdown, CountdownState, TickDriver};
