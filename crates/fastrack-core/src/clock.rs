//! Wall-clock sources.
//!
//! Every timestamp the controller produces carries the UTC offset of the
//! local wall clock, so stored ISO-8601 strings and `YYYY/MM/DD` dates agree
//! with what the user sees.

use std::cell::Cell;
use std::rc::Rc;

use chrono::{DateTime, Duration, FixedOffset, Local, NaiveDate, NaiveTime};

/// Source of "now".
pub trait Clock {
    fn now(&self) -> DateTime<FixedOffset>;

    /// Place a wall-clock `time` on `date` in this clock's zone.
    ///
    /// Returns `None` when that wall time is skipped or repeated there. The
    /// default uses the offset in effect now.
    fn resolve(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
        date.and_time(time)
            .and_local_timezone(*self.now().offset())
            .single()
    }
}

/// The system wall clock in the local timezone.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<FixedOffset> {
        Local::now().fixed_offset()
    }

    /// Uses the local offset in effect at the resolved moment, which may
    /// differ from today's across a DST change.
    fn resolve(&self, date: NaiveDate, time: NaiveTime) -> Option<DateTime<FixedOffset>> {
        date.and_time(time)
            .and_local_timezone(Local)
            .single()
            .map(|resolved| resolved.fixed_offset())
    }
}

/// A clock that only moves when told to.
///
/// Clones share the same instant, so a test can keep one handle and hand
/// another to a controller.
#[derive(Debug, Clone)]
pub struct ManualClock {
    now: Rc<Cell<DateTime<FixedOffset>>>,
}

impl ManualClock {
    pub fn at(now: DateTime<FixedOffset>) -> Self {
        Self {
            now: Rc::new(Cell::new(now)),
        }
    }

    pub fn set(&self, now: DateTime<FixedOffset>) {
        self.now.set(now);
    }

    pub fn advance(&self, by: Duration) {
        self.now.set(self.now.get() + by);
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<FixedOffset> {
        self.now.get()
    }
}
