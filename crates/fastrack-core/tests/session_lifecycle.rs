//! Integration tests for the fasting session lifecycle against real stores.

use chrono::{DateTime, Duration, FixedOffset, NaiveTime};
use fastrack_core::{
    CoreError, DashboardSummary, Event, FastingController, FastingPlan, KeyValueStore,
    ManualClock, MemoryStore, SessionError, SessionStatus, SqliteStore, TickOutcome,
};

fn at(s: &str) -> DateTime<FixedOffset> {
    DateTime::parse_from_rfc3339(s).unwrap()
}

fn sixteen_eight() -> FastingPlan {
    FastingPlan::find("16:8").unwrap()
}

#[test]
fn test_scenario_from_eight_am() {
    let clock = ManualClock::at(at("2024-05-10T08:00:00+02:00"));
    let mut ctl = FastingController::load(MemoryStore::new(), clock.clone()).unwrap();

    let event = ctl
        .start_fasting(&sixteen_eight(), Some(NaiveTime::from_hms_opt(8, 0, 0).unwrap()))
        .unwrap();
    match event {
        Event::FastingStarted { planned_end, .. } => {
            assert_eq!(planned_end, at("2024-05-11T00:00:00+02:00"));
        }
        other => panic!("unexpected event {other:?}"),
    }

    clock.set(at("2024-05-10T23:55:00+02:00"));
    ctl.end_fasting().unwrap();
    assert!(ctl.history()[0].completed);

    clock.set(at("2024-05-11T08:00:00+02:00"));
    ctl.start_fasting(&sixteen_eight(), Some(NaiveTime::from_hms_opt(8, 0, 0).unwrap()))
        .unwrap();
    clock.set(at("2024-05-11T22:00:00+02:00"));
    ctl.end_fasting().unwrap();
    assert!(!ctl.history()[0].completed);
    assert_eq!(ctl.consecutive_days(), 2);
}

#[test]
fn test_history_is_newest_first() {
    let clock = ManualClock::at(at("2024-05-01T20:00:00+00:00"));
    let mut ctl = FastingController::load(MemoryStore::new(), clock.clone()).unwrap();

    let mut ids = Vec::new();
    for _ in 0..5 {
        match ctl.start_fasting(&sixteen_eight(), None).unwrap() {
            Event::FastingStarted { record_id, .. } => ids.push(record_id),
            other => panic!("unexpected event {other:?}"),
        }
        clock.advance(Duration::hours(16));
        ctl.end_fasting().unwrap();
        clock.advance(Duration::hours(8));
    }

    let history: Vec<_> = ctl.history().iter().map(|r| r.id.clone()).collect();
    ids.reverse();
    assert_eq!(history, ids);
    assert_eq!(ctl.consecutive_days(), 5);
}

#[test]
fn test_state_survives_sqlite_reopen() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fastrack.db");
    let clock = ManualClock::at(at("2024-05-01T07:00:00+09:00"));

    {
        let store = SqliteStore::open_at(&path).unwrap();
        let mut ctl = FastingController::load(store, clock.clone()).unwrap();
        ctl.start_fasting(&FastingPlan::find("20-4").unwrap(), None)
            .unwrap();
    }

    clock.advance(Duration::hours(20));
    let store = SqliteStore::open_at(&path).unwrap();
    let mut ctl = FastingController::load(store, clock.clone()).unwrap();
    assert_eq!(ctl.status(), SessionStatus::Fasting);
    assert_eq!(ctl.selected_plan().unwrap().id, "20-4");

    match ctl.tick().unwrap() {
        TickOutcome::Ended(Event::FastingEnded { completed, .. }) => assert!(completed),
        other => panic!("unexpected outcome {other:?}"),
    }

    let store = ctl.into_store();
    assert!(store.get("currentFasting").unwrap().is_none());
    assert!(store.get("selectedPlan").unwrap().is_none());
    let ctl = FastingController::load(store, clock).unwrap();
    assert_eq!(ctl.history().len(), 1);
    assert_eq!(ctl.consecutive_days(), 1);
}

#[test]
fn test_corrupt_store_fails_closed() {
    let mut store = MemoryStore::new();
    store.set("fastingRecords", "not json").unwrap();
    store.set("consecutiveDays", "12").unwrap();
    store.set("currentFasting", "{\"id\":").unwrap();

    let clock = ManualClock::at(at("2024-05-01T07:00:00+00:00"));
    let mut ctl = FastingController::load(store, clock).unwrap();
    assert_eq!(ctl.status(), SessionStatus::Idle);
    assert!(ctl.history().is_empty());
    assert_eq!(ctl.consecutive_days(), 12);

    ctl.start_fasting(&sixteen_eight(), None).unwrap();
    assert_eq!(ctl.status(), SessionStatus::Fasting);
}

#[test]
fn test_rejected_transitions_do_not_touch_the_store() {
    let clock = ManualClock::at(at("2024-05-01T07:00:00+00:00"));
    let mut ctl = FastingController::load(MemoryStore::new(), clock).unwrap();

    assert!(matches!(
        ctl.end_fasting(),
        Err(CoreError::Session(SessionError::NotFasting))
    ));
    assert!(matches!(
        ctl.delete_record("nope"),
        Err(CoreError::Session(SessionError::RecordNotFound { .. }))
    ));
    assert!(ctl.store().is_empty());
}

#[test]
fn test_dashboard_from_controller_history() {
    let clock = ManualClock::at(at("2024-05-01T20:00:00+00:00"));
    let mut ctl = FastingController::load(MemoryStore::new(), clock.clone()).unwrap();

    ctl.start_fasting(&sixteen_eight(), None).unwrap();
    clock.advance(Duration::hours(16));
    ctl.end_fasting().unwrap();

    clock.advance(Duration::hours(8));
    ctl.start_fasting(&sixteen_eight(), None).unwrap();
    clock.advance(Duration::hours(4));
    ctl.end_fasting().unwrap();

    let summary = DashboardSummary::from_history(ctl.history(), ctl.consecutive_days());
    assert_eq!(summary.total_sessions, 2);
    assert_eq!(summary.completed_sessions, 1);
    assert_eq!(summary.total_fasted_hours, 20.0);
    assert_eq!(summary.longest_fast_hours, 16.0);
}
