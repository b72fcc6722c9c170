//! History summary for the dashboard screen.

use serde::{Deserialize, Serialize};

use super::record::FastingRecord;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DashboardSummary {
    pub total_sessions: usize,
    pub completed_sessions: usize,
    /// 0.0 .. 1.0; 0.0 with no history.
    pub completion_rate: f64,
    pub total_fasted_hours: f64,
    pub longest_fast_hours: f64,
    pub consecutive_days: u32,
    pub last_fast_date: Option<String>,
}

impl DashboardSummary {
    /// Summarize a newest-first history.
    pub fn from_history(records: &[FastingRecord], consecutive_days: u32) -> Self {
        let total_sessions = records.len();
        let completed_sessions = records.iter().filter(|r| r.completed).count();
        let hours = |r: &FastingRecord| r.duration().num_seconds().max(0) as f64 / 3600.0;

        Self {
            total_sessions,
            completed_sessions,
            completion_rate: if total_sessions == 0 {
                0.0
            } else {
                completed_sessions as f64 / total_sessions as f64
            },
            total_fasted_hours: records.iter().map(hours).sum(),
            longest_fast_hours: records.iter().map(hours).fold(0.0, f64::max),
            consecutive_days,
            last_fast_date: records.first().map(|r| r.date.clone()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Duration};

    fn record(start: &str, hours: i64, completed: bool) -> FastingRecord {
        let start = DateTime::parse_from_rfc3339(start).unwrap();
        let mut r = FastingRecord::begin("16-8", start, start + Duration::hours(hours));
        r.completed = completed;
        r
    }

    #[test]
    fn empty_history() {
        let summary = DashboardSummary::from_history(&[], 0);
        assert_eq!(summary.total_sessions, 0);
        assert_eq!(summary.completion_rate, 0.0);
        assert_eq!(summary.longest_fast_hours, 0.0);
        assert!(summary.last_fast_date.is_none());
    }

    #[test]
    fn aggregates_history() {
        let records = vec![
            record("2024-03-03T08:00:00+08:00", 18, true),
            record("2024-03-02T08:00:00+08:00", 12, false),
            record("2024-03-01T08:00:00+08:00", 16, true),
            record("2024-02-28T08:00:00+08:00", 16, true),
        ];
        let summary = DashboardSummary::from_history(&records, 2);
        assert_eq!(summary.total_sessions, 4);
        assert_eq!(summary.completed_sessions, 3);
        assert_eq!(summary.completion_rate, 0.75);
        assert_eq!(summary.total_fasted_hours, 62.0);
        assert_eq!(summary.longest_fast_hours, 18.0);
        assert_eq!(summary.consecutive_days, 2);
        assert_eq!(summary.last_fast_date.as_deref(), Some("2024/03/03"));
    }
}
