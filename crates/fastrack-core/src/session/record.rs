use chrono::{DateTime, Duration, FixedOffset, NaiveDate};
use serde::{Deserialize, Serialize};

/// Format of [`FastingRecord::date`].
pub const RECORD_DATE_FORMAT: &str = "%Y/%m/%d";

/// One fasting session.
///
/// While the session is active `end_time` is the planned end; once the
/// session ends it is replaced by the actual end moment.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingRecord {
    pub id: String,
    /// Local calendar date of the start, `YYYY/MM/DD`.
    pub date: String,
    pub start_time: DateTime<FixedOffset>,
    pub end_time: DateTime<FixedOffset>,
    pub completed: bool,
    #[serde(default)]
    pub plan_id: String,
}

impl FastingRecord {
    pub(crate) fn begin(
        plan_id: &str,
        start_time: DateTime<FixedOffset>,
        planned_end: DateTime<FixedOffset>,
    ) -> Self {
        Self {
            id: uuid::Uuid::new_v4().to_string(),
            date: start_time.format(RECORD_DATE_FORMAT).to_string(),
            start_time,
            end_time: planned_end,
            completed: false,
            plan_id: plan_id.to_string(),
        }
    }

    /// Parsed `date`, or `None` if the stored string is not `YYYY/MM/DD`.
    pub fn day(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, RECORD_DATE_FORMAT).ok()
    }

    pub fn duration(&self) -> Duration {
        self.end_time - self.start_time
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn at(s: &str) -> DateTime<FixedOffset> {
        DateTime::parse_from_rfc3339(s).unwrap()
    }

    #[test]
    fn begin_uses_local_start_date() {
        let start = at("2024-03-01T23:30:00+08:00");
        let record = FastingRecord::begin("16-8", start, start + Duration::hours(16));
        assert_eq!(record.date, "2024/03/01");
        assert_eq!(record.day(), NaiveDate::from_ymd_opt(2024, 3, 1));
        assert!(!record.completed);
        assert_eq!(record.duration(), Duration::hours(16));
    }

    #[test]
    fn ids_are_unique_for_identical_starts() {
        let start = at("2024-03-01T08:00:00+08:00");
        let a = FastingRecord::begin("16-8", start, start);
        let b = FastingRecord::begin("16-8", start, start);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn stored_json_uses_iso_timestamps() {
        let start = at("2024-03-01T08:00:00+08:00");
        let record = FastingRecord::begin("16-8", start, start + Duration::hours(16));
        let json = serde_json::to_value(&record).unwrap();
        assert_eq!(json["startTime"], "2024-03-01T08:00:00+08:00");
        assert_eq!(json["endTime"], "2024-03-02T00:00:00+08:00");
        assert_eq!(json["planId"], "16-8");
    }

    #[test]
    fn legacy_json_without_plan_id_still_loads() {
        let json = r#"{"id":"x","date":"2024/03/01","startTime":"2024-03-01T08:00:00+08:00","endTime":"2024-03-02T00:00:00+08:00","completed":true}"#;
        let record: FastingRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.plan_id, "");
        assert!(record.completed);
    }
}
