//! Fasting plans.
//!
//! A plan is a fasting:eating hour ratio. The set of plans is fixed.

use serde::{Deserialize, Serialize};

use crate::error::ValidationError;

/// Fasting plus eating hours never exceed one day.
const HOURS_PER_DAY: i64 = 24;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FastingPlan {
    pub id: String,
    /// Display ratio, e.g. "16:8".
    pub fasting_ratio: String,
    pub fasting_hours: i64,
    pub eating_hours: i64,
}

impl FastingPlan {
    fn builtin(fasting_hours: i64, eating_hours: i64) -> Self {
        Self {
            id: format!("{fasting_hours}-{eating_hours}"),
            fasting_ratio: format!("{fasting_hours}:{eating_hours}"),
            fasting_hours,
            eating_hours,
        }
    }

    /// The three predefined plans: 16:8, 18:6 and 20:4.
    pub fn all() -> Vec<FastingPlan> {
        vec![
            Self::builtin(16, 8),
            Self::builtin(18, 6),
            Self::builtin(20, 4),
        ]
    }

    /// Look up a predefined plan by id ("16-8") or ratio ("16:8").
    pub fn find(key: &str) -> Result<FastingPlan, ValidationError> {
        let key = key.trim();
        Self::all()
            .into_iter()
            .find(|p| p.id == key || p.fasting_ratio == key)
            .ok_or_else(|| ValidationError::UnknownPlan(key.to_string()))
    }

    /// Planned fasting duration.
    pub fn fasting_duration(&self) -> Result<chrono::Duration, ValidationError> {
        chrono::Duration::try_hours(self.fasting_hours).ok_or_else(|| {
            ValidationError::InvalidValue {
                field: "fastingHours".into(),
                message: format!("{} hours is out of range", self.fasting_hours),
            }
        })
    }

    /// Rejects plans that do not fit one day or cannot move forward.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=HOURS_PER_DAY).contains(&self.fasting_hours) {
            return Err(ValidationError::InvalidValue {
                field: "fastingHours".into(),
                message: format!(
                    "must be between 1 and {HOURS_PER_DAY}, got {}",
                    self.fasting_hours
                ),
            });
        }
        let eating_max = HOURS_PER_DAY - self.fasting_hours;
        if !(0..=eating_max).contains(&self.eating_hours) {
            return Err(ValidationError::InvalidValue {
                field: "eatingHours".into(),
                message: format!("must be between 0 and {eating_max}, got {}", self.eating_hours),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn predefined_plans_cover_a_full_day() {
        let plans = FastingPlan::all();
        assert_eq!(plans.len(), 3);
        for plan in &plans {
            assert_eq!(plan.fasting_hours + plan.eating_hours, 24);
            assert!(plan.validate().is_ok());
        }
    }

    #[test]
    fn find_accepts_id_or_ratio() {
        assert_eq!(FastingPlan::find("18-6").unwrap().fasting_hours, 18);
        assert_eq!(FastingPlan::find("20:4").unwrap().eating_hours, 4);
        assert_eq!(
            FastingPlan::find("12:12"),
            Err(ValidationError::UnknownPlan("12:12".into()))
        );
    }

    #[test]
    fn validate_rejects_non_positive_fasting_hours() {
        let mut plan = FastingPlan::find("16:8").unwrap();
        plan.fasting_hours = 0;
        assert!(plan.validate().is_err());
        plan.fasting_hours = -4;
        assert!(plan.validate().is_err());
    }

    #[test]
    fn validate_rejects_plans_longer_than_a_day() {
        let mut plan = FastingPlan::find("20:4").unwrap();
        plan.eating_hours = 5;
        assert!(plan.validate().is_err());

        plan.fasting_hours = i64::MAX / 2;
        plan.eating_hours = 0;
        let err = plan.validate().unwrap_err();
        assert!(matches!(err, ValidationError::InvalidValue { ref field, .. } if field == "fastingHours"));
        assert!(plan.fasting_duration().is_err());
    }

    #[test]
    fn serializes_with_camel_case_fields() {
        let json = serde_json::to_value(FastingPlan::find("16-8").unwrap()).unwrap();
        assert_eq!(json["fastingRatio"], "16:8");
        assert_eq!(json["fastingHours"], 16);
        assert_eq!(json["eatingHours"], 8);
    }
}
