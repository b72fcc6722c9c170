//! Typed persistence boundary for tracker state.
//!
//! Each slice of state lives under its own fixed key as JSON. A slot that
//! fails to deserialize falls back to its default; a missing slot is the
//! default. Writing `None` removes the key.

use std::marker::PhantomData;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::record::FastingRecord;
use crate::error::{Result, StoreError};
use crate::plan::FastingPlan;
use crate::storage::KeyValueStore;

/// Version written under [`SCHEMA_VERSION_KEY`] on every save.
pub const SCHEMA_VERSION: u32 = 1;
pub const SCHEMA_VERSION_KEY: &str = "schemaVersion";

/// A JSON-encoded value stored under one key.
pub struct Slot<T> {
    key: &'static str,
    _value: PhantomData<fn() -> T>,
}

impl<T: Serialize + DeserializeOwned> Slot<T> {
    pub const fn new(key: &'static str) -> Self {
        Self {
            key,
            _value: PhantomData,
        }
    }

    pub fn key(&self) -> &'static str {
        self.key
    }

    /// Read the slot. Malformed JSON is logged and treated as absent.
    pub fn load<S: KeyValueStore + ?Sized>(&self, store: &S) -> Result<Option<T>, StoreError> {
        let Some(raw) = store.get(self.key)? else {
            return Ok(None);
        };
        match serde_json::from_str(&raw) {
            Ok(value) => Ok(Some(value)),
            Err(e) => {
                tracing::warn!(key = self.key, error = %e, "discarding malformed stored value");
                Ok(None)
            }
        }
    }

    /// JSON for `value`; `None` means the key should be removed.
    pub fn encode(&self, value: Option<&T>) -> Result<Option<String>> {
        Ok(value.map(serde_json::to_string).transpose()?)
    }

    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S, value: Option<&T>) -> Result<()> {
        let json = self.encode(value)?;
        store.apply(&[(self.key, json.as_deref())])?;
        Ok(())
    }
}

pub const SELECTED_PLAN: Slot<FastingPlan> = Slot::new("selectedPlan");
pub const CURRENT_FASTING: Slot<FastingRecord> = Slot::new("currentFasting");
pub const FASTING_RECORDS: Slot<Vec<FastingRecord>> = Slot::new("fastingRecords");
pub const CONSECUTIVE_DAYS: Slot<u32> = Slot::new("consecutiveDays");

/// Everything the controller persists.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackerState {
    pub selected_plan: Option<FastingPlan>,
    pub current_fasting: Option<FastingRecord>,
    /// Newest first.
    pub fasting_records: Vec<FastingRecord>,
    pub consecutive_days: u32,
}

impl TrackerState {
    /// Read every slot from the store.
    ///
    /// # Errors
    /// Returns an error if the store fails or the stored schema version is
    /// newer than [`SCHEMA_VERSION`].
    pub fn load<S: KeyValueStore + ?Sized>(store: &S) -> Result<Self> {
        if let Some(raw) = store.get(SCHEMA_VERSION_KEY)? {
            match raw.trim().parse::<u32>() {
                Ok(found) if found > SCHEMA_VERSION => {
                    return Err(StoreError::UnsupportedSchema {
                        found,
                        supported: SCHEMA_VERSION,
                    }
                    .into());
                }
                Ok(_) => {}
                Err(_) => tracing::warn!(value = %raw, "ignoring unreadable schema version"),
            }
        }

        let mut state = Self {
            selected_plan: SELECTED_PLAN.load(store)?,
            current_fasting: CURRENT_FASTING.load(store)?,
            fasting_records: FASTING_RECORDS.load(store)?.unwrap_or_default(),
            consecutive_days: CONSECUTIVE_DAYS.load(store)?.unwrap_or_default(),
        };
        state.repair();
        Ok(state)
    }

    /// Write every slot and the schema version as one batch.
    ///
    /// Either all keys are updated or, on error, none are.
    pub fn save<S: KeyValueStore + ?Sized>(&self, store: &mut S) -> Result<()> {
        let selected_plan = SELECTED_PLAN.encode(self.selected_plan.as_ref())?;
        let current_fasting = CURRENT_FASTING.encode(self.current_fasting.as_ref())?;
        let fasting_records = FASTING_RECORDS.encode(Some(&self.fasting_records))?;
        let consecutive_days = CONSECUTIVE_DAYS.encode(Some(&self.consecutive_days))?;
        let version = SCHEMA_VERSION.to_string();

        store.apply(&[
            (SELECTED_PLAN.key(), selected_plan.as_deref()),
            (CURRENT_FASTING.key(), current_fasting.as_deref()),
            (FASTING_RECORDS.key(), fasting_records.as_deref()),
            (CONSECUTIVE_DAYS.key(), consecutive_days.as_deref()),
            (SCHEMA_VERSION_KEY, Some(version.as_str())),
        ])?;
        tracing::debug!(records = self.fasting_records.len(), "tracker state saved");
        Ok(())
    }

    /// Restore the invariant that a selected plan exists exactly when a
    /// session is active.
    fn repair(&mut self) {
        match (&self.selected_plan, &self.current_fasting) {
            (None, Some(current)) => match FastingPlan::find(&current.plan_id) {
                Ok(plan) => {
                    tracing::warn!(plan = %plan.id, "recovered missing selected plan from active record");
                    self.selected_plan = Some(plan);
                }
                Err(_) => {
                    tracing::warn!(record = %current.id, "dropping active record without a plan");
                    self.current_fasting = None;
                }
            },
            (Some(plan), None) => {
                tracing::warn!(plan = %plan.id, "dropping selected plan without an active record");
                self.selected_plan = None;
            }
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;
    use chrono::{DateTime, Duration};

    fn active_record() -> FastingRecord {
        let start = DateTime::parse_from_rfc3339("2024-03-01T08:00:00+08:00").unwrap();
        FastingRecord::begin("18-6", start, start + Duration::hours(18))
    }

    #[test]
    fn empty_store_loads_defaults() {
        let store = MemoryStore::new();
        assert_eq!(TrackerState::load(&store).unwrap(), TrackerState::default());
    }

    #[test]
    fn save_then_load_preserves_state() {
        let mut store = MemoryStore::new();
        let record = active_record();
        let state = TrackerState {
            selected_plan: Some(FastingPlan::find("18-6").unwrap()),
            current_fasting: Some(record.clone()),
            fasting_records: vec![record],
            consecutive_days: 3,
        };
        state.save(&mut store).unwrap();
        assert_eq!(store.get(SCHEMA_VERSION_KEY).unwrap().as_deref(), Some("1"));
        assert_eq!(TrackerState::load(&store).unwrap(), state);
    }

    #[test]
    fn none_slots_are_removed() {
        let mut store = MemoryStore::new();
        store.set("selectedPlan", "{}").unwrap();
        store.set("currentFasting", "{}").unwrap();
        TrackerState::default().save(&mut store).unwrap();
        assert!(store.get("selectedPlan").unwrap().is_none());
        assert!(store.get("currentFasting").unwrap().is_none());
        assert_eq!(store.get("fastingRecords").unwrap().as_deref(), Some("[]"));
        assert_eq!(store.get("consecutiveDays").unwrap().as_deref(), Some("0"));
    }

    #[test]
    fn malformed_slot_falls_back_to_default() {
        let mut store = MemoryStore::new();
        store.set("fastingRecords", "[{not json").unwrap();
        store.set("consecutiveDays", "\"seven\"").unwrap();
        let state = TrackerState::load(&store).unwrap();
        assert!(state.fasting_records.is_empty());
        assert_eq!(state.consecutive_days, 0);
    }

    #[test]
    fn missing_plan_is_recovered_from_record() {
        let mut store = MemoryStore::new();
        CURRENT_FASTING.save(&mut store, Some(&active_record())).unwrap();
        let state = TrackerState::load(&store).unwrap();
        assert_eq!(state.selected_plan.unwrap().id, "18-6");
        assert!(state.current_fasting.is_some());
    }

    #[test]
    fn orphaned_record_or_plan_is_dropped() {
        let mut store = MemoryStore::new();
        let mut record = active_record();
        record.plan_id = "unknown".into();
        CURRENT_FASTING.save(&mut store, Some(&record)).unwrap();
        let state = TrackerState::load(&store).unwrap();
        assert!(state.current_fasting.is_none());

        let mut store = MemoryStore::new();
        SELECTED_PLAN
            .save(&mut store, Some(&FastingPlan::find("16-8").unwrap()))
            .unwrap();
        let state = TrackerState::load(&store).unwrap();
        assert!(state.selected_plan.is_none());
    }

    #[test]
    fn newer_schema_is_rejected() {
        let mut store = MemoryStore::new();
        store.set(SCHEMA_VERSION_KEY, "2").unwrap();
        let err = TrackerState::load(&store).unwrap_err();
        assert!(matches!(
            err,
            crate::error::CoreError::Store(StoreError::UnsupportedSchema { found: 2, supported: 1 })
        ));
    }
}
