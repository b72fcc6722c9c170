use std::collections::HashMap;

use super::KeyValueStore;
use crate::error::StoreError;

/// In-process store. Nothing survives the process.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        self.entries.remove(key);
        Ok(())
    }

    fn apply(&mut self, writes: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
        for (key, value) in writes {
            match value {
                Some(value) => self.entries.insert(key.to_string(), value.to_string()),
                None => self.entries.remove(*key),
            };
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn set_get_remove() {
        let mut store = MemoryStore::new();
        assert!(store.get("k").unwrap().is_none());
        store.set("k", "v").unwrap();
        assert_eq!(store.get("k").unwrap().as_deref(), Some("v"));
        store.remove("k").unwrap();
        store.remove("k").unwrap();
        assert!(store.is_empty());
    }

    #[test]
    fn apply_sets_and_removes() {
        let mut store = MemoryStore::new();
        store.set("gone", "1").unwrap();
        store.apply(&[("gone", None), ("kept", Some("2"))]).unwrap();
        assert!(store.get("gone").unwrap().is_none());
        assert_eq!(store.get("kept").unwrap().as_deref(), Some("2"));
        assert_eq!(store.len(), 1);
    }
}
