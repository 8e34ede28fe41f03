//! In-memory store.

use std::collections::{BTreeMap, BTreeSet};
use std::sync::RwLock;

use structprefs_core_store::{LLError, LLReader, LLWriter, StoredValue};

/// A store that keeps values and registered defaults in memory.
///
/// Explicit values shadow defaults. Nothing survives the process.
///
/// # Example
///
/// ```rust
/// use structprefs_core_store::{LLReader, LLWriter, StoredValue};
/// use structprefs_json_store::InMemoryStore;
///
/// let store = InMemoryStore::new();
/// store.ll_register_default("app.volume", StoredValue::Integer(5)).unwrap();
/// assert_eq!(store.get_integer("app.volume").unwrap(), Some(5));
///
/// store.ll_set("app.volume", StoredValue::Integer(9)).unwrap();
/// assert_eq!(store.get_integer("app.volume").unwrap(), Some(9));
/// ```
#[derive(Debug, Default)]
pub struct InMemoryStore {
    values: RwLock<BTreeMap<String, StoredValue>>,
    defaults: RwLock<BTreeMap<String, StoredValue>>,
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store with initial explicit values.
    pub fn with_values(values: impl IntoIterator<Item = (String, StoredValue)>) -> Self {
        Self {
            values: RwLock::new(values.into_iter().collect()),
            defaults: RwLock::new(BTreeMap::new()),
        }
    }
}

impl LLReader for InMemoryStore {
    fn ll_get(&self, key: &str) -> Result<Option<StoredValue>, LLError> {
        let values = self.values.read().map_err(|_| LLError::Poisoned)?;
        if let Some(value) = values.get(key) {
            return Ok(Some(value.clone()));
        }
        let defaults = self.defaults.read().map_err(|_| LLError::Poisoned)?;
        Ok(defaults.get(key).cloned())
    }

    fn ll_keys(&self) -> Result<Vec<String>, LLError> {
        let values = self.values.read().map_err(|_| LLError::Poisoned)?;
        let defaults = self.defaults.read().map_err(|_| LLError::Poisoned)?;
        let keys: BTreeSet<&String> = values.keys().chain(defaults.keys()).collect();
        Ok(keys.into_iter().cloned().collect())
    }
}

impl LLWriter for InMemoryStore {
    fn ll_set(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        let mut values = self.values.write().map_err(|_| LLError::Poisoned)?;
        values.insert(key.to_string(), value);
        Ok(())
    }

    fn ll_remove(&self, key: &str) -> Result<bool, LLError> {
        let mut values = self.values.write().map_err(|_| LLError::Poisoned)?;
        Ok(values.remove(key).is_some())
    }

    fn ll_register_default(&self, key: &str, value: StoredValue) -> Result<(), LLError> {
        let mut defaults = self.defaults.write().map_err(|_| LLError::Poisoned)?;
        defaults.insert(key.to_string(), value);
        Ok(())
    }

    fn ll_unregister_default(&self, key: &str) -> Result<(), LLError> {
        let mut defaults = self.defaults.write().map_err(|_| LLError::Poisoned)?;
        defaults.remove(key);
        Ok(())
    }
}
