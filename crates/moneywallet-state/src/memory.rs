use std::{
    collections::HashMap,
    sync::{PoisonError, RwLock},
};

use crate::{
    backend::{BackendError, Change, PreferenceBackend},
    value::PreferenceValue,
};

/// A volatile [`PreferenceBackend`] holding every value in a map.
///
/// Each instance is independent, so tests can create one per case.
#[derive(Default)]
pub struct InMemoryBackend {
    values: RwLock<HashMap<String, PreferenceValue>>,
}

impl std::fmt::Debug for InMemoryBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InMemoryBackend").finish()
    }
}

impl InMemoryBackend {
    /// Creates a new empty backend.
    pub fn new() -> Self {
        Self::default()
    }
}

fn poisoned<T>(_: PoisonError<T>) -> BackendError {
    BackendError::Internal("in-memory preference lock poisoned".to_string())
}

impl PreferenceBackend for InMemoryBackend {
    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, BackendError> {
        Ok(self.values.read().map_err(poisoned)?.get(key).cloned())
    }

    fn put(&self, key: &str, value: PreferenceValue) -> Result<(), BackendError> {
        self.values
            .write()
            .map_err(poisoned)?
            .insert(key.to_string(), value);
        Ok(())
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        self.values.write().map_err(poisoned)?.remove(key);
        Ok(())
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        Ok(self.values.read().map_err(poisoned)?.keys().cloned().collect())
    }

    fn apply(&self, changes: Vec<Change>) -> Result<(), BackendError> {
        let mut values = self.values.write().map_err(poisoned)?;
        for change in changes {
            match change {
                Change::Put(key, value) => {
                    values.insert(key, value);
                }
                Change::Remove(key) => {
                    values.remove(&key);
                }
            }
        }
        Ok(())
    }
}
