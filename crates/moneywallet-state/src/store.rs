use std::{collections::BTreeSet, sync::Arc};

use crate::{
    backend::{BackendError, Change, PreferenceBackend},
    key::PreferenceKey,
    value::{PreferenceValue, ValueKind},
};

/// A Rust type that can be stored as a [`PreferenceValue`].
///
/// Implemented for the five supported kinds: `i32`, `i64`, `bool`, `String` and
/// `BTreeSet<String>`.
pub trait PreferenceType: Sized {
    /// The kind this type is persisted as.
    const KIND: ValueKind;

    /// Wraps the value for storage.
    fn into_value(self) -> PreferenceValue;

    /// Unwraps a stored value, or returns it back if it has a different kind.
    fn from_value(value: PreferenceValue) -> Result<Self, PreferenceValue>;
}

macro_rules! impl_preference_type {
    ($ty:ty, $variant:ident) => {
        impl PreferenceType for $ty {
            const KIND: ValueKind = ValueKind::$variant;

            fn into_value(self) -> PreferenceValue {
                PreferenceValue::$variant(self)
            }

            fn from_value(value: PreferenceValue) -> Result<Self, PreferenceValue> {
                match value {
                    PreferenceValue::$variant(inner) => Ok(inner),
                    other => Err(other),
                }
            }
        }
    };
}

impl_preference_type!(i32, Int);
impl_preference_type!(i64, Long);
impl_preference_type!(bool, Bool);
impl_preference_type!(String, String);
impl_preference_type!(BTreeSet<String>, StringSet);

/// Typed access to preferences stored in a [`PreferenceBackend`].
///
/// Reads never fail: absence resolves to the caller supplied default, and backend read
/// failures are logged and treated as absence. Writes are synchronous and report backend
/// failures to the caller.
///
/// Keys are type-stable. Reading a stored value whose kind differs from the key's declared
/// type is a programming error and panics.
#[derive(Clone)]
pub struct PreferenceStore {
    backend: Arc<dyn PreferenceBackend>,
}

impl std::fmt::Debug for PreferenceStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PreferenceStore").finish()
    }
}

impl PreferenceStore {
    /// Create a new typed store over `backend`.
    pub fn new(backend: Arc<dyn PreferenceBackend>) -> Self {
        Self { backend }
    }

    /// Get the value stored under `key`, or `default` if it was never written.
    pub fn get<K: PreferenceKey>(&self, key: &K, default: K::Value) -> K::Value {
        self.get_optional(key).unwrap_or(default)
    }

    /// Get the value stored under `key`, if any.
    pub fn get_optional<K: PreferenceKey>(&self, key: &K) -> Option<K::Value> {
        self.try_get_optional(key).unwrap_or_else(|e| {
            log::warn!("Failed to read preference '{}': {}", key.name(), e);
            None
        })
    }

    /// Get the value stored under `key`, or `default` if it was never written, reporting
    /// backend failures instead of resolving them to `default`.
    ///
    /// Read-modify-write sequences must use this, so a failed read never overwrites the stored
    /// value with one derived from the default.
    pub fn try_get<K: PreferenceKey>(
        &self,
        key: &K,
        default: K::Value,
    ) -> Result<K::Value, BackendError> {
        Ok(self.try_get_optional(key)?.unwrap_or(default))
    }

    /// Get the value stored under `key`, if any, reporting backend failures.
    pub fn try_get_optional<K: PreferenceKey>(
        &self,
        key: &K,
    ) -> Result<Option<K::Value>, BackendError> {
        let Some(value) = self.backend.get(key.name())? else {
            return Ok(None);
        };

        match K::Value::from_value(value) {
            Ok(value) => Ok(Some(value)),
            Err(other) => panic!(
                "Preference '{}' is declared as {} but {} was stored",
                key.name(),
                K::Value::KIND,
                other.kind()
            ),
        }
    }

    /// Whether a value is stored under `key`.
    pub fn contains<K: PreferenceKey>(&self, key: &K) -> bool {
        self.get_optional(key).is_some()
    }

    /// Update (or create) the value stored under `key`.
    pub fn set<K: PreferenceKey>(&self, key: &K, value: K::Value) -> Result<(), BackendError> {
        self.backend.put(key.name(), value.into_value())
    }

    /// Delete the value stored under `key`. Deleting an absent key is a no-op.
    pub fn remove<K: PreferenceKey>(&self, key: &K) -> Result<(), BackendError> {
        self.backend.remove(key.name())
    }

    /// Commit a batch of changes built with [`PreferenceStore::put_change`] and
    /// [`PreferenceStore::remove_change`].
    pub fn apply(&self, changes: Vec<Change>) -> Result<(), BackendError> {
        self.backend.apply(changes)
    }

    /// A batched write of `value` under `key`.
    pub fn put_change<K: PreferenceKey>(key: &K, value: K::Value) -> Change {
        Change::Put(key.name().to_string(), value.into_value())
    }

    /// A batched removal of `key`.
    pub fn remove_change<K: PreferenceKey>(key: &K) -> Change {
        Change::Remove(key.name().to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{register_preference_family, register_preference_key, InMemoryBackend};

    register_preference_key!(const LONG: i64 = "long");
    register_preference_key!(const INT: i32 = "int");
    register_preference_key!(const FLAG: bool = "flag");
    register_preference_key!(const TEXT: String = "text");
    register_preference_key!(const SET: BTreeSet<String> = "set");
    register_preference_key!(const TEXT_ALIAS: i64 = "text");
    register_preference_family!(const OFFSET: i32 = "offset_");

    struct FailingBackend;

    impl PreferenceBackend for FailingBackend {
        fn get(&self, _key: &str) -> Result<Option<PreferenceValue>, BackendError> {
            Err(BackendError::Internal("disk unavailable".to_string()))
        }
        fn put(&self, _key: &str, _value: PreferenceValue) -> Result<(), BackendError> {
            Err(BackendError::Internal("disk full".to_string()))
        }
        fn remove(&self, _key: &str) -> Result<(), BackendError> {
            Err(BackendError::Internal("disk full".to_string()))
        }
        fn keys(&self) -> Result<Vec<String>, BackendError> {
            Ok(Vec::new())
        }
    }

    fn store() -> PreferenceStore {
        PreferenceStore::new(Arc::new(InMemoryBackend::new()))
    }

    #[test]
    fn test_missing_keys_return_default() {
        let store = store();

        assert_eq!(store.get(&LONG, -1), -1);
        assert_eq!(store.get(&INT, 48), 48);
        assert!(store.get(&FLAG, true));
        assert_eq!(store.get_optional(&TEXT), None);
        assert!(!store.contains(&SET));
    }

    #[test]
    fn test_round_trip_boundary_values() {
        let store = store();

        store.set(&LONG, i64::MAX).unwrap();
        store.set(&INT, 0).unwrap();
        store.set(&FLAG, false).unwrap();
        store.set(&TEXT, String::new()).unwrap();
        store.set(&SET, BTreeSet::new()).unwrap();
        store.set(&OFFSET.key("dropbox"), -12).unwrap();

        assert_eq!(store.get(&LONG, 0), i64::MAX);
        assert_eq!(store.get(&INT, 48), 0);
        assert!(!store.get(&FLAG, true));
        assert_eq!(store.get_optional(&TEXT), Some(String::new()));
        assert_eq!(store.get_optional(&SET), Some(BTreeSet::new()));
        assert_eq!(store.get(&OFFSET.key("dropbox"), 48), -12);
        assert_eq!(store.get(&OFFSET.key("google_drive"), 48), 48);
    }

    #[test]
    fn test_set_is_idempotent() {
        let backend = Arc::new(InMemoryBackend::new());
        let store = PreferenceStore::new(backend.clone());

        store.set(&TEXT, "1234".to_string()).unwrap();
        let once = backend.keys().unwrap();
        store.set(&TEXT, "1234".to_string()).unwrap();

        assert_eq!(backend.keys().unwrap(), once);
        assert_eq!(store.get_optional(&TEXT), Some("1234".to_string()));
    }

    #[test]
    fn test_try_get_resolves_absence_to_default() {
        let store = store();

        assert_eq!(store.try_get(&INT, 48).unwrap(), 48);
        assert_eq!(store.try_get_optional(&TEXT).unwrap(), None);

        store.set(&INT, 7).unwrap();
        assert_eq!(store.try_get(&INT, 48).unwrap(), 7);
    }

    #[test]
    fn test_remove_restores_default() {
        let store = store();

        store.set(&LONG, 5).unwrap();
        store.remove(&LONG).unwrap();
        store.remove(&LONG).unwrap();

        assert_eq!(store.get(&LONG, -1), -1);
    }

    #[test]
    fn test_apply_batch() {
        let store = store();
        store.set(&TEXT, "/x".to_string()).unwrap();

        store
            .apply(vec![
                PreferenceStore::put_change(&FLAG, true),
                PreferenceStore::remove_change(&TEXT),
            ])
            .unwrap();

        assert!(store.get(&FLAG, false));
        assert_eq!(store.get_optional(&TEXT), None);
    }

    #[test]
    #[should_panic(expected = "Preference 'text' is declared as long but string was stored")]
    fn test_type_mismatch_panics() {
        let store = store();
        store.set(&TEXT, "abc".to_string()).unwrap();

        store.get(&TEXT_ALIAS, 0);
    }

    #[test]
    fn test_backend_failures() {
        let store = PreferenceStore::new(Arc::new(FailingBackend));

        assert_eq!(store.get(&LONG, -1), -1);
        assert!(matches!(
            store.try_get(&LONG, -1),
            Err(BackendError::Internal(message)) if message == "disk unavailable"
        ));
        assert!(store.try_get_optional(&TEXT).is_err());
        assert!(matches!(
            store.set(&LONG, 3),
            Err(BackendError::Internal(message)) if message == "disk full"
        ));
        assert!(store.remove(&LONG).is_err());
    }
}
