use std::{path::PathBuf, sync::Arc};

use crate::{value::PreferenceValue, InMemoryBackend, SqliteBackend};

/// An error resulting from operations on a preference backend.
#[derive(thiserror::Error, Debug)]
pub enum BackendError {
    /// An internal unspecified error.
    #[error("Internal error: {0}")]
    Internal(String),

    /// A serialization or deserialization error.
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),

    /// An internal database error.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),

    /// The preference file name can't be used as a storage identifier.
    #[error("Invalid preference file name '{0}', only alphabetic characters and underscores are allowed")]
    InvalidName(String),
}

/// A single mutation in a batch passed to [`PreferenceBackend::apply`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Change {
    /// Store `value` under `key`, replacing whatever was there.
    Put(String, PreferenceValue),
    /// Delete `key`. Deleting an absent key is not an error.
    Remove(String),
}

/// The durable key-value medium that preferences are persisted to.
///
/// Implementations must support arbitrary UTF-8 keys with last-write-wins semantics, and
/// serialize their own writes. Absence is reported as `Ok(None)`, never as an error.
pub trait PreferenceBackend: Send + Sync {
    /// Retrieves the value stored under `key`.
    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, BackendError>;

    /// Stores `value` under `key`.
    fn put(&self, key: &str, value: PreferenceValue) -> Result<(), BackendError>;

    /// Removes the value stored under `key`.
    fn remove(&self, key: &str) -> Result<(), BackendError>;

    /// Lists every key currently stored, in no particular order.
    ///
    /// An inspection API: the typed layers never enumerate keys. It exists for migrations,
    /// diagnostics and for asserting the exact on-disk layout.
    fn keys(&self) -> Result<Vec<String>, BackendError>;

    /// Commits a batch of changes in order.
    ///
    /// The default implementation applies each change individually. Backends that support
    /// transactions should override it so the batch is committed at once.
    fn apply(&self, changes: Vec<Change>) -> Result<(), BackendError> {
        for change in changes {
            match change {
                Change::Put(key, value) => self.put(&key, value)?,
                Change::Remove(key) => self.remove(&key)?,
            }
        }
        Ok(())
    }
}

/// Configuration for the backend preferences are persisted to.
#[derive(Debug, Clone)]
pub enum BackendConfiguration {
    /// A volatile backend, used by tests and ephemeral sessions.
    InMemory,

    /// SQLite configuration, used on native platforms
    Sqlite {
        /// The file path to the SQLite database.
        file_path: PathBuf,
        /// The preference file name. Different names are stored independently in the same
        /// database.
        name: String,
    },
}

/// Opens the backend described by `configuration`.
pub fn open_backend(
    configuration: BackendConfiguration,
) -> Result<Arc<dyn PreferenceBackend>, BackendError> {
    match configuration {
        BackendConfiguration::InMemory => Ok(Arc::new(InMemoryBackend::new())),
        BackendConfiguration::Sqlite { file_path, name } => {
            Ok(Arc::new(SqliteBackend::open(file_path, &name)?))
        }
    }
}

/// Whether `name` can be used as a preference file name.
///
/// The name becomes a SQLite table name, so only a-z, A-Z and underscore are accepted.
pub const fn validate_name(name: &str) -> bool {
    let bytes = name.as_bytes();
    if bytes.is_empty() {
        return false;
    }
    let mut i = 0;
    while i < bytes.len() {
        let byte = bytes[i];
        if !(byte.is_ascii_alphabetic() || byte == b'_') {
            return false;
        }
        i += 1;
    }
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_name() {
        assert!(validate_name("preferences"));
        assert!(validate_name("Valid_Name"));
        assert!(!validate_name(""));
        assert!(!validate_name("Invalid-Name"));
        assert!(!validate_name("Invalid Name"));
        assert!(!validate_name("prefs; DROP TABLE"));
        assert!(!validate_name("Invalid123"));
    }

    #[test]
    fn test_apply_runs_changes_in_order() {
        let backend = open_backend(BackendConfiguration::InMemory).unwrap();

        backend
            .apply(vec![
                Change::Put("a".to_string(), PreferenceValue::Int(1)),
                Change::Put("b".to_string(), PreferenceValue::Int(2)),
                Change::Remove("a".to_string()),
                Change::Put("b".to_string(), PreferenceValue::Int(3)),
            ])
            .unwrap();

        assert_eq!(backend.get("a").unwrap(), None);
        assert_eq!(backend.get("b").unwrap(), Some(PreferenceValue::Int(3)));
        assert_eq!(backend.keys().unwrap(), vec!["b".to_string()]);
    }
}
