#![doc = include_str!("../README.md")]

/// This module provides the raw value model shared by every backend.
pub mod value;

/// This module provides the storage backend interface and its errors.
pub mod backend;

/// Type-safe keys and key families for preference storage.
pub mod key;

/// Typed accessors with explicit defaults over a [`PreferenceBackend`].
pub mod store;

mod memory;
mod sqlite;

pub use backend::{open_backend, BackendConfiguration, BackendError, Change, PreferenceBackend};
pub use key::{family_key, FamilyKey, Key, KeyFamily, PreferenceKey};
pub use memory::InMemoryBackend;
pub use sqlite::SqliteBackend;
pub use store::{PreferenceStore, PreferenceType};
pub use value::{PreferenceValue, ValueKind};
