use std::{collections::BTreeSet, fmt};

use serde::{Deserialize, Serialize};

/// A single persisted preference value.
///
/// Backends store values of exactly these five kinds. The serialized form is used by
/// [`SqliteBackend`](crate::SqliteBackend) and must remain stable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "value", rename_all = "snake_case")]
pub enum PreferenceValue {
    /// A 32-bit signed integer.
    Int(i32),
    /// A 64-bit signed integer.
    Long(i64),
    /// A boolean flag.
    Bool(bool),
    /// A UTF-8 string.
    String(String),
    /// A set of unique UTF-8 strings. Ordering carries no meaning.
    StringSet(BTreeSet<String>),
}

impl PreferenceValue {
    /// The kind of this value.
    pub fn kind(&self) -> ValueKind {
        match self {
            PreferenceValue::Int(_) => ValueKind::Int,
            PreferenceValue::Long(_) => ValueKind::Long,
            PreferenceValue::Bool(_) => ValueKind::Bool,
            PreferenceValue::String(_) => ValueKind::String,
            PreferenceValue::StringSet(_) => ValueKind::StringSet,
        }
    }
}

/// The declared type of a preference value.
#[allow(missing_docs)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    Int,
    Long,
    Bool,
    String,
    StringSet,
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ValueKind::Int => "int",
            ValueKind::Long => "long",
            ValueKind::Bool => "boolean",
            ValueKind::String => "string",
            ValueKind::StringSet => "string set",
        };
        f.write_str(name)
    }
}
