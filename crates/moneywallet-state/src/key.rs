//! Type-safe keys for preference storage.

use std::marker::PhantomData;

use crate::store::PreferenceType;

/// Register a type-safe preference key.
///
/// This macro is the primary way to create preference keys. It associates
/// a persisted key name with a value type at compile time.
///
/// # Example
/// ```rust
/// use moneywallet_state::register_preference_key;
///
/// register_preference_key!(pub const CURRENT_WALLET: i64 = "current_wallet_id");
/// assert_eq!(CURRENT_WALLET.name(), "current_wallet_id");
/// ```
#[macro_export]
macro_rules! register_preference_key {
    ($(#[$meta:meta])* $vis:vis const $name:ident: $ty:ty = $key:literal) => {
        $(#[$meta])*
        $vis const $name: $crate::key::Key<$ty> = $crate::key::Key::new($key);
    };
}

/// Register a type-safe family of preference keys sharing a prefix.
///
/// # Example
/// ```rust
/// use moneywallet_state::register_preference_family;
///
/// register_preference_family!(pub const BACKUP_FOLDER: String = "auto_backup_folder_");
/// assert_eq!(BACKUP_FOLDER.key("dropbox").name(), "auto_backup_folder_dropbox");
/// ```
#[macro_export]
macro_rules! register_preference_family {
    ($(#[$meta:meta])* $vis:vis const $name:ident: $ty:ty = $prefix:literal) => {
        $(#[$meta])*
        $vis const $name: $crate::key::KeyFamily<$ty> = $crate::key::KeyFamily::new($prefix);
    };
}

/// Compose the literal key of a family member.
///
/// The persisted layout is the prefix immediately followed by the identifier, without any
/// separator or escaping.
pub fn family_key(prefix: &str, id: &str) -> String {
    let mut key = String::with_capacity(prefix.len() + id.len());
    key.push_str(prefix);
    key.push_str(id);
    key
}

/// Anything that names a single persisted value of type [`PreferenceKey::Value`].
pub trait PreferenceKey {
    /// The declared type of the value stored under this key.
    type Value: PreferenceType;

    /// The literal key used for storage.
    fn name(&self) -> &str;
}

/// Type-safe key for preference storage.
///
/// Associates a string key name with a value type at compile time,
/// preventing type mismatches while maintaining ergonomic usage.
///
/// Use the [`register_preference_key!`](crate::register_preference_key) macro to create keys.
#[derive(Debug)]
pub struct Key<T> {
    name: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> Key<T> {
    /// Create a new type-safe key with the given storage name.
    #[doc(hidden)]
    pub const fn new(name: &'static str) -> Self {
        Self {
            name,
            _marker: PhantomData,
        }
    }

    /// Get the string key name used for storage.
    pub const fn name(&self) -> &'static str {
        self.name
    }
}

impl<T> Clone for Key<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for Key<T> {}

impl<T: PreferenceType> PreferenceKey for Key<T> {
    type Value = T;

    fn name(&self) -> &str {
        self.name
    }
}

/// A family of keys sharing a literal prefix, parameterized by a caller supplied identifier.
///
/// Every distinct identifier yields an independent key. Identifiers are opaque and are not
/// validated.
#[derive(Debug)]
pub struct KeyFamily<T> {
    prefix: &'static str,
    _marker: PhantomData<fn() -> T>,
}

impl<T> KeyFamily<T> {
    /// Create a new key family with the given prefix.
    #[doc(hidden)]
    pub const fn new(prefix: &'static str) -> Self {
        Self {
            prefix,
            _marker: PhantomData,
        }
    }

    /// Get the literal prefix shared by every key of this family.
    pub const fn prefix(&self) -> &'static str {
        self.prefix
    }

    /// The key of the family member identified by `id`.
    pub fn key(&self, id: &str) -> FamilyKey<T> {
        FamilyKey {
            name: family_key(self.prefix, id),
            _marker: PhantomData,
        }
    }
}

impl<T> Clone for KeyFamily<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for KeyFamily<T> {}

/// A key produced by [`KeyFamily::key`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FamilyKey<T> {
    name: String,
    _marker: PhantomData<fn() -> T>,
}

impl<T> FamilyKey<T> {
    /// Get the string key name used for storage.
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl<T: PreferenceType> PreferenceKey for FamilyKey<T> {
    type Value = T;

    fn name(&self) -> &str {
        &self.name
    }
}
