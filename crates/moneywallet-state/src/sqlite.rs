use std::{
    path::Path,
    sync::{Mutex, MutexGuard, PoisonError},
};

use crate::{
    backend::{validate_name, BackendError, Change, PreferenceBackend},
    value::PreferenceValue,
};

/// A durable [`PreferenceBackend`] storing each preference file in its own SQLite table.
///
/// Values are stored as the JSON form of [`PreferenceValue`].
pub struct SqliteBackend {
    connection: Mutex<rusqlite::Connection>,
    table: String,
}

impl std::fmt::Debug for SqliteBackend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SqliteBackend")
            .field("table", &self.table)
            .finish()
    }
}

impl SqliteBackend {
    /// Opens (creating if needed) the database at `path` and the table for preference file
    /// `name`.
    pub fn open(path: impl AsRef<Path>, name: &str) -> Result<Self, BackendError> {
        let connection = rusqlite::Connection::open(path)?;

        // Set WAL mode for better concurrency
        connection.pragma_update_and_check(None, "journal_mode", "WAL", |_| Ok(()))?;

        Self::initialize(connection, name)
    }

    /// Opens a private in-memory database. Nothing is persisted once the backend is dropped.
    pub fn open_in_memory(name: &str) -> Result<Self, BackendError> {
        Self::initialize(rusqlite::Connection::open_in_memory()?, name)
    }

    fn initialize(connection: rusqlite::Connection, name: &str) -> Result<Self, BackendError> {
        if !validate_name(name) {
            return Err(BackendError::InvalidName(name.to_string()));
        }

        connection.execute(
            &format!(
                "CREATE TABLE IF NOT EXISTS {name} (key TEXT PRIMARY KEY, value TEXT NOT NULL);"
            ),
            [],
        )?;

        log::debug!("Opened SQLite preference table '{}'", name);

        Ok(SqliteBackend {
            connection: Mutex::new(connection),
            table: name.to_string(),
        })
    }

    fn lock(&self) -> Result<MutexGuard<'_, rusqlite::Connection>, BackendError> {
        self.connection.lock().map_err(|_: PoisonError<_>| {
            BackendError::Internal("SQLite connection lock poisoned".to_string())
        })
    }
}

fn put_row(
    conn: &rusqlite::Connection,
    table: &str,
    key: &str,
    value: &PreferenceValue,
) -> Result<(), BackendError> {
    let value = serde_json::to_string(value)?;
    conn.execute(
        &format!("INSERT OR REPLACE INTO {table} (key, value) VALUES (?1, ?2)"),
        rusqlite::params![key, value],
    )?;
    Ok(())
}

fn remove_row(conn: &rusqlite::Connection, table: &str, key: &str) -> Result<(), BackendError> {
    conn.execute(
        &format!("DELETE FROM {table} WHERE key = ?1"),
        rusqlite::params![key],
    )?;
    Ok(())
}

impl PreferenceBackend for SqliteBackend {
    fn get(&self, key: &str) -> Result<Option<PreferenceValue>, BackendError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT value FROM {} WHERE key = ?1", self.table))?;
        let mut rows = stmt.query(rusqlite::params![key])?;

        if let Some(row) = rows.next()? {
            let value = row.get::<_, String>(0)?;

            Ok(Some(serde_json::from_str(&value)?))
        } else {
            Ok(None)
        }
    }

    fn put(&self, key: &str, value: PreferenceValue) -> Result<(), BackendError> {
        let conn = self.lock()?;
        put_row(&conn, &self.table, key, &value)
    }

    fn remove(&self, key: &str) -> Result<(), BackendError> {
        let conn = self.lock()?;
        remove_row(&conn, &self.table, key)
    }

    fn keys(&self) -> Result<Vec<String>, BackendError> {
        let conn = self.lock()?;
        let mut stmt = conn.prepare(&format!("SELECT key FROM {} ORDER BY key", self.table))?;
        let rows = stmt.query_map([], |row| row.get::<_, String>(0))?;

        let mut results = Vec::new();
        for row in rows {
            results.push(row?);
        }

        Ok(results)
    }

    fn apply(&self, changes: Vec<Change>) -> Result<(), BackendError> {
        let mut conn = self.lock()?;
        let transaction = conn.transaction()?;

        for change in &changes {
            match change {
                Change::Put(key, value) => put_row(&transaction, &self.table, key, value)?,
                Change::Remove(key) => remove_row(&transaction, &self.table, key)?,
            }
        }

        transaction.commit()?;
        Ok(())
    }
}
