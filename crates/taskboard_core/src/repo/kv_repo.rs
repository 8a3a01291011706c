//! Key-value store contract with SQLite and in-memory implementations.
//!
//! # Responsibility
//! - Provide `get`/`set`/`remove` over text values keyed by name.
//! - Keep SQL details inside the storage boundary.
//!
//! # Invariants
//! - `set` replaces any previous value for the key.
//! - `remove` on an absent key succeeds.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::cell::RefCell;
use std::collections::BTreeMap;
use std::error::Error;
use std::fmt::{Display, Formatter};

pub type StorageResult<T> = Result<T, StorageError>;

/// Failure reported by a durable store.
#[derive(Debug)]
pub enum StorageError {
    Db(DbError),
    /// Connection was handed over before migrations ran.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Backend refused the operation (quota, unavailable medium, ...).
    Rejected(String),
}

impl Display for StorageError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with open_db"
            ),
            Self::Rejected(reason) => write!(f, "storage rejected operation: {reason}"),
        }
    }
}

impl Error for StorageError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            Self::UninitializedConnection { .. } | Self::Rejected(_) => None,
        }
    }
}

impl From<DbError> for StorageError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for StorageError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed durable store.
pub trait KeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> StorageResult<()>;
    fn remove(&self, key: &str) -> StorageResult<()>;
}

impl<T: KeyValueStore + ?Sized> KeyValueStore for &T {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        (**self).remove(key)
    }
}

/// SQLite-backed key-value store over the `kv_entries` table.
pub struct SqliteKeyValueStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteKeyValueStore<'conn> {
    /// Wraps a connection returned by `open_db`/`open_db_in_memory`.
    ///
    /// # Errors
    /// - `UninitializedConnection` when the schema version is not current.
    pub fn try_new(conn: &'conn Connection) -> StorageResult<Self> {
        let actual_version = current_user_version(conn)?;
        let expected_version = latest_version();
        if actual_version != expected_version {
            return Err(StorageError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }
        Ok(Self { conn })
    }
}

impl KeyValueStore for SqliteKeyValueStore<'_> {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_entries WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.conn.execute(
            "INSERT INTO kv_entries (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.conn
            .execute("DELETE FROM kv_entries WHERE key = ?1;", [key])?;
        Ok(())
    }
}

/// Process-local store for ephemeral boards and tests.
#[derive(Debug, Default)]
pub struct MemoryKeyValueStore {
    entries: RefCell<BTreeMap<String, String>>,
}

impl MemoryKeyValueStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-seeded with raw entries.
    pub fn with_entries<K, V>(entries: impl IntoIterator<Item = (K, V)>) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        Self {
            entries: RefCell::new(
                entries
                    .into_iter()
                    .map(|(key, value)| (key.into(), value.into()))
                    .collect(),
            ),
        }
    }

    pub fn contains_key(&self, key: &str) -> bool {
        self.entries.borrow().contains_key(key)
    }
}

impl KeyValueStore for MemoryKeyValueStore {
    fn get(&self, key: &str) -> StorageResult<Option<String>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> StorageResult<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_string());
        Ok(())
    }

    fn remove(&self, key: &str) -> StorageResult<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{KeyValueStore, MemoryKeyValueStore, SqliteKeyValueStore, StorageError};
    use crate::db::open_db_in_memory;
    use rusqlite::Connection;

    #[test]
    fn sqlite_store_sets_overwrites_and_removes() {
        let conn = open_db_in_memory().unwrap();
        let store = SqliteKeyValueStore::try_new(&conn).unwrap();

        assert_eq!(store.get("boardTitle").unwrap(), None);
        store.set("boardTitle", "Home").unwrap();
        store.set("boardTitle", "Office").unwrap();
        assert_eq!(store.get("boardTitle").unwrap().as_deref(), Some("Office"));

        store.remove("boardTitle").unwrap();
        store.remove("boardTitle").unwrap();
        assert_eq!(store.get("boardTitle").unwrap(), None);
    }

    #[test]
    fn sqlite_store_rejects_unmigrated_connection() {
        let conn = Connection::open_in_memory().unwrap();
        match SqliteKeyValueStore::try_new(&conn) {
            Err(StorageError::UninitializedConnection { actual_version, .. }) => {
                assert_eq!(actual_version, 0);
            }
            Err(other) => panic!("unexpected error: {other}"),
            Ok(_) => panic!("unmigrated connection should be rejected"),
        }
    }

    #[test]
    fn memory_store_behaves_like_a_map() {
        let store = MemoryKeyValueStore::with_entries([("statusFilter", "pending")]);
        assert!(store.contains_key("statusFilter"));
        store.remove("statusFilter").unwrap();
        assert!(!store.contains_key("statusFilter"));

        let by_ref: &dyn KeyValueStore = &store;
        by_ref.set("tasks", "[]").unwrap();
        assert_eq!(store.get("tasks").unwrap().as_deref(), Some("[]"));
    }
}
