//! Key-value cache contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide stable get/set/remove APIs over the `cache` blob table.
//! - Keep SQL details inside the core persistence boundary.
//!
//! # Invariants
//! - Values are opaque JSON text; this layer never parses them.
//! - Writes are last-write-wins with no transaction semantics across keys.

use crate::db::{open_db, open_db_in_memory, DbError};
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::path::Path;

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache transport error for blob reads and writes.
#[derive(Debug)]
pub enum CacheError {
    Db(DbError),
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
        }
    }
}

impl From<DbError> for CacheError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// String-keyed JSON blob cache, the durable analog of browser localStorage.
pub trait CacheStore {
    fn get(&self, key: &str) -> CacheResult<Option<String>>;
    fn set(&self, key: &str, value: &str) -> CacheResult<()>;
    fn remove(&self, key: &str) -> CacheResult<()>;
}

// Shared references are stores too; tests hand the coordinator a borrow
// while keeping their own handle for seeding and assertions.
impl<C: CacheStore + ?Sized> CacheStore for &C {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        (**self).get(key)
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        (**self).set(key, value)
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        (**self).remove(key)
    }
}

/// SQLite-backed cache store owning its connection.
///
/// Components each open their own connection against the same cache file;
/// SQLite serializes the writers and the UI is single-threaded anyway.
pub struct SqliteCacheStore {
    conn: Connection,
}

impl SqliteCacheStore {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }

    /// Opens a file-backed cache with migrations applied.
    pub fn open(path: impl AsRef<Path>) -> CacheResult<Self> {
        Ok(Self::new(open_db(path)?))
    }

    /// Opens an in-memory cache, used by tests and the CLI probe.
    pub fn open_in_memory() -> CacheResult<Self> {
        Ok(Self::new(open_db_in_memory()?))
    }
}

impl CacheStore for SqliteCacheStore {
    fn get(&self, key: &str) -> CacheResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM cache WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    fn set(&self, key: &str, value: &str) -> CacheResult<()> {
        self.conn.execute(
            "INSERT INTO cache (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now') * 1000)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    fn remove(&self, key: &str) -> CacheResult<()> {
        self.conn
            .execute("DELETE FROM cache WHERE key = ?1;", [key])?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{CacheStore, SqliteCacheStore};

    #[test]
    fn set_get_remove_roundtrip() {
        let cache = SqliteCacheStore::open_in_memory().expect("cache should open");

        assert_eq!(cache.get("sessionToken").expect("get should succeed"), None);

        cache
            .set("sessionToken", "\"tok-1\"")
            .expect("set should succeed");
        assert_eq!(
            cache.get("sessionToken").expect("get should succeed"),
            Some("\"tok-1\"".to_string())
        );

        cache
            .set("sessionToken", "\"tok-2\"")
            .expect("overwrite should succeed");
        assert_eq!(
            cache.get("sessionToken").expect("get should succeed"),
            Some("\"tok-2\"".to_string())
        );

        cache
            .remove("sessionToken")
            .expect("remove should succeed");
        assert_eq!(cache.get("sessionToken").expect("get should succeed"), None);
    }

    #[test]
    fn remove_of_missing_key_is_a_no_op() {
        let cache = SqliteCacheStore::open_in_memory().expect("cache should open");
        cache
            .remove("does-not-exist")
            .expect("removing a missing key should not error");
    }
}
