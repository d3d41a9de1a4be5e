use rusqlite::Connection;

use crate::db;
use crate::store::StoreError;

/// String-keyed blob storage the record store sits on.
///
/// Reads of a missing key return `None`; writes replace the whole value.
pub trait KvBackend {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
    fn remove(&mut self, key: &str) -> Result<(), StoreError>;

    /// Apply a batch of sets (`Some`) and removals (`None`) as one unit:
    /// either every entry lands or none does.
    fn replace_all(&mut self, entries: &[(&str, Option<&str>)]) -> Result<(), StoreError>;
}

/// Backend over the workspace SQLite file.
pub struct SqliteKv {
    conn: Connection,
}

impl SqliteKv {
    pub fn new(conn: Connection) -> Self {
        Self { conn }
    }
}

impl KvBackend for SqliteKv {
    fn get(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(db::kv_get(&self.conn, key)?)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        Ok(db::kv_set(&self.conn, key, value)?)
    }

    fn remove(&mut self, key: &str) -> Result<(), StoreError> {
        Ok(db::kv_remove(&self.conn, key)?)
    }

    fn replace_all(&mut self, entries: &[(&str, Option<&str>)]) -> Result<(), StoreError> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            match value {
                Some(v) => db::kv_set(&tx, key, v)?,
                None => db::kv_remove(&tx, key)?,
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
pub use memory::MemoryKv;
