//! String-keyed blob storage on top of the `kv_store` table.

use super::RepoResult;
use rusqlite::{params, Connection, OptionalExtension};

/// Thin accessor for `kv_store` rows.
pub struct KvStore<'conn> {
    conn: &'conn Connection,
}

impl<'conn> KvStore<'conn> {
    pub fn new(conn: &'conn Connection) -> Self {
        Self { conn }
    }

    /// Returns the stored text for `key`, if any.
    pub fn get(&self, key: &str) -> RepoResult<Option<String>> {
        let value = self
            .conn
            .query_row(
                "SELECT value FROM kv_store WHERE key = ?1;",
                [key],
                |row| row.get::<_, String>(0),
            )
            .optional()?;
        Ok(value)
    }

    /// Inserts or replaces the value stored under `key`.
    pub fn put(&self, key: &str, value: &str) -> RepoResult<()> {
        self.conn.execute(
            "INSERT INTO kv_store (key, value, updated_at)
             VALUES (?1, ?2, (strftime('%s', 'now') * 1000))
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = excluded.updated_at;",
            params![key, value],
        )?;
        Ok(())
    }

    /// Removes `key`. Returns whether a row existed.
    pub fn delete(&self, key: &str) -> RepoResult<bool> {
        let changed = self
            .conn
            .execute("DELETE FROM kv_store WHERE key = ?1;", [key])?;
        Ok(changed > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::KvStore;
    use crate::db::open_db_in_memory;

    #[test]
    fn put_overwrites_and_delete_reports_presence() {
        let conn = open_db_in_memory().unwrap();
        let kv = KvStore::new(&conn);

        assert_eq!(kv.get("k").unwrap(), None);
        kv.put("k", "one").unwrap();
        kv.put("k", "two").unwrap();
        assert_eq!(kv.get("k").unwrap().as_deref(), Some("two"));

        assert!(kv.delete("k").unwrap());
        assert!(!kv.delete("k").unwrap());
    }
}
