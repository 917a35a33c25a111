use rusqlite::{Connection, OptionalExtension, Result as SqlResult, params};
use std::path::Path;

/// Every persisted slot the client reads or writes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StorageKey {
    UserCity,
    UserBirthDatetime,
    UserCoordinates,
    UserPortrait,
    DailyInsight,
}

impl StorageKey {
    #[cfg(test)]
    pub const ALL: [StorageKey; 5] = [
        StorageKey::UserCity,
        StorageKey::UserBirthDatetime,
        StorageKey::UserCoordinates,
        StorageKey::UserPortrait,
        StorageKey::DailyInsight,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            StorageKey::UserCity => "user_city",
            StorageKey::UserBirthDatetime => "user_birth_datetime",
            StorageKey::UserCoordinates => "user_coordinates",
            StorageKey::UserPortrait => "user_portrait",
            StorageKey::DailyInsight => "user_daily_insight",
        }
    }
}

/// String-valued slot table backed by SQLite.
pub struct KeyValueStore {
    conn: Connection,
}

impl KeyValueStore {
    /// Open the store at a file path, creating the table if needed.
    pub fn with_path<P: AsRef<Path>>(path: P) -> SqlResult<Self> {
        let store = Self {
            conn: Connection::open(path)?,
        };
        store.init_schema()?;
        Ok(store)
    }

    #[cfg(test)]
    pub fn in_memory() -> SqlResult<Self> {
        let store = Self {
            conn: Connection::open_in_memory()?,
        };
        store.init_schema()?;
        Ok(store)
    }

    /// Remove the slot table so every later read and write fails.
    #[cfg(test)]
    pub fn break_storage(&self) {
        self.conn.execute("DROP TABLE kv_slots", []).unwrap();
    }

    fn init_schema(&self) -> SqlResult<()> {
        self.conn.execute(
            "CREATE TABLE IF NOT EXISTS kv_slots (
                key TEXT PRIMARY KEY,
                value TEXT NOT NULL,
                updated_at INTEGER NOT NULL DEFAULT (strftime('%s', 'now'))
            )",
            [],
        )?;
        Ok(())
    }

    pub fn get(&self, key: StorageKey) -> SqlResult<Option<String>> {
        self.conn
            .query_row(
                "SELECT value FROM kv_slots WHERE key = ?1",
                params![key.as_str()],
                |row| row.get(0),
            )
            .optional()
    }

    /// Read several slots at once; missing slots come back as `None`.
    pub fn get_many<const N: usize>(&self, keys: [StorageKey; N]) -> SqlResult<[Option<String>; N]> {
        let mut values: [Option<String>; N] = std::array::from_fn(|_| None);
        for (slot, key) in values.iter_mut().zip(keys) {
            *slot = self.get(key)?;
        }
        Ok(values)
    }

    /// Insert or overwrite a slot.
    pub fn set(&self, key: StorageKey, value: &str) -> SqlResult<()> {
        self.conn.execute(
            "INSERT OR REPLACE INTO kv_slots (key, value, updated_at)
             VALUES (?1, ?2, strftime('%s', 'now'))",
            params![key.as_str(), value],
        )?;
        Ok(())
    }

    /// Write several slots atomically.
    pub fn set_many(&mut self, entries: &[(StorageKey, &str)]) -> SqlResult<()> {
        let tx = self.conn.transaction()?;
        for (key, value) in entries {
            tx.execute(
                "INSERT OR REPLACE INTO kv_slots (key, value, updated_at)
                 VALUES (?1, ?2, strftime('%s', 'now'))",
                params![key.as_str(), value],
            )?;
        }
        tx.commit()
    }
}
