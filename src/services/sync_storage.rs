//! Sync key-value storage.
//!
//! Models the host's synced extension storage: a flat map of string keys to
//! JSON values, shared by every signed-in instance with last-writer-wins
//! semantics per key. [`SqliteSyncStorage`] persists to the gittools
//! database and enforces the host's quotas; [`MemorySyncStorage`] keeps
//! everything in process.

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use rusqlite::{params, OptionalExtension};
use serde_json::{Map, Value};

use crate::database::connection::Database;
use crate::types::errors::StorageError;

/// A batch of key/value pairs read from or written to storage.
pub type StorageItems = Map<String, Value>;

/// Maximum size of a single item (key + JSON value), in bytes.
pub const QUOTA_BYTES_PER_ITEM: usize = 8_192;
/// Maximum total size of all items, in bytes.
pub const QUOTA_BYTES: usize = 102_400;

/// Trait defining the sync storage interface.
pub trait SyncStorage {
    /// Returns the subset of `keys` that are present.
    fn get(&self, keys: &[&str]) -> Result<StorageItems, StorageError>;
    fn get_all(&self) -> Result<StorageItems, StorageError>;
    /// Writes all items or none of them.
    fn set(&self, items: StorageItems) -> Result<(), StorageError>;
    fn remove(&self, keys: &[&str]) -> Result<(), StorageError>;
    /// Removes every key.
    fn clear(&self) -> Result<(), StorageError>;
}

/// Byte limits applied on write.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StorageQuota {
    pub bytes_per_item: usize,
    pub total_bytes: usize,
}

impl Default for StorageQuota {
    fn default() -> Self {
        Self {
            bytes_per_item: QUOTA_BYTES_PER_ITEM,
            total_bytes: QUOTA_BYTES,
        }
    }
}

impl StorageQuota {
    pub fn unlimited() -> Self {
        Self {
            bytes_per_item: usize::MAX,
            total_bytes: usize::MAX,
        }
    }
}

fn item_size(key: &str, encoded: &str) -> usize {
    key.len() + encoded.len()
}

/// Sync storage backed by the `sync_storage` table.
pub struct SqliteSyncStorage {
    db: Arc<Database>,
    quota: StorageQuota,
}

impl SqliteSyncStorage {
    pub fn new(db: Arc<Database>) -> Self {
        Self::with_quota(db, StorageQuota::default())
    }

    pub fn with_quota(db: Arc<Database>, quota: StorageQuota) -> Self {
        Self { db, quota }
    }

    /// Total bytes currently stored.
    pub fn bytes_in_use(&self) -> Result<usize, StorageError> {
        let used: i64 = self.db.connection().query_row(
            "SELECT COALESCE(SUM(byte_size), 0) FROM sync_storage",
            [],
            |row| row.get(0),
        )?;
        Ok(used.max(0) as usize)
    }

    fn read_value(&self, key: &str) -> Result<Option<Value>, StorageError> {
        let raw: Option<String> = self
            .db
            .connection()
            .query_row(
                "SELECT value FROM sync_storage WHERE key = ?1",
                params![key],
                |row| row.get(0),
            )
            .optional()?;
        match raw {
            Some(text) => Ok(Some(serde_json::from_str(&text)?)),
            None => Ok(None),
        }
    }
}

impl SyncStorage for SqliteSyncStorage {
    fn get(&self, keys: &[&str]) -> Result<StorageItems, StorageError> {
        let mut items = StorageItems::new();
        for key in keys {
            if let Some(value) = self.read_value(key)? {
                items.insert(key.to_string(), value);
            }
        }
        Ok(items)
    }

    fn get_all(&self) -> Result<StorageItems, StorageError> {
        let conn = self.db.connection();
        let mut stmt = conn.prepare("SELECT key, value FROM sync_storage ORDER BY key")?;
        let rows = stmt.query_map([], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, String>(1)?))
        })?;

        let mut items = StorageItems::new();
        for row in rows {
            let (key, text) = row?;
            items.insert(key, serde_json::from_str(&text)?);
        }
        Ok(items)
    }

    fn set(&self, items: StorageItems) -> Result<(), StorageError> {
        let mut encoded = Vec::with_capacity(items.len());
        for (key, value) in &items {
            let text = serde_json::to_string(value)?;
            let size = item_size(key, &text);
            if size > self.quota.bytes_per_item {
                return Err(StorageError::QuotaExceeded(format!(
                    "item '{}' is {} bytes, limit is {}",
                    key, size, self.quota.bytes_per_item
                )));
            }
            encoded.push((key.as_str(), text, size));
        }

        let conn = self.db.connection();
        let tx = conn.unchecked_transaction()?;

        let written: HashSet<&str> = encoded.iter().map(|(k, _, _)| *k).collect();
        let mut untouched = 0usize;
        {
            let mut stmt = tx.prepare("SELECT key, byte_size FROM sync_storage")?;
            let rows = stmt.query_map([], |row| {
                Ok((row.get::<_, String>(0)?, row.get::<_, i64>(1)?))
            })?;
            for row in rows {
                let (key, size) = row?;
                if !written.contains(key.as_str()) {
                    untouched += size.max(0) as usize;
                }
            }
        }
        let incoming: usize = encoded.iter().map(|(_, _, size)| *size).sum();
        if untouched.saturating_add(incoming) > self.quota.total_bytes {
            return Err(StorageError::QuotaExceeded(format!(
                "{} bytes would exceed the {} byte limit",
                untouched + incoming,
                self.quota.total_bytes
            )));
        }

        let now = chrono::Utc::now().timestamp();
        for (key, text, size) in &encoded {
            tx.execute(
                "INSERT INTO sync_storage (key, value, updated_at, byte_size) VALUES (?1, ?2, ?3, ?4)
                 ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at, byte_size = excluded.byte_size",
                params![key, text, now, *size as i64],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let conn = self.db.connection();
        for key in keys {
            conn.execute("DELETE FROM sync_storage WHERE key = ?1", params![key])?;
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.db.connection().execute("DELETE FROM sync_storage", [])?;
        Ok(())
    }
}

/// In-process storage without quotas.
#[derive(Default)]
pub struct MemorySyncStorage {
    items: Mutex<StorageItems>,
}

impl MemorySyncStorage {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<std::sync::MutexGuard<'_, StorageItems>, StorageError> {
        self.items
            .lock()
            .map_err(|e| StorageError::Unavailable(e.to_string()))
    }
}

impl SyncStorage for MemorySyncStorage {
    fn get(&self, keys: &[&str]) -> Result<StorageItems, StorageError> {
        let items = self.lock()?;
        Ok(keys
            .iter()
            .filter_map(|k| items.get(*k).map(|v| (k.to_string(), v.clone())))
            .collect())
    }

    fn get_all(&self) -> Result<StorageItems, StorageError> {
        Ok(self.lock()?.clone())
    }

    fn set(&self, items: StorageItems) -> Result<(), StorageError> {
        let mut stored = self.lock()?;
        for (key, value) in items {
            stored.insert(key, value);
        }
        Ok(())
    }

    fn remove(&self, keys: &[&str]) -> Result<(), StorageError> {
        let mut stored = self.lock()?;
        for key in keys {
            stored.remove(*key);
        }
        Ok(())
    }

    fn clear(&self) -> Result<(), StorageError> {
        self.lock()?.clear();
        Ok(())
    }
}
