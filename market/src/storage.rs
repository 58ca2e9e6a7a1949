//! redb-backed key-value store for a single peer.
//!
//! One table, `kv`, holds both the identity seeds and the auction records,
//! keyed by name. The database is exclusively owned by its peer process.

use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use redb::{Database, ReadableDatabase, TableDefinition};
use tracing::{debug, info};

use crate::error::{AuctionError, AuctionResult};
use crate::traits::KeyValueStore;

/// key = auction name or seed key, value = raw bytes
const KV_TABLE: TableDefinition<&str, &[u8]> = TableDefinition::new("kv");

fn store_err(context: &str, e: impl std::fmt::Display) -> AuctionError {
    AuctionError::Store(format!("{context}: {e}"))
}

/// Persistent store backed by redb.
#[derive(Clone)]
pub struct RedbStore {
    db: Arc<Database>,
}

impl RedbStore {
    /// Open or create the database at `path`, creating parent directories.
    pub fn open(path: impl AsRef<Path>) -> AuctionResult<Self> {
        let path = path.as_ref();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)
                .map_err(|e| store_err("Failed to create data directory", e))?;
        }
        let db = Database::create(path).map_err(|e| store_err("Failed to open database", e))?;
        info!("Opened store at {}", path.display());
        Self::init(db)
    }

    /// Volatile store for tests.
    pub fn open_in_memory() -> AuctionResult<Self> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())
            .map_err(|e| store_err("Failed to create in-memory database", e))?;
        Self::init(db)
    }

    fn init(db: Database) -> AuctionResult<Self> {
        let write_txn = db
            .begin_write()
            .map_err(|e| store_err("Failed to begin transaction", e))?;
        {
            write_txn
                .open_table(KV_TABLE)
                .map_err(|e| store_err("Failed to create table", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| store_err("Failed to commit", e))?;
        Ok(Self { db: Arc::new(db) })
    }

    fn get_blocking(db: &Database, key: &str) -> AuctionResult<Option<Vec<u8>>> {
        let read_txn = db
            .begin_read()
            .map_err(|e| store_err("Failed to begin read", e))?;
        let table = read_txn
            .open_table(KV_TABLE)
            .map_err(|e| store_err("Failed to open table", e))?;
        let value = table
            .get(key)
            .map_err(|e| store_err("Failed to read value", e))?;
        Ok(value.map(|v| v.value().to_vec()))
    }

    fn put_blocking(db: &Database, key: &str, value: &[u8]) -> AuctionResult<()> {
        let write_txn = db
            .begin_write()
            .map_err(|e| store_err("Failed to begin transaction", e))?;
        {
            let mut table = write_txn
                .open_table(KV_TABLE)
                .map_err(|e| store_err("Failed to open table", e))?;
            table
                .insert(key, value)
                .map_err(|e| store_err("Failed to write value", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| store_err("Failed to commit", e))
    }

    fn delete_blocking(db: &Database, key: &str) -> AuctionResult<()> {
        let write_txn = db
            .begin_write()
            .map_err(|e| store_err("Failed to begin transaction", e))?;
        {
            let mut table = write_txn
                .open_table(KV_TABLE)
                .map_err(|e| store_err("Failed to open table", e))?;
            table
                .remove(key)
                .map_err(|e| store_err("Failed to delete value", e))?;
        }
        write_txn
            .commit()
            .map_err(|e| store_err("Failed to commit", e))
    }

    /// Run a blocking redb call off the async runtime.
    async fn blocking<F, R>(&self, f: F) -> AuctionResult<R>
    where
        F: FnOnce(&Database) -> AuctionResult<R> + Send + 'static,
        R: Send + 'static,
    {
        let db = Arc::clone(&self.db);
        tokio::task::spawn_blocking(move || f(&db))
            .await
            .map_err(|e| store_err("Store task failed", e))?
    }
}

#[async_trait]
impl KeyValueStore for RedbStore {
    async fn get(&self, key: &str) -> AuctionResult<Option<Vec<u8>>> {
        let key = key.to_string();
        self.blocking(move |db| Self::get_blocking(db, &key)).await
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> AuctionResult<()> {
        debug!("put '{}' ({} bytes)", key, value.len());
        let key = key.to_string();
        self.blocking(move |db| Self::put_blocking(db, &key, &value))
            .await
    }

    async fn delete(&self, key: &str) -> AuctionResult<()> {
        debug!("delete '{}'", key);
        let key = key.to_string();
        self.blocking(move |db| Self::delete_blocking(db, &key)).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_put_get_delete() {
        let store = RedbStore::open_in_memory().unwrap();

        assert_eq!(store.get("widget").await.unwrap(), None);
        store.put("widget", b"100".to_vec()).await.unwrap();
        assert_eq!(store.get("widget").await.unwrap(), Some(b"100".to_vec()));

        store.put("widget", b"150".to_vec()).await.unwrap();
        assert_eq!(store.get("widget").await.unwrap(), Some(b"150".to_vec()));

        store.delete("widget").await.unwrap();
        assert_eq!(store.get("widget").await.unwrap(), None);
    }

    #[tokio::test]
    async fn test_delete_missing_key_is_ok() {
        let store = RedbStore::open_in_memory().unwrap();
        store.delete("ghost").await.unwrap();
    }

    #[tokio::test]
    async fn test_values_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("auction.redb");

        {
            let store = RedbStore::open(&path).unwrap();
            store.put("lamp", b"25".to_vec()).await.unwrap();
        }

        let reopened = RedbStore::open(&path).unwrap();
        assert_eq!(reopened.get("lamp").await.unwrap(), Some(b"25".to_vec()));
    }
}
