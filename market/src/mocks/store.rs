//! Mock key-value store for testing.

use crate::error::{AuctionError, AuctionResult};
use crate::traits::KeyValueStore;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

/// Types of failures that can be simulated.
#[derive(Debug, Clone)]
pub enum MockStoreFailure {
    /// Fail all operations.
    All,
    /// Fail only reads.
    Reads,
    /// Fail only puts and deletes.
    Writes,
    /// Fail any operation touching this key.
    OnKey(String),
}

#[derive(Debug, Default)]
struct MockStoreInner {
    entries: RwLock<HashMap<String, Vec<u8>>>,
    fail_mode: RwLock<Option<MockStoreFailure>>,
    /// Successful puts and deletes.
    writes: AtomicU64,
}

/// In-memory store shared between clones.
#[derive(Debug, Clone, Default)]
pub struct MockStore {
    inner: Arc<MockStoreInner>,
}

impl MockStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set failure mode for testing error handling.
    pub async fn set_fail_mode(&self, mode: Option<MockStoreFailure>) {
        *self.inner.fail_mode.write().await = mode;
    }

    /// Number of successful writes (puts and deletes) so far.
    pub fn write_count(&self) -> u64 {
        self.inner.writes.load(Ordering::SeqCst)
    }

    /// Copy of every stored entry.
    pub async fn snapshot(&self) -> HashMap<String, Vec<u8>> {
        self.inner.entries.read().await.clone()
    }

    /// Stored value decoded as text, for asserting on prices.
    pub async fn get_text(&self, key: &str) -> Option<String> {
        self.inner
            .entries
            .read()
            .await
            .get(key)
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }

    async fn check(&self, is_write: bool, key: &str) -> AuctionResult<()> {
        let mode = self.inner.fail_mode.read().await;
        let fail = match &*mode {
            None => false,
            Some(MockStoreFailure::All) => true,
            Some(MockStoreFailure::Reads) => !is_write,
            Some(MockStoreFailure::Writes) => is_write,
            Some(MockStoreFailure::OnKey(k)) => k == key,
        };
        if fail {
            let op = if is_write { "write" } else { "read" };
            return Err(AuctionError::Store(format!(
                "MockStore: simulated {op} failure on '{key}'"
            )));
        }
        Ok(())
    }
}

#[async_trait]
impl KeyValueStore for MockStore {
    async fn get(&self, key: &str) -> AuctionResult<Option<Vec<u8>>> {
        self.check(false, key).await?;
        Ok(self.inner.entries.read().await.get(key).cloned())
    }

    async fn put(&self, key: &str, value: Vec<u8>) -> AuctionResult<()> {
        self.check(true, key).await?;
        self.inner.entries.write().await.insert(key.to_string(), value);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    async fn delete(&self, key: &str) -> AuctionResult<()> {
        self.check(true, key).await?;
        self.inner.entries.write().await.remove(key);
        self.inner.writes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
