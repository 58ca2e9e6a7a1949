//! Durable keyed store abstraction.

use async_trait::async_trait;

use crate::error::AuctionResult;

/// Keyed get/put/delete over byte values.
///
/// Implementations fail only on underlying I/O faults; a missing key is
/// `Ok(None)` rather than an error. Callers never retry a failed call.
#[async_trait]
pub trait KeyValueStore: Send + Sync {
    /// Read the value stored under `key`.
    async fn get(&self, key: &str) -> AuctionResult<Option<Vec<u8>>>;

    /// Write `value` under `key`, replacing any previous value.
    async fn put(&self, key: &str, value: Vec<u8>) -> AuctionResult<()>;

    /// Remove `key`. Removing a missing key is not an error.
    async fn delete(&self, key: &str) -> AuctionResult<()>;
}
