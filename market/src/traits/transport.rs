//! Request/response RPC abstraction for testable network operations.

use async_trait::async_trait;

use crate::error::AuctionResult;
use crate::identity::PeerId;

/// Abstraction over a request/response channel keyed by method name.
///
/// Peers are addressed by public key; resolving a key to a network address
/// is the implementation's concern. Payloads are opaque bytes in both
/// directions.
#[async_trait]
pub trait RpcTransport: Send + Sync {
    /// Invoke `method` on `peer` with `payload` and wait for the reply body.
    ///
    /// Errors cover an unreachable peer, a timeout, a malformed reply and an
    /// error raised by the remote handler.
    async fn request(&self, peer: &PeerId, method: &str, payload: Vec<u8>)
        -> AuctionResult<Vec<u8>>;
}
