//! Peer-to-peer RPC over TCP.
//!
//! Each request is one connection: the caller writes a single signed frame
//! and reads a single reply frame. The server verifies the signature before
//! dispatching, so a handler always knows which peer is calling.

pub mod client;
pub mod envelope;
pub mod frame;
pub mod server;

use async_trait::async_trait;

use crate::error::AuctionResult;
use crate::identity::PeerId;

pub use client::TcpRpcClient;
pub use envelope::{RpcReply, RpcRequest, SignedEnvelope};
pub use server::RpcServer;

/// Handler for inbound RPC calls.
#[async_trait]
pub trait RpcService: Send + Sync {
    /// Handle `method` from the verified `caller` and return the reply body.
    ///
    /// An error is sent back to the caller as a remote error.
    async fn call(&self, caller: &PeerId, method: &str, body: &[u8]) -> AuctionResult<Vec<u8>>;
}
