use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use ed25519_dalek::SigningKey;
use tokio::net::TcpStream;
use tracing::debug;

use super::envelope::{RpcReply, RpcRequest, SignedEnvelope};
use super::frame::{read_frame, write_frame};
use crate::error::{AuctionError, AuctionResult};
use crate::identity::PeerId;
use crate::traits::{PeerDirectory, RpcTransport};

/// [`RpcTransport`] over TCP, one connection per request.
///
/// Requests are signed with the local RPC key and the whole round trip is
/// bounded by `timeout`.
pub struct TcpRpcClient<D: PeerDirectory> {
    signing_key: SigningKey,
    directory: Arc<D>,
    timeout: Duration,
}

impl<D: PeerDirectory> TcpRpcClient<D> {
    pub const fn new(signing_key: SigningKey, directory: Arc<D>, timeout: Duration) -> Self {
        Self {
            signing_key,
            directory,
            timeout,
        }
    }

    async fn round_trip(&self, peer: &PeerId, frame: &[u8]) -> AuctionResult<Vec<u8>> {
        let addr = self
            .directory
            .resolve(peer)
            .ok_or_else(|| AuctionError::Network(format!("No address known for peer {peer}")))?;

        let mut stream = TcpStream::connect(addr)
            .await
            .map_err(|e| AuctionError::Network(format!("Failed to connect to {addr}: {e}")))?;
        write_frame(&mut stream, frame).await?;
        let reply = read_frame(&mut stream).await?;
        RpcReply::from_bytes(&reply)?.into_result()
    }
}

#[async_trait]
impl<D: PeerDirectory> RpcTransport for TcpRpcClient<D> {
    async fn request(
        &self,
        peer: &PeerId,
        method: &str,
        payload: Vec<u8>,
    ) -> AuctionResult<Vec<u8>> {
        let request = RpcRequest::new(method, payload).to_bytes()?;
        let frame = SignedEnvelope::sign(request, &self.signing_key).to_bytes()?;
        debug!("Sending '{}' to {}", method, peer);

        tokio::time::timeout(self.timeout, self.round_trip(peer, &frame))
            .await
            .map_err(|_| {
                AuctionError::Network(format!(
                    "Request '{method}' to {peer} timed out after {:?}",
                    self.timeout
                ))
            })?
    }
}
