//! Mock RPC transport for testing.

use crate::error::{AuctionError, AuctionResult};
use crate::identity::PeerId;
use crate::protocol::AckResponse;
use crate::rpc::RpcService;
use crate::traits::RpcTransport;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// A recorded request for test assertions.
#[derive(Debug, Clone)]
pub struct RecordedRequest {
    pub peer: PeerId,
    pub method: String,
    pub payload: Vec<u8>,
}

/// How the mock answers a request.
#[derive(Clone)]
enum Responder {
    /// Reply `{"status":"received"}`.
    Ack,
    /// Reply with these exact bytes.
    Fixed(Vec<u8>),
    /// Fail as if the peer were unreachable.
    Fail,
    /// Hand the request to a local service, as if it arrived from `caller`.
    Loopback {
        caller: PeerId,
        service: Arc<dyn RpcService>,
    },
}

/// Mock transport recording every request it is asked to make.
///
/// Attempts are recorded whether or not the simulated call succeeds, so a
/// test can tell "not sent" apart from "sent and failed".
#[derive(Clone)]
pub struct MockTransport {
    sent_requests: Arc<RwLock<Vec<RecordedRequest>>>,
    responder: Arc<RwLock<Responder>>,
}

impl MockTransport {
    /// Transport that acknowledges every request.
    pub fn new() -> Self {
        Self::with_responder(Responder::Ack)
    }

    /// Transport that delivers requests straight into `service`.
    pub fn loopback(caller: PeerId, service: Arc<dyn RpcService>) -> Self {
        Self::with_responder(Responder::Loopback { caller, service })
    }

    fn with_responder(responder: Responder) -> Self {
        Self {
            sent_requests: Arc::new(RwLock::new(Vec::new())),
            responder: Arc::new(RwLock::new(responder)),
        }
    }

    /// Set whether requests should fail.
    pub async fn set_fail_requests(&self, fail: bool) {
        *self.responder.write().await = if fail { Responder::Fail } else { Responder::Ack };
    }

    /// Reply to every request with `bytes`.
    pub async fn set_response(&self, bytes: Vec<u8>) {
        *self.responder.write().await = Responder::Fixed(bytes);
    }

    /// Requests made for one method.
    pub async fn requests_for(&self, method: &str) -> Vec<RecordedRequest> {
        self.sent_requests
            .read()
            .await
            .iter()
            .filter(|r| r.method == method)
            .cloned()
            .collect()
    }

    /// Get the number of requests made.
    pub async fn request_count(&self) -> usize {
        self.sent_requests.read().await.len()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RpcTransport for MockTransport {
    async fn request(
        &self,
        peer: &PeerId,
        method: &str,
        payload: Vec<u8>,
    ) -> AuctionResult<Vec<u8>> {
        self.sent_requests.write().await.push(RecordedRequest {
            peer: *peer,
            method: method.to_string(),
            payload: payload.clone(),
        });

        let responder = self.responder.read().await.clone();
        match responder {
            Responder::Ack => AckResponse::received().to_bytes(),
            Responder::Fixed(bytes) => Ok(bytes),
            Responder::Fail => Err(AuctionError::Network(format!(
                "simulated request failure to {peer}"
            ))),
            Responder::Loopback { caller, service } => service
                .call(&caller, method, &payload)
                .await
                .map_err(|e| AuctionError::Notification(format!("Remote error: {e}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::handler::EventHandler;
    use crate::protocol::OpenAuctionRequest;

    fn peer() -> PeerId {
        PeerId::from_bytes([1u8; 32])
    }

    #[tokio::test]
    async fn test_mock_transport_acks_and_records() {
        let transport = MockTransport::new();

        let reply = transport
            .request(&peer(), "openauction", b"{}".to_vec())
            .await
            .unwrap();

        assert!(AckResponse::from_bytes(&reply).unwrap().is_received());
        let requests = transport.requests_for("openauction").await;
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].method, "openauction");
        assert_eq!(requests[0].peer, peer());
    }

    #[tokio::test]
    async fn test_mock_transport_fail_mode_still_records() {
        let transport = MockTransport::new();
        transport.set_fail_requests(true).await;

        let result = transport.request(&peer(), "closeauction", vec![]).await;

        assert!(result.is_err());
        assert_eq!(transport.request_count().await, 1);
    }

    #[tokio::test]
    async fn test_mock_transport_loopback_reaches_handler() {
        let handler = Arc::new(EventHandler::new());
        let transport = MockTransport::loopback(peer(), handler.clone());
        let body = OpenAuctionRequest::new("widget", 100).to_bytes().unwrap();

        let reply = transport
            .request(&PeerId::from_bytes([2u8; 32]), "openauction", body)
            .await
            .unwrap();

        assert!(AckResponse::from_bytes(&reply).unwrap().is_received());
        assert_eq!(handler.events().len(), 1);
        assert_eq!(handler.events()[0].caller, peer());
    }
}
