//! Inbound notification handling on the coordinating peer.
//!
//! [`EventHandler`] is the announcement sink for `openauction` and
//! `closeauction`. It decodes each request, logs it, keeps it in a bounded
//! in-memory log and acknowledges with `{"status":"received"}`. It holds no
//! auction state: it never consults or mutates the local store, never
//! deduplicates, and never checks that a close follows an open.

use std::collections::VecDeque;

use async_trait::async_trait;
use parking_lot::Mutex;
use tracing::{info, warn};

use crate::config::EVENT_LOG_CAPACITY;
use crate::error::{AuctionError, AuctionResult};
use crate::identity::PeerId;
use crate::protocol::{AckResponse, CloseAuctionRequest, Method, OpenAuctionRequest};
use crate::rpc::RpcService;

/// What a remote peer announced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuctionEvent {
    /// A new auction; the price is kept exactly as announced.
    Opened { name: String, price: String },
    /// An auction ended at its winning price.
    Closed { name: String, price: u64 },
}

/// An announcement together with the peer that sent it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundEvent {
    pub caller: PeerId,
    pub event: AuctionEvent,
}

/// Receives open/close notifications from other peers.
pub struct EventHandler {
    events: Mutex<VecDeque<InboundEvent>>,
    capacity: usize,
}

impl EventHandler {
    pub fn new() -> Self {
        Self::with_capacity(EVENT_LOG_CAPACITY)
    }

    /// Handler that remembers at most `capacity` events, dropping the oldest.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            events: Mutex::new(VecDeque::with_capacity(capacity.min(EVENT_LOG_CAPACITY))),
            capacity,
        }
    }

    /// Handle an `openauction` request body.
    pub fn on_open_auction(&self, caller: &PeerId, body: &[u8]) -> AuctionResult<Vec<u8>> {
        let request = OpenAuctionRequest::from_bytes(body)?;
        info!(
            "There is a new auction: {} for price ${}",
            request.name, request.price
        );
        self.record(InboundEvent {
            caller: *caller,
            event: AuctionEvent::Opened {
                name: request.name,
                price: request.price,
            },
        });
        AckResponse::received().to_bytes()
    }

    /// Handle a `closeauction` request body.
    pub fn on_close_auction(&self, caller: &PeerId, body: &[u8]) -> AuctionResult<Vec<u8>> {
        let request = CloseAuctionRequest::from_bytes(body)?;
        info!("Auction closed: {}", request.name);
        self.record(InboundEvent {
            caller: *caller,
            event: AuctionEvent::Closed {
                name: request.name,
                price: request.price,
            },
        });
        AckResponse::received().to_bytes()
    }

    /// Events received so far, oldest first.
    pub fn events(&self) -> Vec<InboundEvent> {
        self.events.lock().iter().cloned().collect()
    }

    fn record(&self, event: InboundEvent) {
        if self.capacity == 0 {
            return;
        }
        let mut events = self.events.lock();
        if events.len() >= self.capacity {
            events.pop_front();
        }
        events.push_back(event);
    }
}

impl Default for EventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl RpcService for EventHandler {
    async fn call(&self, caller: &PeerId, method: &str, body: &[u8]) -> AuctionResult<Vec<u8>> {
        let result = match method.parse::<Method>()? {
            Method::OpenAuction => self.on_open_auction(caller, body),
            Method::CloseAuction => self.on_close_auction(caller, body),
        };
        if let Err(AuctionError::Protocol(reason)) = &result {
            warn!("Rejected {} from {}: {}", method, caller, reason);
        }
        result
    }
}
