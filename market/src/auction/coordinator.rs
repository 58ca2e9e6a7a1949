//! Auction lifecycle for a single peer.
//!
//! [`AuctionCoordinator`] applies open/bid/close to the peer's own store and,
//! for open and close, then notifies the coordinating peer. The two steps are
//! deliberately decoupled: the store mutation decides the outcome of the
//! operation, and the notification result is reported next to it in the
//! receipt without ever rolling the mutation back.

use tracing::{debug, info, warn};

use super::record::{validate_name, AuctionRecord};
use crate::error::{AuctionError, AuctionResult};
use crate::identity::PeerId;
use crate::protocol::{AckResponse, CloseAuctionRequest, Method, OpenAuctionRequest};
use crate::traits::{KeyValueStore, RpcTransport};

/// Outcome of the best-effort notification that follows an open or close.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NotificationStatus {
    /// The coordinating peer replied `received`.
    Acknowledged,
    /// No coordinating peer is configured.
    Skipped,
    /// The request failed or the reply was not an acknowledgement.
    Failed(String),
}

impl NotificationStatus {
    pub const fn is_acknowledged(&self) -> bool {
        matches!(self, Self::Acknowledged)
    }
}

/// Result of opening an auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpenReceipt {
    pub name: String,
    pub price: u64,
    pub notification: NotificationStatus,
}

/// Result of an accepted bid.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BidReceipt {
    pub name: String,
    /// Price before the bid.
    pub previous: u64,
    /// Price now stored.
    pub price: u64,
}

/// Result of closing an auction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloseReceipt {
    pub name: String,
    pub winning_price: u64,
    pub notification: NotificationStatus,
}

/// Open/bid/close logic over a store and an RPC transport.
///
/// Operations take `&self` but are meant to be driven one at a time: a bid
/// is a read followed by a write with no lock in between, which is sound
/// only because the peer processes a single command at a time.
pub struct AuctionCoordinator<S, T>
where
    S: KeyValueStore,
    T: RpcTransport,
{
    store: S,
    transport: T,
    /// Peer receiving open/close notifications.
    coordinator: Option<PeerId>,
}

impl<S, T> AuctionCoordinator<S, T>
where
    S: KeyValueStore,
    T: RpcTransport,
{
    pub const fn new(store: S, transport: T, coordinator: Option<PeerId>) -> Self {
        Self {
            store,
            transport,
            coordinator,
        }
    }

    pub const fn store(&self) -> &S {
        &self.store
    }

    pub const fn coordinator(&self) -> Option<&PeerId> {
        self.coordinator.as_ref()
    }

    /// Open an auction for `name` at `price`.
    ///
    /// Any existing record for `name` is overwritten without a check, which
    /// resets its price and discards earlier bids. The coordinating peer is
    /// notified once the write has succeeded.
    pub async fn open_auction(&self, name: &str, price: u64) -> AuctionResult<OpenReceipt> {
        validate_name(name)?;

        let record = AuctionRecord::new(name, price);
        self.store.put(name, record.stored_value()).await?;
        info!("Opened auction '{}' at ${}", name, price);

        let notification = self
            .notify(Method::OpenAuction, OpenAuctionRequest::new(name, price).to_bytes())
            .await;

        Ok(OpenReceipt {
            name: record.name,
            price,
            notification,
        })
    }

    /// Place a bid of `price` on `name`.
    ///
    /// Only a strictly higher bid is stored; an equal or lower bid fails with
    /// [`AuctionError::BidTooLow`] and leaves the record untouched. Bids are
    /// local and never sent to other peers.
    pub async fn bid_product(&self, name: &str, price: u64) -> AuctionResult<BidReceipt> {
        validate_name(name)?;

        let current = self
            .read_record(name)
            .await?
            .ok_or_else(|| AuctionError::NotFound(name.to_string()))?;
        debug!("Current price of '{}' is ${}", name, current.price);

        if price <= current.price {
            return Err(AuctionError::BidTooLow {
                offered: price,
                current: current.price,
            });
        }

        let updated = AuctionRecord::new(name, price);
        self.store.put(name, updated.stored_value()).await?;
        info!(
            "Bid on '{}' accepted: ${} -> ${}",
            name, current.price, price
        );

        Ok(BidReceipt {
            name: updated.name,
            previous: current.price,
            price,
        })
    }

    /// Close the auction for `name` at its current price.
    ///
    /// The record is deleted before the coordinating peer is notified; once
    /// deleted it stays deleted whatever the notification outcome. Closing an
    /// unknown name fails with [`AuctionError::NotFound`] and sends nothing.
    pub async fn close_auction(&self, name: &str) -> AuctionResult<CloseReceipt> {
        validate_name(name)?;

        let record = self
            .read_record(name)
            .await?
            .ok_or_else(|| AuctionError::NotFound(name.to_string()))?;

        self.store.delete(name).await?;
        info!("Closed auction '{}', winning price ${}", name, record.price);

        let notification = self
            .notify(
                Method::CloseAuction,
                CloseAuctionRequest::new(name, record.price).to_bytes(),
            )
            .await;

        Ok(CloseReceipt {
            name: record.name,
            winning_price: record.price,
            notification,
        })
    }

    /// Current price of an open auction, if any.
    pub async fn current_price(&self, name: &str) -> AuctionResult<Option<u64>> {
        validate_name(name)?;
        Ok(self.read_record(name).await?.map(|r| r.price))
    }

    async fn read_record(&self, name: &str) -> AuctionResult<Option<AuctionRecord>> {
        self.store
            .get(name)
            .await?
            .map(|value| AuctionRecord::from_stored(name, &value))
            .transpose()
    }

    /// Send one notification and report how it went. Never fails.
    async fn notify(
        &self,
        method: Method,
        payload: AuctionResult<Vec<u8>>,
    ) -> NotificationStatus {
        let Some(peer) = self.coordinator else {
            debug!("No coordinating peer configured, skipping {}", method);
            return NotificationStatus::Skipped;
        };

        let result = async {
            let reply = self
                .transport
                .request(&peer, method.as_str(), payload?)
                .await?;
            let ack = AckResponse::from_bytes(&reply)?;
            if !ack.is_received() {
                return Err(AuctionError::Notification(format!(
                    "Unexpected acknowledgement status '{}'",
                    ack.status
                )));
            }
            Ok::<(), AuctionError>(())
        }
        .await;

        match result {
            Ok(()) => {
                debug!("{} acknowledged by {}", method, peer);
                NotificationStatus::Acknowledged
            }
            Err(e) => {
                warn!("Failed to notify {} of {}: {}", peer, method, e);
                NotificationStatus::Failed(e.to_string())
            }
        }
    }
}
