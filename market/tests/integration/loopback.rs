//! Seller and coordinating peer over the in-process loopback transport.

use peer_auction::protocol::OpenAuctionRequest;
use peer_auction::{AuctionError, AuctionEvent, KeyValueStore};

use crate::common::LoopbackPeers;

#[tokio::test]
async fn test_sell_bid_close_scenario() {
    let peers = LoopbackPeers::new().await;

    let sold = peers.dispatcher.execute("sell widget 100").await;
    assert!(sold.is_success());

    let low = peers.dispatcher.execute("bid widget 90").await;
    assert!(matches!(low.error, Some(AuctionError::BidTooLow { current: 100, .. })));

    let high = peers.dispatcher.execute("bid widget 150").await;
    assert!(high.is_success());

    let closed = peers.dispatcher.execute("close widget").await;
    assert_eq!(closed.message, "Winning price is: $150");
    assert_eq!(peers.seller_store.get("widget").await.unwrap(), None);

    let events: Vec<AuctionEvent> = peers.handler.events().into_iter().map(|e| e.event).collect();
    assert_eq!(
        events,
        vec![
            AuctionEvent::Opened {
                name: "widget".into(),
                price: "100".into()
            },
            AuctionEvent::Closed {
                name: "widget".into(),
                price: 150
            },
        ]
    );
}

#[tokio::test]
async fn test_events_carry_seller_identity() {
    let peers = LoopbackPeers::new().await;

    peers.dispatcher.execute("sell lamp 25").await;

    let events = peers.handler.events();
    assert_eq!(events.len(), 1);
    assert_eq!(events[0].caller, peers.seller_id);

    let sent = peers.transport.requests_for("openauction").await;
    assert_eq!(sent[0].peer, peers.coordinator_id);
    assert_eq!(
        OpenAuctionRequest::from_bytes(&sent[0].payload).unwrap(),
        OpenAuctionRequest::new("lamp", 25)
    );
}

#[tokio::test]
async fn test_bids_are_not_announced() {
    let peers = LoopbackPeers::new().await;

    peers.dispatcher.execute("sell widget 10").await;
    for price in [20, 30, 40] {
        peers.dispatcher.execute(&format!("bid widget {price}")).await;
    }

    assert_eq!(peers.transport.request_count().await, 1);
    assert_eq!(peers.handler.events().len(), 1);
}

#[tokio::test]
async fn test_close_unknown_product_sends_nothing() {
    let peers = LoopbackPeers::new().await;

    let outcome = peers.dispatcher.execute("close ghost").await;

    assert!(matches!(outcome.error, Some(AuctionError::NotFound(_))));
    assert!(peers.handler.events().is_empty());
}

#[tokio::test]
async fn test_invalid_commands_change_nothing() {
    let peers = LoopbackPeers::new().await;
    let before = peers.seller_store.snapshot().await;

    for line in ["hello", "sell", "bid widget", "close a b", "sell rpc-seed 5"] {
        let outcome = peers.dispatcher.execute(line).await;
        assert!(!outcome.is_success(), "'{line}' should fail");
    }

    assert_eq!(peers.seller_store.snapshot().await, before);
    assert_eq!(peers.transport.request_count().await, 0);
}

#[tokio::test]
async fn test_unreachable_coordinator_keeps_local_state() {
    let peers = LoopbackPeers::new().await;
    peers.transport.set_fail_requests(true).await;

    let sold = peers.dispatcher.execute("sell widget 100").await;
    assert!(sold.is_success());
    assert_eq!(
        peers.seller_store.get_text("widget").await.as_deref(),
        Some("100")
    );

    let closed = peers.dispatcher.execute("close widget").await;
    assert!(closed.is_success());
    assert_eq!(peers.seller_store.get("widget").await.unwrap(), None);
    assert!(peers.handler.events().is_empty());
}
