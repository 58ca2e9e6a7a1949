//! Seller and coordinating peer talking over localhost TCP.

use peer_auction::{AuctionEvent, RedbStore};

use crate::common::{TcpCoordinatorPeer, TcpSellerPeer};

#[tokio::test]
async fn test_open_and_close_reach_coordinator() {
    let coordinator = TcpCoordinatorPeer::start().await;
    let seller = TcpSellerPeer::start(RedbStore::open_in_memory().unwrap(), &coordinator).await;

    let sold = seller.dispatcher.execute("sell widget 100").await;
    assert!(sold.is_success());
    assert!(!sold.message.contains("not notified"), "{}", sold.message);

    seller.dispatcher.execute("bid widget 150").await;
    let closed = seller.dispatcher.execute("close widget").await;
    assert_eq!(closed.message, "Winning price is: $150");

    let events = coordinator.handler.events();
    assert_eq!(events.len(), 2);
    assert!(events.iter().all(|e| e.caller == seller.identity.peer_id()));
    assert_eq!(
        events[1].event,
        AuctionEvent::Closed {
            name: "widget".into(),
            price: 150
        }
    );
}

#[tokio::test]
async fn test_stopped_coordinator_does_not_block_seller() {
    let coordinator = TcpCoordinatorPeer::start().await;
    let seller = TcpSellerPeer::start(RedbStore::open_in_memory().unwrap(), &coordinator).await;
    coordinator.stop();
    tokio::time::sleep(std::time::Duration::from_millis(50)).await;

    let sold = seller.dispatcher.execute("sell widget 100").await;

    assert!(sold.is_success());
    assert!(sold.message.contains("Coordinator was not notified"));
    let price = seller
        .dispatcher
        .coordinator()
        .current_price("widget")
        .await
        .unwrap();
    assert_eq!(price, Some(100));
    assert!(coordinator.handler.events().is_empty());
}
