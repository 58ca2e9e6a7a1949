//! Peer state on disk across restarts.

use peer_auction::mocks::MockRandom;
use peer_auction::{bootstrap_identity, RedbStore};

use crate::common::{TcpCoordinatorPeer, TcpSellerPeer};

#[tokio::test]
async fn test_identity_is_stable_across_restarts() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auction.redb");

    let first = {
        let store = RedbStore::open(&path).unwrap();
        bootstrap_identity(&store, &MockRandom::new(1)).await.unwrap()
    };
    let second = {
        let store = RedbStore::open(&path).unwrap();
        bootstrap_identity(&store, &MockRandom::new(50)).await.unwrap()
    };

    assert_eq!(first.peer_id(), second.peer_id());
    assert_eq!(first.discovery_id(), second.discovery_id());
}

#[tokio::test]
async fn test_open_auction_survives_restart() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("auction.redb");
    let coordinator = TcpCoordinatorPeer::start().await;

    {
        let seller = TcpSellerPeer::start(RedbStore::open(&path).unwrap(), &coordinator).await;
        seller.dispatcher.execute("sell widget 100").await;
        seller.dispatcher.execute("bid widget 120").await;
    }

    let seller = TcpSellerPeer::start(RedbStore::open(&path).unwrap(), &coordinator).await;
    let bid = seller.dispatcher.execute("bid widget 110").await;
    assert_eq!(
        bid.message,
        "Bidding...\nCurrent price is: $120\nBidding for less price is not allowed, price is: $120"
    );

    let closed = seller.dispatcher.execute("close widget").await;
    assert_eq!(closed.message, "Winning price is: $120");
}
