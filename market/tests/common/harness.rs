//! Two-peer test harness.
//!
//! A seller peer runs the auction coordinator against its own store and
//! notifies a coordinating peer that runs the event handler. The link
//! between them is either an in-process loopback transport or real TCP on
//! localhost.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use peer_auction::mocks::{MockRandom, MockStore, MockTransport};
use peer_auction::{
    bootstrap_identity, AuctionCoordinator, CommandDispatcher, EventHandler, PeerId,
    PeerIdentity, RedbStore, RpcServer, StaticDirectory, TcpRpcClient,
};
use tokio_util::sync::CancellationToken;

/// Seller and coordinating peer wired through [`MockTransport::loopback`].
pub struct LoopbackPeers {
    pub seller_id: PeerId,
    pub coordinator_id: PeerId,
    pub seller_store: MockStore,
    pub transport: MockTransport,
    pub handler: Arc<EventHandler>,
    pub dispatcher: CommandDispatcher<MockStore, MockTransport>,
}

impl LoopbackPeers {
    pub async fn new() -> Self {
        let seller_store = MockStore::new();
        let seller = bootstrap_identity(&seller_store, &MockRandom::new(1))
            .await
            .unwrap();
        let coordinator = bootstrap_identity(&MockStore::new(), &MockRandom::new(100))
            .await
            .unwrap();

        let handler = Arc::new(EventHandler::new());
        let transport = MockTransport::loopback(seller.peer_id(), handler.clone());
        let dispatcher = CommandDispatcher::new(AuctionCoordinator::new(
            seller_store.clone(),
            transport.clone(),
            Some(coordinator.peer_id()),
        ));

        Self {
            seller_id: seller.peer_id(),
            coordinator_id: coordinator.peer_id(),
            seller_store,
            transport,
            handler,
            dispatcher,
        }
    }
}

/// A coordinating peer serving the event handler over TCP.
pub struct TcpCoordinatorPeer {
    pub identity: PeerIdentity,
    pub addr: SocketAddr,
    pub handler: Arc<EventHandler>,
    shutdown: CancellationToken,
}

impl TcpCoordinatorPeer {
    pub async fn start() -> Self {
        let store = RedbStore::open_in_memory().unwrap();
        let identity = bootstrap_identity(&store, &MockRandom::new(200))
            .await
            .unwrap();
        let handler = Arc::new(EventHandler::new());
        let shutdown = CancellationToken::new();

        let server = RpcServer::bind(
            "127.0.0.1:0".parse().unwrap(),
            handler.clone(),
            shutdown.clone(),
            Duration::from_secs(5),
        )
        .await
        .unwrap();
        let addr = server.local_addr().unwrap();
        tokio::spawn(server.run());

        Self {
            identity,
            addr,
            handler,
            shutdown,
        }
    }

    pub fn peer_id(&self) -> PeerId {
        self.identity.peer_id()
    }

    pub fn stop(&self) {
        self.shutdown.cancel();
    }
}

impl Drop for TcpCoordinatorPeer {
    fn drop(&mut self) {
        self.shutdown.cancel();
    }
}

/// Seller peer using a real redb store and TCP client.
pub struct TcpSellerPeer {
    pub identity: PeerIdentity,
    pub dispatcher: CommandDispatcher<RedbStore, TcpRpcClient<StaticDirectory>>,
}

impl TcpSellerPeer {
    pub async fn start(store: RedbStore, coordinator: &TcpCoordinatorPeer) -> Self {
        let identity = bootstrap_identity(&store, &MockRandom::new(1))
            .await
            .unwrap();

        let directory = StaticDirectory::new();
        directory.insert(coordinator.peer_id(), coordinator.addr);
        let client = TcpRpcClient::new(
            identity.rpc_signing_key().clone(),
            Arc::new(directory),
            Duration::from_secs(5),
        );

        let dispatcher = CommandDispatcher::new(AuctionCoordinator::new(
            store,
            client,
            Some(coordinator.peer_id()),
        ));
        Self {
            identity,
            dispatcher,
        }
    }
}
