pub mod auction;
pub mod config;
pub mod discovery;
pub mod error;
pub mod handler;
pub mod identity;
pub mod protocol;
pub mod rpc;
pub mod storage;
pub mod traits;

#[cfg(any(test, feature = "test-support"))]
pub mod mocks;

pub use auction::{
    AuctionCoordinator, AuctionRecord, BidReceipt, CloseReceipt, Command, CommandDispatcher,
    DispatchOutcome, NotificationStatus, OpenReceipt,
};
pub use config::PeerConfig;
pub use discovery::StaticDirectory;
pub use error::{AuctionError, AuctionResult};
pub use handler::{AuctionEvent, EventHandler, InboundEvent};
pub use identity::{bootstrap_identity, PeerId, PeerIdentity};
pub use protocol::{AckResponse, CloseAuctionRequest, Method, OpenAuctionRequest};
pub use rpc::{RpcServer, RpcService, TcpRpcClient};
pub use storage::RedbStore;
pub use traits::{KeyValueStore, PeerDirectory, RandomSource, RpcTransport, ThreadRng};
