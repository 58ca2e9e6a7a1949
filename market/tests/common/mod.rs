pub mod harness;

#[allow(unused_imports)]
pub use harness::{LoopbackPeers, TcpCoordinatorPeer, TcpSellerPeer};
