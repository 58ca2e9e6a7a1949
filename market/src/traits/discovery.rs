//! Peer discovery abstraction.

use std::net::SocketAddr;

use crate::identity::PeerId;

/// Resolves a peer's public key to a reachable socket address.
///
/// Stands in for DHT lookup; the RPC client consults it before every
/// request so a peer that moves is picked up without restarting.
pub trait PeerDirectory: Send + Sync {
    /// Current address of `peer`, or `None` when the peer is unknown.
    fn resolve(&self, peer: &PeerId) -> Option<SocketAddr>;
}
