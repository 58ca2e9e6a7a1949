//! Static peer directory.
//!
//! Maps peer public keys to socket addresses. Loaded from a JSON object of
//! the form `{"<hex key>": "127.0.0.1:40001"}` or filled in code.

use std::collections::HashMap;
use std::net::SocketAddr;
use std::path::Path;

use parking_lot::RwLock;
use tracing::{debug, info};

use crate::error::{AuctionError, AuctionResult};
use crate::identity::PeerId;
use crate::traits::PeerDirectory;

#[derive(Debug, Default)]
pub struct StaticDirectory {
    peers: RwLock<HashMap<PeerId, SocketAddr>>,
}

impl StaticDirectory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a directory from a JSON file.
    pub fn from_file(path: impl AsRef<Path>) -> AuctionResult<Self> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|e| {
            AuctionError::Config(format!("Failed to read peers file {}: {e}", path.display()))
        })?;
        let directory = Self::from_json(&text)?;
        info!(
            "Loaded {} peer(s) from {}",
            directory.len(),
            path.display()
        );
        Ok(directory)
    }

    /// Parse a directory from its JSON form.
    pub fn from_json(text: &str) -> AuctionResult<Self> {
        let raw: HashMap<String, String> = serde_json::from_str(text)
            .map_err(|e| AuctionError::Config(format!("Malformed peers file: {e}")))?;

        let mut peers = HashMap::with_capacity(raw.len());
        for (key, addr) in raw {
            let peer: PeerId = key.parse()?;
            let addr: SocketAddr = addr.parse().map_err(|e| {
                AuctionError::Config(format!("Invalid address '{addr}' for peer {key}: {e}"))
            })?;
            peers.insert(peer, addr);
        }
        Ok(Self {
            peers: RwLock::new(peers),
        })
    }

    /// Add or replace the address of `peer`.
    pub fn insert(&self, peer: PeerId, addr: SocketAddr) {
        debug!("Directory: {} -> {}", peer, addr);
        self.peers.write().insert(peer, addr);
    }

    pub fn len(&self) -> usize {
        self.peers.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.peers.read().is_empty()
    }
}

impl PeerDirectory for StaticDirectory {
    fn resolve(&self, peer: &PeerId) -> Option<SocketAddr> {
        self.peers.read().get(peer).copied()
    }
}
