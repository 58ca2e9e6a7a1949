//! Configuration for an auction peer.
//!
//! Constants for wire limits and reserved store keys live here alongside
//! [`PeerConfig`], which collects the runtime settings a peer needs to open
//! its store, serve RPC and reach the coordinating peer.

use std::net::SocketAddr;
use std::path::PathBuf;
use std::time::Duration;

use crate::error::{AuctionError, AuctionResult};
use crate::identity::PeerId;

/// Default TCP port for the RPC server.
pub const DEFAULT_PORT: u16 = 40001;

/// Default RPC round-trip timeout in milliseconds.
pub const DEFAULT_RPC_TIMEOUT_MS: u64 = 10_000;

/// Maximum size of a single RPC frame (envelope plus payload).
pub const MAX_FRAME_SIZE: usize = 64 * 1024;

/// Maximum number of inbound events kept in memory by the event handler.
pub const EVENT_LOG_CAPACITY: usize = 256;

/// Store keys owned by identity bootstrap. Never used as product names.
pub mod reserved_keys {
    /// Seed for the discovery key pair.
    pub const DHT_SEED: &str = "dht-seed";
    /// Seed for the RPC key pair.
    pub const RPC_SEED: &str = "rpc-seed";

    /// All reserved keys.
    pub const ALL: [&str; 2] = [DHT_SEED, RPC_SEED];

    /// Whether `key` is reserved for bootstrap state.
    pub fn is_reserved(key: &str) -> bool {
        ALL.contains(&key)
    }
}

/// Environment variable overriding the data directory.
pub const DATA_DIR_ENV: &str = "AUCTION_DATA_DIR";

/// Environment variable overriding the RPC listen address.
pub const LISTEN_ADDR_ENV: &str = "AUCTION_LISTEN_ADDR";

/// Environment variable holding the coordinating peer's public key (hex).
pub const COORDINATOR_KEY_ENV: &str = "AUCTION_COORDINATOR_KEY";

/// Environment variable pointing at the JSON peer directory.
pub const PEERS_FILE_ENV: &str = "AUCTION_PEERS_FILE";

/// Environment variable overriding the RPC timeout.
pub const RPC_TIMEOUT_ENV: &str = "AUCTION_RPC_TIMEOUT_MS";

/// Runtime configuration of a peer.
#[derive(Debug, Clone)]
pub struct PeerConfig {
    /// Directory holding the peer's database.
    pub data_dir: PathBuf,
    /// Address the RPC server binds to.
    pub listen_addr: SocketAddr,
    /// Peer that receives open/close notifications, if any.
    pub coordinator: Option<PeerId>,
    /// JSON file mapping peer keys to socket addresses.
    pub peers_file: Option<PathBuf>,
    /// Upper bound on a single RPC round trip.
    pub rpc_timeout_ms: u64,
}

impl Default for PeerConfig {
    fn default() -> Self {
        Self::for_port(DEFAULT_PORT)
    }
}

impl PeerConfig {
    /// Defaults for a peer listening on `port`.
    ///
    /// The data directory is port-specific so several peers can share a host.
    pub fn for_port(port: u16) -> Self {
        let base_dir = dirs::data_local_dir().unwrap_or_else(|| PathBuf::from("."));
        Self {
            data_dir: base_dir.join(format!("peer-auction-{port}")),
            listen_addr: SocketAddr::from(([127, 0, 0, 1], port)),
            coordinator: None,
            peers_file: None,
            rpc_timeout_ms: DEFAULT_RPC_TIMEOUT_MS,
        }
    }

    /// Apply environment overrides on top of the defaults for `port`.
    pub fn from_env(port: u16) -> AuctionResult<Self> {
        let mut config = Self::for_port(port);

        if let Ok(dir) = std::env::var(DATA_DIR_ENV) {
            config.data_dir = PathBuf::from(dir);
        }
        if let Ok(addr) = std::env::var(LISTEN_ADDR_ENV) {
            config.listen_addr = addr.parse().map_err(|e| {
                AuctionError::Config(format!("Invalid {LISTEN_ADDR_ENV} '{addr}': {e}"))
            })?;
        }
        if let Ok(key) = std::env::var(COORDINATOR_KEY_ENV) {
            config.coordinator = Some(key.parse().map_err(|e| {
                AuctionError::Config(format!("Invalid {COORDINATOR_KEY_ENV}: {e}"))
            })?);
        }
        if let Ok(path) = std::env::var(PEERS_FILE_ENV) {
            config.peers_file = Some(PathBuf::from(path));
        }
        if let Ok(ms) = std::env::var(RPC_TIMEOUT_ENV) {
            config.rpc_timeout_ms = ms.parse().map_err(|e| {
                AuctionError::Config(format!("Invalid {RPC_TIMEOUT_ENV} '{ms}': {e}"))
            })?;
        }

        Ok(config)
    }

    #[must_use]
    pub fn with_data_dir(mut self, dir: PathBuf) -> Self {
        self.data_dir = dir;
        self
    }

    #[must_use]
    pub const fn with_coordinator(mut self, coordinator: PeerId) -> Self {
        self.coordinator = Some(coordinator);
        self
    }

    #[must_use]
    pub fn with_peers_file(mut self, path: PathBuf) -> Self {
        self.peers_file = Some(path);
        self
    }

    #[must_use]
    pub const fn with_rpc_timeout_ms(mut self, ms: u64) -> Self {
        self.rpc_timeout_ms = ms;
        self
    }

    /// Path of the redb database file.
    pub fn database_path(&self) -> PathBuf {
        self.data_dir.join("auction.redb")
    }

    /// RPC timeout as a [`Duration`].
    pub const fn rpc_timeout(&self) -> Duration {
        Duration::from_millis(self.rpc_timeout_ms)
    }
}
