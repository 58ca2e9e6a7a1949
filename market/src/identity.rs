//! Peer identity and its one-time bootstrap.
//!
//! A peer owns two 32-byte seeds persisted in its own store: one for the
//! discovery key pair and one for the RPC key pair. They are generated the
//! first time a peer starts and reused forever after. [`bootstrap_identity`]
//! turns them into an immutable [`PeerIdentity`] that is handed to the RPC
//! layer; nothing else reads or writes the seed keys.

use std::fmt;
use std::str::FromStr;

use ed25519_dalek::SigningKey;
use tracing::info;

use crate::config::reserved_keys;
use crate::error::{AuctionError, AuctionResult};
use crate::traits::{KeyValueStore, RandomSource};

/// Public key identifying a peer on the network.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PeerId([u8; 32]);

impl PeerId {
    pub const fn from_bytes(bytes: [u8; 32]) -> Self {
        Self(bytes)
    }

    pub const fn as_bytes(&self) -> &[u8; 32] {
        &self.0
    }

    pub fn to_hex(&self) -> String {
        hex::encode(self.0)
    }
}

impl fmt::Display for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_hex())
    }
}

impl fmt::Debug for PeerId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "PeerId({})", self.to_hex())
    }
}

impl FromStr for PeerId {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bytes = hex::decode(s.trim())
            .map_err(|e| AuctionError::Validation(format!("Invalid peer key hex: {e}")))?;
        let bytes: [u8; 32] = bytes.as_slice().try_into().map_err(|_| {
            AuctionError::Validation(format!(
                "Invalid peer key length: expected 32 bytes, got {}",
                bytes.len()
            ))
        })?;
        Ok(Self(bytes))
    }
}

/// Key material of the local peer, derived from the persisted seeds.
#[derive(Clone)]
pub struct PeerIdentity {
    discovery_key: SigningKey,
    rpc_key: SigningKey,
}

impl PeerIdentity {
    /// Derive both key pairs from their seeds.
    pub fn from_seeds(dht_seed: &[u8; 32], rpc_seed: &[u8; 32]) -> Self {
        Self {
            discovery_key: SigningKey::from_bytes(dht_seed),
            rpc_key: SigningKey::from_bytes(rpc_seed),
        }
    }

    /// Identity other peers use to address this peer's RPC server.
    pub fn peer_id(&self) -> PeerId {
        PeerId(self.rpc_key.verifying_key().to_bytes())
    }

    /// Public key announced to the discovery layer.
    pub fn discovery_id(&self) -> PeerId {
        PeerId(self.discovery_key.verifying_key().to_bytes())
    }

    /// Key used to sign outgoing RPC requests.
    pub const fn rpc_signing_key(&self) -> &SigningKey {
        &self.rpc_key
    }
}

impl fmt::Debug for PeerIdentity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("PeerIdentity")
            .field("peer_id", &self.peer_id())
            .field("discovery_id", &self.discovery_id())
            .finish_non_exhaustive()
    }
}

/// Load the peer's seeds from `store`, generating and persisting any that
/// are missing, and derive the identity from them.
///
/// Existing seeds are never rewritten. A stored seed of the wrong length is
/// reported as [`AuctionError::CorruptRecord`] rather than replaced.
pub async fn bootstrap_identity<S, R>(store: &S, rng: &R) -> AuctionResult<PeerIdentity>
where
    S: KeyValueStore + ?Sized,
    R: RandomSource + ?Sized,
{
    let dht_seed = resolve_seed(store, rng, reserved_keys::DHT_SEED).await?;
    let rpc_seed = resolve_seed(store, rng, reserved_keys::RPC_SEED).await?;

    let identity = PeerIdentity::from_seeds(&dht_seed, &rpc_seed);
    info!(
        "Peer identity ready: rpc key {}, discovery key {}",
        identity.peer_id(),
        identity.discovery_id()
    );
    Ok(identity)
}

async fn resolve_seed<S, R>(store: &S, rng: &R, key: &str) -> AuctionResult<[u8; 32]>
where
    S: KeyValueStore + ?Sized,
    R: RandomSource + ?Sized,
{
    if let Some(existing) = store.get(key).await? {
        return existing.as_slice().try_into().map_err(|_| {
            AuctionError::CorruptRecord(format!(
                "Seed '{key}' has {} bytes, expected 32",
                existing.len()
            ))
        });
    }

    let seed = rng.seed();
    store.put(key, seed.to_vec()).await?;
    info!("Generated new seed '{}'", key);
    Ok(seed)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mocks::{MockRandom, MockStore};

    #[tokio::test]
    async fn test_bootstrap_generates_and_persists_seeds() {
        let store = MockStore::new();
        let rng = MockRandom::new(7);

        let identity = bootstrap_identity(&store, &rng).await.unwrap();

        let dht_seed = store.get(reserved_keys::DHT_SEED).await.unwrap().unwrap();
        let rpc_seed = store.get(reserved_keys::RPC_SEED).await.unwrap().unwrap();
        assert_eq!(dht_seed.len(), 32);
        assert_eq!(rpc_seed.len(), 32);
        assert_ne!(dht_seed, rpc_seed);
        assert_ne!(identity.peer_id(), identity.discovery_id());
    }

    #[tokio::test]
    async fn test_bootstrap_reuses_existing_seeds() {
        let store = MockStore::new();

        let first = bootstrap_identity(&store, &MockRandom::new(1)).await.unwrap();
        let writes_after_first = store.write_count();

        // A different RNG must not matter once the seeds exist.
        let second = bootstrap_identity(&store, &MockRandom::new(2)).await.unwrap();

        assert_eq!(first.peer_id(), second.peer_id());
        assert_eq!(first.discovery_id(), second.discovery_id());
        assert_eq!(store.write_count(), writes_after_first);
    }

    #[tokio::test]
    async fn test_bootstrap_rejects_truncated_seed() {
        let store = MockStore::new();
        store
            .put(reserved_keys::RPC_SEED, vec![1, 2, 3])
            .await
            .unwrap();

        let result = bootstrap_identity(&store, &MockRandom::new(1)).await;

        assert!(matches!(result, Err(AuctionError::CorruptRecord(_))));
        assert_eq!(
            store.get(reserved_keys::RPC_SEED).await.unwrap(),
            Some(vec![1, 2, 3])
        );
    }

    #[test]
    fn test_peer_id_hex_round_trip() {
        let identity = PeerIdentity::from_seeds(&[1u8; 32], &[2u8; 32]);
        let id = identity.peer_id();

        let parsed: PeerId = id.to_hex().parse().unwrap();
        assert_eq!(parsed, id);
        assert_eq!(id.to_hex().len(), 64);
    }

    #[test]
    fn test_peer_id_rejects_bad_input() {
        assert!("not-hex".parse::<PeerId>().is_err());
        assert!("abcd".parse::<PeerId>().is_err());
    }

    #[test]
    fn test_same_seeds_same_identity() {
        let a = PeerIdentity::from_seeds(&[9u8; 32], &[8u8; 32]);
        let b = PeerIdentity::from_seeds(&[9u8; 32], &[8u8; 32]);
        assert_eq!(a.peer_id(), b.peer_id());
    }
}
