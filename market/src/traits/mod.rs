//! Trait abstractions for the collaborators an auction peer depends on.
//!
//! The coordinator, bootstrap and RPC client are written against these
//! traits so they can be exercised in tests with the in-memory mocks
//! instead of a database file or a live network.

pub mod discovery;
pub mod random;
pub mod store;
pub mod transport;

// Re-export all traits for crate-internal use.
// The public API surface is controlled by lib.rs re-exports.
pub use discovery::PeerDirectory;
pub use random::{RandomSource, ThreadRng};
pub use store::KeyValueStore;
pub use transport::RpcTransport;
