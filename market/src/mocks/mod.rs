//! Mock implementations for testing.
//!
//! In-memory stand-ins for the store, the RPC transport and the random
//! source, so coordinator and bootstrap logic can be tested without a
//! database file or a network.

pub mod random;
pub mod store;
pub mod transport;

pub use random::MockRandom;
pub use store::{MockStore, MockStoreFailure};
pub use transport::{MockTransport, RecordedRequest};
