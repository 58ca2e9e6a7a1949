//! Mock random source for deterministic testing.

use crate::traits::RandomSource;
use std::sync::atomic::{AtomicU8, Ordering};
use std::sync::Arc;

/// Random source producing a repeatable byte sequence.
///
/// Each call to [`RandomSource::fill_bytes`] fills the buffer with
/// `seed, seed+1, ...` (wrapping) and then bumps the seed, so successive
/// seeds drawn from one instance differ while two instances built with the
/// same seed agree.
#[derive(Debug, Clone)]
pub struct MockRandom {
    next: Arc<AtomicU8>,
}

impl MockRandom {
    pub fn new(seed: u8) -> Self {
        Self {
            next: Arc::new(AtomicU8::new(seed)),
        }
    }
}

impl Default for MockRandom {
    fn default() -> Self {
        Self::new(0)
    }
}

impl RandomSource for MockRandom {
    fn fill_bytes(&self, dest: &mut [u8]) {
        let start = self.next.fetch_add(1, Ordering::SeqCst);
        for (i, byte) in dest.iter_mut().enumerate() {
            *byte = start.wrapping_add(i as u8);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_seed_same_sequence() {
        let a = MockRandom::new(3);
        let b = MockRandom::new(3);

        assert_eq!(a.seed(), b.seed());
        assert_eq!(a.seed(), b.seed());
    }

    #[test]
    fn test_successive_seeds_differ() {
        let rng = MockRandom::new(3);
        assert_ne!(rng.seed(), rng.seed());
    }
}
