//! The persisted auction record: product name mapped to its current price.
//!
//! The price is stored as its decimal text, so the store holds values such
//! as `b"150"`. A key that is present means the auction is open.

use crate::config::reserved_keys;
use crate::error::{AuctionError, AuctionResult};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuctionRecord {
    pub name: String,
    pub price: u64,
}

impl AuctionRecord {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    /// Decode a stored value read under `name`.
    pub fn from_stored(name: &str, value: &[u8]) -> AuctionResult<Self> {
        let price = std::str::from_utf8(value)
            .ok()
            .and_then(|text| text.trim().parse::<u64>().ok())
            .ok_or_else(|| {
                AuctionError::CorruptRecord(format!(
                    "Stored price for '{name}' is not a non-negative integer"
                ))
            })?;
        Ok(Self::new(name, price))
    }

    /// Bytes written to the store.
    pub fn stored_value(&self) -> Vec<u8> {
        self.price.to_string().into_bytes()
    }
}

/// Check that `name` can be used as a store key for a product.
pub fn validate_name(name: &str) -> AuctionResult<()> {
    if name.trim().is_empty() {
        return Err(AuctionError::Validation("Product name must not be empty".into()));
    }
    if reserved_keys::is_reserved(name) {
        return Err(AuctionError::Validation(format!(
            "'{name}' is reserved and cannot be auctioned"
        )));
    }
    Ok(())
}
