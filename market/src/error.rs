/// Domain-specific error types for the auction peer.
#[derive(Debug, thiserror::Error)]
pub enum AuctionError {
    #[error("Product not found: {0}")]
    NotFound(String),

    #[error("Bid of {offered} rejected, current price is {current}")]
    BidTooLow { offered: u64, current: u64 },

    #[error("Invalid command: {0}")]
    InvalidCommand(String),

    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Store operation failed: {0}")]
    Store(String),

    #[error("Corrupt record: {0}")]
    CorruptRecord(String),

    #[error("Notification failed: {0}")]
    Notification(String),

    #[error("Protocol error: {0}")]
    Protocol(String),

    #[error("Serialization failed: {0}")]
    Serialization(String),

    #[error("Cryptographic operation failed: {0}")]
    Crypto(String),

    #[error("Network operation failed: {0}")]
    Network(String),

    #[error("Configuration error: {0}")]
    Config(String),
}

impl AuctionError {
    /// Whether the error is a business-rule rejection rather than a fault.
    ///
    /// Rejections leave the store untouched and are reported to the user
    /// without being logged as failures.
    pub const fn is_rejection(&self) -> bool {
        matches!(
            self,
            Self::NotFound(_) | Self::BidTooLow { .. } | Self::InvalidCommand(_) | Self::Validation(_)
        )
    }
}

/// Convenience type alias.
pub type AuctionResult<T> = Result<T, AuctionError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejections_are_not_faults() {
        assert!(AuctionError::NotFound("ghost".into()).is_rejection());
        assert!(AuctionError::BidTooLow {
            offered: 90,
            current: 100
        }
        .is_rejection());
        assert!(!AuctionError::Store("disk full".into()).is_rejection());
        assert!(!AuctionError::Notification("no route".into()).is_rejection());
    }

    #[test]
    fn test_bid_too_low_message() {
        let err = AuctionError::BidTooLow {
            offered: 90,
            current: 100,
        };
        assert_eq!(err.to_string(), "Bid of 90 rejected, current price is 100");
    }

    #[test]
    fn test_converts_into_anyhow_at_binary_edge() {
        let err: anyhow::Error = AuctionError::Config("bad key".into()).into();
        assert!(matches!(
            err.downcast_ref::<AuctionError>(),
            Some(AuctionError::Config(_))
        ));
    }
}
