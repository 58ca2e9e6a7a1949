//! Open/close notification messages exchanged between peers.
//!
//! Each method has a typed request and shares [`AckResponse`] as its reply.
//! Bodies are UTF-8 JSON. The open request carries its price as a decimal
//! string while the close request carries a number; both shapes are part of
//! the wire contract and are preserved exactly.

use std::fmt;
use std::str::FromStr;

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{AuctionError, AuctionResult};

/// Status every handler replies with.
pub const STATUS_RECEIVED: &str = "received";

/// RPC methods understood by the event handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    OpenAuction,
    CloseAuction,
}

impl Method {
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::OpenAuction => "openauction",
            Self::CloseAuction => "closeauction",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Method {
    type Err = AuctionError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "openauction" => Ok(Self::OpenAuction),
            "closeauction" => Ok(Self::CloseAuction),
            other => Err(AuctionError::Protocol(format!("Unknown method '{other}'"))),
        }
    }
}

/// Announcement that a peer opened an auction.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct OpenAuctionRequest {
    pub name: String,
    /// Opening price, decimal digits.
    pub price: String,
}

impl OpenAuctionRequest {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price: price.to_string(),
        }
    }

    pub fn to_bytes(&self) -> AuctionResult<Vec<u8>> {
        encode(self, "open auction request")
    }

    pub fn from_bytes(data: &[u8]) -> AuctionResult<Self> {
        decode(data, "open auction request")
    }
}

/// Announcement that a peer closed an auction at its winning price.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CloseAuctionRequest {
    pub name: String,
    pub price: u64,
}

impl CloseAuctionRequest {
    pub fn new(name: impl Into<String>, price: u64) -> Self {
        Self {
            name: name.into(),
            price,
        }
    }

    pub fn to_bytes(&self) -> AuctionResult<Vec<u8>> {
        encode(self, "close auction request")
    }

    pub fn from_bytes(data: &[u8]) -> AuctionResult<Self> {
        decode(data, "close auction request")
    }
}

/// Acknowledgement returned for every notification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AckResponse {
    pub status: String,
}

impl AckResponse {
    pub fn received() -> Self {
        Self {
            status: STATUS_RECEIVED.to_string(),
        }
    }

    pub fn is_received(&self) -> bool {
        self.status == STATUS_RECEIVED
    }

    pub fn to_bytes(&self) -> AuctionResult<Vec<u8>> {
        encode(self, "ack response")
    }

    pub fn from_bytes(data: &[u8]) -> AuctionResult<Self> {
        decode(data, "ack response")
    }
}

fn encode<T: Serialize>(value: &T, what: &str) -> AuctionResult<Vec<u8>> {
    serde_json::to_vec(value)
        .map_err(|e| AuctionError::Serialization(format!("Failed to encode {what}: {e}")))
}

fn decode<T: DeserializeOwned>(data: &[u8], what: &str) -> AuctionResult<T> {
    let text = std::str::from_utf8(data)
        .map_err(|e| AuctionError::Protocol(format!("{what} is not UTF-8: {e}")))?;
    serde_json::from_str(text)
        .map_err(|e| AuctionError::Protocol(format!("Malformed {what}: {e}")))
}
