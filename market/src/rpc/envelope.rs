use bincode::Options;
use ed25519_dalek::{Signer, Verifier};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::config::MAX_FRAME_SIZE;
use crate::error::{AuctionError, AuctionResult};
use crate::identity::PeerId;

/// Bincode options shared by every RPC structure, with a size limit so a
/// crafted length cannot trigger a huge allocation.
fn bincode_options() -> impl Options {
    bincode::options().with_limit(MAX_FRAME_SIZE as u64)
}

fn encode<T: Serialize>(value: &T, what: &str) -> AuctionResult<Vec<u8>> {
    bincode_options()
        .serialize(value)
        .map_err(|e| AuctionError::Serialization(format!("Failed to serialize {what}: {e}")))
}

fn decode<T: DeserializeOwned>(data: &[u8], what: &str) -> AuctionResult<T> {
    bincode_options()
        .deserialize(data)
        .map_err(|e| AuctionError::Protocol(format!("Failed to deserialize {what}: {e}")))
}

/// A method call carried inside a [`SignedEnvelope`].
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct RpcRequest {
    pub method: String,
    pub body: Vec<u8>,
}

impl RpcRequest {
    pub fn new(method: impl Into<String>, body: Vec<u8>) -> Self {
        Self {
            method: method.into(),
            body,
        }
    }

    pub fn to_bytes(&self) -> AuctionResult<Vec<u8>> {
        encode(self, "rpc request")
    }

    pub fn from_bytes(data: &[u8]) -> AuctionResult<Self> {
        decode(data, "rpc request")
    }
}

/// Server reply: the handler's body or the error it raised.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub enum RpcReply {
    Ok(Vec<u8>),
    Err(String),
}

impl RpcReply {
    pub fn to_bytes(&self) -> AuctionResult<Vec<u8>> {
        encode(self, "rpc reply")
    }

    pub fn from_bytes(data: &[u8]) -> AuctionResult<Self> {
        decode(data, "rpc reply")
    }

    /// Turn a remote error into [`AuctionError::Notification`].
    pub fn into_result(self) -> AuctionResult<Vec<u8>> {
        match self {
            Self::Ok(body) => Ok(body),
            Self::Err(message) => Err(AuctionError::Notification(format!(
                "Remote error: {message}"
            ))),
        }
    }
}

/// Signed wrapper around every RPC request.
///
/// The sender signs `payload` with its RPC key; the receiver verifies the
/// signature before decoding the payload, and treats `signer` as the
/// caller's [`PeerId`].
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct SignedEnvelope {
    /// Bincode-serialized [`RpcRequest`].
    pub payload: Vec<u8>,
    /// Ed25519 verifying key bytes of the sender.
    pub signer: [u8; 32],
    /// Ed25519 signature over `payload` (64 bytes).
    pub signature: Vec<u8>,
}

impl SignedEnvelope {
    pub fn sign(payload: Vec<u8>, signing_key: &ed25519_dalek::SigningKey) -> Self {
        let signature = signing_key.sign(&payload);
        Self {
            payload,
            signer: signing_key.verifying_key().to_bytes(),
            signature: signature.to_bytes().to_vec(),
        }
    }

    /// Decode an envelope, check its signature and return the payload with
    /// the signer's identity.
    pub fn verify_and_unwrap(data: &[u8]) -> AuctionResult<(Vec<u8>, PeerId)> {
        let envelope: Self = decode(data, "signed envelope")?;

        let verifying_key = ed25519_dalek::VerifyingKey::from_bytes(&envelope.signer)
            .map_err(|e| AuctionError::Crypto(format!("Invalid signer public key: {e}")))?;
        let sig_bytes: [u8; 64] = envelope.signature.as_slice().try_into().map_err(|_| {
            AuctionError::Crypto(format!(
                "Invalid signature length: expected 64, got {}",
                envelope.signature.len()
            ))
        })?;
        let signature = ed25519_dalek::Signature::from_bytes(&sig_bytes);
        verifying_key
            .verify(&envelope.payload, &signature)
            .map_err(|e| AuctionError::Crypto(format!("Signature verification failed: {e}")))?;

        Ok((envelope.payload, PeerId::from_bytes(envelope.signer)))
    }

    pub fn to_bytes(&self) -> AuctionResult<Vec<u8>> {
        encode(self, "signed envelope")
    }
}
