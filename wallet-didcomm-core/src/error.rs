//! Error types for the wallet-didcomm-core crate.

use thiserror::Error;

/// Error type for the DIDComm core library
#[derive(Debug, Error)]
pub enum Error {
    /// The message has no recipient DID
    #[error("No DID receiver set on message")]
    NoReceiverSet,
    /// The message has no sender DID
    #[error("No DID sender set on message")]
    NoSenderSet,
    /// Invalid format error
    #[error("Invalid format: {0}")]
    InvalidFormat(String),
    /// Base64 decode error
    #[error("Base64 decode error: {0}")]
    Base64Decode(#[from] base64::DecodeError),
    /// Missing required field
    #[error("Missing required field: {0}")]
    MissingField(&'static str),
    /// The string is not a syntactically valid DID
    #[error("Invalid DID string: {0}")]
    InvalidDid(String),
    /// DID resolution error
    #[error("DID resolution error: {0}")]
    DIDResolution(String),
    /// Serialization error
    #[error(transparent)]
    Serialization(#[from] serde_json::Error),
    /// Encryption error
    #[error("Encryption error: {0}")]
    Encryption(String),
    /// Decryption error
    #[error("Decryption error: {0}")]
    Decryption(String),
    /// Transport error below the request/response abstraction
    #[error("Transport error for {url}: {reason}")]
    Transport {
        /// The target of the failed request
        url: String,
        /// What went wrong
        reason: String,
    },
    /// Persistence error
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Result type for the DIDComm core library
pub type Result<T> = std::result::Result<T, Error>;
