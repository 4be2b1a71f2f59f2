//! Error types for the wallet-didcomm-node crate.

use thiserror::Error;

/// The main error type for wallet-didcomm-node operations.
#[derive(Error, Debug)]
pub enum Error {
    /// An error from the core crate, including codec and resolver failures.
    #[error("Core error: {0}")]
    Core(#[from] wallet_didcomm_core::Error),

    /// A received message was handed back for sending.
    #[error("Message {0} was received and must be re-wrapped before sending")]
    ReceivedMessageResend(String),

    /// No service advertising DIDComm messaging was found.
    #[error("No valid service found{}", .did.as_ref().map(|d| format!(" for {d}")).unwrap_or_default())]
    NoValidServiceFound {
        /// The DID whose document lacked the service
        did: Option<String>,
    },

    /// The mediator's own endpoint is another DID.
    #[error("Mediator {mediator} routes through {endpoint}; chained mediation is not supported")]
    UnsupportedMediatorChain {
        /// The first mediator
        mediator: String,
        /// Its endpoint, itself a DID
        endpoint: String,
    },

    /// A message of an unexpected protocol type was handed to a runner.
    #[error("Invalid message type {found}, should be {expected}")]
    InvalidMessageType {
        /// The offending type
        found: String,
        /// The accepted alternatives
        expected: String,
    },

    /// No mediator is available, or the mediator refused mediation.
    #[error("No mediator available")]
    NoMediatorAvailable,

    /// An error occurred during HTTP operations.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// An error occurred on the live delivery socket.
    #[error("Websocket error: {0}")]
    Websocket(#[from] Box<tokio_tungstenite::tungstenite::Error>),

    /// An endpoint could not be used.
    #[error("Invalid endpoint {0}")]
    InvalidEndpoint(String),

    /// An error occurred during serialization or deserialization.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// A specialized Result type for wallet-didcomm-node operations.
pub type Result<T> = std::result::Result<T, Error>;
