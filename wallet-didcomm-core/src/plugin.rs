//! Plugin system for DIDComm operations.
//!
//! This module provides the port traits the messaging core consumes. The
//! implementations live outside this workspace: a DID method library, a
//! DIDComm envelope library holding the wallet's keys, an HTTP client and
//! the wallet's storage.
//!
//! # Plugin Architecture
//!
//! - [`DIDResolver`]: For resolving DIDs to DID Documents
//! - [`EnvelopeCodec`]: For encrypting and decrypting message envelopes
//! - [`Transport`]: For request/response delivery
//! - [`MediatorStore`]: For persisting an established mediator
//!
//! Resolver and codec are usually backed by the same DIDComm library, so
//! they can be bundled through the [`DIDCommPlugin`] trait.
//!
//! # Examples
//!
//! ```rust,no_run
//! use wallet_didcomm_core::plugin::{DIDCommPlugin, DIDResolver, EnvelopeCodec};
//! use wallet_didcomm_core::{DIDDocument, Message, Result};
//!
//! struct CustomPlugin;
//!
//! #[async_trait::async_trait]
//! impl DIDResolver for CustomPlugin {
//!     async fn resolve(&self, did: &str) -> Result<DIDDocument> {
//!         todo!()
//!     }
//! }
//!
//! #[async_trait::async_trait]
//! impl EnvelopeCodec for CustomPlugin {
//!     async fn pack_encrypted(&self, message: &Message) -> Result<String> {
//!         todo!()
//!     }
//!
//!     async fn unpack(&self, envelope: &str) -> Result<Message> {
//!         todo!()
//!     }
//! }
//!
//! impl DIDCommPlugin for CustomPlugin {
//!     fn resolver(&self) -> &dyn DIDResolver { self }
//!     fn codec(&self) -> &dyn EnvelopeCodec { self }
//! }
//! ```

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::{DIDDocument, Mediator, Message, Result};

/// Resolves DIDs to DID Documents.
#[async_trait]
pub trait DIDResolver: Send + Sync {
    /// Resolves a DID to its DID Document.
    ///
    /// # Errors
    /// - If the DID is invalid or unknown
    /// - If the DID Document is invalid
    async fn resolve(&self, did: &str) -> Result<DIDDocument>;
}

/// Encrypts messages into transport envelopes and back.
///
/// Implementations may need to fetch key material, so both directions are
/// asynchronous.
#[async_trait]
pub trait EnvelopeCodec: Send + Sync {
    /// Encrypts `message` for its `to` DID, authenticated as its `from` DID.
    ///
    /// # Errors
    /// - If keys cannot be found
    /// - If encryption fails
    async fn pack_encrypted(&self, message: &Message) -> Result<String>;

    /// Decrypts an envelope back into a plaintext message.
    ///
    /// # Errors
    /// - If the envelope is malformed
    /// - If decryption or verification fails
    async fn unpack(&self, envelope: &str) -> Result<Message>;
}

/// Combined interface for DID resolution and envelope handling.
pub trait DIDCommPlugin: Send + Sync {
    /// Gets the DID resolver implementation.
    fn resolver(&self) -> &dyn DIDResolver;

    /// Gets the envelope codec implementation.
    fn codec(&self) -> &dyn EnvelopeCodec;
}

/// HTTP method of a transport request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum HttpMethod {
    /// GET
    Get,
    /// POST
    Post,
}

impl fmt::Display for HttpMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            HttpMethod::Get => f.write_str("GET"),
            HttpMethod::Post => f.write_str("POST"),
        }
    }
}

/// A header or query parameter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyValue {
    /// The key
    pub key: String,
    /// The value
    pub value: String,
}

impl KeyValue {
    /// Creates a pair.
    #[must_use]
    pub fn new(key: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            value: value.into(),
        }
    }
}

/// A request handed to a [`Transport`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    /// The method
    pub method: HttpMethod,
    /// Absolute target URL
    pub url: String,
    /// Query parameters, appended in order
    pub query: Vec<KeyValue>,
    /// Request headers
    pub headers: Vec<KeyValue>,
    /// Request body
    pub body: Option<String>,
}

impl HttpRequest {
    /// A POST of `body` to `url`.
    #[must_use]
    pub fn post(url: impl Into<String>, body: impl Into<String>) -> Self {
        Self {
            method: HttpMethod::Post,
            url: url.into(),
            query: Vec::new(),
            headers: Vec::new(),
            body: Some(body.into()),
        }
    }

    /// Adds a header.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push(KeyValue::new(key, value));
        self
    }
}

/// What a [`Transport`] got back.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct HttpResponse {
    /// HTTP status code
    pub status: u16,
    /// Raw response body
    pub body: Vec<u8>,
}

impl HttpResponse {
    /// Whether `status` is 400 or above.
    #[must_use]
    pub fn is_error(&self) -> bool {
        self.status >= 400
    }
}

/// Performs request/response exchanges.
///
/// A non-success status is not an error at this level; only failures to get
/// any response at all are.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Performs `request`.
    ///
    /// # Errors
    /// - If the connection fails or times out
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Persists the mediator relationship.
#[async_trait]
pub trait MediatorStore: Send + Sync {
    /// Loads the previously granted mediator, if any.
    ///
    /// # Errors
    /// - If the storage backend fails
    async fn load_stored_mediator(&self) -> Result<Option<Mediator>>;

    /// Stores a newly granted mediator.
    ///
    /// # Errors
    /// - If the storage backend fails
    async fn store_mediator(&self, mediator: &Mediator) -> Result<()>;
}
