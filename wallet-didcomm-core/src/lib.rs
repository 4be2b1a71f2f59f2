//! Core `DIDComm` v2 messaging types for a decentralized-identity wallet.
//!
//! This crate provides the value types and port contracts the wallet's
//! messaging core is built on, including the message model, DID syntax,
//! forward message construction and the protocol messages used for mediation
//! and pickup.
//!
//! # Features
//!
//! - Plaintext message and attachment model
//! - DID syntax predicate deciding direct vs. mediated delivery
//! - Ports for:
//!   - DID resolution
//!   - Envelope encryption and decryption
//!   - Request/response transport
//!   - Mediator persistence
//! - Forward message builder
//! - Coordinate-mediation and message-pickup message builders
//!
//! # Architecture
//!
//! The crate is organized into these main modules:
//! - `message`: The plaintext message type
//! - `types`: Attachments, DID Documents and the mediator record
//! - `did`: DID syntax
//! - `plugin`: Port traits implemented by collaborators
//! - `pack`: Precondition-checked packing and unpacking
//! - `forward`: Forward message builder
//! - `protocols`: Protocol constants and message builders
//! - `error`: Error types and handling
//!
//! # Examples
//!
//! ```rust,no_run
//! use wallet_didcomm_core::{pack_message, unpack_message, EnvelopeCodec, Message};
//!
//! async fn example(codec: &dyn EnvelopeCodec) -> wallet_didcomm_core::Result<()> {
//!     let message = Message::new("https://didcomm.org/basicmessage/2.0/message", "{}")
//!         .from("did:example:alice")
//!         .to("did:example:bob");
//!
//!     let packed = pack_message(&message, codec).await?;
//!     let unpacked = unpack_message(&packed, codec).await?;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod did;
pub mod error;
pub mod forward;
pub mod message;
pub mod pack;
pub mod plugin;
pub mod prelude;
pub mod protocols;
pub mod types;


pub use did::{is_did, Did};
pub use error::{Error, Result};
pub use forward::ForwardMessage;
pub use message::{Direction, Message};
pub use pack::{pack_message, require_parties, unpack_message};
pub use plugin::{
    DIDCommPlugin, DIDResolver, EnvelopeCodec, HttpMethod, HttpRequest, HttpResponse, KeyValue,
    MediatorStore, Transport,
};
pub use protocols::ProtocolType;
pub use types::{
    AttachmentData, AttachmentDescriptor, DIDDocument, Mediator, Service, ServiceEndpoint,
};
