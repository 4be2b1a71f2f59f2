//! `DIDComm` messaging for a decentralized-identity wallet.
//!
//! This crate provides the part of the wallet that talks to other agents:
//! - Packs, sends and unpacks messages, forwarding through a mediator when
//!   the recipient's endpoint is another DID
//! - Manages the mediation relationship (grant, key-list update, pickup,
//!   acknowledgement)
//! - Streams live deliveries from the mediator to callbacks or actors
//!
//! # Architecture
//!
//! The crate is organized into several modules:
//! - `router`: Pack, send and unpack, with mediator forwarding
//! - `pickup`: Pickup response classification and extraction
//! - `mediation`: The mediator relationship
//! - `transport`: HTTP transport backed by `reqwest`
//! - `store`: In-memory mediator store
//! - `actor`: Callbacks and Actix actor integration for inbound messages
//! - `error`: Error types and handling
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use futures::TryStreamExt;
//! use wallet_didcomm_node::{MediationHandler, Router, RouterConfig};
//! use wallet_didcomm_node::store::InMemoryMediatorStore;
//! use wallet_didcomm_node::transport::{HttpTransport, HttpTransportConfig};
//!
//! async fn example(plugin: Arc<dyn wallet_didcomm_core::DIDCommPlugin>) -> wallet_didcomm_node::Result<()> {
//!     let transport = Arc::new(HttpTransport::new(HttpTransportConfig::default())?);
//!     let router = Arc::new(Router::new(RouterConfig::default(), plugin, transport));
//!     let handler = MediationHandler::new(
//!         "did:peer:mediator",
//!         router,
//!         Arc::new(InMemoryMediatorStore::default()),
//!     );
//!
//!     if handler.boot_registered_mediator().await?.is_none() {
//!         handler.achieve_mediation("did:peer:host").await?;
//!     }
//!
//!     let messages: Vec<_> = handler.pickup_unread_messages(10).try_collect().await?;
//!     let ids: Vec<String> = messages.iter().map(|(_, m)| m.id.clone()).collect();
//!     handler.register_messages_as_read(&ids).await?;
//!     Ok(())
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod actor;
pub mod error;
pub mod mediation;
pub mod pickup;
pub mod router;
pub mod store;
pub mod transport;

#[cfg(test)]
mod mock;

// Re-export main types for convenience
pub use actor::{ActorCallback, InboundMessage, LoggingActor, OnMessageCallback};
pub use error::{Error, Result};
pub use mediation::{MediationHandler, MediationState};
pub use pickup::{PickupResponse, PickupRunner};
pub use router::{Router, RouterConfig};
