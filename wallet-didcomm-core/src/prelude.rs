//! Prelude module for commonly used types and traits.
//!
//! Import everything from this module with
//! `use wallet_didcomm_core::prelude::*`.
//!
//! # Example
//!
//! ```rust
//! use wallet_didcomm_core::prelude::*;
//!
//! async fn example(codec: &dyn EnvelopeCodec) -> Result<()> {
//!     let message = Message::new("https://didcomm.org/basicmessage/2.0/message", "{}")
//!         .from("did:example:alice")
//!         .to("did:example:bob");
//!
//!     let packed = pack_message(&message, codec).await?;
//!     Ok(())
//! }
//! ```

// Re-export error types
pub use crate::error::{Error, Result};

// Re-export core traits
pub use crate::plugin::{DIDCommPlugin, DIDResolver, EnvelopeCodec, MediatorStore, Transport};

// Re-export message types
pub use crate::message::{Direction, Message};
pub use crate::types::{AttachmentData, AttachmentDescriptor, DIDDocument, Mediator};

// Re-export routing helpers
pub use crate::did::is_did;
pub use crate::forward::ForwardMessage;
pub use crate::protocols::ProtocolType;

// Re-export core functions
pub use crate::pack::{pack_message, unpack_message};
