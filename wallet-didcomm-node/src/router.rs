//! Messaging router.
//!
//! This module provides the [`Router`], which coordinates:
//! - Packing and unpacking through the envelope codec
//! - DID resolution of the recipient
//! - Mediator detection and forward wrapping
//! - Delivery through the transport
//!
//! # Examples
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use wallet_didcomm_core::Message;
//! use wallet_didcomm_node::{Router, RouterConfig};
//! use wallet_didcomm_node::transport::{HttpTransport, HttpTransportConfig};
//!
//! async fn example(plugin: Arc<dyn wallet_didcomm_core::DIDCommPlugin>) -> wallet_didcomm_node::Result<()> {
//!     let transport = HttpTransport::new(HttpTransportConfig::default())?;
//!     let router = Router::new(RouterConfig::default(), plugin, Arc::new(transport));
//!
//!     let message = Message::new("https://didcomm.org/basicmessage/2.0/message", "{}")
//!         .from("did:example:alice")
//!         .to("did:example:bob");
//!
//!     let reply = router.send_and_parse_response(&message).await?;
//!     Ok(())
//! }
//! ```

use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, error};
use wallet_didcomm_core::{
    is_did, pack_message, require_parties, unpack_message, DIDCommPlugin, Direction,
    ForwardMessage, HttpRequest, Message, Service, Transport,
};

use crate::error::{Error, Result};

/// Configuration for a [`Router`].
///
/// # Examples
///
/// ```rust
/// use wallet_didcomm_node::RouterConfig;
///
/// let config = RouterConfig {
///     service_type: "DIDCommMessaging".to_string(),
///     ..Default::default()
/// };
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RouterConfig {
    /// Service type that marks a DIDComm messaging endpoint
    pub service_type: String,

    /// Content type sent with every envelope
    pub content_type: String,
}

impl Default for RouterConfig {
    fn default() -> Self {
        Self {
            service_type: "DIDCommMessaging".to_string(),
            content_type: "application/didcomm-encrypted+json".to_string(),
        }
    }
}

/// Sends and receives `DIDComm` messages.
///
/// The router holds no per-message state; it can be shared behind an `Arc`.
pub struct Router {
    /// The router's configuration
    config: RouterConfig,

    /// DID resolution and envelope codec
    plugin: Arc<dyn DIDCommPlugin>,

    /// Delivery
    transport: Arc<dyn Transport>,
}

impl Router {
    /// Create a new router.
    ///
    /// # Arguments
    ///
    /// * `config` - Configuration for the router
    /// * `plugin` - Plugin providing DID resolution and the envelope codec
    /// * `transport` - Transport used for delivery
    #[must_use]
    pub fn new(
        config: RouterConfig,
        plugin: Arc<dyn DIDCommPlugin>,
        transport: Arc<dyn Transport>,
    ) -> Self {
        Self {
            config,
            plugin,
            transport,
        }
    }

    /// Pack a message into an encrypted envelope.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The message has no recipient or sender
    /// - The codec fails
    pub async fn pack(&self, message: &Message) -> Result<String> {
        Ok(pack_message(message, self.plugin.codec()).await?)
    }

    /// Unpack an envelope into a received message.
    ///
    /// # Errors
    ///
    /// Returns the codec's error unchanged, wrapped in [`Error::Core`].
    pub async fn unpack(&self, envelope: &str) -> Result<Message> {
        Ok(unpack_message(envelope, self.plugin.codec()).await?)
    }

    /// Send a message and return the raw response body.
    ///
    /// The recipient is resolved first. If its messaging endpoint is another
    /// DID, the packed message is wrapped in a forward message and delivered
    /// to that mediator instead. A response status of 400 or above is logged
    /// but its body is still returned.
    ///
    /// # Returns
    ///
    /// The response body, or `None` if it was empty.
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The message has no recipient or sender, or was received
    /// - Resolution of the recipient or the mediator fails
    /// - No messaging service is found
    /// - The mediator itself routes through another DID
    /// - Packing fails
    /// - The transport cannot deliver the request
    pub async fn send(&self, message: &Message) -> Result<Option<Vec<u8>>> {
        let (from, to) = require_parties(message)?;
        if message.direction == Direction::Received {
            return Err(Error::ReceivedMessageResend(message.id.clone()));
        }

        let document = self.plugin.resolver().resolve(to).await?;
        let packed = self.pack(message).await?;
        let service = document
            .find_service(&self.config.service_type)
            .ok_or_else(|| Error::NoValidServiceFound {
                did: Some(to.to_string()),
            })?;

        if let Some(mediator_did) = mediator_did(service) {
            let mediator_uri = self.mediator_endpoint(mediator_did).await?;
            let forward = ForwardMessage::new(to, packed, from, mediator_did);

            debug!(
                sender = %forward.from,
                receiver = %forward.to,
                "Sending forward message with internal message type {}",
                message.piuri
            );

            let packed_forward = self.pack(&forward.make_message()?).await?;
            return self.deliver(&mediator_uri, packed_forward).await;
        }

        debug!(
            sender = %from,
            receiver = %to,
            "Sending message with type {}",
            message.piuri
        );

        self.deliver(&service.service_endpoint.uri, packed).await
    }

    /// Send a message and unpack the response, if there is one.
    ///
    /// Response parsing is best effort: an empty body, the literal `null`,
    /// a non UTF-8 body or an envelope that fails to unpack all yield `None`.
    ///
    /// # Errors
    ///
    /// Returns any error from [`Router::send`].
    pub async fn send_and_parse_response(&self, message: &Message) -> Result<Option<Message>> {
        let Some(bytes) = self.send(message).await? else {
            return Ok(None);
        };

        let Ok(text) = String::from_utf8(bytes) else {
            debug!("Response to {} is not UTF-8", message.id);
            return Ok(None);
        };

        if text.is_empty() || text == "null" {
            return Ok(None);
        }

        match self.unpack(&text).await {
            Ok(response) => Ok(Some(response)),
            Err(e) => {
                debug!("Could not unpack response to {}: {e}", message.id);
                Ok(None)
            }
        }
    }

    /// Returns a reference to the router's configuration.
    #[must_use]
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Returns a reference to the router's plugin.
    #[must_use]
    pub fn plugin(&self) -> &dyn DIDCommPlugin {
        self.plugin.as_ref()
    }

    async fn mediator_endpoint(&self, mediator_did: &str) -> Result<String> {
        let document = self.plugin.resolver().resolve(mediator_did).await?;
        let uri = document
            .find_service(&self.config.service_type)
            .map(|s| s.service_endpoint.uri.clone())
            .ok_or_else(|| Error::NoValidServiceFound {
                did: Some(mediator_did.to_string()),
            })?;

        if is_did(&uri) {
            return Err(Error::UnsupportedMediatorChain {
                mediator: mediator_did.to_string(),
                endpoint: uri,
            });
        }

        Ok(uri)
    }

    async fn deliver(&self, uri: &str, envelope: String) -> Result<Option<Vec<u8>>> {
        let request =
            HttpRequest::post(uri, envelope).header("Content-Type", &self.config.content_type);
        let body_len = request.body.as_ref().map_or(0, String::len);

        let response = self.transport.request(request).await?;
        if response.is_error() {
            error!(
                status = response.status,
                uri,
                body_len,
                "Calling api result in {} error",
                response.status
            );
        }

        Ok((!response.body.is_empty()).then_some(response.body))
    }
}

/// The mediator DID behind `service`, if its endpoint is a DID.
fn mediator_did(service: &Service) -> Option<&str> {
    let uri = service.service_endpoint.uri.as_str();
    is_did(uri).then_some(uri)
}
