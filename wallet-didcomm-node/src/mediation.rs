//! Mediator relationship management.
//!
//! A [`MediationHandler`] owns the single relationship between this wallet
//! and its mediator. It moves through three states:
//!
//! - `Unbootstrapped`: no mediator known
//! - `Granted`: a mediator accepted us, either just now or in a previous run
//! - `Active`: at least one DID has been registered for routing
//!
//! The mailbox itself lives on the mediator and is polled on demand, or
//! streamed over a websocket with [`MediationHandler::listen_unread_messages`].

use async_stream::try_stream;
use futures::{SinkExt, Stream, StreamExt};
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio_tungstenite::tungstenite::Message as WsMessage;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};
use url::Url;
use uuid::Uuid;
use wallet_didcomm_core::{
    protocols::{
        LiveDeliveryChange, MediationGrant, MediationKeysUpdateList, MediationRequest,
        PickupReceived, PickupRequest,
    },
    Mediator, MediatorStore, Message,
};

use crate::{
    actor::OnMessageCallback,
    error::{Error, Result},
    pickup::PickupRunner,
    router::Router,
};

/// Where the relationship stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MediationState {
    /// No mediator known
    Unbootstrapped,
    /// Mediation granted, nothing registered yet
    Granted,
    /// DIDs registered with the mediator
    Active {
        /// Number of DIDs registered through this handler
        registered_keys: usize,
    },
}

struct Relationship {
    mediator: Mediator,
    registered_keys: usize,
}

/// Manages the relationship with one mediator.
///
/// All state changes go through the internal write lock, so the handler is
/// the only writer of the [`Mediator`] it holds.
pub struct MediationHandler {
    mediator_did: String,
    router: Arc<Router>,
    store: Arc<dyn MediatorStore>,
    relationship: RwLock<Option<Relationship>>,
}

impl MediationHandler {
    /// Creates a handler for the mediator at `mediator_did`.
    #[must_use]
    pub fn new(
        mediator_did: impl Into<String>,
        router: Arc<Router>,
        store: Arc<dyn MediatorStore>,
    ) -> Self {
        Self {
            mediator_did: mediator_did.into(),
            router,
            store,
            relationship: RwLock::new(None),
        }
    }

    /// The mediator DID this handler talks to.
    #[must_use]
    pub fn mediator_did(&self) -> &str {
        &self.mediator_did
    }

    /// The current mediator, if one has been granted.
    pub async fn mediator(&self) -> Option<Mediator> {
        self.relationship
            .read()
            .await
            .as_ref()
            .map(|r| r.mediator.clone())
    }

    /// The current state.
    pub async fn state(&self) -> MediationState {
        match self.relationship.read().await.as_ref() {
            None => MediationState::Unbootstrapped,
            Some(r) if r.registered_keys == 0 => MediationState::Granted,
            Some(r) => MediationState::Active {
                registered_keys: r.registered_keys,
            },
        }
    }

    /// Recovers a previously granted mediator from storage.
    ///
    /// Calling this again once a mediator is held returns that mediator
    /// without touching storage.
    ///
    /// # Errors
    ///
    /// Returns an error if the store fails.
    pub async fn boot_registered_mediator(&self) -> Result<Option<Mediator>> {
        let mut relationship = self.relationship.write().await;
        if let Some(current) = relationship.as_ref() {
            return Ok(Some(current.mediator.clone()));
        }

        let stored = self.store.load_stored_mediator().await?;
        if let Some(mediator) = &stored {
            info!(mediator = %mediator.mediator_did, "Booted registered mediator");
            *relationship = Some(Relationship {
                mediator: mediator.clone(),
                registered_keys: 0,
            });
        }
        Ok(stored)
    }

    /// Asks the mediator to mediate for `host_did`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMediatorAvailable`] if the mediator does not answer
    /// with a grant, and propagates routing and storage errors.
    pub async fn achieve_mediation(&self, host_did: &str) -> Result<Mediator> {
        let mut relationship = self.relationship.write().await;

        let request = MediationRequest {
            from: host_did.to_string(),
            to: self.mediator_did.clone(),
        }
        .make_message()?;

        let response = self
            .router
            .send_and_parse_response(&request)
            .await?
            .ok_or(Error::NoMediatorAvailable)?;

        let grant = MediationGrant::try_from(&response).map_err(|e| {
            debug!("Mediation refused by {}: {e}", self.mediator_did);
            Error::NoMediatorAvailable
        })?;

        let mediator = Mediator {
            id: Uuid::new_v4().to_string(),
            mediator_did: self.mediator_did.clone(),
            host_did: host_did.to_string(),
            routing_did: grant.body.routing_did,
        };
        self.store.store_mediator(&mediator).await?;

        info!(
            mediator = %mediator.mediator_did,
            routing = %mediator.routing_did,
            "Mediation granted"
        );
        *relationship = Some(Relationship {
            mediator: mediator.clone(),
            registered_keys: 0,
        });
        Ok(mediator)
    }

    /// Registers `dids` with the mediator, in order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMediatorAvailable`] without a mediator, and any
    /// delivery failure.
    pub async fn update_key_list_with_dids(&self, dids: &[String]) -> Result<()> {
        let mut relationship = self.relationship.write().await;
        let current = relationship.as_mut().ok_or(Error::NoMediatorAvailable)?;

        let message = MediationKeysUpdateList {
            from: current.mediator.host_did.clone(),
            to: current.mediator.mediator_did.clone(),
            recipient_dids: dids.to_vec(),
        }
        .make_message()?;

        self.router.send(&message).await?;
        current.registered_keys += dids.len();
        debug!("Registered {} DIDs with {}", dids.len(), current.mediator.mediator_did);
        Ok(())
    }

    /// Polls the mediator for up to `limit` queued messages.
    ///
    /// Nothing is sent until the stream is first polled. Each call asks the
    /// mediator for a fresh batch.
    #[must_use = "streams do nothing unless polled"]
    pub fn pickup_unread_messages(
        &self,
        limit: u32,
    ) -> impl Stream<Item = Result<(String, Message)>> + '_ {
        try_stream! {
            let mediator = self.require_mediator().await?;
            let request = pickup_request(mediator, limit)?;

            if let Some(response) = self.router.send_and_parse_response(&request).await? {
                let runner = PickupRunner::new(response, &self.router)?;
                for item in runner.run().await {
                    yield item;
                }
            }
        }
    }

    /// Tells the mediator that `ids` were delivered and can be dropped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NoMediatorAvailable`] without a mediator, and any
    /// delivery failure.
    pub async fn register_messages_as_read(&self, ids: &[String]) -> Result<()> {
        let mediator = self.require_mediator().await?;
        let message = PickupReceived {
            from: mediator.host_did,
            to: mediator.mediator_did,
            message_ids: ids.to_vec(),
        }
        .make_message()?;

        self.router.send(&message).await?;
        Ok(())
    }

    /// Subscribes to live delivery on `endpoint` until `cancel` fires or the
    /// mediator closes the connection.
    ///
    /// Frames that cannot be unpacked or are not pickup responses are logged
    /// and skipped.
    ///
    /// # Errors
    ///
    /// Returns an error without a mediator, for an endpoint that is not
    /// http(s) or ws(s), and for socket failures.
    pub async fn listen_unread_messages(
        &self,
        endpoint: &str,
        callback: &dyn OnMessageCallback,
        cancel: CancellationToken,
    ) -> Result<()> {
        let mediator = self.require_mediator().await?;
        let url = websocket_url(endpoint)?;

        let (socket, _) = tokio_tungstenite::connect_async(url.as_str())
            .await
            .map_err(Box::new)?;
        let (mut sink, mut frames) = socket.split();

        let live = LiveDeliveryChange {
            from: mediator.host_did,
            to: mediator.mediator_did,
            live_delivery: true,
        }
        .make_message()?;
        sink.send(WsMessage::Text(self.router.pack(&live).await?))
            .await
            .map_err(Box::new)?;
        info!("Listening for live delivery on {url}");

        loop {
            tokio::select! {
                () = cancel.cancelled() => {
                    if let Err(e) = sink.close().await {
                        debug!("Error closing live delivery socket: {e}");
                    }
                    break;
                }
                frame = frames.next() => match frame {
                    Some(Ok(WsMessage::Text(text))) => self.handle_frame(&text, callback).await,
                    Some(Ok(WsMessage::Binary(bytes))) => match String::from_utf8(bytes) {
                        Ok(text) => self.handle_frame(&text, callback).await,
                        Err(_) => warn!("Skipping non UTF-8 frame"),
                    },
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    Some(Ok(_)) => {}
                    Some(Err(e)) => return Err(Box::new(e).into()),
                },
            }
        }

        info!("Stopped listening on {url}");
        Ok(())
    }

    async fn handle_frame(&self, frame: &str, callback: &dyn OnMessageCallback) {
        let message = match self.router.unpack(frame).await {
            Ok(message) => message,
            Err(e) => {
                warn!("Skipping frame that failed to unpack: {e}");
                return;
            }
        };

        let runner = match PickupRunner::new(message, &self.router) {
            Ok(runner) => runner,
            Err(e) => {
                warn!("Skipping frame: {e}");
                return;
            }
        };

        for (attachment_id, message) in runner.run().await {
            callback.on_message(attachment_id, message);
        }
    }

    async fn require_mediator(&self) -> Result<Mediator> {
        self.mediator().await.ok_or(Error::NoMediatorAvailable)
    }
}

fn pickup_request(mediator: Mediator, limit: u32) -> Result<Message> {
    let request = PickupRequest {
        from: mediator.host_did,
        to: mediator.mediator_did,
        limit,
    };
    Ok(request.make_message()?)
}

/// Maps an http(s) endpoint to its websocket equivalent.
fn websocket_url(endpoint: &str) -> Result<Url> {
    let mut url = Url::parse(endpoint).map_err(|_| Error::InvalidEndpoint(endpoint.to_string()))?;
    let scheme = match url.scheme() {
        "http" | "ws" => "ws",
        "https" | "wss" => "wss",
        _ => return Err(Error::InvalidEndpoint(endpoint.to_string())),
    };
    url.set_scheme(scheme)
        .map_err(|()| Error::InvalidEndpoint(endpoint.to_string()))?;
    Ok(url)
}
