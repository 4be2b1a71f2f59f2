//! Protocol message types used for routing, mediation and pickup.

use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    Message,
};

/// Well-known protocol message types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ProtocolType {
    /// Request mediation from a mediator
    MediationRequest,
    /// Mediator accepted the request
    MediationGrant,
    /// Mediator refused the request
    MediationDeny,
    /// Add or remove routed DIDs
    MediationKeysUpdate,
    /// Ask for queued messages
    PickupRequest,
    /// Mailbox status
    PickupStatus,
    /// Queued messages, as attachments
    PickupDelivery,
    /// Acknowledge delivered messages
    PickupReceived,
    /// Toggle live delivery on a persistent connection
    LiveDeliveryChange,
    /// Routing forward
    Forward,
}

impl ProtocolType {
    /// The protocol URI.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::MediationRequest => "https://didcomm.org/coordinate-mediation/2.0/mediate-request",
            Self::MediationGrant => "https://didcomm.org/coordinate-mediation/2.0/mediate-grant",
            Self::MediationDeny => "https://didcomm.org/coordinate-mediation/2.0/mediate-deny",
            Self::MediationKeysUpdate => "https://didcomm.org/coordinate-mediation/2.0/keylist-update",
            Self::PickupRequest => "https://didcomm.org/messagepickup/3.0/delivery-request",
            Self::PickupStatus => "https://didcomm.org/messagepickup/3.0/status",
            Self::PickupDelivery => "https://didcomm.org/messagepickup/3.0/delivery",
            Self::PickupReceived => "https://didcomm.org/messagepickup/3.0/messages-received",
            Self::LiveDeliveryChange => "https://didcomm.org/messagepickup/3.0/live-delivery-change",
            Self::Forward => "https://didcomm.org/routing/2.0/forward",
        }
    }

    /// Whether `message` is of this type.
    #[must_use]
    pub fn matches(self, message: &Message) -> bool {
        message.piuri == self.as_str()
    }
}

fn message_with_body<T: Serialize>(
    piuri: ProtocolType,
    from: &str,
    to: &str,
    body: &T,
) -> Result<Message> {
    Ok(Message::new(piuri.as_str(), serde_json::to_string(body)?)
        .from(from)
        .to(to))
}

/// Mediation request sent by a host to a prospective mediator.
#[derive(Debug, Clone)]
pub struct MediationRequest {
    /// Requesting DID
    pub from: String,
    /// Mediator DID
    pub to: String,
}

impl MediationRequest {
    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn make_message(&self) -> Result<Message> {
        message_with_body(
            ProtocolType::MediationRequest,
            &self.from,
            &self.to,
            &serde_json::json!({}),
        )
    }
}

/// Body of a mediation grant.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MediationGrantBody {
    /// DID the mediator will route for the host
    pub routing_did: String,
}

/// A mediation grant received from the mediator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediationGrant {
    /// Id of the grant message
    pub id: String,
    /// Parsed body
    pub body: MediationGrantBody,
}

impl TryFrom<&Message> for MediationGrant {
    type Error = Error;

    fn try_from(message: &Message) -> Result<Self> {
        if !ProtocolType::MediationGrant.matches(message) {
            return Err(Error::InvalidFormat(format!(
                "expected {}, got {}",
                ProtocolType::MediationGrant.as_str(),
                message.piuri
            )));
        }

        Ok(Self {
            id: message.id.clone(),
            body: serde_json::from_str(&message.body)?,
        })
    }
}

/// One entry of a key-list update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyListUpdate {
    /// DID being routed
    pub recipient_did: String,
    /// `add` or `remove`
    pub action: String,
}

/// Body of a key-list update.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeyListUpdateBody {
    /// Updates, in request order
    pub updates: Vec<KeyListUpdate>,
}

/// Registers DIDs with the mediator so it accepts forwards for them.
#[derive(Debug, Clone)]
pub struct MediationKeysUpdateList {
    /// Host DID
    pub from: String,
    /// Mediator DID
    pub to: String,
    /// DIDs to add
    pub recipient_dids: Vec<String>,
}

impl MediationKeysUpdateList {
    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn make_message(&self) -> Result<Message> {
        let body = KeyListUpdateBody {
            updates: self
                .recipient_dids
                .iter()
                .map(|did| KeyListUpdate {
                    recipient_did: did.clone(),
                    action: "add".to_string(),
                })
                .collect(),
        };
        message_with_body(ProtocolType::MediationKeysUpdate, &self.from, &self.to, &body)
    }
}

/// Asks the mediator for queued messages.
#[derive(Debug, Clone)]
pub struct PickupRequest {
    /// Host DID
    pub from: String,
    /// Mediator DID
    pub to: String,
    /// Maximum number of messages to deliver
    pub limit: u32,
}

impl PickupRequest {
    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn make_message(&self) -> Result<Message> {
        let body = serde_json::json!({
            "recipient_did": self.from,
            "limit": self.limit,
        });
        message_with_body(ProtocolType::PickupRequest, &self.from, &self.to, &body)
    }
}

/// Acknowledges delivered messages so the mediator can drop them.
#[derive(Debug, Clone)]
pub struct PickupReceived {
    /// Host DID
    pub from: String,
    /// Mediator DID
    pub to: String,
    /// Ids of the delivered messages
    pub message_ids: Vec<String>,
}

impl PickupReceived {
    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn make_message(&self) -> Result<Message> {
        let body = serde_json::json!({ "message_id_list": self.message_ids });
        message_with_body(ProtocolType::PickupReceived, &self.from, &self.to, &body)
    }
}

/// Turns live delivery on or off.
#[derive(Debug, Clone)]
pub struct LiveDeliveryChange {
    /// Host DID
    pub from: String,
    /// Mediator DID
    pub to: String,
    /// Whether the mediator should push messages
    pub live_delivery: bool,
}

impl LiveDeliveryChange {
    /// Builds the message.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn make_message(&self) -> Result<Message> {
        let body = serde_json::json!({ "live_delivery": self.live_delivery });
        message_with_body(ProtocolType::LiveDeliveryChange, &self.from, &self.to, &body)
    }
}

/// Mailbox counters carried by a pickup status message.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PickupStatus {
    /// DID the status applies to
    #[serde(default)]
    pub recipient_did: Option<String>,
    /// Number of queued messages
    #[serde(default)]
    pub message_count: u64,
    /// Age of the oldest message, in seconds
    #[serde(default)]
    pub longest_waited_seconds: Option<u64>,
    /// Newest reception time
    #[serde(default)]
    pub newest_received_time: Option<u64>,
    /// Oldest reception time
    #[serde(default)]
    pub oldest_received_time: Option<u64>,
    /// Total size of queued messages
    #[serde(default)]
    pub total_bytes: Option<u64>,
    /// Whether live delivery is on
    #[serde(default)]
    pub live_delivery: Option<bool>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::{json, Value};

    fn body(message: &Message) -> Value {
        serde_json::from_str(&message.body).unwrap()
    }

    #[test]
    fn test_keys_update_list() {
        let message = MediationKeysUpdateList {
            from: "did:example:123".into(),
            to: "did:example:456".into(),
            recipient_dids: vec!["did:example:789".into(), "did:example:abc".into()],
        }
        .make_message()
        .unwrap();

        assert_eq!(message.piuri, ProtocolType::MediationKeysUpdate.as_str());
        assert_eq!(message.from.as_deref(), Some("did:example:123"));
        assert_eq!(message.to.as_deref(), Some("did:example:456"));

        let parsed: KeyListUpdateBody = serde_json::from_str(&message.body).unwrap();
        assert_eq!(
            parsed.updates,
            vec![
                KeyListUpdate {
                    recipient_did: "did:example:789".into(),
                    action: "add".into()
                },
                KeyListUpdate {
                    recipient_did: "did:example:abc".into(),
                    action: "add".into()
                },
            ]
        );
    }

    #[test]
    fn test_pickup_messages() {
        let request = PickupRequest {
            from: "did:example:host".into(),
            to: "did:example:mediator".into(),
            limit: 10,
        }
        .make_message()
        .unwrap();
        assert_eq!(request.piuri, ProtocolType::PickupRequest.as_str());
        assert_eq!(body(&request), json!({"recipient_did": "did:example:host", "limit": 10}));

        let received = PickupReceived {
            from: "did:example:host".into(),
            to: "did:example:mediator".into(),
            message_ids: vec!["a".into(), "b".into()],
        }
        .make_message()
        .unwrap();
        assert_eq!(body(&received), json!({"message_id_list": ["a", "b"]}));

        let live = LiveDeliveryChange {
            from: "did:example:host".into(),
            to: "did:example:mediator".into(),
            live_delivery: true,
        }
        .make_message()
        .unwrap();
        assert_eq!(live.piuri, ProtocolType::LiveDeliveryChange.as_str());
        assert_eq!(body(&live), json!({"live_delivery": true}));
    }

    #[test]
    fn test_mediation_grant() {
        let message = Message::new(
            ProtocolType::MediationGrant.as_str(),
            json!({"routing_did": "did:peer:routing"}).to_string(),
        );
        let grant = MediationGrant::try_from(&message).unwrap();
        assert_eq!(grant.body.routing_did, "did:peer:routing");

        let deny = Message::new(ProtocolType::MediationDeny.as_str(), "{}");
        assert!(MediationGrant::try_from(&deny).is_err());
    }

    #[test]
    fn test_pickup_status_defaults() {
        let status: PickupStatus =
            serde_json::from_value(json!({"message_count": 3, "live_delivery": false})).unwrap();
        assert_eq!(status.message_count, 3);
        assert_eq!(status.live_delivery, Some(false));
        assert_eq!(status.recipient_did, None);
    }
}
