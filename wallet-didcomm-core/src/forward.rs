//! Routing protocol forward messages.
//!
//! A forward message is built around ciphertext that was already packed for
//! the final recipient. The caller packs the forward message itself for the
//! mediator, so the mediator can read `next` but not the payload.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    error::{Error, Result},
    protocols::ProtocolType,
    types::{AttachmentData, AttachmentDescriptor},
    Message,
};

/// Body of a forward message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ForwardBody {
    /// DID of the next hop
    pub next: String,
}

/// A forward message addressed to a mediator.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForwardMessage {
    /// Message id
    pub id: String,
    /// Routing instruction
    pub body: ForwardBody,
    /// Ciphertext for the final recipient
    pub encrypted_message: String,
    /// The original sender
    pub from: String,
    /// The mediator
    pub to: String,
}

impl ForwardMessage {
    /// Wraps `encrypted_message`, packed for `recipient`, for delivery via `mediator`.
    #[must_use]
    pub fn new(
        recipient: impl Into<String>,
        encrypted_message: impl Into<String>,
        from: impl Into<String>,
        mediator: impl Into<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            body: ForwardBody {
                next: recipient.into(),
            },
            encrypted_message: encrypted_message.into(),
            from: from.into(),
            to: mediator.into(),
        }
    }

    /// Materializes the forward as a plaintext message, ready to be packed.
    ///
    /// # Errors
    ///
    /// Returns an error if the body cannot be serialized.
    pub fn make_message(&self) -> Result<Message> {
        let body = serde_json::to_string(&self.body)?;
        let attachment = AttachmentDescriptor::new(
            Uuid::new_v4().to_string(),
            AttachmentData::json(self.encrypted_message.clone()),
        )
        .media_type("application/json");

        Ok(Message::new(ProtocolType::Forward.as_str(), body)
            .with_id(self.id.clone())
            .from(self.from.clone())
            .to(self.to.clone())
            .attachment(attachment))
    }
}

impl TryFrom<&Message> for ForwardMessage {
    type Error = Error;

    fn try_from(message: &Message) -> Result<Self> {
        if message.piuri != ProtocolType::Forward.as_str() {
            return Err(Error::InvalidFormat(format!(
                "expected a forward message, got {}",
                message.piuri
            )));
        }

        let body: ForwardBody = serde_json::from_str(&message.body)?;
        let encrypted_message = message
            .attachments
            .iter()
            .find_map(|a| match &a.data {
                AttachmentData::Json(json) => Some(json.data.clone()),
                _ => None,
            })
            .ok_or(Error::MissingField("attachments"))?;

        Ok(Self {
            id: message.id.clone(),
            body,
            encrypted_message,
            from: message.from.clone().ok_or(Error::MissingField("from"))?,
            to: message.to.clone().ok_or(Error::MissingField("to"))?,
        })
    }
}
