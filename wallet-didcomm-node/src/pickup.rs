//! Pickup response classification.
//!
//! A mailbox poll is answered either with a status message (counters only)
//! or with a delivery message whose attachments are the queued envelopes.

use base64::{
    alphabet,
    engine::{DecodePaddingMode, GeneralPurpose, GeneralPurposeConfig},
    Engine,
};
use tracing::warn;
use wallet_didcomm_core::{
    protocols::PickupStatus, AttachmentData, AttachmentDescriptor, Message, ProtocolType,
};

use crate::{
    error::{Error, Result},
    router::Router,
};

/// Url-safe base64 that accepts padded and unpadded input.
const URL_SAFE_LENIENT: GeneralPurpose = GeneralPurpose::new(
    &alphabet::URL_SAFE,
    GeneralPurposeConfig::new().with_decode_padding_mode(DecodePaddingMode::Indifferent),
);

/// A classified pickup response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PickupResponse {
    /// Mailbox status
    Status(Message),
    /// Queued messages
    Delivery(Message),
}

impl PickupResponse {
    /// The message that produced this response.
    #[must_use]
    pub fn message(&self) -> &Message {
        match self {
            Self::Status(message) | Self::Delivery(message) => message,
        }
    }
}

impl TryFrom<Message> for PickupResponse {
    type Error = Error;

    fn try_from(message: Message) -> Result<Self> {
        if ProtocolType::PickupStatus.matches(&message) {
            Ok(Self::Status(message))
        } else if ProtocolType::PickupDelivery.matches(&message) {
            Ok(Self::Delivery(message))
        } else {
            Err(Error::InvalidMessageType {
                found: message.piuri,
                expected: format!(
                    "{} or {}",
                    ProtocolType::PickupStatus.as_str(),
                    ProtocolType::PickupDelivery.as_str()
                ),
            })
        }
    }
}

/// Extracts and unpacks the messages of a pickup response.
pub struct PickupRunner<'a> {
    response: PickupResponse,
    router: &'a Router,
}

impl<'a> PickupRunner<'a> {
    /// Classifies `message`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::InvalidMessageType`] unless `message` is a pickup
    /// status or delivery.
    pub fn new(message: Message, router: &'a Router) -> Result<Self> {
        Ok(Self {
            response: PickupResponse::try_from(message)?,
            router,
        })
    }

    /// The classified response.
    #[must_use]
    pub fn response(&self) -> &PickupResponse {
        &self.response
    }

    /// Mailbox counters of a status response; `None` for deliveries.
    ///
    /// # Errors
    ///
    /// Returns an error if the status body is not valid JSON.
    pub fn status(&self) -> Result<Option<PickupStatus>> {
        match &self.response {
            PickupResponse::Status(message) => Ok(Some(serde_json::from_str(&message.body)?)),
            PickupResponse::Delivery(_) => Ok(None),
        }
    }

    /// Unpacks every delivered message, in attachment order.
    ///
    /// Only base64 and JSON attachments carry envelopes; other attachments are
    /// skipped. An attachment that cannot be decoded or unpacked is logged
    /// and skipped without dropping the rest of the batch. A status response
    /// yields nothing.
    pub async fn run(&self) -> Vec<(String, Message)> {
        let PickupResponse::Delivery(message) = &self.response else {
            return Vec::new();
        };

        let mut messages = Vec::with_capacity(message.attachments.len());
        for (attachment_id, envelope) in message.attachments.iter().filter_map(envelope_of) {
            match self.unpack_attachment(envelope).await {
                Ok(unpacked) => messages.push((attachment_id, unpacked)),
                Err(e) => warn!(attachment = %attachment_id, "Skipping attachment: {e}"),
            }
        }
        messages
    }

    async fn unpack_attachment(&self, envelope: Result<String>) -> Result<Message> {
        self.router.unpack(&envelope?).await
    }
}

/// The envelope carried by `attachment`, if it carries one.
fn envelope_of(attachment: &AttachmentDescriptor) -> Option<(String, Result<String>)> {
    let envelope = match &attachment.data {
        AttachmentData::Base64(data) => decode_base64(&data.base64),
        AttachmentData::Json(data) => Ok(data.data.clone()),
        AttachmentData::Jws(_) | AttachmentData::Links(_) | AttachmentData::Header(_) => {
            return None
        }
    };
    Some((attachment.id.clone(), envelope))
}

fn decode_base64(data: &str) -> Result<String> {
    let bytes = URL_SAFE_LENIENT
        .decode(data)
        .map_err(wallet_didcomm_core::Error::from)?;
    String::from_utf8(bytes).map_err(|e| {
        wallet_didcomm_core::Error::InvalidFormat(format!("attachment is not UTF-8: {e}")).into()
    })
}
