//! Message packing and unpacking functionality.
//!
//! These functions check the routing preconditions of a message and hand the
//! cryptographic work to an [`EnvelopeCodec`]. Codec failures are returned
//! as-is.

use crate::{
    error::{Error, Result},
    message::Direction,
    plugin::EnvelopeCodec,
    Message,
};

/// Returns the `(from, to)` DIDs of `message`.
///
/// # Errors
///
/// Returns [`Error::NoReceiverSet`] if `to` is missing, then
/// [`Error::NoSenderSet`] if `from` is missing.
pub fn require_parties(message: &Message) -> Result<(&str, &str)> {
    let to = message.to.as_deref().ok_or(Error::NoReceiverSet)?;
    let from = message.from.as_deref().ok_or(Error::NoSenderSet)?;
    Ok((from, to))
}

/// Pack a `DIDComm` message into an encrypted envelope.
///
/// # Errors
///
/// Returns an error if:
/// - The message has no recipient or no sender
/// - The codec fails to encrypt
pub async fn pack_message(message: &Message, codec: &dyn EnvelopeCodec) -> Result<String> {
    require_parties(message)?;
    codec.pack_encrypted(message).await
}

/// Unpack a `DIDComm` envelope. The result is marked as received.
///
/// # Errors
///
/// Returns whatever the codec reports for a malformed or undecryptable
/// envelope.
pub async fn unpack_message(envelope: &str, codec: &dyn EnvelopeCodec) -> Result<Message> {
    let mut message = codec.unpack(envelope).await?;
    message.direction = Direction::Received;
    Ok(message)
}
