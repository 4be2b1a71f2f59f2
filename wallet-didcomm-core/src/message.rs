//! Plaintext DIDComm message type.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

use crate::types::AttachmentDescriptor;

/// Who materialized a message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Direction {
    /// Built locally for sending
    #[default]
    Sent,
    /// Produced by unpacking an inbound envelope
    Received,
}

/// A plaintext DIDComm message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    /// The message ID
    pub id: String,
    /// The protocol message type
    #[serde(rename = "type")]
    pub piuri: String,
    /// The DID of the sender
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from: Option<String>,
    /// The DID of the recipient
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub to: Option<String>,
    /// DID rotation proof
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub from_prior: Option<String>,
    /// Protocol-specific body, usually JSON
    pub body: String,
    /// Additional headers
    #[serde(default)]
    pub extra_headers: HashMap<String, String>,
    /// Creation time, opaque
    #[serde(default)]
    pub created_time: String,
    /// Expiry time, opaque
    #[serde(default)]
    pub expires_time_plus: String,
    /// Attachments, in delivery order
    #[serde(default)]
    pub attachments: Vec<AttachmentDescriptor>,
    /// Thread id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub thid: Option<String>,
    /// Parent thread id
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pthid: Option<String>,
    /// Acknowledged message ids
    #[serde(default)]
    pub ack: Vec<String>,
    /// Local direction marker
    #[serde(default)]
    pub direction: Direction,
}

impl Message {
    /// Creates a new outbound message with a random id.
    ///
    /// # Arguments
    ///
    /// * `piuri` - The protocol message type
    /// * `body` - The message body
    #[must_use]
    pub fn new(piuri: impl Into<String>, body: impl Into<String>) -> Self {
        let created = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_secs())
            .unwrap_or_default();

        Self {
            id: Uuid::new_v4().to_string(),
            piuri: piuri.into(),
            from: None,
            to: None,
            from_prior: None,
            body: body.into(),
            extra_headers: HashMap::new(),
            created_time: created.to_string(),
            expires_time_plus: String::new(),
            attachments: Vec::new(),
            thid: None,
            pthid: None,
            ack: Vec::new(),
            direction: Direction::Sent,
        }
    }

    /// Replaces the generated id.
    #[must_use]
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.id = id.into();
        self
    }

    /// Sets the sender of the message.
    #[must_use]
    pub fn from(mut self, from: impl Into<String>) -> Self {
        self.from = Some(from.into());
        self
    }

    /// Sets the recipient of the message.
    #[must_use]
    pub fn to(mut self, to: impl Into<String>) -> Self {
        self.to = Some(to.into());
        self
    }

    /// Sets the thread id.
    #[must_use]
    pub fn thid(mut self, thid: impl Into<String>) -> Self {
        self.thid = Some(thid.into());
        self
    }

    /// Sets the parent thread id.
    #[must_use]
    pub fn pthid(mut self, pthid: impl Into<String>) -> Self {
        self.pthid = Some(pthid.into());
        self
    }

    /// Adds a header. An existing value for `key` is replaced.
    #[must_use]
    pub fn header(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra_headers.insert(key.into(), value.into());
        self
    }

    /// Appends an attachment.
    #[must_use]
    pub fn attachment(mut self, attachment: AttachmentDescriptor) -> Self {
        self.attachments.push(attachment);
        self
    }

    /// Sets the direction marker.
    #[must_use]
    pub fn direction(mut self, direction: Direction) -> Self {
        self.direction = direction;
        self
    }
}
