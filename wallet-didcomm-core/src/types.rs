//! Attachment, DID Document and mediator value types.

use serde::{Deserialize, Serialize};

/// Describes a single attachment carried by a [`crate::Message`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentDescriptor {
    /// The attachment ID
    pub id: String,
    /// The attachment media type
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<String>,
    /// The attachment data
    pub data: AttachmentData,
    /// The attachment filename(s)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub filename: Option<Vec<String>>,
    /// The attachment format
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub format: Option<String>,
    /// Last modification time, opaque
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_mod_time: Option<String>,
    /// Size of the attached content in bytes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub byte_count: Option<u64>,
    /// The attachment description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl AttachmentDescriptor {
    /// Creates a descriptor with only an id and a payload.
    #[must_use]
    pub fn new(id: impl Into<String>, data: AttachmentData) -> Self {
        Self {
            id: id.into(),
            media_type: None,
            data,
            filename: None,
            format: None,
            last_mod_time: None,
            byte_count: None,
            description: None,
        }
    }

    /// Sets the media type.
    #[must_use]
    pub fn media_type(mut self, media_type: impl Into<String>) -> Self {
        self.media_type = Some(media_type.into());
        self
    }

    /// Sets the description.
    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Attachment payload.
///
/// Deserialization is shape-driven, so the variant order matters: a JWS
/// payload also carries a `base64` member and must be tried first.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum AttachmentData {
    /// Base64 content with a detached JWS
    Jws(AttachmentJwsData),
    /// Links to externally hosted content
    Links(AttachmentLinkData),
    /// Inline base64 content
    Base64(AttachmentBase64),
    /// Inline JSON carried as a string
    Json(AttachmentJsonData),
    /// Reference to nested children
    Header(AttachmentHeader),
}

impl AttachmentData {
    /// Base64 payload from an already-encoded string.
    #[must_use]
    pub fn base64(base64: impl Into<String>) -> Self {
        Self::Base64(AttachmentBase64 {
            base64: base64.into(),
        })
    }

    /// JSON payload from a string.
    #[must_use]
    pub fn json(data: impl Into<String>) -> Self {
        Self::Json(AttachmentJsonData { data: data.into() })
    }
}

/// Header referencing child attachments.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentHeader {
    /// The children reference
    pub children: String,
}

/// Detached JWS envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentJws {
    /// Unprotected header
    pub header: AttachmentHeader,
    /// Protected header, base64url
    pub protected: String,
    /// Signature, base64url
    pub signature: String,
}

/// Base64 payload signed by a detached JWS.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentJwsData {
    /// The signed content
    pub base64: String,
    /// The signature envelope
    pub jws: AttachmentJws,
}

/// Inline base64 payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentBase64 {
    /// The encoded content
    pub base64: String,
}

/// Links to content plus its hash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentLinkData {
    /// Where the content can be fetched
    pub links: Vec<String>,
    /// Hash of the content
    pub hash: String,
}

/// Embedded JSON string.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentJsonData {
    /// The JSON document, as a string
    #[serde(rename = "json")]
    pub data: String,
}

/// A resolved DID Document, reduced to what messaging needs.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DIDDocument {
    /// The DID this document describes
    pub id: String,
    /// Service entries, in document order
    #[serde(default, rename = "service")]
    pub services: Vec<Service>,
}

impl DIDDocument {
    /// First service whose type set contains `capability`.
    #[must_use]
    pub fn find_service(&self, capability: &str) -> Option<&Service> {
        self.services.iter().find(|s| s.has_type(capability))
    }
}

/// A DID Document service entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Service {
    /// Service id
    pub id: String,
    /// Capability strings advertised by the service
    #[serde(rename = "type")]
    pub types: Vec<String>,
    /// Where to reach the service
    pub service_endpoint: ServiceEndpoint,
}

impl Service {
    /// Whether the service advertises `capability`.
    #[must_use]
    pub fn has_type(&self, capability: &str) -> bool {
        self.types.iter().any(|t| t == capability)
    }
}

/// A service endpoint: a transport URI or another DID.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceEndpoint {
    /// Transport URI or DID
    pub uri: String,
    /// Accepted envelope profiles
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accept: Vec<String>,
    /// Routing keys
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub routing_keys: Vec<String>,
}

impl ServiceEndpoint {
    /// An endpoint with only a URI.
    #[must_use]
    pub fn new(uri: impl Into<String>) -> Self {
        Self {
            uri: uri.into(),
            accept: Vec::new(),
            routing_keys: Vec::new(),
        }
    }
}

/// An established relay relationship with a mediator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Mediator {
    /// Local identifier of the relationship
    pub id: String,
    /// The mediator's DID
    #[serde(rename = "mediatorDID")]
    pub mediator_did: String,
    /// Our DID, as known to the mediator
    #[serde(rename = "hostDID")]
    pub host_did: String,
    /// DID the mediator routes for us
    #[serde(rename = "routingDID")]
    pub routing_did: String,
}
