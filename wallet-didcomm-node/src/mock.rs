use async_trait::async_trait;
use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use wallet_didcomm_core::{
    error::{Error as CoreError, Result},
    plugin::{DIDCommPlugin, DIDResolver, EnvelopeCodec},
    DIDDocument, HttpRequest, HttpResponse, Message, Service, ServiceEndpoint, Transport,
};

/// A mock plugin for testing.
///
/// Resolves from a fixed set of documents and records every resolution.
/// Packing is plain JSON serialization, so envelopes can be inspected.
#[derive(Default)]
pub struct MockPlugin {
    documents: HashMap<String, DIDDocument>,
    resolutions: Mutex<Vec<String>>,
}

impl MockPlugin {
    /// Creates a new instance of the mock plugin.
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a document whose messaging service points at `endpoint`.
    pub fn with_endpoint(mut self, did: &str, endpoint: &str) -> Self {
        self.documents.insert(did.to_string(), document(did, "DIDCommMessaging", endpoint));
        self
    }

    /// Adds an arbitrary document.
    pub fn with_document(mut self, document: DIDDocument) -> Self {
        self.documents.insert(document.id.clone(), document);
        self
    }

    /// DIDs resolved so far, in call order.
    pub fn resolutions(&self) -> Vec<String> {
        self.resolutions.lock().unwrap().clone()
    }
}

#[async_trait]
impl DIDResolver for MockPlugin {
    async fn resolve(&self, did: &str) -> Result<DIDDocument> {
        self.resolutions.lock().unwrap().push(did.to_string());
        self.documents
            .get(did)
            .cloned()
            .ok_or_else(|| CoreError::DIDResolution(format!("unknown DID {did}")))
    }
}

#[async_trait]
impl EnvelopeCodec for MockPlugin {
    async fn pack_encrypted(&self, message: &Message) -> Result<String> {
        pack(message)
    }

    async fn unpack(&self, envelope: &str) -> Result<Message> {
        Ok(serde_json::from_str(envelope)?)
    }
}

impl DIDCommPlugin for MockPlugin {
    fn resolver(&self) -> &dyn DIDResolver {
        self
    }

    fn codec(&self) -> &dyn EnvelopeCodec {
        self
    }
}

/// What the mock codec produces for `message`.
pub fn pack(message: &Message) -> Result<String> {
    Ok(serde_json::to_string(message)?)
}

/// A document with one service.
pub fn document(did: &str, service_type: &str, endpoint: &str) -> DIDDocument {
    DIDDocument {
        id: did.to_string(),
        services: vec![Service {
            id: format!("{did}#service-1"),
            types: vec![service_type.to_string()],
            service_endpoint: ServiceEndpoint::new(endpoint),
        }],
    }
}

/// A transport that records requests and replays scripted responses.
///
/// Once the script runs out it answers `200` with an empty body.
#[derive(Default)]
pub struct RecordingTransport {
    responses: Mutex<VecDeque<Result<HttpResponse>>>,
    requests: Mutex<Vec<HttpRequest>>,
}

impl RecordingTransport {
    /// Creates a transport with an empty script.
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a response.
    pub fn respond(self, status: u16, body: impl Into<Vec<u8>>) -> Self {
        self.responses.lock().unwrap().push_back(Ok(HttpResponse {
            status,
            body: body.into(),
        }));
        self
    }

    /// Queues a connection failure.
    pub fn fail(self, reason: &str) -> Self {
        self.responses.lock().unwrap().push_back(Err(CoreError::Transport {
            url: "scripted".to_string(),
            reason: reason.to_string(),
        }));
        self
    }

    /// Requests received so far.
    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl Transport for RecordingTransport {
    async fn request(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.requests.lock().unwrap().push(request);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| {
                Ok(HttpResponse {
                    status: 200,
                    body: Vec::new(),
                })
            })
    }
}
