//! HTTP transport backed by `reqwest`.
//!
//! [`HttpTransport`] implements the core [`Transport`] port. It never turns
//! a non-success status into an error: callers get the status and body and
//! decide for themselves.
//!
//! # Examples
//!
//! ```rust,no_run
//! use wallet_didcomm_core::{HttpRequest, Transport};
//! use wallet_didcomm_node::transport::{HttpTransport, HttpTransportConfig};
//!
//! async fn post() -> wallet_didcomm_node::Result<()> {
//!     let transport = HttpTransport::new(HttpTransportConfig::default())?;
//!     let response = transport
//!         .request(HttpRequest::post("https://mediator.example/didcomm", "envelope"))
//!         .await?;
//!     println!("{}", response.status);
//!     Ok(())
//! }
//! ```

use async_trait::async_trait;
use reqwest::{Client, Method};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;
use wallet_didcomm_core::{
    error::{Error as CoreError, Result as CoreResult},
    HttpMethod, HttpRequest, HttpResponse, Transport,
};

use crate::error::Result;

/// Configuration for the HTTP transport
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpTransportConfig {
    /// The HTTP client timeout in seconds
    pub timeout_secs: u64,
    /// The user agent sent with every request
    pub user_agent: String,
}

impl Default for HttpTransportConfig {
    fn default() -> Self {
        Self {
            timeout_secs: 30,
            user_agent: concat!("wallet-didcomm/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// A [`Transport`] performing real HTTP requests.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: Client,
}

impl HttpTransport {
    /// Builds a transport with its own connection pool.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be built.
    pub fn new(config: HttpTransportConfig) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .user_agent(config.user_agent)
            .build()?;
        Ok(Self { client })
    }

    /// Wraps an existing client.
    #[must_use]
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn request(&self, request: HttpRequest) -> CoreResult<HttpResponse> {
        let method = match request.method {
            HttpMethod::Get => Method::GET,
            HttpMethod::Post => Method::POST,
        };

        debug!("{} {}", request.method, request.url);

        let query: Vec<(&str, &str)> = request
            .query
            .iter()
            .map(|kv| (kv.key.as_str(), kv.value.as_str()))
            .collect();

        let mut builder = self.client.request(method, &request.url).query(&query);
        for header in &request.headers {
            builder = builder.header(header.key.as_str(), header.value.as_str());
        }
        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let transport_error = |e: reqwest::Error| CoreError::Transport {
            url: request.url.clone(),
            reason: e.to_string(),
        };

        let response = builder.send().await.map_err(transport_error)?;
        let status = response.status().as_u16();
        let body = response.bytes().await.map_err(transport_error)?;

        Ok(HttpResponse {
            status,
            body: body.to_vec(),
        })
    }
}
