//! Transport layer for fetching chunk containers
//!
//! Resolvers talk to the remote chunk store through [`ChunkTransport`], one
//! request per call with no implicit retries. [`HttpTransport`] is the
//! reqwest-backed implementation.

use async_trait::async_trait;
use bytes::Bytes;
use reqwest::{Client, ClientBuilder, StatusCode};
use std::sync::{Arc, OnceLock};

use crate::config::HttpConfig;
use crate::error::Result;

/// Global shared HTTP client
/// Avoids costly client creation for every resolver
static GLOBAL_HTTP_CLIENT: OnceLock<Arc<Client>> = OnceLock::new();

/// Response to a single transport request
#[derive(Debug, Clone)]
pub struct TransportResponse {
    /// HTTP status
    pub status: StatusCode,
    /// Full response body
    pub body: Bytes,
}

/// Fetches raw bytes for a URL
#[async_trait]
pub trait ChunkTransport: Send + Sync {
    /// Issue exactly one GET request
    async fn get(&self, url: &str) -> Result<TransportResponse>;
}

/// HTTP transport backed by reqwest
#[derive(Clone)]
pub struct HttpTransport {
    client: Arc<Client>,
}

impl HttpTransport {
    /// Create a transport using the global shared client
    pub fn new() -> Result<Self> {
        if let Some(client) = GLOBAL_HTTP_CLIENT.get() {
            return Ok(Self {
                client: Arc::clone(client),
            });
        }

        let client = Arc::new(Self::build_client(&HttpConfig::default())?);
        Ok(Self {
            client: Arc::clone(GLOBAL_HTTP_CLIENT.get_or_init(|| client)),
        })
    }

    /// Create a transport with its own client
    pub fn with_config(config: &HttpConfig) -> Result<Self> {
        Ok(Self {
            client: Arc::new(Self::build_client(config)?),
        })
    }

    fn build_client(config: &HttpConfig) -> Result<Client> {
        // Fails harmlessly when a provider is already installed
        let _ = rustls::crypto::ring::default_provider().install_default();

        let mut builder = ClientBuilder::new()
            .pool_idle_timeout(config.pool_idle_timeout)
            .pool_max_idle_per_host(config.pool_max_idle_per_host)
            .connect_timeout(config.connect_timeout)
            .tcp_nodelay(config.tcp_nodelay)
            .user_agent(config.user_agent.clone());

        if let Some(timeout) = config.request_timeout {
            builder = builder.timeout(timeout);
        }

        if config.enable_compression {
            builder = builder.gzip(true).brotli(true).deflate(true);
        }

        builder.build().map_err(Into::into)
    }

}

#[async_trait]
impl ChunkTransport for HttpTransport {
    async fn get(&self, url: &str) -> Result<TransportResponse> {
        tracing::debug!(%url, "requesting chunk");
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.bytes().await?;
        Ok(TransportResponse { status, body })
    }
}
