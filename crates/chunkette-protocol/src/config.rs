//! Configuration structures for chunk resolution

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;
use url::Url;

use crate::error::{ProtocolError, Result};

/// Where chunks come from and whether they are verified
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolverConfig {
    /// Local cache directory holding decompressed, verified payloads
    pub cache_dir: Option<PathBuf>,

    /// Remote chunk store base URI (e.g. `https://cdn.example.com/Chunks`)
    pub base_uri: Option<String>,

    /// Lazy mode: skip hash-bearing header fields and all integrity checks
    pub lazy: bool,
}

impl ResolverConfig {
    /// Create configuration from environment variables
    pub fn from_env() -> Result<Self> {
        let config = Self {
            cache_dir: std::env::var("CHUNKETTE_CACHE_DIR").map(PathBuf::from).ok(),
            base_uri: std::env::var("CHUNKETTE_BASE_URI").ok(),
            lazy: std::env::var("CHUNKETTE_LAZY")
                .ok()
                .is_some_and(|s| matches!(s.as_str(), "1" | "true" | "yes")),
        };
        config.validate()?;
        Ok(config)
    }

    /// Set the cache directory
    #[must_use]
    pub fn with_cache_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.cache_dir = Some(dir.into());
        self
    }

    /// Set the remote base URI
    #[must_use]
    pub fn with_base_uri(mut self, uri: impl Into<String>) -> Self {
        self.base_uri = Some(uri.into());
        self
    }

    /// Enable or disable lazy mode
    #[must_use]
    pub fn with_lazy(mut self, lazy: bool) -> Self {
        self.lazy = lazy;
        self
    }

    /// Whether integrity checks run
    pub const fn verify(&self) -> bool {
        !self.lazy
    }

    /// Check that at least one chunk source is configured and the base URI parses
    pub fn validate(&self) -> Result<()> {
        if self.cache_dir.is_none() && self.base_uri.is_none() {
            return Err(ProtocolError::Configuration(
                "neither a cache directory nor a remote base URI is configured".to_string(),
            ));
        }

        if let Some(uri) = &self.base_uri {
            let parsed =
                Url::parse(uri).map_err(|e| ProtocolError::InvalidEndpoint(format!("{uri}: {e}")))?;
            if !matches!(parsed.scheme(), "http" | "https") {
                return Err(ProtocolError::InvalidEndpoint(format!(
                    "{uri}: unsupported scheme {}",
                    parsed.scheme()
                )));
            }
        }

        Ok(())
    }
}

/// HTTP client configuration for the remote chunk store
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HttpConfig {
    /// Connection establishment timeout
    pub connect_timeout: Duration,

    /// Whole-request timeout, `None` leaves requests unbounded
    pub request_timeout: Option<Duration>,

    /// How long idle pooled connections are kept
    pub pool_idle_timeout: Duration,

    /// Idle connections kept per host
    pub pool_max_idle_per_host: usize,

    /// Disable Nagle's algorithm
    pub tcp_nodelay: bool,

    /// Accept gzip/brotli/deflate transfer encodings
    pub enable_compression: bool,

    /// User agent sent with every request
    pub user_agent: String,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            connect_timeout: Duration::from_secs(10),
            request_timeout: None,
            pool_idle_timeout: Duration::from_secs(30),
            pool_max_idle_per_host: 10,
            tcp_nodelay: true,
            enable_compression: true,
            user_agent: concat!("chunkette-protocol/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}
