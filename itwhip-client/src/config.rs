//! Client configuration

use crate::{ClientError, ClientResult};

/// Default request timeout in seconds
const DEFAULT_TIMEOUT_SECS: u64 = 30;

/// Client configuration for the admin API
///
/// # Environment variables
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ITWHIP_API_BASE_URL | http://localhost:3000 | Admin API origin |
/// | ITWHIP_API_TOKEN | (none) | Bearer token |
/// | ITWHIP_REQUEST_TIMEOUT_SECS | 30 | Request timeout |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "https://itwhip.com")
    pub base_url: String,

    /// Bearer token for authentication
    pub token: Option<String>,

    /// Request timeout in seconds
    pub timeout: u64,
}

impl ClientConfig {
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            token: None,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }

    /// Load from the environment, reading `.env` first if present
    pub fn from_env() -> Self {
        dotenv::dotenv().ok();

        let base_url = std::env::var("ITWHIP_API_BASE_URL")
            .unwrap_or_else(|_| "http://localhost:3000".into());
        let token = std::env::var("ITWHIP_API_TOKEN")
            .ok()
            .filter(|t| !t.trim().is_empty());
        let timeout = std::env::var("ITWHIP_REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(DEFAULT_TIMEOUT_SECS);

        Self {
            base_url,
            token,
            timeout,
        }
    }

    pub fn with_token(mut self, token: impl Into<String>) -> Self {
        self.token = Some(token.into());
        self
    }

    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an HTTP client from this configuration
    pub fn build_http_client(&self) -> ClientResult<super::HttpClient> {
        super::HttpClient::new(self)
    }

    pub(crate) fn validate(&self) -> ClientResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base_url must start with http:// or https://, got {:?}",
                self.base_url
            )));
        }
        if self.timeout == 0 {
            return Err(ClientError::Config("timeout must be at least 1 second".into()));
        }
        Ok(())
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new("http://localhost:3000")
    }
}
