//! Client configuration

use crate::{ClientError, ClientResult};

/// Default backend address
pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:5000";

/// Env var holding the backend base URL
pub const ENV_API_URL: &str = "POS_API_URL";

/// Env var holding the request timeout in seconds
pub const ENV_HTTP_TIMEOUT: &str = "POS_HTTP_TIMEOUT_SECS";

/// Client configuration for connecting to the POS backend
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Server base URL (e.g., "http://127.0.0.1:5000")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// User-Agent header sent with every request
    pub user_agent: String,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            user_agent: concat!("pos-client/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    /// Build configuration from `POS_API_URL` / `POS_HTTP_TIMEOUT_SECS`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> ClientResult<Self> {
        let base_url =
            std::env::var(ENV_API_URL).unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
        let mut config = Self::new(base_url);

        if let Ok(raw) = std::env::var(ENV_HTTP_TIMEOUT) {
            let seconds = raw.trim().parse::<u64>().map_err(|_| {
                ClientError::Config(format!("{ENV_HTTP_TIMEOUT} must be a number, got {raw:?}"))
            })?;
            config = config.with_timeout(seconds);
        }

        config.validate()?;
        Ok(config)
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the User-Agent header
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Reject configurations the HTTP client cannot work with
    pub fn validate(&self) -> ClientResult<()> {
        let url = self.base_url.trim();
        if !(url.starts_with("http://") || url.starts_with("https://")) {
            return Err(ClientError::Config(format!(
                "base URL must start with http:// or https://, got {:?}",
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
        Self::new(DEFAULT_BASE_URL)
    }
}
