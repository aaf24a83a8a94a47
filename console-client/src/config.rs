//! Client configuration

use std::path::PathBuf;

/// Default adapter base URL, including the API prefix
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000/api";

/// Configuration for connecting to a bank-adapter deployment
///
/// # Environment variables
///
/// Every field can be overridden through the environment:
///
/// | Variable | Default | Meaning |
/// |----------|---------|---------|
/// | ADAPTER_API_URL | http://localhost:3000/api | Adapter base URL |
/// | CONSOLE_DATA_DIR | ./data | Directory for the persisted token |
/// | REQUEST_TIMEOUT_SECS | 30 | Per-request deadline |
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Adapter base URL (e.g., "http://localhost:3000/api")
    pub base_url: String,

    /// Request timeout in seconds
    pub timeout: u64,

    /// Directory holding the persisted token file
    pub data_dir: PathBuf,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            timeout: 30,
            data_dir: PathBuf::from("./data"),
        }
    }

    /// Set the request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Set the token storage directory
    pub fn with_data_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.data_dir = dir.into();
        self
    }

    /// Load configuration from environment variables
    ///
    /// Unset variables fall back to the defaults.
    pub fn from_env() -> Self {
        let mut config = Self::new(
            std::env::var("ADAPTER_API_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.into()),
        );
        if let Some(timeout) = std::env::var("REQUEST_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.parse().ok())
        {
            config.timeout = timeout;
        }
        if let Ok(dir) = std::env::var("CONSOLE_DATA_DIR") {
            config.data_dir = PathBuf::from(dir);
        }
        config
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}
