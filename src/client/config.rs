use std::time::Duration;

use super::error::{Error, Result};

pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);
pub const DEFAULT_USER_AGENT: &str = concat!("unifi-rust-sdk/", env!("CARGO_PKG_VERSION"));

pub const API_KEY_ENV: &str = "UNIFI_API_KEY";
pub const BASE_URL_ENV: &str = "UNIFI_BASE_URL";

/// Connection settings shared by every API client.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Config {
    pub api_key: String,
    /// Empty means "use the API's default".
    pub base_url: String,
    pub user_agent: String,
    pub timeout: Duration,
    /// Skip TLS certificate checks, for consoles with self-signed certificates.
    pub accept_invalid_certs: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: String::new(),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            timeout: DEFAULT_TIMEOUT,
            accept_invalid_certs: false,
        }
    }
}

impl Config {
    pub fn new(api_key: &str) -> Self {
        Self::default().with_api_key(api_key)
    }

    /// Read `UNIFI_API_KEY` and, if set, `UNIFI_BASE_URL`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var(API_KEY_ENV).map_err(|_| Error::EmptyApiKey)?;
        let mut config = Self::new(&api_key);
        if let Ok(base_url) = std::env::var(BASE_URL_ENV) {
            config = config.with_base_url(&base_url);
        }
        config.validate()?;
        Ok(config)
    }

    pub fn with_api_key(mut self, api_key: &str) -> Self {
        self.api_key = api_key.trim().to_string();
        self
    }

    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim().trim_end_matches('/').to_string();
        self
    }

    pub fn with_user_agent(mut self, user_agent: &str) -> Self {
        self.user_agent = user_agent.to_string();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_accept_invalid_certs(mut self, accept: bool) -> Self {
        self.accept_invalid_certs = accept;
        self
    }

    pub fn validate(&self) -> Result<()> {
        if self.api_key.is_empty() {
            return Err(Error::EmptyApiKey);
        }
        Ok(())
    }
}
