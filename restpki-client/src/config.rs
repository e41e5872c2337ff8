//! Client configuration

use serde::{Deserialize, Serialize};

use crate::error::{RestError, Result};

/// Placeholder shipped in sample configurations; a token containing it was never set.
const PLACEHOLDER_MARKER: &str = " API ";

/// Client configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ClientConfig {
    /// Base URL of the REST PKI instance
    #[serde(default = "default_endpoint_url")]
    pub endpoint_url: String,
    /// API access token, sent as a bearer token
    #[serde(default)]
    pub access_token: String,
    /// Request timeout in seconds (default: 30)
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_endpoint_url() -> String {
    "https://pki.rest/".to_string()
}

fn default_timeout_secs() -> u64 {
    30
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            endpoint_url: default_endpoint_url(),
            access_token: String::new(),
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl ClientConfig {
    pub fn new(endpoint_url: impl Into<String>, access_token: impl Into<String>) -> Self {
        Self {
            endpoint_url: endpoint_url.into(),
            access_token: access_token.into(),
            ..Default::default()
        }
    }

    /// Read `RESTPKI_ENDPOINT`, `RESTPKI_ACCESS_TOKEN` and `RESTPKI_TIMEOUT_SECS`,
    /// falling back to defaults for unset variables.
    pub fn from_env() -> Result<Self> {
        let mut config = Self::default();
        if let Ok(endpoint) = std::env::var("RESTPKI_ENDPOINT") {
            config.endpoint_url = endpoint;
        }
        if let Ok(token) = std::env::var("RESTPKI_ACCESS_TOKEN") {
            config.access_token = token;
        }
        if let Ok(timeout) = std::env::var("RESTPKI_TIMEOUT_SECS") {
            config.timeout_secs = timeout.parse().map_err(|_| {
                RestError::Config(format!("RESTPKI_TIMEOUT_SECS is not a number: {timeout}"))
            })?;
        }
        Ok(config)
    }

    /// Check that the configuration can be used to call the API.
    pub fn validate(&self) -> Result<()> {
        if self.access_token.trim().is_empty() {
            return Err(RestError::Config("the API access token was not set".into()));
        }
        if self.access_token.contains(PLACEHOLDER_MARKER) {
            return Err(RestError::Config(
                "the API access token was not set, replace the placeholder with a token generated on the REST PKI website".into(),
            ));
        }
        if !(self.endpoint_url.starts_with("https://") || self.endpoint_url.starts_with("http://")) {
            return Err(RestError::Config(format!(
                "endpoint URL must be http(s): {}",
                self.endpoint_url
            )));
        }
        if self.timeout_secs == 0 {
            return Err(RestError::Config("timeout must be at least one second".into()));
        }
        Ok(())
    }

    /// Endpoint URL with a guaranteed trailing slash
    pub fn normalized_endpoint(&self) -> String {
        if self.endpoint_url.ends_with('/') {
            self.endpoint_url.clone()
        } else {
            format!("{}/", self.endpoint_url)
        }
    }
}
