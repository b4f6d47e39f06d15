//! Client configuration.
//!
//! Loaded from a JSON file with camelCase keys. Every field has a default, so
//! an empty object (or a missing file) yields a working configuration.

use std::path::Path;
use std::time::Duration;

use dataprotocol_rpc::{ChannelConfig, DEFAULT_MAX_MESSAGE_SIZE};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result};

pub const DEFAULT_PROVIDER_ID: &str = "MSSQL";
pub const DEFAULT_HOST_NAME: &str = "dataprotocol";

fn default_provider_id() -> String {
    DEFAULT_PROVIDER_ID.to_string()
}

fn default_host_name() -> String {
    DEFAULT_HOST_NAME.to_string()
}

fn default_host_version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}

fn default_request_timeout_ms() -> u64 {
    30_000
}

fn default_max_message_size() -> usize {
    DEFAULT_MAX_MESSAGE_SIZE
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientConfig {
    /// Provider id stamped on every provider handed to the host.
    #[serde(default = "default_provider_id")]
    pub provider_id: String,

    #[serde(default = "default_host_name")]
    pub host_name: String,

    #[serde(default = "default_host_version")]
    pub host_version: String,

    #[serde(default = "default_request_timeout_ms")]
    pub request_timeout_ms: u64,

    #[serde(default = "default_max_message_size")]
    pub max_message_size: usize,

    /// Skip features whose area is missing from the server's capabilities.
    #[serde(default)]
    pub require_server_capabilities: bool,

    /// Passed verbatim as `initializationOptions` in the handshake.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub initialization_options: Option<Value>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            provider_id: default_provider_id(),
            host_name: default_host_name(),
            host_version: default_host_version(),
            request_timeout_ms: default_request_timeout_ms(),
            max_message_size: default_max_message_size(),
            require_server_capabilities: false,
            initialization_options: None,
        }
    }
}

impl ClientConfig {
    /// Load config from file. A missing file yields the defaults.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read, is not valid JSON, or
    /// fails validation.
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            tracing::debug!(path = %path.display(), "No config file, using defaults");
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_json::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// # Errors
    ///
    /// Returns `Error::Config` naming the first offending field.
    pub fn validate(&self) -> Result<()> {
        if self.provider_id.trim().is_empty() {
            return Err(Error::Config("providerId must not be empty".to_string()));
        }
        if self.request_timeout_ms == 0 {
            return Err(Error::Config(
                "requestTimeoutMs must be positive".to_string(),
            ));
        }
        if self.max_message_size == 0 {
            return Err(Error::Config("maxMessageSize must be positive".to_string()));
        }
        Ok(())
    }

    #[must_use]
    pub fn request_timeout(&self) -> Duration {
        Duration::from_millis(self.request_timeout_ms)
    }

    #[must_use]
    pub fn channel_config(&self) -> ChannelConfig {
        ChannelConfig {
            request_timeout: self.request_timeout(),
            max_message_size: self.max_message_size,
        }
    }
}
