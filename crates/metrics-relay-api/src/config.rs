//! Configuration types for the HTTP service

use crate::errors::ConfigError;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use url::Url;

/// Service configuration
///
/// Every section carries serde defaults so a partial configuration source
/// only needs to name the values it overrides.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
pub struct ServiceConfig {
    /// HTTP server settings
    pub server: ServerConfig,

    /// Report relay settings
    pub relay: RelayConfig,

    /// Logging configuration
    pub logging: LoggingConfig,
}

impl ServiceConfig {
    /// Validate configuration
    ///
    /// Checks that:
    /// - the sender context is not empty
    /// - the target URL is present and an absolute http(s) URL
    /// - the webhook endpoint path starts with `/`
    /// - port, body limit and request timeout are non-zero
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.server.port == 0 {
            return Err(ConfigError::Invalid {
                message: "server.port must be non-zero".to_string(),
            });
        }

        if self.server.max_body_size == 0 {
            return Err(ConfigError::Invalid {
                message: "server.max_body_size must be non-zero".to_string(),
            });
        }

        if self.relay.context.trim().is_empty() {
            return Err(ConfigError::Invalid {
                message: "relay.context must not be empty".to_string(),
            });
        }

        if !self.relay.endpoint_path.starts_with('/') {
            return Err(ConfigError::Invalid {
                message: format!(
                    "relay.endpoint_path must start with '/', got '{}'",
                    self.relay.endpoint_path
                ),
            });
        }

        if self.relay.request_timeout_seconds == 0 {
            return Err(ConfigError::Invalid {
                message: "relay.request_timeout_seconds must be non-zero".to_string(),
            });
        }

        self.relay.target_url()?;
        Ok(())
    }
}

/// HTTP server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    /// Host to bind to
    pub host: String,

    /// Port to listen on
    pub port: u16,

    /// Graceful shutdown timeout in seconds
    pub shutdown_timeout_seconds: u64,

    /// Maximum request size in bytes
    pub max_body_size: usize,

    /// Enable CORS
    pub enable_cors: bool,

    /// Enable compression
    pub enable_compression: bool,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: "0.0.0.0".to_string(),
            port: 8080,
            shutdown_timeout_seconds: 30,
            max_body_size: 10 * 1024 * 1024, // 10MB
            enable_cors: true,
            enable_compression: true,
        }
    }
}

/// Report relay configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RelayConfig {
    /// Sender context stamped on every analysis report
    pub context: String,

    /// Base URL of the aggregation service; reports go to `<target_url>/report`
    pub target_url: Option<String>,

    /// Path the webhook is served on
    pub endpoint_path: String,

    /// Log every inbound webhook body at debug level
    pub log_webhook_events: bool,

    /// Timeout for a single report delivery in seconds
    pub request_timeout_seconds: u64,
}

impl RelayConfig {
    /// Parsed aggregation service URL
    pub fn target_url(&self) -> Result<Url, ConfigError> {
        let raw = self
            .target_url
            .as_deref()
            .filter(|s| !s.trim().is_empty())
            .ok_or_else(|| ConfigError::Missing {
                key: "relay.target_url".to_string(),
            })?;

        let url = Url::parse(raw).map_err(|e| ConfigError::Invalid {
            message: format!("relay.target_url '{}' is not a valid URL: {}", raw, e),
        })?;

        if !matches!(url.scheme(), "http" | "https") {
            return Err(ConfigError::Invalid {
                message: format!("relay.target_url '{}' must use http or https", raw),
            });
        }

        Ok(url)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_seconds)
    }
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            context: "gradle-metrics".to_string(),
            target_url: None,
            endpoint_path: "/report".to_string(),
            log_webhook_events: false,
            request_timeout_seconds: 30,
        }
    }
}

/// Logging configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logging level, used when `RUST_LOG` is not set
    pub level: String,

    /// Enable JSON structured logging
    pub json_format: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            json_format: false,
        }
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
