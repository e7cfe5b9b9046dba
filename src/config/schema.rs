//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the gateway.
//! All types derive Serde traits so they can round-trip through JSON, though
//! the normal path is [`crate::config::loader`] reading the environment once
//! at startup and handing the result to the server at construction time.

use serde::{Deserialize, Serialize};

/// Known-public sample key for unauthenticated/demo use. Not a secret.
pub const FALLBACK_API_KEY: &str = "4d5a494e5a736d61373461474e4743";

/// Seoul open-data API host the gateway proxies.
pub const DEFAULT_UPSTREAM_BASE: &str = "http://openapi.seoul.go.kr:8088";

/// Default listen port when `PORT` is unset.
pub const DEFAULT_PORT: u16 = 3000;

/// Root configuration for the population gateway.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct GatewayConfig {
    /// Listener configuration (bind address).
    pub listener: ListenerConfig,

    /// Upstream open-data API settings.
    pub upstream: UpstreamConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,
}

/// Listener configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:3000").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: format!("0.0.0.0:{DEFAULT_PORT}"),
        }
    }
}

/// Upstream open-data API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct UpstreamConfig {
    /// Base URL of the open-data host, scheme and port included.
    pub base_url: String,

    /// Access key embedded positionally in every upstream path.
    pub api_key: String,
}

impl Default for UpstreamConfig {
    fn default() -> Self {
        Self {
            base_url: DEFAULT_UPSTREAM_BASE.to_string(),
            api_key: FALLBACK_API_KEY.to_string(),
        }
    }
}

/// Timeout configuration for inbound and outbound requests.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Total inbound request timeout in seconds. Must exceed
    /// `upstream_secs` so a slow upstream is reported as an ERROR
    /// envelope, never cut off mid-handler by the inbound layer.
    pub request_secs: u64,

    /// Total outbound upstream-call timeout in seconds.
    pub upstream_secs: u64,

    /// Outbound connection establishment timeout in seconds.
    pub connect_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self {
            request_secs: 30,
            upstream_secs: 20,
            connect_secs: 5,
        }
    }
}
