//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde/env parsing handles syntactic)
//! - Validate value ranges (timeouts > 0, bindable address, parseable URL)
//!
//! # Design Decisions
//! - Returns all validation errors, not just the first
//! - Validation is a pure function: GatewayConfig → Result<(), Vec<ValidationError>>
//! - Runs before the config is accepted into the system

use std::net::SocketAddr;

use url::Url;

use crate::config::schema::GatewayConfig;

/// A single semantic problem found in the configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationError {
    pub field: &'static str,
    pub problem: String,
}

impl std::fmt::Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// Check the assembled configuration, collecting every problem.
pub fn validate_config(config: &GatewayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError {
            field: "listener.bind_address",
            problem: format!("not a socket address: {:?}", config.listener.bind_address),
        });
    }

    match Url::parse(&config.upstream.base_url) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError {
            field: "upstream.base_url",
            problem: format!("unsupported scheme {:?}", url.scheme()),
        }),
        Err(e) => errors.push(ValidationError {
            field: "upstream.base_url",
            problem: e.to_string(),
        }),
    }

    if config.upstream.api_key.trim().is_empty() {
        errors.push(ValidationError {
            field: "upstream.api_key",
            problem: "must not be empty".to_string(),
        });
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            problem: "must be greater than zero".to_string(),
        });
    }

    if config.timeouts.upstream_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.upstream_secs",
            problem: "must be greater than zero".to_string(),
        });
    }

    if config.timeouts.connect_secs == 0 {
        errors.push(ValidationError {
            field: "timeouts.connect_secs",
            problem: "must be greater than zero".to_string(),
        });
    }

    // The inbound layer must outlive the outbound call, or a slow upstream
    // surfaces as a bare timeout instead of an ERROR envelope.
    if config.timeouts.request_secs > 0
        && config.timeouts.request_secs <= config.timeouts.upstream_secs
    {
        errors.push(ValidationError {
            field: "timeouts.request_secs",
            problem: format!(
                "must be greater than timeouts.upstream_secs ({})",
                config.timeouts.upstream_secs
            ),
        });
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
