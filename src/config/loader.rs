//! Configuration loading from the environment.
//!
//! The gateway is configured entirely through environment variables:
//! `SEOUL_API_KEY` (falls back to the documented public sample key) and
//! `PORT` (falls back to 3000). Loading happens once in `main`; nothing
//! reads the environment after startup.

use crate::config::schema::GatewayConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    /// An environment variable was present but unusable.
    Env { name: &'static str, reason: String },
    /// Semantic validation rejected the assembled config.
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Env { name, reason } => {
                write!(f, "invalid environment variable {}: {}", name, reason)
            }
            ConfigError::Validation(errors) => {
                write!(f, "validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Assemble and validate configuration from the process environment.
pub fn load_from_env() -> Result<GatewayConfig, ConfigError> {
    let mut config = GatewayConfig::default();

    if let Ok(key) = std::env::var("SEOUL_API_KEY") {
        if !key.trim().is_empty() {
            config.upstream.api_key = key.trim().to_string();
        }
    }

    if let Ok(port) = std::env::var("PORT") {
        let port: u16 = port.trim().parse().map_err(|_| ConfigError::Env {
            name: "PORT",
            reason: format!("expected a port number, got {:?}", port),
        })?;
        config.listener.bind_address = format!("0.0.0.0:{port}");
    }

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}
