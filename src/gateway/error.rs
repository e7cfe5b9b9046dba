//! Gateway error definitions.

use thiserror::Error;

/// Errors that can occur while talking to the upstream open-data API.
///
/// Note that an empty result set is NOT an error: it is reported through the
/// envelope as `NO_DATA`. Only transport-level failures and upstream HTTP
/// error statuses end up here.
#[derive(Debug, Error)]
pub enum GatewayError {
    /// Network-level failure (connect, DNS, timeout) on the outbound call.
    #[error("upstream request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// Upstream answered with a non-2xx status.
    #[error("upstream returned status {status}")]
    UpstreamStatus { status: u16 },

    /// The constructed upstream URL was not valid.
    #[error("invalid upstream URL: {0}")]
    InvalidUrl(#[from] url::ParseError),
}

impl GatewayError {
    /// Human-readable detail string surfaced in the error envelope.
    pub fn detail(&self) -> String {
        self.to_string()
    }
}

/// Result type for gateway operations.
pub type GatewayResult<T> = Result<T, GatewayError>;
