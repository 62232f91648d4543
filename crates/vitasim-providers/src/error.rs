//! Remote call failures.

use thiserror::Error;

/// Why a remote call produced no usable completion.
#[derive(Debug, Error)]
pub enum ProviderError {
    #[error("network error: {0}")]
    Network(String),

    #[error("rate limited by the API")]
    RateLimited,

    #[error("API error: HTTP {status}: {body}")]
    Api { status: u16, body: String },

    #[error("failed to parse API response: {0}")]
    Parse(String),

    #[error("request blocked by safety filters: {0}")]
    Blocked(String),

    #[error("model returned no text (finish reason: {0})")]
    EmptyResponse(String),
}

impl From<reqwest::Error> for ProviderError {
    fn from(e: reqwest::Error) -> Self {
        if e.is_decode() {
            ProviderError::Parse(e.to_string())
        } else {
            ProviderError::Network(e.to_string())
        }
    }
}
