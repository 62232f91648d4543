//! LLM provider trait — the boundary to the remote generative-language service.

use async_trait::async_trait;
use vitasim_core::types::{SessionConfiguration, Turn};

use crate::error::ProviderError;

/// Everything one completion call needs.
#[derive(Clone, Copy, Debug)]
pub struct GenerateRequest<'a> {
    /// Instruction, output hint, safety thresholds, sampling.
    pub configuration: &'a SessionConfiguration,
    /// Prior turns, oldest first.
    pub history: &'a [Turn],
    /// The new user text.
    pub message: &'a str,
}

/// Trait that all remote backends implement.
///
/// The service is stateless per call: whatever context it should see must
/// be supplied in `history`.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Request one completion. Returns the completion text.
    async fn generate(&self, request: &GenerateRequest<'_>) -> Result<String, ProviderError>;

    /// Display name for logging.
    fn display_name(&self) -> &str;
}
