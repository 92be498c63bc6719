//! Boundary to the external LLM generation call.

use std::time::Duration;

use async_trait::async_trait;

use crate::error::Result;
use crate::settings::AIModelConfig;

/// Text returned instead of an empty string when the provider sends no content.
pub const NO_OUTPUT_PLACEHOLDER: &str = "// No output generated";

/// A single generation request: one prompt, one response.
#[derive(Debug, Clone, PartialEq)]
pub struct GenerationRequest {
    pub prompt: String,
    pub model_name: String,
    pub temperature: f32,
    pub max_tokens: u32,
    pub top_p: f32,
    /// Deadline for one round trip; enforced by the client.
    pub timeout: Option<Duration>,
    /// Extra attempts the client may spend on retryable provider failures.
    pub max_retries: u32,
}

impl GenerationRequest {
    /// Builds a request from a prompt and the model section of the settings.
    pub fn from_config(prompt: impl Into<String>, config: &AIModelConfig) -> Self {
        Self {
            prompt: prompt.into(),
            model_name: config.model_name.clone(),
            temperature: config.temperature,
            max_tokens: config.max_tokens,
            top_p: config.top_p,
            timeout: config.timeout_ms.map(Duration::from_millis),
            max_retries: config.max_retries.unwrap_or(0),
        }
    }
}

/// Translates a prompt plus model parameters into generated text.
///
/// Implementations must never return an empty string; provider failures of
/// any kind are reported as `ChimeraError::Generation` and a missing
/// credential as `ChimeraError::Configuration`.
#[async_trait]
pub trait GenerationClient: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<String>;
}
