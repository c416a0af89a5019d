use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;

use crate::llm::anthropic::{AnthropicClient, AnthropicConfig};
use crate::llm::gemini::{GeminiClient, GeminiConfig};

/// Sampling parameters for one generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct StageParams {
    /// Temperature (0-1, lower = more deterministic)
    pub temperature: f64,
    /// Maximum tokens in response
    pub max_tokens: u32,
}

impl StageParams {
    pub const SUMMARIZER: StageParams = StageParams {
        temperature: 0.3,
        max_tokens: 300,
    };

    pub const CLASSIFIER: StageParams = StageParams {
        temperature: 0.4,
        max_tokens: 200,
    };
}

/// A single instruction + input call to a text-generation backend
#[derive(Debug, Clone, Copy)]
pub struct GenerationRequest<'a> {
    /// Fixed instruction template
    pub system: &'a str,
    /// Rendered input for this invocation
    pub user: &'a str,
    pub params: StageParams,
}

/// JSON schema the backend must shape its answer to
#[derive(Debug, Clone, Copy)]
pub struct OutputSchema<'a> {
    /// Name of the submission tool or schema
    pub name: &'a str,
    pub description: &'a str,
    pub schema: &'a serde_json::Value,
}

/// Raw structured answer, before schema validation
#[derive(Debug, Clone, PartialEq)]
pub enum StructuredReply {
    /// Backend returned a decoded JSON value (tool use)
    Json(serde_json::Value),
    /// Backend returned text that should contain a JSON object
    Text(String),
}

/// A text-generation backend
///
/// Implementations must be safe to call from concurrent invocations; the
/// pipeline never retries a failed call.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Free-text generation
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String>;

    /// Generation constrained to an output schema
    async fn generate_structured(
        &self,
        request: GenerationRequest<'_>,
        schema: OutputSchema<'_>,
    ) -> Result<StructuredReply>;

    /// Provider name used in logs
    fn name(&self) -> &str;
}

/// Build a generator for the named provider, configured from the environment
pub fn build_generator(provider: &str, model: Option<&str>) -> Result<Arc<dyn TextGenerator>> {
    match provider.trim().to_lowercase().as_str() {
        "anthropic" | "claude" => {
            let mut config = AnthropicConfig::from_env()?;
            if let Some(model) = model {
                config.model = model.to_string();
            }
            Ok(Arc::new(AnthropicClient::new(config)?))
        }
        "gemini" | "google" => {
            let mut config = GeminiConfig::from_env()?;
            if let Some(model) = model {
                config.model = model.to_string();
            }
            Ok(Arc::new(GeminiClient::new(config)?))
        }
        other => anyhow::bail!(
            "Unsupported provider '{}'. Supported providers: anthropic, gemini",
            other
        ),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unsupported_provider_returns_error() {
        let err = match build_generator("openai", None) {
            Ok(_) => panic!("expected provider creation to fail"),
            Err(e) => e.to_string(),
        };
        assert!(err.contains("Unsupported provider 'openai'"));
    }

    #[test]
    fn test_stage_params() {
        assert_eq!(StageParams::SUMMARIZER.max_tokens, 300);
        assert_eq!(StageParams::CLASSIFIER.temperature, 0.4);
    }
}
