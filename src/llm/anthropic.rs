use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::llm::client::{
    GenerationRequest, OutputSchema, StageParams, StructuredReply, TextGenerator,
};

const DEFAULT_ANTHROPIC_ENDPOINT: &str = "https://api.anthropic.com/v1/messages";
const DEFAULT_ANTHROPIC_MODEL: &str = "claude-sonnet-4-20250514";
const DEFAULT_TIMEOUT_SECS: u64 = 45;

/// Configuration for the Anthropic API client
#[derive(Debug, Clone)]
pub struct AnthropicConfig {
    /// API key (from ANTHROPIC_API_KEY env var)
    pub api_key: String,
    /// Model to use (e.g., "claude-sonnet-4-20250514")
    pub model: String,
    /// Messages endpoint
    pub endpoint: String,
    /// HTTP request timeout
    pub timeout_secs: u64,
}

impl AnthropicConfig {
    /// Create config from environment variables
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("ANTHROPIC_API_KEY")
            .context("ANTHROPIC_API_KEY environment variable not set")?;

        let mut config = Self::new(api_key, DEFAULT_ANTHROPIC_MODEL.to_string());
        if let Ok(model) = std::env::var("CALLGUARD_MODEL") {
            if !model.trim().is_empty() {
                config.model = model.trim().to_string();
            }
        }
        if let Ok(endpoint) = std::env::var("ANTHROPIC_ENDPOINT") {
            if !endpoint.trim().is_empty() {
                config.endpoint = endpoint.trim().to_string();
            }
        }
        Ok(config)
    }

    /// Create with custom settings
    pub fn new(api_key: String, model: String) -> Self {
        Self {
            api_key,
            model,
            endpoint: DEFAULT_ANTHROPIC_ENDPOINT.to_string(),
            timeout_secs: DEFAULT_TIMEOUT_SECS,
        }
    }
}

/// Anthropic API client
pub struct AnthropicClient {
    client: Client,
    config: AnthropicConfig,
}

impl AnthropicClient {
    pub fn new(config: AnthropicConfig) -> Result<Self> {
        if config.api_key.trim().is_empty() {
            anyhow::bail!("Anthropic API key is empty");
        }

        Ok(Self {
            client: Client::builder()
                .timeout(Duration::from_secs(config.timeout_secs))
                .build()
                .context("Failed to build Anthropic HTTP client")?,
            config,
        })
    }

    /// Send a message to Claude and get a response
    pub async fn send_message(
        &self,
        system: &str,
        user: &str,
        params: StageParams,
    ) -> Result<String> {
        let request = self.build_request(system, user, params, None);
        let response = self.post(&request).await?;

        // Concatenate all text blocks
        let text: String = response
            .content
            .iter()
            .filter(|c| c.content_type == "text")
            .map(|c| c.text.as_str())
            .collect();

        if text.trim().is_empty() {
            anyhow::bail!("No text content in response");
        }
        Ok(text)
    }

    /// Send a message with a forced tool call for structured output
    pub async fn send_with_tool(
        &self,
        system: &str,
        user: &str,
        params: StageParams,
        schema: OutputSchema<'_>,
    ) -> Result<serde_json::Value> {
        let tool = Tool {
            name: schema.name.to_string(),
            description: schema.description.to_string(),
            input_schema: schema.schema.clone(),
        };
        let request = self.build_request(system, user, params, Some(tool));
        let response = self.post(&request).await?;

        // Find the tool_use content block
        response
            .content
            .into_iter()
            .find(|c| c.content_type == "tool_use" && c.name.as_deref() == Some(schema.name))
            .and_then(|c| c.input)
            .with_context(|| format!("No {} tool_use response found", schema.name))
    }

    fn build_request(
        &self,
        system: &str,
        user: &str,
        params: StageParams,
        tool: Option<Tool>,
    ) -> AnthropicRequest {
        let tool_choice = tool.as_ref().map(|t| ToolChoice {
            choice_type: "tool".to_string(),
            name: t.name.clone(),
        });

        AnthropicRequest {
            model: self.config.model.clone(),
            max_tokens: params.max_tokens,
            temperature: Some(params.temperature),
            system: Some(system.to_string()),
            messages: vec![Message {
                role: "user".to_string(),
                content: user.to_string(),
            }],
            tools: tool.into_iter().collect(),
            tool_choice,
        }
    }

    async fn post(&self, request: &AnthropicRequest) -> Result<AnthropicResponse> {
        debug!(
            "Anthropic request: model={}, max_tokens={}, tools={}",
            request.model,
            request.max_tokens,
            request.tools.len()
        );

        let response = self
            .client
            .post(&self.config.endpoint)
            .header("x-api-key", &self.config.api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(request)
            .send()
            .await
            .context("Failed to send request to Anthropic API")?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            anyhow::bail!("Anthropic API error: {} - {}", status, body);
        }

        response
            .json()
            .await
            .context("Failed to parse Anthropic API response")
    }
}

#[async_trait]
impl TextGenerator for AnthropicClient {
    async fn generate(&self, request: GenerationRequest<'_>) -> Result<String> {
        self.send_message(request.system, request.user, request.params)
            .await
    }

    async fn generate_structured(
        &self,
        request: GenerationRequest<'_>,
        schema: OutputSchema<'_>,
    ) -> Result<StructuredReply> {
        self.send_with_tool(request.system, request.user, request.params, schema)
            .await
            .map(StructuredReply::Json)
    }

    fn name(&self) -> &str {
        "anthropic"
    }
}

#[derive(Debug, Serialize)]
struct AnthropicRequest {
    model: String,
    max_tokens: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    system: Option<String>,
    messages: Vec<Message>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<Tool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Serialize)]
struct Message {
    role: String,
    content: String,
}

#[derive(Debug, Serialize)]
struct Tool {
    name: String,
    description: String,
    input_schema: serde_json::Value,
}

#[derive(Debug, Serialize)]
struct ToolChoice {
    #[serde(rename = "type")]
    choice_type: String,
    name: String,
}

#[derive(Debug, Deserialize)]
struct AnthropicResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    #[serde(rename = "type")]
    content_type: String,
    #[serde(default)]
    text: String,
    #[serde(default)]
    name: Option<String>,
    #[serde(default)]
    input: Option<serde_json::Value>,
}
