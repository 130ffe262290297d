//! OpenRouter chat-completion client
//!
//! OpenAI-compatible API used by the advisor server and the meta-agent.
//! Uses a long-lived reqwest::Client for connection pooling.

use crate::error::MeshError;
use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{error, info};

pub const DEFAULT_MODEL: &str = "openrouter/sonoma-dusk-alpha";
const BASE_URL: &str = "https://openrouter.ai/api/v1/chat/completions";

/// Reusable OpenRouter client (connection-pooled)
pub struct OpenRouterClient {
    client: Client,
    api_key: String,
    model: String,
    base_url: String,
}

impl OpenRouterClient {
    pub fn new(api_key: String) -> Self {
        Self::with_model(api_key, DEFAULT_MODEL.to_string())
    }

    pub fn with_model(api_key: String, model: String) -> Self {
        let client = Client::builder()
            .pool_idle_timeout(Duration::from_secs(90))
            .pool_max_idle_per_host(8)
            .timeout(Duration::from_secs(60))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            api_key,
            model,
            base_url: BASE_URL.to_string(),
        }
    }

    /// Read OPENROUTER_API_KEY from the environment.
    pub fn from_env() -> crate::Result<Self> {
        let api_key = std::env::var("OPENROUTER_API_KEY")
            .map_err(|_| MeshError::ConfigError("OPENROUTER_API_KEY not set".to_string()))?;
        Ok(Self::new(api_key))
    }
}

#[async_trait]
impl super::ChatModel for OpenRouterClient {
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> crate::Result<String> {
        if self.api_key.is_empty() {
            return Err(MeshError::ConfigError(
                "OPENROUTER_API_KEY not configured".to_string(),
            ));
        }

        let request = ChatRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: system_prompt.to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: user_prompt.to_string(),
                },
            ],
            temperature: 0.0,
        };

        info!(model = %self.model, "Calling OpenRouter API");

        let response = self
            .client
            .post(&self.base_url)
            .bearer_auth(&self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                error!("OpenRouter request failed: {}", e);
                MeshError::LlmError(format!("OpenRouter API error: {}", e))
            })?;

        if !response.status().is_success() {
            let error_text = response.text().await.unwrap_or_default();
            error!("OpenRouter error response: {}", error_text);
            return Err(MeshError::LlmError(format!(
                "OpenRouter API error: {}",
                error_text
            )));
        }

        let completion: ChatResponse = response.json().await.map_err(|e| {
            error!("Failed to parse OpenRouter response: {}", e);
            MeshError::LlmError(format!("OpenRouter parse error: {}", e))
        })?;

        let answer = completion
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| MeshError::LlmError("No choices in OpenRouter response".to_string()))?;

        Ok(answer)
    }
}

#[derive(Debug, Serialize)]
struct ChatRequest {
    model: String,
    messages: Vec<ChatMessage>,
    temperature: f32,
}

#[derive(Debug, Serialize, Deserialize)]
struct ChatMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatMessage,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_serialization() {
        let request = ChatRequest {
            model: DEFAULT_MODEL.to_string(),
            messages: vec![
                ChatMessage {
                    role: "system".to_string(),
                    content: "You are a financial advisor".to_string(),
                },
                ChatMessage {
                    role: "user".to_string(),
                    content: "What is a P/E ratio?".to_string(),
                },
            ],
            temperature: 0.0,
        };

        let json = serde_json::to_string(&request).unwrap();
        assert!(json.contains("What is a P/E ratio?"));
        assert!(json.contains("sonoma-dusk-alpha"));
    }

    #[test]
    fn test_response_deserialization() {
        let raw = r#"{
            "choices": [
                {"message": {"role": "assistant", "content": "A valuation ratio."}}
            ]
        }"#;

        let parsed: ChatResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(parsed.choices[0].message.content, "A valuation ratio.");
    }
}
