//! Chat model trait and implementations
//!
//! Both the advisor server and the meta-agent talk to an
//! OpenAI-compatible chat-completion API through this seam.

use crate::Result;
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::Mutex;

pub mod openrouter;
pub use openrouter::OpenRouterClient;

/// Trait for a single-turn chat completion (LLM controlled)
#[async_trait]
pub trait ChatModel: Send + Sync {
    /// Produce a completion for a user prompt under a system prompt.
    async fn complete(&self, system_prompt: &str, user_prompt: &str) -> Result<String>;
}

/// Scripted chat model for development & testing
/// Keeps the mesh functional without LLM dependency
pub struct ScriptedChat {
    responses: Mutex<VecDeque<String>>,
}

impl ScriptedChat {
    pub fn new(responses: Vec<String>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }
}

#[async_trait]
impl ChatModel for ScriptedChat {
    async fn complete(&self, _system_prompt: &str, _user_prompt: &str) -> Result<String> {
        let mut responses = self
            .responses
            .lock()
            .map_err(|_| crate::error::MeshError::LlmError("scripted chat poisoned".to_string()))?;

        responses
            .pop_front()
            .ok_or_else(|| crate::error::MeshError::LlmError("scripted chat exhausted".to_string()))
    }
}
