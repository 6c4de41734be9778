//! LLM Client — the single point of entry for every backend call in Resume Chat.
//!
//! No other module talks to the Ollama HTTP API directly. Retrieval and
//! synthesis depend on the `TextEmbedder` / `TextGenerator` traits so tests can
//! swap in fakes.
//!
//! Calls are made once: no retries and no request timeout. A slow backend
//! blocks the turn until it answers.

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::debug;

pub mod prompts;

#[derive(Debug, Error)]
pub enum LlmError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Backend returned {actual} embeddings for {expected} inputs")]
    EmbeddingCount { expected: usize, actual: usize },

    #[error("LLM returned empty content")]
    EmptyContent,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

/// One message of a chat-style prompt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PromptMessage {
    pub role: Role,
    pub content: String,
}

impl PromptMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Produces a completion for a chat-style prompt.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, LlmError>;
}

/// Produces one embedding vector per input, in input order.
#[async_trait]
pub trait TextEmbedder: Send + Sync {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError>;
}

#[derive(Debug, Serialize)]
struct ChatRequest<'a> {
    model: &'a str,
    messages: &'a [PromptMessage],
    stream: bool,
}

#[derive(Debug, Deserialize)]
struct ChatResponse {
    message: PromptMessage,
    #[serde(default)]
    prompt_eval_count: Option<u32>,
    #[serde(default)]
    eval_count: Option<u32>,
}

#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [String],
}

#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

#[derive(Debug, Deserialize)]
struct OllamaError {
    error: String,
}

/// Client for an Ollama-compatible backend, bound to one generation model and
/// one embedding model.
#[derive(Clone)]
pub struct LlmClient {
    client: Client,
    base_url: String,
    chat_model: String,
    embed_model: String,
}

impl LlmClient {
    pub fn new(
        base_url: impl Into<String>,
        chat_model: impl Into<String>,
        embed_model: impl Into<String>,
    ) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.into(),
            chat_model: chat_model.into(),
            embed_model: embed_model.into(),
        }
    }

    async fn post<B: Serialize, T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        body: &B,
    ) -> Result<T, LlmError> {
        let response = self
            .client
            .post(format!("{}{}", self.base_url, path))
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            let message = serde_json::from_str::<OllamaError>(&body)
                .map(|e| e.error)
                .unwrap_or(body);
            return Err(LlmError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }
}

#[async_trait]
impl TextGenerator for LlmClient {
    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, LlmError> {
        let request = ChatRequest {
            model: &self.chat_model,
            messages,
            stream: false,
        };
        let response: ChatResponse = self.post("/api/chat", &request).await?;

        debug!(
            model = %self.chat_model,
            prompt_tokens = ?response.prompt_eval_count,
            output_tokens = ?response.eval_count,
            "Chat call succeeded"
        );

        if response.message.content.trim().is_empty() {
            return Err(LlmError::EmptyContent);
        }
        Ok(response.message.content)
    }
}

#[async_trait]
impl TextEmbedder for LlmClient {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        if inputs.is_empty() {
            return Ok(Vec::new());
        }
        let request = EmbedRequest {
            model: &self.embed_model,
            input: inputs,
        };
        let response: EmbedResponse = self.post("/api/embed", &request).await?;

        if response.embeddings.len() != inputs.len() {
            return Err(LlmError::EmbeddingCount {
                expected: inputs.len(),
                actual: response.embeddings.len(),
            });
        }

        debug!(model = %self.embed_model, count = inputs.len(), "Embed call succeeded");
        Ok(response.embeddings)
    }
}
