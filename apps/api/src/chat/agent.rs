//! Chat Orchestrator — one resume, one mode, many sessions.
//!
//! Flow per exchange: history → contextualize → retrieve → synthesize →
//! append. Each step is one sequential backend round trip; any failure
//! propagates and leaves the session untouched.

use std::path::PathBuf;
use std::sync::Arc;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::chat::contextualizer::contextualize;
use crate::chat::session::{InMemorySessionStore, SessionStore};
use crate::chat::synthesizer::{synthesize, SynthesisInput};
use crate::chat::ChatMode;
use crate::config::{Config, DEFAULT_EMBED_MODEL, DEFAULT_LLM_MODEL, DEFAULT_RESUME_PATH};
use crate::ingest::{load_resume, IngestError};
use crate::llm_client::{LlmClient, LlmError, TextEmbedder, TextGenerator};
use crate::retrieval::{EmbeddingIndex, IndexError, ScoredPassage, DEFAULT_TOP_K};

/// Session key used by the command-line mode, which only ever holds one
/// conversation.
pub const DEFAULT_SESSION_KEY: &str = "acc_setup";

#[derive(Debug, Error)]
pub enum AgentError {
    #[error("Resume ingestion failed: {0}")]
    Ingest(#[from] IngestError),

    #[error("Index error: {0}")]
    Index(#[from] IndexError),

    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

/// Fixed at construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    pub mode: ChatMode,
    pub job_summary: String,
    pub llm_model: String,
    pub embed_model: String,
    pub resume_path: PathBuf,
}

impl AgentConfig {
    pub fn new(mode: ChatMode, job_summary: impl Into<String>) -> Self {
        Self {
            mode,
            job_summary: job_summary.into(),
            llm_model: DEFAULT_LLM_MODEL.to_string(),
            embed_model: DEFAULT_EMBED_MODEL.to_string(),
            resume_path: PathBuf::from(DEFAULT_RESUME_PATH),
        }
    }

    pub fn with_resume_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.resume_path = path.into();
        self
    }

    /// Takes the model identifiers from application config.
    pub fn with_models(mut self, config: &Config) -> Self {
        self.llm_model = config.llm_model.clone();
        self.embed_model = config.embed_model.clone();
        self
    }
}

/// The two backend operations the pipeline consumes.
#[derive(Clone)]
pub struct ModelBackend {
    pub generator: Arc<dyn TextGenerator>,
    pub embedder: Arc<dyn TextEmbedder>,
}

impl ModelBackend {
    /// Ollama backend using the agent's model identifiers.
    pub fn ollama(base_url: &str, agent: &AgentConfig) -> Self {
        let client = Arc::new(LlmClient::new(
            base_url,
            agent.llm_model.clone(),
            agent.embed_model.clone(),
        ));
        Self {
            generator: client.clone(),
            embedder: client,
        }
    }
}

/// The transient record of one exchange. Only `input` and `answer` are kept.
#[derive(Debug, Clone, Serialize)]
pub struct MessageExchange {
    pub input: String,
    pub query: String,
    pub context: Vec<ScoredPassage>,
    pub answer: String,
}

/// Anything that can hold a keyed conversation about a resume.
#[async_trait]
pub trait ChatAgent: Send + Sync {
    fn mode(&self) -> ChatMode;

    async fn chat(&self, session_key: &str, utterance: &str) -> Result<String, AgentError>;
}

pub struct ResumeAgent {
    config: AgentConfig,
    index: EmbeddingIndex,
    backend: ModelBackend,
    sessions: Arc<dyn SessionStore>,
}

impl ResumeAgent {
    /// Ingests and indexes the resume with a fresh in-memory session store.
    /// Blocks until every passage is embedded.
    pub async fn build(config: AgentConfig, backend: ModelBackend) -> Result<Self, AgentError> {
        Self::build_with_store(config, backend, Arc::new(InMemorySessionStore::new())).await
    }

    pub async fn build_with_store(
        config: AgentConfig,
        backend: ModelBackend,
        sessions: Arc<dyn SessionStore>,
    ) -> Result<Self, AgentError> {
        let path = config.resume_path.clone();
        let passages = tokio::task::spawn_blocking(move || load_resume(&path)).await??;
        let index = EmbeddingIndex::build(passages, backend.embedder.as_ref()).await?;

        info!(
            mode = %config.mode,
            model = %config.llm_model,
            embed_model = %config.embed_model,
            passages = index.len(),
            "Resume agent ready"
        );

        Ok(Self::from_index(config, index, backend, sessions))
    }

    /// Assembles an agent around an already-built index.
    pub fn from_index(
        config: AgentConfig,
        index: EmbeddingIndex,
        backend: ModelBackend,
        sessions: Arc<dyn SessionStore>,
    ) -> Self {
        Self {
            config,
            index,
            backend,
            sessions,
        }
    }

    pub fn config(&self) -> &AgentConfig {
        &self.config
    }

    pub fn sessions(&self) -> &Arc<dyn SessionStore> {
        &self.sessions
    }

    /// Runs one full exchange and records it under `session_key`.
    pub async fn exchange(
        &self,
        session_key: &str,
        utterance: &str,
    ) -> Result<MessageExchange, AgentError> {
        let history = self.sessions.history(session_key);

        let query = contextualize(self.backend.generator.as_ref(), &history, utterance).await?;
        let context = self
            .index
            .search(&query, self.backend.embedder.as_ref(), DEFAULT_TOP_K)
            .await?;
        let answer = synthesize(
            self.backend.generator.as_ref(),
            SynthesisInput {
                mode: self.config.mode,
                job_summary: &self.config.job_summary,
                passages: &context,
                history: &history,
                utterance,
            },
        )
        .await?;

        // The original utterance is recorded, never the rewritten query.
        self.sessions.append_exchange(session_key, utterance, &answer);

        info!(
            session = session_key,
            turns = history.len() / 2 + 1,
            passages = context.len(),
            "Exchange complete"
        );

        Ok(MessageExchange {
            input: utterance.to_string(),
            query,
            context,
            answer,
        })
    }
}

#[async_trait]
impl ChatAgent for ResumeAgent {
    fn mode(&self) -> ChatMode {
        self.config.mode
    }

    async fn chat(&self, session_key: &str, utterance: &str) -> Result<String, AgentError> {
        Ok(self.exchange(session_key, utterance).await?.answer)
    }
}
