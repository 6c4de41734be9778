//! Presentation layer as an explicit state machine.
//!
//! Phases: `FormIncomplete` → `FormValid` → `Chatting`, driven by discrete
//! events. The displayed transcript is kept here, separate from the agent's
//! own session store.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use bytes::Bytes;
use serde::Serialize;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

use crate::chat::agent::{AgentConfig, AgentError, ChatAgent, ModelBackend, ResumeAgent};
use crate::chat::session::ChatMessage;
use crate::chat::ChatMode;
use crate::config::Config;
use crate::llm_client::Role;

pub mod handlers;

/// Selector value meaning "no mode chosen".
pub const MODE_PLACEHOLDER: &str = "---";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum PagePhase {
    FormIncomplete,
    FormValid,
    Chatting,
}

/// A required form field that is missing. Each has its own message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Error)]
#[serde(rename_all = "snake_case")]
pub enum FormError {
    #[error("Enter a job description")]
    MissingJobDescription,

    #[error("Resume not uploaded!")]
    MissingResume,

    #[error("Choose a chat option!")]
    MissingMode,
}

impl FormError {
    pub fn field(self) -> &'static str {
        match self {
            FormError::MissingJobDescription => "job_description",
            FormError::MissingResume => "resume",
            FormError::MissingMode => "mode",
        }
    }
}

#[derive(Debug, Error)]
pub enum PageError {
    #[error("Form incomplete: {}", join_form_errors(.0))]
    Form(Vec<FormError>),

    #[error("Enter a job description before choosing a chat option")]
    ModeLocked,

    #[error("Unknown chat option '{0}'")]
    UnknownMode(String),

    #[error("Uploaded file is not a PDF")]
    NotPdf,

    #[error("Chat is not active; submit the form first")]
    ChatInactive,

    #[error("Message is empty")]
    EmptyMessage,

    #[error("Failed to store uploaded resume: {0}")]
    Upload(#[from] std::io::Error),

    #[error(transparent)]
    Agent(#[from] AgentError),
}

fn join_form_errors(errors: &[FormError]) -> String {
    errors
        .iter()
        .map(|e| e.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}

/// Parses a selector value; the placeholder means no mode.
pub fn parse_mode_selection(raw: &str) -> Result<Option<ChatMode>, PageError> {
    if raw.trim() == MODE_PLACEHOLDER {
        return Ok(None);
    }
    raw.parse::<ChatMode>()
        .map(Some)
        .map_err(|_| PageError::UnknownMode(raw.to_string()))
}

#[derive(Debug, Clone)]
pub enum PageEvent {
    JobDescriptionChanged(String),
    ResumeUploaded(Bytes),
    ModeChanged(Option<ChatMode>),
    Submit,
    MessageSent(String),
}

#[derive(Debug, Clone, PartialEq)]
pub enum PageOutcome {
    Updated,
    Reply(String),
}

/// Builds an agent for the page. Swappable so the state machine can run
/// without a PDF or a model backend.
#[async_trait]
pub trait AgentFactory: Send + Sync {
    async fn build(
        &self,
        mode: ChatMode,
        job_summary: &str,
        resume_path: &Path,
    ) -> Result<Arc<dyn ChatAgent>, AgentError>;
}

/// Production factory: a `ResumeAgent` on the configured Ollama backend.
pub struct OllamaAgentFactory {
    config: Config,
}

impl OllamaAgentFactory {
    pub fn new(config: Config) -> Self {
        Self { config }
    }
}

#[async_trait]
impl AgentFactory for OllamaAgentFactory {
    async fn build(
        &self,
        mode: ChatMode,
        job_summary: &str,
        resume_path: &Path,
    ) -> Result<Arc<dyn ChatAgent>, AgentError> {
        let agent_config = AgentConfig::new(mode, job_summary)
            .with_models(&self.config)
            .with_resume_path(resume_path);
        let backend = ModelBackend::ollama(&self.config.ollama_host, &agent_config);
        let agent = ResumeAgent::build(agent_config, backend).await?;
        Ok(Arc::new(agent))
    }
}

/// Serializable view of the page.
#[derive(Debug, Clone, Serialize)]
pub struct PageSnapshot {
    pub phase: PagePhase,
    pub job_description: String,
    pub resume_uploaded: bool,
    pub mode: String,
    /// Mode selector is disabled until a job description is entered.
    pub mode_selectable: bool,
    /// Incremented every time a new agent is built.
    pub agent_generation: u64,
    pub transcript: Vec<ChatMessage>,
}

pub struct PageController {
    job_description: String,
    resume_uploaded: bool,
    mode: Option<ChatMode>,
    chat_started: bool,
    agent: Option<Arc<dyn ChatAgent>>,
    agent_generation: u64,
    session_key: String,
    transcript: Vec<ChatMessage>,
    upload_path: PathBuf,
    factory: Arc<dyn AgentFactory>,
}

impl PageController {
    pub fn new(upload_path: impl Into<PathBuf>, factory: Arc<dyn AgentFactory>) -> Self {
        Self {
            job_description: String::new(),
            resume_uploaded: false,
            mode: None,
            chat_started: false,
            agent: None,
            agent_generation: 0,
            session_key: Uuid::new_v4().to_string(),
            transcript: Vec::new(),
            upload_path: upload_path.into(),
            factory,
        }
    }

    pub fn phase(&self) -> PagePhase {
        if self.chat_started && self.agent.is_some() {
            PagePhase::Chatting
        } else if self.validate().is_ok() {
            PagePhase::FormValid
        } else {
            PagePhase::FormIncomplete
        }
    }

    pub fn transcript(&self) -> &[ChatMessage] {
        &self.transcript
    }

    pub fn agent_generation(&self) -> u64 {
        self.agent_generation
    }

    pub fn has_agent(&self) -> bool {
        self.agent.is_some()
    }

    /// Every missing required field, in form order.
    pub fn validate(&self) -> Result<(), Vec<FormError>> {
        let mut errors = Vec::new();
        if self.job_description.trim().is_empty() {
            errors.push(FormError::MissingJobDescription);
        }
        if !self.resume_uploaded {
            errors.push(FormError::MissingResume);
        }
        if self.mode.is_none() {
            errors.push(FormError::MissingMode);
        }
        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }

    pub fn snapshot(&self) -> PageSnapshot {
        PageSnapshot {
            phase: self.phase(),
            job_description: self.job_description.clone(),
            resume_uploaded: self.resume_uploaded,
            mode: self
                .mode
                .map(|m| m.label().to_string())
                .unwrap_or_else(|| MODE_PLACEHOLDER.to_string()),
            mode_selectable: !self.job_description.trim().is_empty(),
            agent_generation: self.agent_generation,
            transcript: self.transcript.clone(),
        }
    }

    pub async fn handle(&mut self, event: PageEvent) -> Result<PageOutcome, PageError> {
        match event {
            PageEvent::JobDescriptionChanged(text) => {
                self.set_job_description(text);
                Ok(PageOutcome::Updated)
            }
            PageEvent::ResumeUploaded(data) => {
                self.store_resume(&data)?;
                Ok(PageOutcome::Updated)
            }
            PageEvent::ModeChanged(mode) => {
                self.change_mode(mode).await?;
                Ok(PageOutcome::Updated)
            }
            PageEvent::Submit => {
                self.submit().await?;
                Ok(PageOutcome::Updated)
            }
            PageEvent::MessageSent(text) => self.send_message(&text).await.map(PageOutcome::Reply),
        }
    }

    fn set_job_description(&mut self, text: String) {
        if text == self.job_description {
            return;
        }
        self.job_description = text;
        // The agent's prompts embed the old job description.
        self.reset_conversation();
    }

    fn store_resume(&mut self, data: &[u8]) -> Result<(), PageError> {
        if !data.starts_with(b"%PDF-") {
            return Err(PageError::NotPdf);
        }
        write_upload(&self.upload_path, data)?;
        info!(path = %self.upload_path.display(), bytes = data.len(), "Resume uploaded");

        self.resume_uploaded = true;
        self.reset_conversation();
        Ok(())
    }

    async fn change_mode(&mut self, mode: Option<ChatMode>) -> Result<(), PageError> {
        if self.job_description.trim().is_empty() {
            return Err(PageError::ModeLocked);
        }
        if mode == self.mode {
            return Ok(());
        }

        self.mode = mode;
        let was_chatting = self.chat_started;
        self.reset_conversation();

        // Without a resume the agent is built on submit instead.
        if let (Some(mode), true) = (mode, self.resume_uploaded) {
            self.build_agent(mode).await?;
            self.chat_started = was_chatting;
        }
        Ok(())
    }

    async fn submit(&mut self) -> Result<(), PageError> {
        if let Err(errors) = self.validate() {
            for error in &errors {
                warn!(field = error.field(), "{error}");
            }
            return Err(PageError::Form(errors));
        }

        if self.agent.is_none() {
            if let Some(mode) = self.mode {
                self.build_agent(mode).await?;
            }
        }
        self.chat_started = true;
        Ok(())
    }

    async fn send_message(&mut self, text: &str) -> Result<String, PageError> {
        let agent = match (&self.agent, self.chat_started) {
            (Some(agent), true) => agent.clone(),
            _ => return Err(PageError::ChatInactive),
        };
        if text.trim().is_empty() {
            return Err(PageError::EmptyMessage);
        }

        let answer = agent.chat(&self.session_key, text).await?;

        self.transcript.push(ChatMessage::new(Role::User, text));
        self.transcript.push(ChatMessage::new(Role::Assistant, answer.clone()));
        Ok(answer)
    }

    async fn build_agent(&mut self, mode: ChatMode) -> Result<(), PageError> {
        let agent = self
            .factory
            .build(mode, &self.job_description, &self.upload_path)
            .await?;

        info!(
            mode = %agent.mode(),
            generation = self.agent_generation + 1,
            "Chat agent constructed"
        );
        self.agent = Some(agent);
        self.agent_generation += 1;
        self.session_key = Uuid::new_v4().to_string();
        Ok(())
    }

    /// Drops the agent (and with it the agent's sessions) and the displayed
    /// transcript.
    fn reset_conversation(&mut self) {
        self.agent = None;
        self.chat_started = false;
        self.transcript.clear();
    }
}

/// Writes the upload next to its destination, then renames over it, so a
/// failed write never leaves a truncated resume behind.
fn write_upload(path: &Path, data: &[u8]) -> std::io::Result<()> {
    use std::io::Write;

    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };
    let mut file = tempfile::NamedTempFile::new_in(dir)?;
    file.write_all(data)?;
    file.persist(path).map_err(|e| e.error)?;
    Ok(())
}
