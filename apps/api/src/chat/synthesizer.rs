//! Answer Synthesizer — produces the reply from retrieved passages.
//!
//! Prompt layout: one system message (mode instructions, then the job summary
//! and resume passages fenced as untrusted content), the session history, and
//! finally the user's own utterance.

use crate::chat::prompts::{CONTEXT_PREAMBLE, ENHANCE_INSTRUCTIONS, INTERVIEW_INSTRUCTIONS};
use crate::chat::session::ChatMessage;
use crate::chat::ChatMode;
use crate::llm_client::prompts::{fence_untrusted, UNTRUSTED_CONTENT_INSTRUCTION};
use crate::llm_client::{LlmError, PromptMessage, TextGenerator};
use crate::retrieval::ScoredPassage;

/// Everything one synthesis call needs.
pub struct SynthesisInput<'a> {
    pub mode: ChatMode,
    pub job_summary: &'a str,
    pub passages: &'a [ScoredPassage],
    pub history: &'a [ChatMessage],
    pub utterance: &'a str,
}

pub async fn synthesize(
    generator: &dyn TextGenerator,
    input: SynthesisInput<'_>,
) -> Result<String, LlmError> {
    let messages = build_messages(&input);
    let answer = generator.generate(&messages).await?;
    Ok(answer.trim().to_string())
}

pub fn build_messages(input: &SynthesisInput<'_>) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(input.history.len() + 2);
    messages.push(PromptMessage::system(build_system_prompt(
        input.mode,
        input.job_summary,
        input.passages,
    )));
    messages.extend(input.history.iter().map(PromptMessage::from));
    messages.push(PromptMessage::user(input.utterance));
    messages
}

pub fn build_system_prompt(
    mode: ChatMode,
    job_summary: &str,
    passages: &[ScoredPassage],
) -> String {
    let instructions = match mode {
        ChatMode::Enhance => ENHANCE_INSTRUCTIONS,
        ChatMode::Interview => INTERVIEW_INSTRUCTIONS,
    };

    format!(
        "{instructions}\n\n{UNTRUSTED_CONTENT_INSTRUCTION}\n\nJob Summary:\n{}\n\n{CONTEXT_PREAMBLE}\n\nContext:\n{}",
        fence_untrusted("job_summary", job_summary),
        fence_untrusted("resume_context", &join_passages(passages)),
    )
}

/// Passages in retrieval order, separated by blank lines.
fn join_passages(passages: &[ScoredPassage]) -> String {
    passages
        .iter()
        .map(|p| p.passage.text.as_str())
        .collect::<Vec<_>>()
        .join("\n\n")
}
