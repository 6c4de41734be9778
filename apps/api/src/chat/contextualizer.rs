//! Query Contextualizer — rewrites a follow-up into a standalone question.

use tracing::debug;

use crate::chat::prompts::CONTEXTUALIZE_SYSTEM;
use crate::chat::session::ChatMessage;
use crate::llm_client::{LlmError, PromptMessage, TextGenerator};

/// Returns a retrieval query for `utterance`.
///
/// With no history the utterance is already standalone and is returned
/// without a model call. Otherwise the model is asked to rewrite it; an empty
/// reply falls back to the utterance. Whether the model actually refrained
/// from answering is not checked.
pub async fn contextualize(
    generator: &dyn TextGenerator,
    history: &[ChatMessage],
    utterance: &str,
) -> Result<String, LlmError> {
    if history.is_empty() {
        return Ok(utterance.to_string());
    }

    let messages = build_messages(history, utterance);
    let rewritten = generator.generate(&messages).await?;
    let rewritten = rewritten.trim();

    debug!(original = utterance, rewritten, "Contextualized query");

    if rewritten.is_empty() {
        Ok(utterance.to_string())
    } else {
        Ok(rewritten.to_string())
    }
}

fn build_messages(history: &[ChatMessage], utterance: &str) -> Vec<PromptMessage> {
    let mut messages = Vec::with_capacity(history.len() + 2);
    messages.push(PromptMessage::system(CONTEXTUALIZE_SYSTEM));
    messages.extend(history.iter().map(PromptMessage::from));
    messages.push(PromptMessage::user(utterance));
    messages
}
