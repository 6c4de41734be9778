#![allow(dead_code)]

use std::sync::Mutex;

use async_trait::async_trait;

use resume_chat::llm_client::{LlmError, PromptMessage, Role, TextEmbedder, TextGenerator};

const VOCABULARY: &[&str] = &[
    "python",
    "go",
    "distributed",
    "systems",
    "education",
    "experience",
    "years",
    "sql",
    "kubernetes",
    "degree",
];

/// Bag-of-words embedder over a fixed vocabulary, plus a bias dimension so no
/// vector is all zeros.
#[derive(Default)]
pub struct KeywordEmbedder {
    pub calls: Mutex<Vec<Vec<String>>>,
}

pub fn keyword_vector(text: &str) -> Vec<f32> {
    let lowered = text.to_lowercase();
    let words: Vec<&str> = lowered
        .split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .collect();
    let mut vector: Vec<f32> = VOCABULARY
        .iter()
        .map(|term| words.iter().filter(|w| **w == *term).count() as f32)
        .collect();
    vector.push(0.1);
    vector
}

#[async_trait]
impl TextEmbedder for KeywordEmbedder {
    async fn embed(&self, inputs: &[String]) -> Result<Vec<Vec<f32>>, LlmError> {
        self.calls.lock().unwrap().push(inputs.to_vec());
        Ok(inputs.iter().map(|t| keyword_vector(t)).collect())
    }
}

/// Answers contextualization requests with a marked rewrite and everything
/// else with a fixed reply. Records every prompt it sees.
pub struct ScriptedGenerator {
    pub answer: String,
    pub fail_answers: bool,
    pub calls: Mutex<Vec<Vec<PromptMessage>>>,
}

impl ScriptedGenerator {
    pub fn new(answer: &str) -> Self {
        Self {
            answer: answer.to_string(),
            fail_answers: false,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub fn failing() -> Self {
        Self {
            fail_answers: true,
            ..Self::new("")
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    /// Prompts of answer calls, skipping contextualization calls.
    pub fn answer_prompts(&self) -> Vec<Vec<PromptMessage>> {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|msgs| !is_contextualize(msgs))
            .cloned()
            .collect()
    }
}

pub fn is_contextualize(messages: &[PromptMessage]) -> bool {
    messages
        .first()
        .map(|m| m.role == Role::System && m.content.contains("formulate a standalone question"))
        .unwrap_or(false)
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, messages: &[PromptMessage]) -> Result<String, LlmError> {
        self.calls.lock().unwrap().push(messages.to_vec());
        if is_contextualize(messages) {
            let last = messages.last().map(|m| m.content.clone()).unwrap_or_default();
            return Ok(format!("Standalone: {last}"));
        }
        if self.fail_answers {
            return Err(LlmError::Api {
                status: 500,
                message: "model crashed".to_string(),
            });
        }
        Ok(self.answer.clone())
    }
}
