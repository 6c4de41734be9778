// Chat pipeline: contextualize → retrieve → synthesize → record.
// All backend calls go through llm_client traits; nothing here talks HTTP.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod agent;
pub mod contextualizer;
pub mod prompts;
pub mod session;
pub mod synthesizer;

/// What the assistant does with the resume. Fixed per agent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ChatMode {
    /// Rate the resume against the job and suggest improvements.
    Enhance,
    /// Run a mock interview grounded in the resume.
    Interview,
}

impl ChatMode {
    /// Label shown in the page's mode selector.
    pub fn label(self) -> &'static str {
        match self {
            ChatMode::Enhance => "Enhance resume",
            ChatMode::Interview => "Simulate interview",
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ChatMode::Enhance => "enhance",
            ChatMode::Interview => "interview",
        }
    }
}

impl fmt::Display for ChatMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for ChatMode {
    type Err = String;

    /// Accepts the short names, the selector labels, and `simulate`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "enhance" | "enhance resume" => Ok(ChatMode::Enhance),
            "interview" | "simulate" | "simulate interview" => Ok(ChatMode::Interview),
            other => Err(format!("unknown chat mode '{other}'")),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_parses_labels_and_names() {
        assert_eq!("enhance".parse::<ChatMode>().unwrap(), ChatMode::Enhance);
        assert_eq!("Enhance resume".parse::<ChatMode>().unwrap(), ChatMode::Enhance);
        assert_eq!("Simulate interview".parse::<ChatMode>().unwrap(), ChatMode::Interview);
        assert_eq!("simulate".parse::<ChatMode>().unwrap(), ChatMode::Interview);
        assert!("---".parse::<ChatMode>().is_err());
    }

    #[test]
    fn test_mode_label_round_trips() {
        for mode in [ChatMode::Enhance, ChatMode::Interview] {
            assert_eq!(mode.label().parse::<ChatMode>().unwrap(), mode);
        }
    }
}
