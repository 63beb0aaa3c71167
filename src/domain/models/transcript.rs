//! Conversation transcripts sent to the reasoning engine.
//!
//! A transcript is built fresh for every engine call. Builder methods consume
//! the transcript and return the extended one, so a transcript that has been
//! handed to the engine is never mutated afterwards.

use serde::{Deserialize, Serialize};

/// Speaker of a single turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    /// Instructions framing the whole conversation.
    System,
    /// Requests from the orchestrator.
    User,
    /// Prior answers produced by the engine.
    Assistant,
}

impl Role {
    /// Wire name of the role.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
        }
    }
}

/// One `(role, content)` turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    /// Who is speaking.
    pub role: Role,
    /// What was said.
    pub content: String,
}

/// Ordered turns for a single engine call.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Transcript {
    turns: Vec<Turn>,
}

impl Transcript {
    /// Build the standard opening: a system prompt, the question, then each
    /// auxiliary prompt as its own user turn.
    pub fn framed(system_prompt: &str, question: &str, other_prompts: &[String]) -> Self {
        let mut turns = Vec::with_capacity(2 + other_prompts.len());
        turns.push(Turn {
            role: Role::System,
            content: system_prompt.to_string(),
        });
        turns.push(Turn {
            role: Role::User,
            content: question.to_string(),
        });
        turns.extend(other_prompts.iter().map(|prompt| Turn {
            role: Role::User,
            content: prompt.clone(),
        }));
        Self { turns }
    }

    /// Append an assistant turn.
    #[must_use]
    pub fn with_assistant(self, content: impl Into<String>) -> Self {
        self.with_turn(Role::Assistant, content)
    }

    /// Append a user turn.
    #[must_use]
    pub fn with_user(self, content: impl Into<String>) -> Self {
        self.with_turn(Role::User, content)
    }

    fn with_turn(mut self, role: Role, content: impl Into<String>) -> Self {
        self.turns.push(Turn {
            role,
            content: content.into(),
        });
        self
    }

    /// All turns in order.
    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    /// Number of turns.
    pub fn len(&self) -> usize {
        self.turns.len()
    }

    /// True when there are no turns.
    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }

    /// Content of the system turn, if the transcript opens with one.
    pub fn system_prompt(&self) -> Option<&str> {
        self.turns
            .first()
            .filter(|turn| turn.role == Role::System)
            .map(|turn| turn.content.as_str())
    }

    /// Content of the final turn.
    pub fn last_content(&self) -> Option<&str> {
        self.turns.last().map(|turn| turn.content.as_str())
    }
}
