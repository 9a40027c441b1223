use chrono::{DateTime, Local};

pub const GREETING: &str = "Hello! I'm your AI agricultural advisor. How can I help you today?";
pub const APOLOGY: &str = "Sorry, I encountered an error. Please try again.";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    User,
    Bot,
}

impl ChatRole {
    pub fn as_label(self) -> &'static str {
        match self {
            Self::User => "you",
            Self::Bot => "advisor",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: ChatRole,
    pub content: String,
    pub timestamp: DateTime<Local>,
}

impl ChatTurn {
    pub fn now(role: ChatRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp: Local::now(),
        }
    }
}

/// Conversation history kept by the caller. The chat endpoint is stateless,
/// so this is the only record of earlier turns.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChatTranscript {
    turns: Vec<ChatTurn>,
}

impl ChatTranscript {
    pub fn with_greeting() -> Self {
        let mut transcript = Self::default();
        transcript.push(ChatTurn::now(ChatRole::Bot, GREETING));
        transcript
    }

    pub fn push(&mut self, turn: ChatTurn) -> &ChatTurn {
        self.turns.push(turn);
        &self.turns[self.turns.len() - 1]
    }

    pub fn turns(&self) -> &[ChatTurn] {
        &self.turns
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }
}
