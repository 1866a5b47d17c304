//! Conversation transcript for one interactive session.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Greeting placed at the top of every new session.
pub const GREETING: &str = "Hello! How can I help you with the sales data today?";

/// Who produced a turn.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::User => f.write_str("user"),
            Role::Assistant => f.write_str("assistant"),
        }
    }
}

/// One entry in the transcript.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Turn {
    pub role: Role,
    pub text: String,
}

/// The ordered transcript of a session. Owned by the caller and passed to
/// [`SalesAssistant::answer`](crate::SalesAssistant::answer); never persisted.
#[derive(Debug, Clone, Default)]
pub struct ChatSession {
    turns: Vec<Turn>,
}

impl ChatSession {
    /// A session opening with the assistant's [`GREETING`].
    pub fn new() -> Self {
        Self { turns: vec![Turn { role: Role::Assistant, text: GREETING.to_string() }] }
    }

    /// A session with no turns.
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn push(&mut self, role: Role, text: impl Into<String>) {
        self.turns.push(Turn { role, text: text.into() });
    }

    pub fn turns(&self) -> &[Turn] {
        &self.turns
    }

    pub fn last(&self) -> Option<&Turn> {
        self.turns.last()
    }

    pub fn len(&self) -> usize {
        self.turns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.turns.is_empty()
    }
}
