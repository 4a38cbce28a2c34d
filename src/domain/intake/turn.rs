//! Conversation turns.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Who produced a turn. Closed two-variant tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnRole {
    User,
    Assistant,
}

impl TurnRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            TurnRole::User => "user",
            TurnRole::Assistant => "assistant",
        }
    }
}

/// One message within a session. Immutable once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Turn {
    pub role: TurnRole,
    pub content: String,
    /// Epoch milliseconds; non-decreasing within a session.
    pub timestamp: i64,
}

impl Turn {
    /// Creates a user turn stamped with the current time.
    pub fn user(content: impl Into<String>) -> Self {
        Self::at(TurnRole::User, content, Timestamp::now().as_unix_millis())
    }

    /// Creates an assistant turn stamped with the current time.
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::at(TurnRole::Assistant, content, Timestamp::now().as_unix_millis())
    }

    /// Creates a turn with an explicit timestamp.
    pub fn at(role: TurnRole, content: impl Into<String>, timestamp: i64) -> Self {
        Self {
            role,
            content: content.into(),
            timestamp,
        }
    }

    pub fn is_user(&self) -> bool {
        self.role == TurnRole::User
    }

    pub fn is_assistant(&self) -> bool {
        self.role == TurnRole::Assistant
    }
}
