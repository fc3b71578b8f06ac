use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LlamaChatMessage {
    pub role: Role,
    pub content: String,
}

impl LlamaChatMessage {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// One multi-turn conversation handed to the generator.
pub type Dialog = Vec<LlamaChatMessage>;

/// Reply produced for a single dialog.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatPrediction {
    pub generation: LlamaChatMessage,
}

impl ChatPrediction {
    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            generation: LlamaChatMessage::assistant(content),
        }
    }
}
