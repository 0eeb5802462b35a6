//! Common types for chat interactions

use super::ChatError;
use crate::backend;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Message role
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    User,
    Assistant,
}

/// One message in the conversation
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

impl ConversationTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Outbound chat request body
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    /// History before `message` was appended
    pub conversation_history: Vec<ConversationTurn>,
}

/// How the backend delivers the assistant reply
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseMode {
    /// `data: ` lines rendered as they arrive
    #[default]
    Streaming,
    /// One JSON body with the whole reply
    Buffered,
}

impl fmt::Display for ResponseMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ResponseMode::Streaming => write!(f, "streaming"),
            ResponseMode::Buffered => write!(f, "buffered"),
        }
    }
}

impl FromStr for ResponseMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "streaming" | "stream" => Ok(ResponseMode::Streaming),
            "buffered" | "standard" => Ok(ResponseMode::Buffered),
            other => Err(format!("unknown response mode: {other}")),
        }
    }
}

/// Raw status and body of a buffered reply
#[derive(Debug, Clone)]
pub struct RawReply {
    pub status: u16,
    pub body: String,
}

#[derive(Debug, Deserialize)]
struct BufferedReply {
    #[serde(default)]
    success: bool,
    #[serde(default)]
    message: Option<String>,
    #[serde(default)]
    error: Option<String>,
}

impl RawReply {
    /// Interpret a buffered reply, yielding the assistant message text.
    pub fn into_message(self) -> Result<String, ChatError> {
        if !backend::is_success(self.status) {
            return Err(ChatError::transport(backend::status_error_message(
                self.status,
                &self.body,
            )));
        }

        let reply: BufferedReply = serde_json::from_str(&self.body)
            .map_err(|e| ChatError::transport(format!("Failed to parse response: {e}")))?;

        if !reply.success {
            return Err(ChatError::transport(
                reply
                    .error
                    .filter(|e| !e.is_empty())
                    .unwrap_or_else(|| "Unknown error occurred".to_string()),
            ));
        }

        Ok(reply.message.unwrap_or_default())
    }
}
