//! Chat error types

use thiserror::Error;

/// Chat error with classification
#[derive(Debug, Clone, Error)]
#[error("{message}")]
pub struct ChatError {
    pub kind: ChatErrorKind,
    pub message: String,
}

impl ChatError {
    pub fn new(kind: ChatErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Validation, message)
    }

    pub fn transport(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Transport, message)
    }

    pub fn protocol(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::Protocol, message)
    }

    pub fn malformed_frame(message: impl Into<String>) -> Self {
        Self::new(ChatErrorKind::MalformedFrame, message)
    }
}

/// Error classification for turn handling
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatErrorKind {
    /// Empty or whitespace-only input, rejected before any side effect
    Validation,
    /// Network failure or non-success HTTP status
    Transport,
    /// Explicit error frame in the stream
    Protocol,
    /// A single stream line failed to parse - skipped
    MalformedFrame,
}

impl ChatErrorKind {
    /// Whether an error of this kind ends the current turn
    pub fn aborts_turn(self) -> bool {
        !matches!(self, Self::MalformedFrame)
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Validation => "validation",
            Self::Transport => "transport",
            Self::Protocol => "protocol",
            Self::MalformedFrame => "malformed_frame",
        }
    }
}
