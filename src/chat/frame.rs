//! Stream frame decoding
//!
//! Each line of the reply stream is decoded into zero or more [`Frame`]s
//! before the consumer acts on it, so control flow never sees raw text.

use super::ChatError;
use serde::Deserialize;

/// Marker that precedes every frame payload
pub const DATA_PREFIX: &str = "data: ";

/// One decoded unit of the reply stream
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Frame {
    /// Incremental reply text
    Content(String),
    /// Server-reported failure; ends the turn
    Error(String),
    /// End of reply
    Done,
    /// Line without the data marker
    Unrecognized,
}

#[derive(Debug, Deserialize)]
struct FramePayload {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    error: Option<String>,
    #[serde(default)]
    done: Option<bool>,
}

/// Decode one line of the reply stream.
///
/// A payload carrying both `content` and `done` yields the content first.
/// An `error` field wins over everything else in the same payload.
pub fn decode_line(line: &str) -> Result<Vec<Frame>, ChatError> {
    let line = line.strip_suffix('\r').unwrap_or(line);
    let Some(payload) = line.strip_prefix(DATA_PREFIX) else {
        return Ok(vec![Frame::Unrecognized]);
    };

    let payload: FramePayload = serde_json::from_str(payload)
        .map_err(|e| ChatError::malformed_frame(format!("Invalid frame payload: {e}")))?;

    if let Some(error) = payload.error {
        return Ok(vec![Frame::Error(error)]);
    }

    let mut frames = Vec::with_capacity(2);
    if let Some(content) = payload.content {
        frames.push(Frame::Content(content));
    }
    if payload.done == Some(true) {
        frames.push(Frame::Done);
    }
    Ok(frames)
}
