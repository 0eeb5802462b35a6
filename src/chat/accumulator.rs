//! Per-turn reply accumulation
//!
//! Feeds raw chunks through the [`StreamDecoder`], decodes frames and builds
//! up the reply text. It knows nothing about transports or rendering: every
//! content delta is handed to a sink as soon as it is decoded.

use super::decoder::{LineBuffering, StreamDecoder};
use super::frame::{self, Frame};
use super::ChatError;

/// Whether the turn wants more input
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Progress {
    Continue,
    /// A done frame arrived; anything after it is ignored
    Done,
}

/// Reply text for the turn in flight
pub struct TurnAccumulator {
    decoder: StreamDecoder,
    text: String,
    malformed: usize,
}

impl TurnAccumulator {
    pub fn new(buffering: LineBuffering) -> Self {
        Self {
            decoder: StreamDecoder::new(buffering),
            text: String::new(),
            malformed: 0,
        }
    }

    /// Consume one chunk of the reply body.
    ///
    /// Returns the protocol error if an error frame is decoded.
    pub fn feed(
        &mut self,
        chunk: &[u8],
        sink: &mut dyn FnMut(&str, &str),
    ) -> Result<Progress, ChatError> {
        let lines = self.decoder.feed(chunk);
        self.apply(lines, sink)
    }

    /// Flush whatever the decoder still holds at end of stream
    pub fn finish(&mut self, sink: &mut dyn FnMut(&str, &str)) -> Result<Progress, ChatError> {
        let lines = self.decoder.finish();
        self.apply(lines, sink)
    }

    fn apply(
        &mut self,
        lines: Vec<String>,
        sink: &mut dyn FnMut(&str, &str),
    ) -> Result<Progress, ChatError> {
        for line in lines {
            let frames = match frame::decode_line(&line) {
                Ok(frames) => frames,
                Err(e) if e.kind.aborts_turn() => return Err(e),
                Err(e) => {
                    self.malformed += 1;
                    tracing::warn!(error = %e, line = %line, "Skipping malformed stream frame");
                    continue;
                }
            };

            for frame in frames {
                match frame {
                    Frame::Error(message) => return Err(ChatError::protocol(message)),
                    Frame::Content(delta) => {
                        self.text.push_str(&delta);
                        sink(&delta, &self.text);
                    }
                    Frame::Done => return Ok(Progress::Done),
                    Frame::Unrecognized => {}
                }
            }
        }
        Ok(Progress::Continue)
    }

    #[cfg(test)]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Number of lines skipped as malformed so far
    pub fn malformed_count(&self) -> usize {
        self.malformed
    }

    pub fn into_text(self) -> String {
        self.text
    }
}
