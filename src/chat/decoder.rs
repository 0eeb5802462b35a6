//! Incremental decoding of the reply byte stream into lines
//!
//! Chunk boundaries line up with neither character nor line boundaries.
//! [`Utf8Decoder`] carries incomplete UTF-8 sequences between reads and
//! [`LineSplitter`] optionally carries an unterminated trailing line.

use std::fmt;
use std::str::FromStr;

/// How a line cut off at the end of a chunk is treated
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineBuffering {
    /// Hold the unterminated tail and prepend it to the next chunk
    #[default]
    Carry,
    /// Split every chunk on its own; a cut-off line is parsed as-is
    PerChunk,
}

impl fmt::Display for LineBuffering {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LineBuffering::Carry => write!(f, "carry"),
            LineBuffering::PerChunk => write!(f, "per-chunk"),
        }
    }
}

impl FromStr for LineBuffering {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "carry" => Ok(LineBuffering::Carry),
            "per-chunk" | "per_chunk" | "perchunk" => Ok(LineBuffering::PerChunk),
            other => Err(format!("unknown line buffering: {other}")),
        }
    }
}

/// UTF-8 decoder that keeps partial sequences across calls.
///
/// Invalid bytes become U+FFFD, matching a lossy text decoder.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);

        let mut out = String::with_capacity(self.pending.len());
        let mut consumed = 0;
        loop {
            let rest = self.pending.get(consumed..).unwrap_or_default();
            match std::str::from_utf8(rest) {
                Ok(valid) => {
                    out.push_str(valid);
                    consumed = self.pending.len();
                    break;
                }
                Err(e) => {
                    let (valid, _) = rest.split_at(e.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    consumed += e.valid_up_to();
                    match e.error_len() {
                        Some(len) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            consumed += len;
                        }
                        // Incomplete sequence at the end: wait for more bytes
                        None => break,
                    }
                }
            }
        }

        self.pending.drain(..consumed);
        out
    }

    /// Flush at end of stream; a dangling partial sequence becomes U+FFFD.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            return String::new();
        }
        self.pending.clear();
        char::REPLACEMENT_CHARACTER.to_string()
    }
}

/// Splits decoded text into lines.
#[derive(Debug, Default)]
pub struct LineSplitter {
    buffering: LineBuffering,
    fragment: String,
}

impl LineSplitter {
    pub fn new(buffering: LineBuffering) -> Self {
        Self {
            buffering,
            fragment: String::new(),
        }
    }

    pub fn push(&mut self, text: &str) -> Vec<String> {
        match self.buffering {
            LineBuffering::PerChunk => text.split('\n').map(str::to_string).collect(),
            LineBuffering::Carry => {
                self.fragment.push_str(text);
                let mut lines: Vec<String> = self.fragment.split('\n').map(str::to_string).collect();
                // split always yields at least one piece; the last is unterminated
                self.fragment = lines.pop().unwrap_or_default();
                lines
            }
        }
    }

    /// Remaining unterminated line at end of stream, if any
    pub fn finish(&mut self) -> Option<String> {
        let tail = std::mem::take(&mut self.fragment);
        if tail.is_empty() {
            None
        } else {
            Some(tail)
        }
    }
}

/// Bytes in, lines out.
#[derive(Debug, Default)]
pub struct StreamDecoder {
    utf8: Utf8Decoder,
    lines: LineSplitter,
}

impl StreamDecoder {
    pub fn new(buffering: LineBuffering) -> Self {
        Self {
            utf8: Utf8Decoder::default(),
            lines: LineSplitter::new(buffering),
        }
    }

    /// Decode one chunk and return the lines it completes
    pub fn feed(&mut self, chunk: &[u8]) -> Vec<String> {
        let text = self.utf8.decode(chunk);
        self.lines.push(&text)
    }

    /// Flush decoder state at end of stream
    pub fn finish(&mut self) -> Vec<String> {
        let text = self.utf8.finish();
        let mut lines = if text.is_empty() {
            Vec::new()
        } else {
            self.lines.push(&text)
        };
        lines.extend(self.lines.finish());
        lines
    }
}
