//! Mock implementations for testing
//!
//! These mocks let the session run without a network or a terminal.

use super::transport::{ByteStream, ChatTransport};
use super::types::{ChatRequest, RawReply};
use super::view::{ChatView, Notice};
use super::ChatError;
use async_trait::async_trait;
use bytes::Bytes;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

// ============================================================================
// Scripted byte stream
// ============================================================================

/// Byte stream that yields a fixed script and counts releases
pub struct ScriptedStream {
    chunks: VecDeque<Result<Bytes, ChatError>>,
    releases: Arc<AtomicUsize>,
}

impl ScriptedStream {
    pub fn new(chunks: Vec<Result<Bytes, ChatError>>, releases: Arc<AtomicUsize>) -> Self {
        Self {
            chunks: chunks.into(),
            releases,
        }
    }
}

#[async_trait]
impl ByteStream for ScriptedStream {
    async fn next_chunk(&mut self) -> Option<Result<Bytes, ChatError>> {
        self.chunks.pop_front()
    }

    fn release(&mut self) {
        self.releases.fetch_add(1, Ordering::SeqCst);
    }
}

// ============================================================================
// Mock transport
// ============================================================================

/// Canned reply for one request
pub enum MockReply {
    /// Streamed body, optionally failing after the last chunk
    Stream {
        chunks: Vec<Result<Vec<u8>, ChatError>>,
        then: Option<ChatError>,
    },
    Buffered(RawReply),
    /// Request fails before any body
    Fail(ChatError),
}

impl MockReply {
    pub fn stream(chunks: &[&str]) -> Self {
        MockReply::Stream {
            chunks: chunks.iter().map(|c| Ok(c.as_bytes().to_vec())).collect(),
            then: None,
        }
    }

    pub fn stream_bytes(chunks: Vec<Vec<u8>>) -> Self {
        MockReply::Stream {
            chunks: chunks.into_iter().map(Ok).collect(),
            then: None,
        }
    }

    pub fn buffered(status: u16, body: &str) -> Self {
        MockReply::Buffered(RawReply {
            status,
            body: body.to_string(),
        })
    }
}

/// Transport that serves queued replies and records requests
pub struct MockTransport {
    replies: Mutex<VecDeque<MockReply>>,
    requests: Mutex<Vec<ChatRequest>>,
    releases: Arc<AtomicUsize>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self {
            replies: Mutex::new(VecDeque::new()),
            requests: Mutex::new(Vec::new()),
            releases: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn queue(&self, reply: MockReply) {
        self.replies.lock().unwrap().push_back(reply);
    }

    pub fn recorded_requests(&self) -> Vec<ChatRequest> {
        self.requests.lock().unwrap().clone()
    }

    /// Total stream releases across all requests
    pub fn release_count(&self) -> usize {
        self.releases.load(Ordering::SeqCst)
    }

    fn next_reply(&self, request: &ChatRequest) -> Option<MockReply> {
        self.requests.lock().unwrap().push(request.clone());
        self.replies.lock().unwrap().pop_front()
    }
}

impl Default for MockTransport {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ChatTransport for MockTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<Box<dyn ByteStream>, ChatError> {
        match self.next_reply(request) {
            Some(MockReply::Stream { chunks, then }) => {
                let mut script: Vec<Result<Bytes, ChatError>> =
                    chunks.into_iter().map(|c| c.map(Bytes::from)).collect();
                if let Some(err) = then {
                    script.push(Err(err));
                }
                Ok(Box::new(ScriptedStream::new(script, self.releases.clone())))
            }
            Some(MockReply::Fail(err)) => Err(err),
            Some(MockReply::Buffered(_)) => Err(ChatError::transport("Mock queued a buffered reply")),
            None => Err(ChatError::transport("No mock reply queued")),
        }
    }

    async fn send_buffered(&self, request: &ChatRequest) -> Result<RawReply, ChatError> {
        match self.next_reply(request) {
            Some(MockReply::Buffered(reply)) => Ok(reply),
            Some(MockReply::Fail(err)) => Err(err),
            Some(MockReply::Stream { .. }) => Err(ChatError::transport("Mock queued a streamed reply")),
            None => Err(ChatError::transport("No mock reply queued")),
        }
    }

    fn endpoint(&self) -> &str {
        "mock://chat"
    }
}

// ============================================================================
// Recording view
// ============================================================================

/// Everything a session asked the view to do
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    Notice(Notice),
    User(String),
    ShowTyping,
    HideTyping,
    Delta(String),
    EndStream(String),
    Reply(String),
    Error(String),
    Clear,
}

/// View that records calls in order
#[derive(Debug, Default)]
pub struct RecordingView {
    pub events: Vec<ViewEvent>,
}

impl RecordingView {
    pub fn count(&self, pred: impl Fn(&ViewEvent) -> bool) -> usize {
        self.events.iter().filter(|e| pred(e)).count()
    }

    pub fn position(&self, pred: impl Fn(&ViewEvent) -> bool) -> Option<usize> {
        self.events.iter().position(pred)
    }
}

impl ChatView for RecordingView {
    fn notify(&mut self, notice: Notice) {
        self.events.push(ViewEvent::Notice(notice));
    }

    fn render_user(&mut self, text: &str) {
        self.events.push(ViewEvent::User(text.to_string()));
    }

    fn show_typing(&mut self) {
        self.events.push(ViewEvent::ShowTyping);
    }

    fn hide_typing(&mut self) {
        self.events.push(ViewEvent::HideTyping);
    }

    fn render_delta(&mut self, delta: &str, _accumulated: &str) {
        self.events.push(ViewEvent::Delta(delta.to_string()));
    }

    fn end_stream(&mut self, reply: &str) {
        self.events.push(ViewEvent::EndStream(reply.to_string()));
    }

    fn render_reply(&mut self, reply: &str) {
        self.events.push(ViewEvent::Reply(reply.to_string()));
    }

    fn render_error(&mut self, message: &str) {
        self.events.push(ViewEvent::Error(message.to_string()));
    }

    fn clear(&mut self) {
        self.events.push(ViewEvent::Clear);
    }
}
