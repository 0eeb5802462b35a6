//! Chat with the remote completion backend
//!
//! A [`ChatSession`] owns the conversation and drives one turn at a time:
//! send the request, decode the streamed (or buffered) reply, render it and
//! record the result.

mod accumulator;
mod decoder;
mod error;
mod frame;
mod history;
mod session;
mod transport;
mod types;
mod view;

#[cfg(test)]
mod proptests;
#[cfg(test)]
pub(crate) mod testing;

pub use decoder::LineBuffering;
pub use error::ChatError;
pub use session::{ChatSession, SubmitOutcome};
pub use transport::{ByteStream, ChatTransport, HttpTransport};
pub use types::*;
pub use view::{ChatView, Notice, NoticeLevel};

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

/// Logging wrapper for chat transports
pub struct LoggingTransport {
    inner: Arc<dyn ChatTransport>,
}

impl LoggingTransport {
    pub fn new(inner: Arc<dyn ChatTransport>) -> Self {
        Self { inner }
    }

    fn log_result<T>(&self, what: &str, request: &ChatRequest, start: Instant, result: &Result<T, ChatError>) {
        let duration = start.elapsed();
        match result {
            Ok(_) => {
                tracing::info!(
                    endpoint = %self.inner.endpoint(),
                    history_len = request.conversation_history.len(),
                    duration_ms = %duration.as_millis(),
                    "Chat {what} opened"
                );
            }
            Err(e) => {
                tracing::error!(
                    endpoint = %self.inner.endpoint(),
                    duration_ms = %duration.as_millis(),
                    kind = e.kind.as_str(),
                    error = %e.message,
                    "Chat {what} failed"
                );
            }
        }
    }
}

#[async_trait]
impl ChatTransport for LoggingTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<Box<dyn ByteStream>, ChatError> {
        let start = Instant::now();
        let result = self.inner.open_stream(request).await;
        self.log_result("stream", request, start, &result);
        result
    }

    async fn send_buffered(&self, request: &ChatRequest) -> Result<RawReply, ChatError> {
        let start = Instant::now();
        let result = self.inner.send_buffered(request).await;
        self.log_result("request", request, start, &result);
        result
    }

    fn endpoint(&self) -> &str {
        self.inner.endpoint()
    }
}
