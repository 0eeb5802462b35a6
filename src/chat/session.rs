//! Chat session: one conversation and the turns submitted to it

use super::accumulator::{Progress, TurnAccumulator};
use super::decoder::LineBuffering;
use super::history::ConversationHistory;
use super::transport::{ChatTransport, StreamGuard};
use super::types::{ChatRequest, ConversationTurn, ResponseMode};
use super::view::{ChatView, Notice, TypingIndicator};
use super::ChatError;
use std::sync::Arc;
use uuid::Uuid;

pub const EMPTY_MESSAGE_NOTICE: &str = "Please enter a message.";
pub const FAILED_RESPONSE_NOTICE: &str =
    "Failed to get response. Please check if the backend server is running.";
pub const CLEARED_NOTICE: &str = "Conversation cleared";

/// Result of one `submit` call
#[derive(Debug)]
pub enum SubmitOutcome {
    /// Input failed validation; nothing was sent or recorded
    Rejected(ChatError),
    /// The assistant turn was appended to the history
    Completed { reply: String },
    /// The turn failed after the user turn was recorded
    Failed(ChatError),
}

impl SubmitOutcome {
    #[cfg(test)]
    pub fn is_completed(&self) -> bool {
        matches!(self, SubmitOutcome::Completed { .. })
    }
}

/// A conversation with the chat backend.
///
/// Created at session start and torn down with it. The history changes only
/// through [`ChatSession::submit`] and [`ChatSession::clear`]. Callers keep at
/// most one submission in flight.
pub struct ChatSession {
    id: Uuid,
    transport: Arc<dyn ChatTransport>,
    history: ConversationHistory,
    mode: ResponseMode,
    buffering: LineBuffering,
}

impl ChatSession {
    pub fn new(transport: Arc<dyn ChatTransport>, mode: ResponseMode, buffering: LineBuffering) -> Self {
        Self {
            id: Uuid::new_v4(),
            transport,
            history: ConversationHistory::new(),
            mode,
            buffering,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn history(&self) -> &ConversationHistory {
        &self.history
    }

    pub fn mode(&self) -> ResponseMode {
        self.mode
    }

    pub fn set_mode(&mut self, mode: ResponseMode) {
        self.mode = mode;
    }

    /// Submit one user turn and render the reply.
    ///
    /// Every failure is turned into something visible on `view`; nothing
    /// propagates past this call.
    #[tracing::instrument(skip_all, fields(session = %self.id, mode = %self.mode))]
    pub async fn submit(&mut self, text: &str, view: &mut dyn ChatView) -> SubmitOutcome {
        let message = text.trim();
        if message.is_empty() {
            view.notify(Notice::error(EMPTY_MESSAGE_NOTICE));
            return SubmitOutcome::Rejected(ChatError::validation(EMPTY_MESSAGE_NOTICE));
        }

        let request = ChatRequest {
            message: message.to_string(),
            conversation_history: self.history.turns().to_vec(),
        };
        self.history.push(ConversationTurn::user(message));
        view.render_user(message);

        let mut typing = TypingIndicator::show(view);

        let result = match self.mode {
            ResponseMode::Streaming => self.stream_reply(&request, view, &mut typing).await,
            ResponseMode::Buffered => self.buffered_reply(&request).await,
        };
        typing.dismiss(view);

        match result {
            Ok(reply) => {
                match self.mode {
                    ResponseMode::Streaming => view.end_stream(&reply),
                    ResponseMode::Buffered => view.render_reply(&reply),
                }
                self.history.push(ConversationTurn::assistant(reply.clone()));
                tracing::debug!(turns = self.history.len(), "Turn completed");
                SubmitOutcome::Completed { reply }
            }
            Err(e) => {
                tracing::error!(kind = e.kind.as_str(), error = %e, "Turn failed");
                view.render_error(&e.message);
                view.notify(Notice::error(FAILED_RESPONSE_NOTICE));
                SubmitOutcome::Failed(e)
            }
        }
    }

    /// Forget the conversation. Safe to call at any time.
    pub fn clear(&mut self, view: &mut dyn ChatView) {
        self.history.clear();
        view.clear();
        view.notify(Notice::success(CLEARED_NOTICE));
        tracing::info!(session = %self.id, "Conversation cleared");
    }

    async fn stream_reply(
        &self,
        request: &ChatRequest,
        view: &mut dyn ChatView,
        typing: &mut TypingIndicator,
    ) -> Result<String, ChatError> {
        let mut stream = StreamGuard::new(self.transport.open_stream(request).await?);
        let mut accumulator = TurnAccumulator::new(self.buffering);
        let mut sink = |delta: &str, accumulated: &str| {
            typing.dismiss(view);
            view.render_delta(delta, accumulated);
        };

        let result = loop {
            match stream.next_chunk().await {
                Some(Ok(chunk)) => match accumulator.feed(&chunk, &mut sink) {
                    Ok(Progress::Continue) => {}
                    Ok(Progress::Done) => break Ok(()),
                    Err(e) => break Err(e),
                },
                Some(Err(e)) => break Err(e),
                None => break accumulator.finish(&mut sink).map(|_| ()),
            }
        };
        stream.release();

        if accumulator.malformed_count() > 0 {
            tracing::warn!(skipped = accumulator.malformed_count(), "Reply contained malformed frames");
        }

        result.map(|()| accumulator.into_text())
    }

    async fn buffered_reply(&self, request: &ChatRequest) -> Result<String, ChatError> {
        self.transport.send_buffered(request).await?.into_message()
    }
}
