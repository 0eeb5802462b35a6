//! Rendering surface for a chat session
//!
//! The session drives a [`ChatView`]; the terminal front end and the test
//! recorder both implement it.

/// Severity of a transient notice
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Success,
    Error,
}

/// Short-lived message shown outside the conversation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn success(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Success,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Everything a session needs to show the conversation
pub trait ChatView: Send {
    fn notify(&mut self, notice: Notice);

    fn render_user(&mut self, text: &str);

    fn show_typing(&mut self);

    fn hide_typing(&mut self);

    /// A streamed piece of the reply; `accumulated` includes `delta`
    fn render_delta(&mut self, delta: &str, accumulated: &str);

    /// A streamed reply finished normally
    fn end_stream(&mut self, reply: &str);

    /// A complete reply delivered in one piece
    fn render_reply(&mut self, reply: &str);

    fn render_error(&mut self, message: &str);

    /// Reset the conversation display to its greeting
    fn clear(&mut self);
}

/// Typing placeholder that is taken down at most once per turn
pub(crate) struct TypingIndicator {
    visible: bool,
}

impl TypingIndicator {
    pub(crate) fn show(view: &mut dyn ChatView) -> Self {
        view.show_typing();
        Self { visible: true }
    }

    pub(crate) fn dismiss(&mut self, view: &mut dyn ChatView) {
        if self.visible {
            self.visible = false;
            view.hide_typing();
        }
    }
}
