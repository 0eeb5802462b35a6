//! Terminal rendering of the chat and widget output

use crate::chat::{ChatView, Notice, NoticeLevel};
use crate::tools::{ToolOutput, ToolRegistry};
use std::io::{self, Stdout, Write};

const GREETING: &str =
    "Hello! I'm here to help you with your studies. Feel free to ask me anything!";
const BOT: &str = "GPT:";

/// Line-oriented view on stdout
pub struct TerminalView {
    out: Stdout,
    /// A streamed reply line is open and needs terminating
    streaming: bool,
}

impl TerminalView {
    pub fn new() -> Self {
        Self {
            out: io::stdout(),
            streaming: false,
        }
    }

    // Output errors on a terminal are not actionable; drop them.
    fn emit(&mut self, text: &str) {
        let _ = self.out.write_all(text.as_bytes());
        let _ = self.out.flush();
    }

    fn close_stream_line(&mut self) {
        if self.streaming {
            self.streaming = false;
            self.emit("\n");
        }
    }

    pub fn print_help(&mut self, tools: &ToolRegistry) {
        let mut help = String::from(
            "Type a message to chat.\n\
             /clear                 forget the conversation\n\
             /mode <streaming|buffered>  switch reply mode\n\
             /help                  show this help\n\
             /quit                  leave\n\nWidgets:\n",
        );
        for tool in tools.tools() {
            help.push_str(&format!("  {}\n      {}\n", tool.usage(), tool.description()));
        }
        self.emit(&help);
    }

    pub fn render_tool_output(&mut self, output: &ToolOutput) {
        let mark = if output.success { "✓" } else { "✗" };
        self.emit(&format!("{mark} {}\n", output.output));
    }
}

impl Default for TerminalView {
    fn default() -> Self {
        Self::new()
    }
}

impl ChatView for TerminalView {
    fn notify(&mut self, notice: Notice) {
        self.close_stream_line();
        let tag = match notice.level {
            NoticeLevel::Info => "info",
            NoticeLevel::Success => "ok",
            NoticeLevel::Error => "error",
        };
        self.emit(&format!("[{tag}] {}\n", notice.message));
    }

    fn render_user(&mut self, text: &str) {
        self.emit(&format!("You: {text}\n"));
    }

    fn show_typing(&mut self) {
        self.emit(&format!("{BOT} ..."));
    }

    fn hide_typing(&mut self) {
        // carriage return plus erase-line
        self.emit("\r\x1b[2K");
    }

    fn render_delta(&mut self, delta: &str, _accumulated: &str) {
        if !self.streaming {
            self.streaming = true;
            self.emit(&format!("{BOT} "));
        }
        self.emit(delta);
    }

    fn end_stream(&mut self, reply: &str) {
        if self.streaming {
            self.close_stream_line();
        } else {
            self.emit(&format!("{BOT} {reply}\n"));
        }
    }

    fn render_reply(&mut self, reply: &str) {
        self.emit(&format!("{BOT} {reply}\n"));
    }

    fn render_error(&mut self, message: &str) {
        self.close_stream_line();
        self.emit(&format!("Error: {message}\n"));
    }

    fn clear(&mut self) {
        self.streaming = false;
        self.emit(&format!("\x1b[2J\x1b[H{BOT} {GREETING}\n"));
    }
}
