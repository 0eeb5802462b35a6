//! Buddy Tools - study helpers for the terminal
//!
//! A chat client for the Buddy Tools backend with streamed replies, plus the
//! summarizer, file check, contact and slide conversion widgets.

mod backend;
mod chat;
mod commands;
mod config;
mod terminal;
mod tools;

use chat::{ChatSession, ChatView, HttpTransport, LoggingTransport, Notice, SubmitOutcome};
use commands::Command;
use config::AppConfig;
use std::sync::Arc;
use terminal::TerminalView;
use tokio::io::{AsyncBufReadExt, BufReader};
use tools::{ToolContext, ToolRegistry};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize logging; stdout belongs to the conversation
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "buddy_tools=warn".into()),
        )
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_current_span(false)
                .with_span_list(false)
                .with_writer(std::io::stderr),
        )
        .init();

    let config = AppConfig::from_env();
    let client = backend::build_client(config.connect_timeout)?;

    let transport = Arc::new(LoggingTransport::new(Arc::new(HttpTransport::new(
        client.clone(),
        config.chat_url.clone(),
    ))));
    let mut session = ChatSession::new(transport, config.mode, config.line_buffering);
    let tools = ToolRegistry::standard();
    let tool_ctx = ToolContext::new(&config, std::env::current_dir()?, client);

    tracing::info!(
        session = %session.id(),
        chat_url = %config.chat_url,
        mode = %config.mode,
        line_buffering = %config.line_buffering,
        "Session started"
    );

    let mut view = TerminalView::new();
    view.clear();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        match Command::parse(&line) {
            Command::Send(text) => match session.submit(&text, &mut view).await {
                SubmitOutcome::Completed { reply } => {
                    tracing::debug!(reply_len = reply.len(), "Reply recorded");
                }
                SubmitOutcome::Rejected(e) | SubmitOutcome::Failed(e) => {
                    tracing::debug!(kind = e.kind.as_str(), "Turn not completed");
                }
            },
            Command::Clear => session.clear(&mut view),
            Command::Help => view.print_help(&tools),
            Command::Quit => break,
            Command::Mode(mode) => {
                session.set_mode(mode);
                view.notify(Notice::info(format!("Reply mode: {}", session.mode())));
            }
            Command::Tool { name, input } => {
                match tools.execute(&name, input, tool_ctx.clone()).await {
                    Some(output) => view.render_tool_output(&output),
                    None => view.notify(Notice::error(format!("Unknown widget: {name}"))),
                }
            }
            Command::Invalid(message) => view.notify(Notice::error(message)),
        }
    }

    tracing::info!(session = %session.id(), turns = session.history().len(), "Session ended");
    Ok(())
}
