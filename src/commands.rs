//! Input layer: turns a line typed at the prompt into a command
//!
//! Plain text is a chat message. Lines starting with `/` are session
//! commands or widget invocations.

use crate::chat::ResponseMode;
use serde_json::{json, Value};

/// What the user asked for
#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    /// Chat message, passed to the session untouched
    Send(String),
    Clear,
    Help,
    Quit,
    Mode(ResponseMode),
    /// Widget invocation with its JSON input
    Tool { name: String, input: Value },
    /// Unusable command line, with the reason
    Invalid(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let Some(command_line) = line.trim().strip_prefix('/') else {
            return Command::Send(line.to_string());
        };

        let (name, rest) = command_line
            .split_once(char::is_whitespace)
            .map_or((command_line, ""), |(n, r)| (n, r.trim()));

        match name {
            "clear" => Command::Clear,
            "help" => Command::Help,
            "quit" | "exit" => Command::Quit,
            "mode" => match rest.parse() {
                Ok(mode) => Command::Mode(mode),
                Err(e) => Command::Invalid(format!("{e} (use streaming or buffered)")),
            },
            "summarize" => tool(name, json!({ "text": rest })),
            "check_files" => {
                let mut words = rest.split_whitespace();
                match words.next() {
                    Some(kind) => {
                        let paths: Vec<&str> = words.collect();
                        tool(name, json!({ "kind": kind, "paths": paths }))
                    }
                    None => Command::Invalid("Usage: /check_files <images|pdf|slides> <path>...".to_string()),
                }
            }
            "contact" => {
                let mut fields = rest.splitn(3, '|').map(str::trim);
                let name_field = fields.next().unwrap_or_default();
                let email = fields.next().unwrap_or_default();
                let message = fields.next().unwrap_or_default();
                tool(
                    name,
                    json!({ "name": name_field, "email": email, "message": message }),
                )
            }
            "slides_to_pdf" => {
                let mut words = rest.split_whitespace();
                match words.next() {
                    Some(path) => tool(name, json!({ "path": path, "output": words.next() })),
                    None => Command::Invalid("Usage: /slides_to_pdf <path> [output]".to_string()),
                }
            }
            "" => Command::Invalid("Type /help for a list of commands.".to_string()),
            other => Command::Invalid(format!("Unknown command: /{other}. Type /help for a list.")),
        }
    }
}

fn tool(name: &str, input: Value) -> Command {
    Command::Tool {
        name: name.to_string(),
        input,
    }
}
