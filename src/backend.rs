//! Shared plumbing for the remote backend endpoints
//!
//! The chat, contact and conversion endpoints all report failures the same
//! way: a JSON body with an optional `error` field, or just a bad status.

use reqwest::Client;
use serde::Deserialize;
use std::time::Duration;

/// Failure body shared by all backend endpoints
#[derive(Debug, Default, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    error: Option<String>,
}

/// Extract the `error` field from a JSON body, if there is one
pub fn error_field(body: &str) -> Option<String> {
    serde_json::from_str::<ErrorBody>(body)
        .ok()
        .and_then(|b| b.error)
        .filter(|e| !e.is_empty())
}

/// Message for a non-success status, preferring the server's own error text
pub fn status_error_message(status: u16, body: &str) -> String {
    error_field(body).unwrap_or_else(|| format!("HTTP error! status: {status}"))
}

/// Whether a status code is in the 2xx range
pub fn is_success(status: u16) -> bool {
    (200..300).contains(&status)
}

/// Build the HTTP client used for every backend call.
///
/// Only the connect phase is bounded; a streamed reply may take as long as
/// the server needs.
pub fn build_client(connect_timeout: Duration) -> Result<Client, reqwest::Error> {
    Client::builder().connect_timeout(connect_timeout).build()
}
