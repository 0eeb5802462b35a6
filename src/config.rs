//! Application configuration from the environment

use crate::chat::{LineBuffering, ResponseMode};
use std::fmt::Display;
use std::str::FromStr;
use std::time::Duration;

pub const MEGABYTE: u64 = 1024 * 1024;

pub const DEFAULT_CHAT_URL: &str = "https://bt-backend-eight.vercel.app/api/chat";
pub const DEFAULT_CONTACT_URL: &str = "https://bt-backend-eight.vercel.app/api/contact";
pub const DEFAULT_CONVERT_URL: &str = "http://localhost:5000/api/convert/ppt-to-pdf";

/// Runtime configuration
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub chat_url: String,
    pub contact_url: String,
    pub convert_url: String,
    pub mode: ResponseMode,
    pub line_buffering: LineBuffering,
    pub connect_timeout: Duration,
    /// Upload limit for the file widgets, in megabytes
    pub max_upload_mb: u64,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            chat_url: DEFAULT_CHAT_URL.to_string(),
            contact_url: DEFAULT_CONTACT_URL.to_string(),
            convert_url: DEFAULT_CONVERT_URL.to_string(),
            mode: ResponseMode::Streaming,
            line_buffering: LineBuffering::Carry,
            connect_timeout: Duration::from_secs(30),
            max_upload_mb: 10,
        }
    }
}

impl AppConfig {
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from an arbitrary variable lookup. Bad values fall back to the
    /// default with a warning.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            chat_url: lookup("BUDDY_CHAT_URL").unwrap_or(defaults.chat_url),
            contact_url: lookup("BUDDY_CONTACT_URL").unwrap_or(defaults.contact_url),
            convert_url: lookup("BUDDY_CONVERT_URL").unwrap_or(defaults.convert_url),
            mode: parse_or(&lookup, "BUDDY_CHAT_MODE", defaults.mode),
            line_buffering: parse_or(&lookup, "BUDDY_LINE_BUFFERING", defaults.line_buffering),
            connect_timeout: Duration::from_secs(parse_or(
                &lookup,
                "BUDDY_CONNECT_TIMEOUT_SECS",
                defaults.connect_timeout.as_secs(),
            )),
            max_upload_mb: parse_or(&lookup, "BUDDY_MAX_UPLOAD_MB", defaults.max_upload_mb),
        }
    }

    pub fn max_upload_bytes(&self) -> u64 {
        self.max_upload_mb.saturating_mul(MEGABYTE)
    }
}

fn parse_or<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> T
where
    T: FromStr,
    T::Err: Display,
{
    match lookup(key) {
        Some(raw) => match raw.parse() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(key, value = %raw, error = %e, "Ignoring invalid setting");
                default
            }
        },
        None => default,
    }
}
