//! Transport abstraction for the chat backend
//!
//! These traits let the session run against a mock backend in tests.

use super::types::{ChatRequest, RawReply};
use super::ChatError;
use crate::backend;
use async_trait::async_trait;
use bytes::Bytes;
use futures::stream::BoxStream;
use futures::StreamExt;
use reqwest::Client;
use std::sync::Arc;

/// An open reply body, read chunk by chunk
#[async_trait]
pub trait ByteStream: Send {
    /// Next chunk of the body; `None` once the body is exhausted
    async fn next_chunk(&mut self) -> Option<Result<Bytes, ChatError>>;

    /// Give the underlying connection back
    fn release(&mut self);
}

/// Owns a [`ByteStream`] and releases it exactly once, on every exit path.
pub struct StreamGuard {
    inner: Box<dyn ByteStream>,
    released: bool,
}

impl StreamGuard {
    pub fn new(inner: Box<dyn ByteStream>) -> Self {
        Self {
            inner,
            released: false,
        }
    }

    pub async fn next_chunk(&mut self) -> Option<Result<Bytes, ChatError>> {
        if self.released {
            return None;
        }
        self.inner.next_chunk().await
    }

    pub fn release(&mut self) {
        if !self.released {
            self.released = true;
            self.inner.release();
        }
    }
}

impl Drop for StreamGuard {
    fn drop(&mut self) {
        self.release();
    }
}

/// Client for the chat backend
#[async_trait]
pub trait ChatTransport: Send + Sync {
    /// Send the request and return the reply body as a stream.
    ///
    /// A non-success status is reported here, before any body is consumed.
    async fn open_stream(&self, request: &ChatRequest) -> Result<Box<dyn ByteStream>, ChatError>;

    /// Send the request and return the whole reply
    async fn send_buffered(&self, request: &ChatRequest) -> Result<RawReply, ChatError>;

    /// Endpoint this transport talks to
    fn endpoint(&self) -> &str;
}

#[async_trait]
impl<T: ChatTransport + ?Sized> ChatTransport for Arc<T> {
    async fn open_stream(&self, request: &ChatRequest) -> Result<Box<dyn ByteStream>, ChatError> {
        (**self).open_stream(request).await
    }

    async fn send_buffered(&self, request: &ChatRequest) -> Result<RawReply, ChatError> {
        (**self).send_buffered(request).await
    }

    fn endpoint(&self) -> &str {
        (**self).endpoint()
    }
}

// ============================================================================
// HTTP implementation
// ============================================================================

/// Chat transport over HTTP
pub struct HttpTransport {
    client: Client,
    url: String,
}

impl HttpTransport {
    pub fn new(client: Client, url: impl Into<String>) -> Self {
        Self {
            client,
            url: url.into(),
        }
    }

    async fn send(&self, request: &ChatRequest) -> Result<reqwest::Response, ChatError> {
        self.client
            .post(&self.url)
            .json(request)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    ChatError::transport(format!("Request timeout: {e}"))
                } else if e.is_connect() {
                    ChatError::transport(format!(
                        "Failed to get response. Please check if the backend server is running. ({e})"
                    ))
                } else {
                    ChatError::transport(format!("Request failed: {e}"))
                }
            })
    }
}

#[async_trait]
impl ChatTransport for HttpTransport {
    async fn open_stream(&self, request: &ChatRequest) -> Result<Box<dyn ByteStream>, ChatError> {
        let response = self.send(request).await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ChatError::transport(backend::status_error_message(
                status.as_u16(),
                &body,
            )));
        }

        Ok(Box::new(HttpByteStream {
            body: Some(response.bytes_stream().boxed()),
        }))
    }

    async fn send_buffered(&self, request: &ChatRequest) -> Result<RawReply, ChatError> {
        let response = self.send(request).await?;
        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|e| ChatError::transport(format!("Failed to read response: {e}")))?;
        Ok(RawReply { status, body })
    }

    fn endpoint(&self) -> &str {
        &self.url
    }
}

/// Response body of a streamed reply; dropping it closes the connection
struct HttpByteStream {
    body: Option<BoxStream<'static, reqwest::Result<Bytes>>>,
}

#[async_trait]
impl ByteStream for HttpByteStream {
    async fn next_chunk(&mut self) -> Option<Result<Bytes, ChatError>> {
        let body = self.body.as_mut()?;
        body.next().await.map(|chunk| {
            chunk.map_err(|e| ChatError::transport(format!("Failed to read response: {e}")))
        })
    }

    fn release(&mut self) {
        self.body = None;
    }
}
