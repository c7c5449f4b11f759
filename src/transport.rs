//! Transport abstraction for talking to the game server.
//!
//! The server speaks plain request/response over HTTP: every operation is one
//! [`Request`] that yields one [`Response`] carrying a status code and a text
//! body. The [`Transport`] trait models exactly that exchange, so the sync
//! client and orchestrator can run against a real HTTP stack, an in-process
//! fake server, or a scripted mock.
//!
//! Transports report only delivery problems as errors. A response with a
//! non-success status is still an `Ok(Response)`; interpreting it is the job
//! of [`SyncClient`](crate::sync::SyncClient).
//!
//! # Implementing a Custom Transport
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use connect_four_client::error::ClientError;
//! use connect_four_client::transport::{Request, Response, Transport};
//!
//! struct MyTransport { /* ... */ }
//!
//! #[async_trait]
//! impl Transport for MyTransport {
//!     async fn send(&self, request: Request) -> Result<Response, ClientError> {
//!         // Deliver the request and wait for the server's answer
//!         todo!()
//!     }
//! }
//! ```

use std::fmt;

use async_trait::async_trait;

use crate::error::ClientError;

/// HTTP method of a [`Request`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Method {
    Get,
    Post,
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Get => f.write_str("GET"),
            Self::Post => f.write_str("POST"),
        }
    }
}

/// One request to the game server.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Request {
    pub method: Method,
    /// Path relative to the server origin, e.g. `/board`.
    pub path: String,
    /// Form-encoded body, if any.
    pub body: Option<String>,
}

impl Request {
    /// A `GET` request without a body.
    pub fn get(path: impl Into<String>) -> Self {
        Self {
            method: Method::Get,
            path: path.into(),
            body: None,
        }
    }

    /// A `POST` request without a body.
    pub fn post(path: impl Into<String>) -> Self {
        Self {
            method: Method::Post,
            path: path.into(),
            body: None,
        }
    }

    /// Attach a form-encoded body.
    #[must_use]
    pub fn with_form(mut self, body: impl Into<String>) -> Self {
        self.body = Some(body.into());
        self
    }
}

/// The server's answer to a [`Request`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Response {
    /// HTTP status code.
    pub status: u16,
    /// Response body text.
    pub body: String,
}

impl Response {
    /// Returns `true` for `2xx` status codes.
    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// A request/response channel to the game server.
///
/// # Object Safety
///
/// This trait is object-safe, so `Box<dyn Transport>` works for dynamic dispatch.
///
/// # Concurrency
///
/// `send` takes `&self` because the orchestrator may issue a request from a
/// timer task while a caller holds another handle. Implementations must be
/// safe to share across tasks.
#[async_trait]
pub trait Transport: Send + Sync + 'static {
    /// Deliver `request` and wait for the server's response.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the request could not be
    /// delivered or no response arrived, or [`ClientError::Timeout`] if the
    /// transport gave up waiting.
    async fn send(&self, request: Request) -> Result<Response, ClientError>;
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for std::sync::Arc<T> {
    async fn send(&self, request: Request) -> Result<Response, ClientError> {
        (**self).send(request).await
    }
}

#[async_trait]
impl<T: Transport + ?Sized> Transport for Box<T> {
    async fn send(&self, request: Request) -> Result<Response, ClientError> {
        (**self).send(request).await
    }
}
