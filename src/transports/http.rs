//! HTTP transport implementation using `reqwest`.
//!
//! This module provides [`HttpTransport`], a [`Transport`] implementation
//! that sends each [`Request`] to a fixed server origin. Every request carries
//! a timeout so a stuck server cannot stall a move forever.
//!
//! # Feature gate
//!
//! This module is only available when the `transport-http` feature is enabled
//! (it is enabled by default).
//!
//! # Example
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), connect_four_client::ClientError> {
//! use connect_four_client::{HttpTransport, Request, Transport};
//!
//! let transport = HttpTransport::new("http://localhost:8080")?;
//! let response = transport.send(Request::get("/board")).await?;
//! println!("board: {}", response.body);
//! # Ok(())
//! # }
//! ```

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::CONTENT_TYPE;

use crate::error::ClientError;
use crate::transport::{Method, Request, Response, Transport};

/// Default origin of the game server.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

/// Default per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

const FORM_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

/// Configuration for an [`HttpTransport`].
///
/// # Example
///
/// ```
/// use connect_four_client::transports::http::HttpConfig;
/// use std::time::Duration;
///
/// let config = HttpConfig::new("http://game.local:8080")
///     .with_request_timeout(Duration::from_secs(3));
/// assert_eq!(config.base_url, "http://game.local:8080");
/// ```
#[derive(Debug, Clone)]
pub struct HttpConfig {
    /// Server origin every request path is appended to.
    pub base_url: String,
    /// Upper bound on a single request, connect through body.
    ///
    /// Defaults to **10 seconds**.
    pub request_timeout: Duration,
}

impl HttpConfig {
    /// Create a configuration for the given origin with default values.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
        }
    }

    /// Set the per-request timeout.
    #[must_use]
    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self::new(DEFAULT_BASE_URL)
    }
}

/// A [`Transport`] backed by a `reqwest` HTTP client.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for `base_url` with the default request timeout.
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn new(base_url: impl Into<String>) -> Result<Self, ClientError> {
        Self::from_config(HttpConfig::new(base_url))
    }

    /// Create a transport from an [`HttpConfig`].
    ///
    /// # Errors
    ///
    /// Returns [`ClientError::Transport`] if the HTTP client cannot be built.
    pub fn from_config(config: HttpConfig) -> Result<Self, ClientError> {
        let client = reqwest::Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| ClientError::Transport(e.to_string()))?;
        Ok(Self::from_client(client, config.base_url))
    }

    /// Wrap an already-configured `reqwest` client.
    ///
    /// Useful for custom proxies or headers that [`HttpConfig`] does not expose.
    pub fn from_client(client: reqwest::Client, base_url: impl Into<String>) -> Self {
        let base_url: String = base_url.into();
        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    /// The origin requests are sent to.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

fn map_reqwest_error(e: reqwest::Error) -> ClientError {
    if e.is_timeout() {
        ClientError::Timeout
    } else {
        ClientError::Transport(e.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let url = format!("{}{}", self.base_url, request.path);
        tracing::debug!(method = %request.method, url = %url, "sending request");

        let mut builder = match request.method {
            Method::Get => self.client.get(&url),
            Method::Post => self.client.post(&url),
        };
        if let Some(body) = request.body {
            builder = builder.header(CONTENT_TYPE, FORM_CONTENT_TYPE).body(body);
        }

        let response = builder.send().await.map_err(map_reqwest_error)?;
        let status = response.status().as_u16();
        let body = response.text().await.map_err(map_reqwest_error)?;

        tracing::debug!(status, bytes = body.len(), "received response");
        Ok(Response { status, body })
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use tokio::io::{AsyncReadExt, AsyncWriteExt};
    use tokio::net::TcpListener;

    #[test]
    fn http_transport_is_send_sync() {
        fn assert_send_sync<T: Send + Sync>() {}
        assert_send_sync::<HttpTransport>();
    }

    #[test]
    fn trailing_slash_is_trimmed() {
        let transport = HttpTransport::new("http://localhost:8080/").unwrap();
        assert_eq!(transport.base_url(), "http://localhost:8080");
    }

    #[test]
    fn config_defaults() {
        let config = HttpConfig::default();
        assert_eq!(config.base_url, DEFAULT_BASE_URL);
        assert_eq!(config.request_timeout, DEFAULT_REQUEST_TIMEOUT);
    }

    // ── Mock-server helpers ──────────────────────────────────────────────

    /// Read one request: headers through the blank line, then
    /// `Content-Length` bytes of body.
    async fn read_request(tcp: &mut tokio::net::TcpStream) -> String {
        let mut data = Vec::new();
        let mut buf = [0u8; 1024];
        loop {
            let n = tcp.read(&mut buf).await.unwrap();
            if n == 0 {
                break;
            }
            data.extend_from_slice(&buf[..n]);
            let text = String::from_utf8_lossy(&data).to_string();
            if let Some(end) = text.find("\r\n\r\n") {
                let content_length = text[..end]
                    .lines()
                    .find_map(|line| {
                        let (name, value) = line.split_once(':')?;
                        name.eq_ignore_ascii_case("content-length")
                            .then(|| value.trim().parse::<usize>().ok())
                            .flatten()
                    })
                    .unwrap_or(0);
                if data.len() >= end + 4 + content_length {
                    break;
                }
            }
        }
        String::from_utf8_lossy(&data).to_string()
    }

    /// Start a one-shot HTTP server that answers with `status` and `body`,
    /// returning its origin and a receiver for the raw request it saw.
    async fn start_mock_server(
        status: u16,
        body: &'static str,
    ) -> (String, tokio::sync::oneshot::Receiver<String>) {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        let (seen_tx, seen_rx) = tokio::sync::oneshot::channel();

        tokio::spawn(async move {
            let (mut tcp, _) = listener.accept().await.unwrap();
            let raw = read_request(&mut tcp).await;
            let _ = seen_tx.send(raw);
            let reply = format!(
                "HTTP/1.1 {status} X\r\nContent-Type: text/plain\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            );
            tcp.write_all(reply.as_bytes()).await.unwrap();
            tcp.shutdown().await.unwrap();
        });

        (format!("http://{addr}"), seen_rx)
    }

    // ── Mock-server tests ────────────────────────────────────────────────

    #[tokio::test]
    async fn get_returns_status_and_body() {
        let (url, seen) = start_mock_server(200, "0,0|0,0|").await;
        let transport = HttpTransport::new(url).unwrap();

        let response = transport.send(Request::get("/board")).await.unwrap();
        assert_eq!(response.status, 200);
        assert_eq!(response.body, "0,0|0,0|");
        assert!(response.is_success());

        let raw = seen.await.unwrap();
        assert!(raw.starts_with("GET /board HTTP/1.1"));
    }

    #[tokio::test]
    async fn post_sends_form_body() {
        let (url, seen) = start_mock_server(200, "ok").await;
        let transport = HttpTransport::new(url).unwrap();

        transport
            .send(Request::post("/move").with_form("column=3"))
            .await
            .unwrap();

        let raw = seen.await.unwrap();
        assert!(raw.starts_with("POST /move HTTP/1.1"));
        assert!(raw
            .to_ascii_lowercase()
            .contains("content-type: application/x-www-form-urlencoded"));
        assert!(raw.ends_with("column=3"));
    }

    #[tokio::test]
    async fn error_status_is_not_a_transport_error() {
        let (url, _seen) = start_mock_server(400, "rejected").await;
        let transport = HttpTransport::new(url).unwrap();

        let response = transport.send(Request::post("/move")).await.unwrap();
        assert_eq!(response.status, 400);
        assert!(!response.is_success());
    }

    #[tokio::test]
    async fn unreachable_host_is_transport_error() {
        let transport = HttpTransport::new("http://127.0.0.1:1").unwrap();
        let err = transport.send(Request::get("/board")).await.unwrap_err();
        assert!(err.is_transport());
    }

    #[tokio::test]
    async fn silent_server_times_out() {
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            // Accept and hold the connection open without answering.
            let (_tcp, _) = listener.accept().await.unwrap();
            std::future::pending::<()>().await;
        });

        let config = HttpConfig::new(format!("http://{addr}"))
            .with_request_timeout(Duration::from_millis(50));
        let transport = HttpTransport::from_config(config).unwrap();

        let err = transport.send(Request::get("/board")).await.unwrap_err();
        assert!(matches!(err, ClientError::Timeout));
    }
}
