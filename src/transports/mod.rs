//! Transport implementations for the game server protocol.
//!
//! This module provides concrete [`Transport`](crate::Transport) implementations
//! behind feature gates. Enable the corresponding Cargo feature to pull in
//! a transport:
//!
//! | Feature           | Transport         |
//! |-------------------|-------------------|
//! | `transport-http`  | [`HttpTransport`] |
//!
//! # Example
//!
//! ```rust,ignore
//! # async fn example() -> Result<(), connect_four_client::ClientError> {
//! use connect_four_client::{HttpTransport, Request, Transport};
//!
//! let http = HttpTransport::new("http://localhost:8080")?;
//! let response = http.send(Request::get("/board")).await?;
//! println!("server said: {}", response.body);
//! # Ok(())
//! # }
//! ```

#[cfg(feature = "transport-http")]
pub mod http;

#[cfg(feature = "transport-http")]
pub use http::HttpTransport;
