//! # Connect Four Client
//!
//! Client-side engine for a Connect Four game whose board, rules, and
//! opponent live on a remote server.
//!
//! The server speaks a compact pipe-and-comma text format over HTTP. This
//! crate decodes it into immutable snapshots, keeps the current snapshot in a
//! watchable store, and runs the turn-taking state machine: optimistic
//! placement of the human piece, a paced opponent turn, an auto-reset after
//! the game ends, and re-synchronization with the server after any failure.
//!
//! ## Features
//!
//! - **Transport-agnostic** — implement the [`Transport`] trait for any backend
//! - **HTTP built-in** — default `transport-http` feature provides `HttpTransport`
//! - **Observable** — `watch` subscriptions for snapshot and status, plus a
//!   [`GameEvent`] channel for failures in background work
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! # async fn example() -> Result<(), connect_four_client::ClientError> {
//! use connect_four_client::{HttpTransport, MoveOrchestrator, OrchestratorConfig, SyncClient};
//!
//! let transport = HttpTransport::new("http://localhost:8080")?;
//! let (game, _events) =
//!     MoveOrchestrator::start(SyncClient::new(transport), OrchestratorConfig::default());
//! game.refresh().await?;
//! game.submit_move(3).await?;
//! println!("{}", game.snapshot().board);
//! # Ok(())
//! # }
//! ```

pub mod error;
pub mod event;
pub mod orchestrator;
pub mod protocol;
pub mod status_codes;
pub mod store;
pub mod sync;
pub mod transport;
pub mod transports;

// Re-export primary types for ergonomic imports.
pub use error::{ClientError, ProtocolError};
pub use event::GameEvent;
pub use orchestrator::{MoveOrchestrator, MoveOutcome, OrchestratorConfig, TurnStatus};
pub use protocol::{Board, Cell, GameOutcome, GameSnapshot, Player, Winner};
pub use status_codes::StatusCode;
pub use store::{GameStateStore, Placement};
pub use sync::SyncClient;
pub use transport::{Method, Request, Response, Transport};

#[cfg(feature = "transport-http")]
pub use transports::HttpTransport;
