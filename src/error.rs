//! Error types for the Connect Four client.

use thiserror::Error;

use crate::status_codes::StatusCode;

/// Errors raised while decoding a server response body.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProtocolError {
    /// The board segment did not contain exactly 42 cells.
    #[error("malformed board: expected {expected} cells, found {found}")]
    CellCount {
        /// Number of cells a board must carry.
        expected: usize,
        /// Number of non-empty tokens actually present.
        found: usize,
    },

    /// A board token was not an integer in `{0, 1, 2}`.
    #[error("malformed board: invalid cell {token:?} at index {index}")]
    CellValue {
        /// Row-major position of the offending token.
        index: usize,
        /// The raw token text.
        token: String,
    },
}

/// Errors that can occur when using the Connect Four client.
#[derive(Debug, Error)]
pub enum ClientError {
    /// A server response could not be decoded into a snapshot.
    #[error("malformed server response: {0}")]
    Protocol(#[from] ProtocolError),

    /// The target column has no empty cell. Nothing was sent to the server.
    #[error("column {column} is full")]
    ColumnFull {
        /// The rejected column.
        column: usize,
    },

    /// The column index is outside `0..7`. Nothing was sent to the server.
    #[error("column {column} is out of range")]
    InvalidColumn {
        /// The rejected column.
        column: usize,
    },

    /// The request could not be delivered or no response arrived.
    #[error("transport error: {0}")]
    Transport(String),

    /// The server answered with a non-success status code.
    #[error("server returned status {status} ({code})")]
    ServerStatus {
        /// Raw HTTP status code.
        status: u16,
        /// Classification of the status code.
        code: StatusCode,
        /// Response body, kept for diagnostics.
        body: String,
    },

    /// A request did not complete within the configured timeout.
    #[error("request timed out")]
    Timeout,

    /// A full move round trip failed. The local state has already been
    /// reverted to server truth (or to the last known-good snapshot).
    #[error("move submission failed: {source}")]
    MoveSubmissionFailed {
        /// The failure that aborted the round trip.
        #[source]
        source: Box<ClientError>,
    },
}

impl ClientError {
    /// Returns `true` for failures of the request/response exchange itself,
    /// as opposed to local legality checks.
    pub fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Transport(_) | Self::ServerStatus { .. } | Self::Timeout
        )
    }
}

/// A specialized [`Result`] type for Connect Four client operations.
pub type Result<T> = std::result::Result<T, ClientError>;
