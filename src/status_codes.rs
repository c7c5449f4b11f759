//! Classification of HTTP status codes returned by the game server.
//!
//! The server answers every endpoint with a board body, but signals rejected
//! moves and opponent failures through the status line. These codes give the
//! failures a name so callers can log or display them.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Meaning of a non-success status code returned by the game server.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum StatusCode {
    /// `400`: the server refused the move (game over, bad or full column).
    InvalidMove,
    /// `404`: the endpoint does not exist on this server.
    NotFound,
    /// `405`: the endpoint was called with the wrong HTTP method.
    MethodNotAllowed,
    /// `500`: the server failed while choosing or applying the opponent move.
    OpponentFailure,
    /// `503`: the server is not accepting requests.
    ServiceUnavailable,
    /// Any other non-success status.
    Other,
}

impl StatusCode {
    /// Classify a raw HTTP status code.
    pub fn from_status(status: u16) -> Self {
        match status {
            400 => Self::InvalidMove,
            404 => Self::NotFound,
            405 => Self::MethodNotAllowed,
            500 => Self::OpponentFailure,
            503 => Self::ServiceUnavailable,
            _ => Self::Other,
        }
    }

    /// Returns a human-readable description of this status.
    pub fn description(&self) -> &'static str {
        match self {
            Self::InvalidMove => {
                "The server rejected the move. The game may be over or the column full."
            }
            Self::NotFound => "The server does not provide this endpoint.",
            Self::MethodNotAllowed => "The endpoint was called with an unsupported method.",
            Self::OpponentFailure => "The server failed to compute or apply the opponent move.",
            Self::ServiceUnavailable => "The game server is temporarily unavailable.",
            Self::Other => "The server returned an unexpected status.",
        }
    }
}

impl fmt::Display for StatusCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::InvalidMove => "INVALID_MOVE",
            Self::NotFound => "NOT_FOUND",
            Self::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            Self::OpponentFailure => "OPPONENT_FAILURE",
            Self::ServiceUnavailable => "SERVICE_UNAVAILABLE",
            Self::Other => "OTHER",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_are_classified() {
        assert_eq!(StatusCode::from_status(400), StatusCode::InvalidMove);
        assert_eq!(StatusCode::from_status(404), StatusCode::NotFound);
        assert_eq!(StatusCode::from_status(405), StatusCode::MethodNotAllowed);
        assert_eq!(StatusCode::from_status(500), StatusCode::OpponentFailure);
        assert_eq!(StatusCode::from_status(503), StatusCode::ServiceUnavailable);
        assert_eq!(StatusCode::from_status(418), StatusCode::Other);
    }

    #[test]
    fn display_matches_serde_name() {
        for code in [
            StatusCode::InvalidMove,
            StatusCode::NotFound,
            StatusCode::MethodNotAllowed,
            StatusCode::OpponentFailure,
            StatusCode::ServiceUnavailable,
            StatusCode::Other,
        ] {
            let json = serde_json::to_string(&code).unwrap();
            assert_eq!(json, format!("\"{code}\""));
        }
    }

    #[test]
    fn descriptions_are_non_empty() {
        assert!(!StatusCode::InvalidMove.description().is_empty());
        assert!(!StatusCode::Other.description().is_empty());
    }
}
