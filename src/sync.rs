//! Thin client for the four game server endpoints.
//!
//! [`SyncClient`] turns each remote operation into one [`Request`], checks the
//! status line, and decodes the body through the wire codec. It never retries:
//! recovering from a failure (re-fetching authoritative state) is the
//! orchestrator's decision.

use crate::error::{ClientError, Result};
use crate::protocol::{self, GameSnapshot};
use crate::status_codes::StatusCode;
use crate::transport::{Request, Response, Transport};

/// Path of the board endpoint.
pub const BOARD_PATH: &str = "/board";
/// Path of the human move endpoint.
pub const MOVE_PATH: &str = "/move";
/// Path of the opponent move endpoint.
pub const OPPONENT_MOVE_PATH: &str = "/ai-move";
/// Path of the reset endpoint.
pub const RESET_PATH: &str = "/reset";

/// Performs the remote game operations over a [`Transport`].
#[derive(Debug, Clone)]
pub struct SyncClient<T> {
    transport: T,
}

impl<T: Transport> SyncClient<T> {
    /// Wrap a transport.
    pub fn new(transport: T) -> Self {
        Self { transport }
    }

    /// The underlying transport.
    pub fn transport(&self) -> &T {
        &self.transport
    }

    /// `GET /board`: the server's current snapshot.
    ///
    /// # Errors
    ///
    /// Returns a transport error, [`ClientError::ServerStatus`] on a
    /// non-success status, or [`ClientError::Protocol`] if the body does not
    /// decode.
    pub async fn fetch_state(&self) -> Result<GameSnapshot> {
        let response = self.exchange(Request::get(BOARD_PATH)).await?;
        decode_body(&response)
    }

    /// `POST /move` with `column=<n>`: the snapshot after the human move.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_state`](Self::fetch_state).
    pub async fn post_move(&self, column: usize) -> Result<GameSnapshot> {
        let request = Request::post(MOVE_PATH).with_form(protocol::encode_move_request(column));
        let response = self.exchange(request).await?;
        decode_body(&response)
    }

    /// `POST /ai-move`: the snapshot after the opponent move.
    ///
    /// # Errors
    ///
    /// Same as [`fetch_state`](Self::fetch_state).
    pub async fn post_opponent_move(&self) -> Result<GameSnapshot> {
        let response = self.exchange(Request::post(OPPONENT_MOVE_PATH)).await?;
        decode_body(&response)
    }

    /// `POST /reset`. The body is ignored; follow with
    /// [`fetch_state`](Self::fetch_state) for the fresh snapshot.
    ///
    /// # Errors
    ///
    /// Returns a transport error or [`ClientError::ServerStatus`].
    pub async fn reset_game(&self) -> Result<()> {
        self.exchange(Request::post(RESET_PATH)).await.map(|_| ())
    }

    /// Send one request and reject non-success statuses.
    async fn exchange(&self, request: Request) -> Result<Response> {
        let method = request.method;
        let path = request.path.clone();
        tracing::debug!(%method, %path, "sync request");

        let response = self.transport.send(request).await.map_err(|e| {
            tracing::warn!(%method, %path, error = %e, "sync request failed");
            e
        })?;

        if !response.is_success() {
            let code = StatusCode::from_status(response.status);
            tracing::warn!(%method, %path, status = response.status, %code, "server rejected request");
            return Err(ClientError::ServerStatus {
                status: response.status,
                code,
                body: response.body,
            });
        }
        Ok(response)
    }
}

fn decode_body(response: &Response) -> Result<GameSnapshot> {
    protocol::decode(&response.body).map_err(|e| {
        tracing::warn!(error = %e, "failed to decode server response");
        ClientError::from(e)
    })
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
    use crate::protocol::{encode_snapshot, Winner};
    use crate::transport::Method;
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    /// Replays scripted responses and records requests.
    struct ScriptedTransport {
        responses: StdMutex<VecDeque<std::result::Result<Response, ClientError>>>,
        seen: StdMutex<Vec<Request>>,
    }

    impl ScriptedTransport {
        fn new(responses: Vec<std::result::Result<Response, ClientError>>) -> Self {
            Self {
                responses: StdMutex::new(VecDeque::from(responses)),
                seen: StdMutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl Transport for ScriptedTransport {
        async fn send(&self, request: Request) -> std::result::Result<Response, ClientError> {
            self.seen.lock().unwrap().push(request);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Transport("script exhausted".into())))
        }
    }

    fn ok(body: String) -> std::result::Result<Response, ClientError> {
        Ok(Response { status: 200, body })
    }

    #[tokio::test]
    async fn post_move_sends_form_and_decodes() {
        let after = GameSnapshot::new_game()
            .with_piece(3, crate::protocol::Player::One)
            .unwrap();
        let client = SyncClient::new(ScriptedTransport::new(vec![ok(encode_snapshot(&after))]));

        let snap = client.post_move(3).await.unwrap();
        assert_eq!(snap, after);

        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen[0].method, Method::Post);
        assert_eq!(seen[0].path, MOVE_PATH);
        assert_eq!(seen[0].body.as_deref(), Some("column=3"));
    }

    #[tokio::test]
    async fn non_success_status_is_server_status_error() {
        let client = SyncClient::new(ScriptedTransport::new(vec![Ok(Response {
            status: 500,
            body: "AI move failed".into(),
        })]));

        let err = client.post_opponent_move().await.unwrap_err();
        let ClientError::ServerStatus { status, code, body } = err else {
            panic!("expected ServerStatus, got {err:?}");
        };
        assert_eq!(status, 500);
        assert_eq!(code, StatusCode::OpponentFailure);
        assert_eq!(body, "AI move failed");
    }

    #[tokio::test]
    async fn malformed_body_is_protocol_error() {
        let client = SyncClient::new(ScriptedTransport::new(vec![ok("1,2,3|0,0".into())]));
        let err = client.fetch_state().await.unwrap_err();
        assert!(matches!(err, ClientError::Protocol(_)));
    }

    #[tokio::test]
    async fn reset_ignores_body() {
        let client = SyncClient::new(ScriptedTransport::new(vec![ok("whatever".into())]));
        client.reset_game().await.unwrap();

        let seen = client.transport().seen.lock().unwrap();
        assert_eq!(seen[0].path, RESET_PATH);
        assert!(seen[0].body.is_none());
    }

    #[tokio::test]
    async fn transport_failure_is_propagated_without_retry() {
        let client = SyncClient::new(ScriptedTransport::new(vec![Err(
            ClientError::Transport("connection refused".into()),
        )]));
        let err = client.fetch_state().await.unwrap_err();
        assert!(err.is_transport());
        assert_eq!(client.transport().seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn opponent_move_hits_dedicated_endpoint() {
        let over = GameSnapshot {
            is_over: true,
            winner: Winner::PlayerTwo,
            winning_cells: vec![(2, 0), (3, 0), (4, 0), (5, 0)],
            ..GameSnapshot::new_game()
        };
        let client = SyncClient::new(ScriptedTransport::new(vec![ok(encode_snapshot(&over))]));
        let snap = client.post_opponent_move().await.unwrap();
        assert_eq!(snap, over);
        assert_eq!(
            client.transport().seen.lock().unwrap()[0].path,
            OPPONENT_MOVE_PATH
        );
    }
}
