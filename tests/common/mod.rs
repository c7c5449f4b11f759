#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing,
    dead_code
)]
//! Shared test utilities for Connect Four client integration tests.
//!
//! Provides a scripted [`MockTransport`] and helper functions for building
//! common server snapshots and responses.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex as StdMutex};

use async_trait::async_trait;
use connect_four_client::protocol::{encode_snapshot, ROWS};
use connect_four_client::{
    Cell, ClientError, GameEvent, GameSnapshot, MoveOrchestrator, OrchestratorConfig, Request,
    Response, SyncClient, Transport, Winner,
};
use tokio::sync::{mpsc, oneshot};

// ── MockTransport ───────────────────────────────────────────────────

/// One scripted server reaction.
pub enum Scripted {
    /// Answer immediately.
    Reply(Result<Response, ClientError>),
    /// Answer once the paired sender fires (or is dropped).
    Held {
        release: oneshot::Receiver<()>,
        reply: Result<Response, ClientError>,
    },
}

/// A scripted mock transport for integration testing.
///
/// Scripted reactions are consumed in request order. Every request the
/// client sends is recorded in `requests`. Once the script runs out, every
/// request fails with a transport error.
pub struct MockTransport {
    script: StdMutex<VecDeque<Scripted>>,
    /// Recorded requests from the client.
    pub requests: Arc<StdMutex<Vec<Request>>>,
}

impl MockTransport {
    /// Create a mock transport with the given script.
    ///
    /// Returns the transport plus a shared handle for inspecting requests.
    pub fn new(script: Vec<Scripted>) -> (Self, Arc<StdMutex<Vec<Request>>>) {
        let requests = Arc::new(StdMutex::new(Vec::new()));
        let transport = Self {
            script: StdMutex::new(VecDeque::from(script)),
            requests: Arc::clone(&requests),
        };
        (transport, requests)
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: Request) -> Result<Response, ClientError> {
        self.requests.lock().unwrap().push(request);
        let next = self.script.lock().unwrap().pop_front();
        match next {
            Some(Scripted::Reply(reply)) => reply,
            Some(Scripted::Held { release, reply }) => {
                let _ = release.await;
                reply
            }
            None => Err(ClientError::Transport("script exhausted".into())),
        }
    }
}

// ── Orchestrator helpers ────────────────────────────────────────────

/// Start an orchestrator over a scripted transport with default timing.
#[allow(clippy::type_complexity)]
pub fn start_game(
    script: Vec<Scripted>,
) -> (
    MoveOrchestrator<MockTransport>,
    mpsc::Receiver<GameEvent>,
    Arc<StdMutex<Vec<Request>>>,
) {
    start_game_with(script, OrchestratorConfig::default())
}

/// Start an orchestrator over a scripted transport with a custom config.
#[allow(clippy::type_complexity)]
pub fn start_game_with(
    script: Vec<Scripted>,
    config: OrchestratorConfig,
) -> (
    MoveOrchestrator<MockTransport>,
    mpsc::Receiver<GameEvent>,
    Arc<StdMutex<Vec<Request>>>,
) {
    let (transport, requests) = MockTransport::new(script);
    let (game, events) = MoveOrchestrator::start(SyncClient::new(transport), config);
    (game, events, requests)
}

/// Paths of all recorded requests, in order.
pub fn paths(requests: &Arc<StdMutex<Vec<Request>>>) -> Vec<String> {
    requests
        .lock()
        .unwrap()
        .iter()
        .map(|r| r.path.clone())
        .collect()
}

/// Yield to other tasks until at least `n` requests were recorded.
pub async fn wait_for_requests(requests: &Arc<StdMutex<Vec<Request>>>, n: usize) {
    for _ in 0..1000 {
        if requests.lock().unwrap().len() >= n {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("timed out waiting for {n} request(s)");
}

/// Drain every event currently queued.
pub fn drain(events: &mut mpsc::Receiver<GameEvent>) -> Vec<GameEvent> {
    let mut out = Vec::new();
    while let Ok(event) = events.try_recv() {
        out.push(event);
    }
    out
}

// ── Response helpers ────────────────────────────────────────────────

/// A `200` reply carrying `snapshot` in wire format.
pub fn reply(snapshot: &GameSnapshot) -> Scripted {
    Scripted::Reply(Ok(Response {
        status: 200,
        body: encode_snapshot(snapshot),
    }))
}

/// A reply with an arbitrary status and body.
pub fn reply_raw(status: u16, body: &str) -> Scripted {
    Scripted::Reply(Ok(Response {
        status,
        body: body.to_string(),
    }))
}

/// A transport failure.
pub fn network_down() -> Scripted {
    Scripted::Reply(Err(ClientError::Transport("connection refused".into())))
}

/// A `200` reply to `snapshot` that waits for the returned sender.
pub fn held(snapshot: &GameSnapshot) -> (Scripted, oneshot::Sender<()>) {
    let (tx, rx) = oneshot::channel();
    let scripted = Scripted::Held {
        release: rx,
        reply: Ok(Response {
            status: 200,
            body: encode_snapshot(snapshot),
        }),
    };
    (scripted, tx)
}

// ── Snapshot helpers ────────────────────────────────────────────────

/// A fresh game with the given `(column, cell)` drops applied in order.
pub fn with_drops(drops: &[(usize, Cell)]) -> GameSnapshot {
    let mut snapshot = GameSnapshot::new_game();
    for &(col, cell) in drops {
        let row = snapshot.board.landing_row(col).expect("column has room");
        snapshot.board = snapshot.board.with_cell(row, col, cell).expect("in bounds");
    }
    snapshot
}

/// A game won by player one along the bottom row.
pub fn won_by_player_one() -> GameSnapshot {
    let mut snapshot = with_drops(&[
        (0, Cell::PlayerOne),
        (1, Cell::PlayerOne),
        (2, Cell::PlayerOne),
        (3, Cell::PlayerOne),
    ]);
    snapshot.is_over = true;
    snapshot.winner = Winner::PlayerOne;
    snapshot.winning_cells = (0..4).map(|c| (ROWS - 1, c)).collect();
    snapshot
}

/// A finished game with no winner.
pub fn drawn() -> GameSnapshot {
    GameSnapshot {
        is_over: true,
        winner: Winner::None,
        ..GameSnapshot::new_game()
    }
}

/// A game where `col` is filled to the top.
pub fn column_full(col: usize) -> GameSnapshot {
    let drops: Vec<(usize, Cell)> = (0..ROWS)
        .map(|i| {
            (
                col,
                if i % 2 == 0 {
                    Cell::PlayerOne
                } else {
                    Cell::PlayerTwo
                },
            )
        })
        .collect();
    with_drops(&drops)
}
