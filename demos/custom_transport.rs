//! # Custom Transport Example
//!
//! Shows how to implement the [`Transport`] trait with an in-process fake
//! game server. This is useful for:
//!
//! - **Testing** — exercise your UI against the real orchestrator without a server
//! - **Custom backends** — adapt any I/O layer to the four game endpoints
//!
//! ## Running
//!
//! ```sh
//! cargo run --example custom_transport
//! ```

use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use connect_four_client::protocol::{encode_snapshot, COLUMNS, ROWS};
use connect_four_client::{
    Cell, ClientError, GameEvent, GameSnapshot, MoveOrchestrator, OrchestratorConfig, Player,
    Request, Response, SyncClient, Transport, TurnStatus, Winner,
};

// ─────────────────────────────────────────────────────────────────────
// Step 1: A tiny server-side game
// ─────────────────────────────────────────────────────────────────────

/// Authoritative game state held by the fake server.
struct FakeGame {
    snapshot: GameSnapshot,
    to_move: Player,
}

impl FakeGame {
    fn new() -> Self {
        Self {
            snapshot: GameSnapshot::new_game(),
            to_move: Player::One,
        }
    }

    /// Apply a move for the side to move. Returns `false` if illegal.
    fn play(&mut self, column: usize) -> bool {
        if self.snapshot.is_over {
            return false;
        }
        let Some(row) = self.snapshot.board.landing_row(column) else {
            return false;
        };
        let Some(next) = self.snapshot.with_piece(column, self.to_move) else {
            return false;
        };
        self.snapshot = next;

        if let Some(line) = winning_line(&self.snapshot, row, column) {
            self.snapshot.is_over = true;
            self.snapshot.winner = match self.to_move {
                Player::One => Winner::PlayerOne,
                Player::Two => Winner::PlayerTwo,
            };
            self.snapshot.winning_cells = line;
        } else if self.snapshot.board.is_full() {
            self.snapshot.is_over = true;
        }
        self.to_move = match self.to_move {
            Player::One => Player::Two,
            Player::Two => Player::One,
        };
        true
    }

    /// The opponent prefers the centre, then works outwards.
    fn opponent_column(&self) -> Option<usize> {
        [3, 2, 4, 1, 5, 0, 6]
            .into_iter()
            .find(|&c| !self.snapshot.board.is_column_full(c))
    }
}

/// Four in a row through `(row, col)`, if any.
fn winning_line(snapshot: &GameSnapshot, row: usize, col: usize) -> Option<Vec<(usize, usize)>> {
    let piece = snapshot.board.get(row, col)?;
    if piece == Cell::Empty {
        return None;
    }
    let same = |r: isize, c: isize| -> bool {
        r >= 0
            && c >= 0
            && (r as usize) < ROWS
            && (c as usize) < COLUMNS
            && snapshot.board.get(r as usize, c as usize) == Some(piece)
    };

    for (dr, dc) in [(0isize, 1isize), (1, 0), (1, 1), (1, -1)] {
        let mut line = vec![(row, col)];
        for sign in [1isize, -1] {
            let (mut r, mut c) = (row as isize + dr * sign, col as isize + dc * sign);
            while same(r, c) {
                line.push((r as usize, c as usize));
                r += dr * sign;
                c += dc * sign;
            }
        }
        if line.len() >= 4 {
            line.sort_unstable();
            line.truncate(4);
            return Some(line);
        }
    }
    None
}

// ─────────────────────────────────────────────────────────────────────
// Step 2: Implement the Transport trait
// ─────────────────────────────────────────────────────────────────────

/// A transport that answers requests from an in-process [`FakeGame`].
struct InProcessServer {
    game: Mutex<FakeGame>,
}

#[async_trait]
impl Transport for InProcessServer {
    async fn send(&self, request: Request) -> Result<Response, ClientError> {
        let mut game = self
            .game
            .lock()
            .map_err(|_| ClientError::Transport("server state poisoned".into()))?;

        let accepted = match request.path.as_str() {
            "/board" => true,
            "/reset" => {
                *game = FakeGame::new();
                true
            }
            "/move" => request
                .body
                .as_deref()
                .and_then(|b| b.strip_prefix("column="))
                .and_then(|c| c.parse::<usize>().ok())
                .is_some_and(|column| game.play(column)),
            "/ai-move" => game.opponent_column().is_some_and(|c| game.play(c)),
            other => {
                return Ok(Response {
                    status: 404,
                    body: format!("no such endpoint: {other}"),
                })
            }
        };

        Ok(Response {
            status: if accepted { 200 } else { 400 },
            body: encode_snapshot(&game.snapshot),
        })
    }
}

// ─────────────────────────────────────────────────────────────────────
// Step 3: Play a scripted game against the fake server
// ─────────────────────────────────────────────────────────────────────

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Initialize tracing for readable output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let server = InProcessServer {
        game: Mutex::new(FakeGame::new()),
    };
    let config = OrchestratorConfig::default()
        .with_opponent_delay(Duration::from_millis(100))
        .with_auto_reset(false);
    let (game, mut event_rx) = MoveOrchestrator::start(SyncClient::new(server), config);
    game.refresh().await?;

    let mut status_rx = game.subscribe_status();
    // Stack the left-most column; the opponent answers in the centre.
    for _ in 0..4 {
        game.submit_move(0).await?;
        status_rx
            .wait_for(|s| matches!(s, TurnStatus::AwaitingPlayer | TurnStatus::GameOver))
            .await?;
        if game.status() == TurnStatus::GameOver {
            break;
        }
    }

    println!("{}", game.snapshot().board);
    tracing::info!("Result: {}", game.status_message());

    // Drain whatever events arrived while playing.
    while let Ok(event) = event_rx.try_recv() {
        if let GameEvent::GameOver { outcome } = event {
            tracing::info!("Event: GameOver {outcome:?}");
        }
    }
    Ok(())
}
