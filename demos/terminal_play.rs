//! # Terminal Play Example
//!
//! Plays a game against a running Connect Four server from the terminal:
//!
//! 1. Load the server's current board
//! 2. Read a column (`0`-`6`) per line from stdin and submit it
//! 3. Redraw the board whenever the snapshot changes
//! 4. `r` starts a new game, `q` quits (as does Ctrl+C)
//!
//! ## Running
//!
//! ```sh
//! # Start the game server on localhost:8080, then:
//! cargo run --example terminal_play
//!
//! # Override the server URL:
//! CONNECT_FOUR_URL=http://my-server:8080 cargo run --example terminal_play
//! ```

use connect_four_client::transports::http::{HttpConfig, DEFAULT_BASE_URL};
use connect_four_client::{
    ClientError, GameEvent, HttpTransport, MoveOrchestrator, OrchestratorConfig, SyncClient,
};
use tokio::io::{AsyncBufReadExt, BufReader};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // ── Logging ─────────────────────────────────────────────────────
    // Initialize tracing. Set `RUST_LOG=debug` for verbose output.
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    // ── Configuration ───────────────────────────────────────────────
    let url = std::env::var("CONNECT_FOUR_URL").unwrap_or_else(|_| DEFAULT_BASE_URL.to_string());
    tracing::info!("Playing against {url}");

    let transport = HttpTransport::from_config(HttpConfig::new(url))?;
    let (game, mut event_rx) =
        MoveOrchestrator::start(SyncClient::new(transport), OrchestratorConfig::default());

    game.refresh().await?;
    println!("{}\n{}", game.snapshot().board, game.status_message());

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    // ── Input / event loop ──────────────────────────────────────────
    loop {
        tokio::select! {
            // Branch 1: a line typed by the player.
            line = lines.next_line() => {
                let Some(line) = line? else {
                    break;
                };
                match line.trim() {
                    "q" => break,
                    "r" => {
                        if let Err(e) = game.reset().await {
                            tracing::warn!("Reset failed: {e}");
                        }
                    }
                    input => match input.parse::<usize>() {
                        Ok(column) => match game.submit_move(column).await {
                            Ok(_) => {}
                            Err(ClientError::ColumnFull { column }) => {
                                println!("Column {column} is full, pick another.");
                            }
                            Err(e) => tracing::warn!("Move failed: {e}"),
                        },
                        Err(_) => println!("Type a column 0-6, `r` for a new game or `q` to quit."),
                    },
                }
            }

            // Branch 2: orchestrator notifications.
            event = event_rx.recv() => {
                let Some(event) = event else {
                    break;
                };
                match event {
                    GameEvent::SnapshotReplaced(snapshot) => {
                        println!("{}", snapshot.board);
                    }
                    GameEvent::StatusChanged(_) | GameEvent::GameOver { .. } => {
                        println!("{}", game.status_message());
                    }
                    GameEvent::OpponentMoveFailed { reason } => {
                        tracing::warn!("Opponent move failed: {reason}");
                    }
                    other => {
                        tracing::debug!("Event: {other:?}");
                    }
                }
            }

            // Branch 3: Ctrl+C.
            _ = tokio::signal::ctrl_c() => {
                tracing::info!("Ctrl+C received, exiting");
                break;
            }
        }
    }

    tracing::info!("Goodbye!");
    Ok(())
}
