//! Turn-taking state machine that drives a game against the server.
//!
//! [`MoveOrchestrator`] owns the [`TurnStatus`] and the pending auto-reset.
//! It places the human piece optimistically, submits it, schedules the
//! opponent turn after a short pause, and arms an auto-reset once the game
//! ends. Any failed round trip is resolved by re-fetching the server's
//! snapshot rather than patching local state.
//!
//! # Example
//!
//! ```rust,ignore
//! let transport = HttpTransport::new("http://localhost:8080")?;
//! let (game, mut events) =
//!     MoveOrchestrator::start(SyncClient::new(transport), OrchestratorConfig::default());
//! game.refresh().await?;
//!
//! game.submit_move(3).await?;
//! while let Some(event) = events.recv().await {
//!     if let GameEvent::StatusChanged(TurnStatus::AwaitingPlayer) = event {
//!         break;
//!     }
//! }
//! ```
//!
//! # Epochs
//!
//! Every reset starts a new epoch. Work begun under an older epoch (a move
//! round trip, a sleeping opponent turn, a re-fetch) checks the epoch before
//! touching the store or the status and discards its result if a reset has
//! happened in the meantime. Network calls themselves are never aborted.

use std::fmt;
use std::sync::{Arc, Mutex, MutexGuard, PoisonError};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use tokio::sync::{mpsc, watch};
use tokio::task::{JoinError, JoinHandle};
use tracing::{debug, info, warn};

use crate::error::{ClientError, Result};
use crate::event::GameEvent;
use crate::protocol::{GameOutcome, GameSnapshot, Player, COLUMNS};
use crate::store::{GameStateStore, Placement};
use crate::sync::SyncClient;
use crate::transport::Transport;

/// Default pause before the opponent move is requested.
const DEFAULT_OPPONENT_DELAY: Duration = Duration::from_secs(1);

/// Default time a finished game stays on screen before the auto-reset.
const DEFAULT_AUTO_RESET_DELAY: Duration = Duration::from_secs(2);

/// Default capacity of the bounded event channel.
const DEFAULT_EVENT_CHANNEL_CAPACITY: usize = 256;

// ── Turn status ─────────────────────────────────────────────────────

/// Where the game is in the turn cycle. Exactly one value at any instant.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TurnStatus {
    /// The human may submit a move.
    #[default]
    AwaitingPlayer,
    /// The human move is on its way to the server.
    PlayerMoveInFlight,
    /// Pausing before the opponent move is requested.
    OpponentThinking,
    /// The opponent move request is on its way to the server.
    OpponentMoveInFlight,
    /// The last snapshot was terminal.
    GameOver,
}

impl TurnStatus {
    /// Returns `true` while a request is outstanding.
    pub fn is_in_flight(self) -> bool {
        matches!(self, Self::PlayerMoveInFlight | Self::OpponentMoveInFlight)
    }

    /// Returns `true` if a move submitted now would be accepted.
    pub fn accepts_moves(self) -> bool {
        self == Self::AwaitingPlayer
    }
}

impl fmt::Display for TurnStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::AwaitingPlayer => "awaiting player",
            Self::PlayerMoveInFlight => "player move in flight",
            Self::OpponentThinking => "opponent thinking",
            Self::OpponentMoveInFlight => "opponent move in flight",
            Self::GameOver => "game over",
        };
        f.write_str(s)
    }
}

/// One-line status text for a status bar.
pub fn status_message(snapshot: &GameSnapshot, status: TurnStatus) -> &'static str {
    match snapshot.outcome() {
        GameOutcome::Won(Player::One) => "You win!",
        GameOutcome::Won(Player::Two) => "AI wins!",
        GameOutcome::Draw => "It's a draw!",
        GameOutcome::InProgress => match status {
            TurnStatus::OpponentThinking | TurnStatus::OpponentMoveInFlight => {
                "AI is thinking..."
            }
            TurnStatus::PlayerMoveInFlight => "Dropping your piece...",
            TurnStatus::AwaitingPlayer | TurnStatus::GameOver => "Your turn - drop a piece!",
        },
    }
}

// ── Configuration ───────────────────────────────────────────────────

/// Timing and channel settings for a [`MoveOrchestrator`].
///
/// # Example
///
/// ```
/// use connect_four_client::orchestrator::OrchestratorConfig;
/// use std::time::Duration;
///
/// let config = OrchestratorConfig::default()
///     .with_opponent_delay(Duration::from_millis(250))
///     .with_auto_reset(false);
/// assert!(!config.auto_reset);
/// ```
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    /// Pause between a confirmed human move and the opponent request.
    ///
    /// Defaults to **1 second**.
    pub opponent_delay: Duration,
    /// How long a finished game is shown before it resets itself.
    ///
    /// Defaults to **2 seconds**.
    pub auto_reset_delay: Duration,
    /// Whether a terminal snapshot arms the auto-reset timer.
    ///
    /// Defaults to **true**.
    pub auto_reset: bool,
    /// Capacity of the bounded event channel. Events are dropped (with a
    /// warning) when the consumer falls behind.
    ///
    /// Defaults to **256**. Values below 1 are clamped to 1.
    pub event_channel_capacity: usize,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            opponent_delay: DEFAULT_OPPONENT_DELAY,
            auto_reset_delay: DEFAULT_AUTO_RESET_DELAY,
            auto_reset: true,
            event_channel_capacity: DEFAULT_EVENT_CHANNEL_CAPACITY,
        }
    }
}

impl OrchestratorConfig {
    /// Set the pause before the opponent move.
    #[must_use]
    pub fn with_opponent_delay(mut self, delay: Duration) -> Self {
        self.opponent_delay = delay;
        self
    }

    /// Set how long a finished game stays up before resetting.
    #[must_use]
    pub fn with_auto_reset_delay(mut self, delay: Duration) -> Self {
        self.auto_reset_delay = delay;
        self
    }

    /// Enable or disable the auto-reset.
    #[must_use]
    pub fn with_auto_reset(mut self, enabled: bool) -> Self {
        self.auto_reset = enabled;
        self
    }

    /// Set the capacity of the event channel. Values below 1 are clamped to 1.
    #[must_use]
    pub fn with_event_channel_capacity(mut self, capacity: usize) -> Self {
        self.event_channel_capacity = capacity.max(1);
        self
    }
}

// ── Pending reset ───────────────────────────────────────────────────

/// Handle to an armed auto-reset timer.
#[derive(Debug)]
pub struct PendingReset {
    handle: JoinHandle<()>,
}

impl PendingReset {
    /// Stop the timer. Has no effect if it already fired.
    fn cancel(self) {
        self.handle.abort();
    }
}

/// Result of [`MoveOrchestrator::submit_move`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveOutcome {
    /// Another move, the opponent turn, a finished game, or a reset was in
    /// progress. Nothing happened.
    Ignored,
    /// The server accepted the move; carries the snapshot it returned.
    Accepted(GameSnapshot),
}

// ── Shared state ────────────────────────────────────────────────────

/// Mutable orchestration state. Only touched with the lock held, never
/// across an await.
#[derive(Debug, Default)]
struct Machine {
    status: TurnStatus,
    epoch: u64,
    resetting: bool,
    pending_reset: Option<PendingReset>,
}

struct Inner<T> {
    sync: SyncClient<T>,
    store: GameStateStore,
    machine: Mutex<Machine>,
    status_tx: watch::Sender<TurnStatus>,
    event_tx: mpsc::Sender<GameEvent>,
    config: OrchestratorConfig,
}

// ── Orchestrator handle ─────────────────────────────────────────────

/// Drives the turn cycle for one game.
///
/// Created via [`MoveOrchestrator::start`]. Handles are cheap to clone and
/// share the same state. Timers run as tokio tasks, so the orchestrator must
/// be started inside a tokio runtime.
pub struct MoveOrchestrator<T> {
    inner: Arc<Inner<T>>,
}

impl<T> Clone for MoveOrchestrator<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<T: Transport> MoveOrchestrator<T> {
    /// Create an orchestrator over a fresh store holding an empty board.
    ///
    /// Call [`refresh`](Self::refresh) to load the server's current game.
    #[must_use = "the event receiver must be used to receive events"]
    pub fn start(
        sync: SyncClient<T>,
        config: OrchestratorConfig,
    ) -> (Self, mpsc::Receiver<GameEvent>) {
        Self::start_with_store(sync, GameStateStore::default(), config)
    }

    /// Create an orchestrator that writes into an existing store.
    #[must_use = "the event receiver must be used to receive events"]
    pub fn start_with_store(
        sync: SyncClient<T>,
        store: GameStateStore,
        config: OrchestratorConfig,
    ) -> (Self, mpsc::Receiver<GameEvent>) {
        // Clamp capacity to at least 1 (tokio panics on 0).
        let capacity = config.event_channel_capacity.max(1);
        let (event_tx, event_rx) = mpsc::channel(capacity);
        let (status_tx, _status_rx) = watch::channel(TurnStatus::AwaitingPlayer);

        let inner = Arc::new(Inner {
            sync,
            store,
            machine: Mutex::new(Machine::default()),
            status_tx,
            event_tx,
            config,
        });
        (Self { inner }, event_rx)
    }

    // ── Public API methods ──────────────────────────────────────────

    /// Submit the human move for `column`.
    ///
    /// Does nothing and returns [`MoveOutcome::Ignored`] unless the status is
    /// [`TurnStatus::AwaitingPlayer`]. Otherwise the piece is placed
    /// optimistically and sent to the server. On success the opponent turn is
    /// scheduled, or the game-over state entered. On failure the server
    /// snapshot is re-fetched and the status returns to awaiting the player.
    ///
    /// # Errors
    ///
    /// - [`ClientError::InvalidColumn`] if `column >= 7`
    /// - [`ClientError::ColumnFull`] if the column has no empty cell
    /// - [`ClientError::MoveSubmissionFailed`] if the round trip failed
    ///
    /// In every error case the status is back to awaiting the player. The
    /// round trip runs in a spawned task, so it completes (and the status
    /// settles) even if the returned future is dropped.
    pub async fn submit_move(&self, column: usize) -> Result<MoveOutcome> {
        let inner = &self.inner;
        let epoch = {
            let mut machine = inner.machine();
            if machine.status != TurnStatus::AwaitingPlayer || machine.resetting {
                return Ok(MoveOutcome::Ignored);
            }
            if column >= COLUMNS {
                return Err(ClientError::InvalidColumn { column });
            }
            inner.set_status(&mut machine, TurnStatus::PlayerMoveInFlight);
            machine.epoch
        };

        let previous = inner.store.current();
        match inner.store.apply_optimistic_placement(column, Player::One) {
            Placement::Placed(snapshot) => {
                inner.emit(GameEvent::SnapshotReplaced(snapshot));
            }
            Placement::Rejected => {
                debug!(column, "column full, move not sent");
                inner.transition(epoch, TurnStatus::AwaitingPlayer);
                inner.emit(GameEvent::MoveRejected { column });
                return Err(ClientError::ColumnFull { column });
            }
        }

        // Detached from the caller: dropping this future does not abandon
        // the round trip.
        let task = tokio::spawn({
            let inner = Arc::clone(inner);
            async move { inner.finish_move(epoch, column, previous).await }
        });
        task.await.map_err(task_failed)?
    }

    /// Abort whatever is happening and start a new game.
    ///
    /// Cancels a pending auto-reset, asks the server to reset, and loads the
    /// fresh snapshot. The status ends at [`TurnStatus::AwaitingPlayer`]
    /// whether or not the server calls succeed.
    ///
    /// # Errors
    ///
    /// Returns the failure of the reset or the follow-up fetch. The store
    /// keeps its previous snapshot in that case. Like
    /// [`submit_move`](Self::submit_move), the server calls run in a spawned
    /// task and finish even if the returned future is dropped.
    pub async fn reset(&self) -> Result<GameSnapshot> {
        self.inner.reset().await
    }

    /// Load the server's current snapshot.
    ///
    /// Applied only while awaiting the player or showing a finished game;
    /// during a turn the fetched snapshot is returned but not stored. A
    /// terminal snapshot enters the game-over state. A finished game is only
    /// left through a reset: while in game over, an in-progress snapshot is
    /// returned but not stored.
    ///
    /// # Errors
    ///
    /// Returns the failure of the fetch; local state is unchanged.
    pub async fn refresh(&self) -> Result<GameSnapshot> {
        self.inner.refresh().await
    }

    // ── State accessors ─────────────────────────────────────────────

    /// The current turn status.
    pub fn status(&self) -> TurnStatus {
        self.inner.machine().status
    }

    /// A copy of the current snapshot.
    pub fn snapshot(&self) -> GameSnapshot {
        self.inner.store.current()
    }

    /// The store this orchestrator writes into.
    pub fn store(&self) -> &GameStateStore {
        &self.inner.store
    }

    /// Returns `true` while an auto-reset timer is armed.
    pub fn has_pending_reset(&self) -> bool {
        self.inner
            .machine()
            .pending_reset
            .as_ref()
            .is_some_and(|p| !p.handle.is_finished())
    }

    /// Subscribe to turn status changes.
    pub fn subscribe_status(&self) -> watch::Receiver<TurnStatus> {
        self.inner.status_tx.subscribe()
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe_snapshot(&self) -> watch::Receiver<GameSnapshot> {
        self.inner.store.subscribe()
    }

    /// Status line text for the current snapshot and status.
    pub fn status_message(&self) -> &'static str {
        status_message(&self.snapshot(), self.status())
    }
}

impl<T> fmt::Debug for MoveOrchestrator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let machine = self.inner.machine();
        f.debug_struct("MoveOrchestrator")
            .field("status", &machine.status)
            .field("epoch", &machine.epoch)
            .field("pending_reset", &machine.pending_reset.is_some())
            .finish_non_exhaustive()
    }
}

// ── Internal helpers ────────────────────────────────────────────────

impl<T> Inner<T> {
    fn machine(&self) -> MutexGuard<'_, Machine> {
        self.machine.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Emit an event. If the channel is full, log a warning and drop the
    /// event so orchestration never blocks on a slow consumer.
    fn emit(&self, event: GameEvent) {
        match self.event_tx.try_send(event) {
            Ok(()) => {}
            Err(mpsc::error::TrySendError::Full(dropped)) => {
                warn!(
                    "event channel full, dropping event: {:?}",
                    std::mem::discriminant(&dropped)
                );
            }
            Err(mpsc::error::TrySendError::Closed(_)) => {
                debug!("event channel closed, receiver dropped");
            }
        }
    }

    fn set_status(&self, machine: &mut Machine, status: TurnStatus) {
        if machine.status == status {
            return;
        }
        debug!(from = %machine.status, to = %status, "turn status");
        machine.status = status;
        self.status_tx.send_replace(status);
        self.emit(GameEvent::StatusChanged(status));
    }

    /// Move to `status` unless a reset started a new epoch.
    fn transition(&self, epoch: u64, status: TurnStatus) {
        let mut machine = self.machine();
        if machine.epoch == epoch {
            self.set_status(&mut machine, status);
        }
    }
}

impl<T: Transport> Inner<T> {
    /// Store a server snapshot and advance: to game over if it is terminal,
    /// otherwise to `next`. Returns the new status, or `None` when the
    /// snapshot belongs to an older epoch and was discarded.
    fn commit(
        self: &Arc<Self>,
        epoch: u64,
        snapshot: GameSnapshot,
        next: TurnStatus,
    ) -> Option<TurnStatus> {
        let mut machine = self.machine();
        if machine.epoch != epoch {
            debug!(epoch, current = machine.epoch, "discarding response from before reset");
            return None;
        }
        let outcome = snapshot.outcome();
        self.store.replace(snapshot.clone());
        self.emit(GameEvent::SnapshotReplaced(snapshot));

        if outcome == GameOutcome::InProgress {
            self.set_status(&mut machine, next);
        } else {
            self.enter_game_over(&mut machine, outcome);
        }
        Some(machine.status)
    }

    fn enter_game_over(self: &Arc<Self>, machine: &mut Machine, outcome: GameOutcome) {
        info!(?outcome, "game over");
        self.set_status(machine, TurnStatus::GameOver);
        self.emit(GameEvent::GameOver { outcome });

        if let Some(previous) = machine.pending_reset.take() {
            previous.cancel();
        }
        if !self.config.auto_reset {
            return;
        }

        let inner = Arc::clone(self);
        let epoch = machine.epoch;
        let delay = self.config.auto_reset_delay;
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.fire_auto_reset(epoch).await;
        });
        debug!(?delay, "auto-reset armed");
        machine.pending_reset = Some(PendingReset { handle });
    }

    async fn fire_auto_reset(self: &Arc<Self>, epoch: u64) {
        {
            let mut machine = self.machine();
            if machine.epoch != epoch || machine.status != TurnStatus::GameOver {
                return;
            }
            // Detach our own handle so the reset below does not abort this task.
            machine.pending_reset = None;
        }
        info!("auto-reset fired");
        self.emit(GameEvent::AutoResetFired);
        if let Err(e) = self.reset().await {
            warn!(error = %e, "auto-reset failed");
        }
    }

    /// Send an optimistically placed move and settle the outcome.
    async fn finish_move(
        self: &Arc<Self>,
        epoch: u64,
        column: usize,
        previous: GameSnapshot,
    ) -> Result<MoveOutcome> {
        match self.sync.post_move(column).await {
            Ok(snapshot) => {
                let next = self.commit(epoch, snapshot.clone(), TurnStatus::OpponentThinking);
                if next == Some(TurnStatus::OpponentThinking) {
                    self.schedule_opponent_turn(epoch);
                }
                Ok(MoveOutcome::Accepted(snapshot))
            }
            Err(e) => {
                warn!(column, error = %e, "move submission failed, re-fetching server state");
                self.recover(epoch, Some(previous)).await;
                self.emit(GameEvent::MoveFailed {
                    column,
                    reason: e.to_string(),
                });
                Err(ClientError::MoveSubmissionFailed {
                    source: Box::new(e),
                })
            }
        }
    }

    fn schedule_opponent_turn(self: &Arc<Self>, epoch: u64) {
        let inner = Arc::clone(self);
        let delay = self.config.opponent_delay;
        tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            inner.run_opponent_turn(epoch).await;
        });
    }

    async fn run_opponent_turn(self: &Arc<Self>, epoch: u64) {
        {
            let mut machine = self.machine();
            if machine.epoch != epoch || machine.status != TurnStatus::OpponentThinking {
                debug!("opponent turn no longer current, standing down");
                return;
            }
            self.set_status(&mut machine, TurnStatus::OpponentMoveInFlight);
        }

        match self.sync.post_opponent_move().await {
            Ok(snapshot) => {
                self.commit(epoch, snapshot, TurnStatus::AwaitingPlayer);
            }
            Err(e) => {
                warn!(error = %e, "opponent move failed, re-fetching server state");
                self.recover(epoch, None).await;
                self.emit(GameEvent::OpponentMoveFailed {
                    reason: e.to_string(),
                });
            }
        }
    }

    /// Replace local state with the server's after a failed round trip.
    ///
    /// If the re-fetch fails too, `fallback` (the last snapshot known to
    /// match the server) is restored instead, or the store is left alone.
    async fn recover(self: &Arc<Self>, epoch: u64, fallback: Option<GameSnapshot>) {
        let fetched = self.sync.fetch_state().await;

        let mut machine = self.machine();
        if machine.epoch != epoch {
            debug!("discarding re-fetch from before reset");
            return;
        }
        let snapshot = match fetched {
            Ok(snapshot) => Some(snapshot),
            Err(e) => {
                warn!(error = %e, "re-fetch failed, keeping last known-good snapshot");
                fallback
            }
        };

        if let Some(snapshot) = snapshot {
            let outcome = snapshot.outcome();
            self.store.replace(snapshot.clone());
            self.emit(GameEvent::SnapshotReplaced(snapshot));
            if outcome != GameOutcome::InProgress {
                self.enter_game_over(&mut machine, outcome);
                return;
            }
        }
        self.set_status(&mut machine, TurnStatus::AwaitingPlayer);
    }

    async fn reset(self: &Arc<Self>) -> Result<GameSnapshot> {
        let epoch = {
            let mut machine = self.machine();
            if let Some(pending) = machine.pending_reset.take() {
                debug!("cancelling pending auto-reset");
                pending.cancel();
            }
            machine.epoch = machine.epoch.wrapping_add(1);
            machine.resetting = true;
            machine.epoch
        };

        let task = tokio::spawn({
            let inner = Arc::clone(self);
            async move { inner.finish_reset(epoch).await }
        });
        task.await.map_err(task_failed)?
    }

    async fn finish_reset(self: &Arc<Self>, epoch: u64) -> Result<GameSnapshot> {
        let result = match self.sync.reset_game().await {
            Ok(()) => self.sync.fetch_state().await,
            Err(e) => Err(e),
        };

        let mut machine = self.machine();
        if machine.epoch != epoch {
            // A later reset owns the state now.
            return result;
        }
        machine.resetting = false;
        match &result {
            Ok(snapshot) => {
                self.store.replace(snapshot.clone());
                self.emit(GameEvent::SnapshotReplaced(snapshot.clone()));
                info!("game reset");
                self.emit(GameEvent::ResetCompleted);
            }
            Err(e) => {
                warn!(error = %e, "reset failed");
                self.emit(GameEvent::ResetFailed {
                    reason: e.to_string(),
                });
            }
        }
        self.set_status(&mut machine, TurnStatus::AwaitingPlayer);
        result
    }

    async fn refresh(self: &Arc<Self>) -> Result<GameSnapshot> {
        let epoch = self.machine().epoch;
        let snapshot = self.sync.fetch_state().await?;

        let mut machine = self.machine();
        let settled = matches!(
            machine.status,
            TurnStatus::AwaitingPlayer | TurnStatus::GameOver
        );
        if machine.epoch != epoch || machine.resetting || !settled {
            debug!(status = %machine.status, "turn in progress, not applying refresh");
            return Ok(snapshot);
        }

        let outcome = snapshot.outcome();
        if machine.status == TurnStatus::GameOver && outcome == GameOutcome::InProgress {
            // Only a reset leaves game over.
            debug!("game over until reset, not applying in-progress refresh");
            return Ok(snapshot);
        }
        self.store.replace(snapshot.clone());
        self.emit(GameEvent::SnapshotReplaced(snapshot.clone()));

        if machine.status == TurnStatus::AwaitingPlayer && outcome != GameOutcome::InProgress {
            self.enter_game_over(&mut machine, outcome);
        }
        Ok(snapshot)
    }
}

/// A background round trip that panicked or was aborted.
fn task_failed(e: JoinError) -> ClientError {
    ClientError::Transport(format!("background task failed: {e}"))
}

// ── Tests ───────────────────────────────────────────────────────────

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
    use crate::transport::{Request, Response};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    // ── Mock transport ──────────────────────────────────────────────

    /// Replays scripted responses in order and records request paths.
    struct MockTransport {
        responses: StdMutex<VecDeque<std::result::Result<Response, ClientError>>>,
        paths: Arc<StdMutex<Vec<String>>>,
    }

    impl MockTransport {
        fn new(
            responses: Vec<std::result::Result<Response, ClientError>>,
        ) -> (Self, Arc<StdMutex<Vec<String>>>) {
            let paths = Arc::new(StdMutex::new(Vec::new()));
            let transport = Self {
                responses: StdMutex::new(VecDeque::from(responses)),
                paths: Arc::clone(&paths),
            };
            (transport, paths)
        }
    }

    #[async_trait]
    impl Transport for MockTransport {
        async fn send(&self, request: Request) -> std::result::Result<Response, ClientError> {
            self.paths.lock().unwrap().push(request.path);
            self.responses
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or_else(|| Err(ClientError::Transport("script exhausted".into())))
        }
    }

    fn ok(snapshot: &GameSnapshot) -> std::result::Result<Response, ClientError> {
        Ok(Response {
            status: 200,
            body: encode_snapshot(snapshot),
        })
    }

    fn start(
        responses: Vec<std::result::Result<Response, ClientError>>,
    ) -> (
        MoveOrchestrator<MockTransport>,
        mpsc::Receiver<GameEvent>,
        Arc<StdMutex<Vec<String>>>,
    ) {
        let (transport, paths) = MockTransport::new(responses);
        let (orch, events) =
            MoveOrchestrator::start(SyncClient::new(transport), OrchestratorConfig::default());
        (orch, events, paths)
    }

    // ── Config ──────────────────────────────────────────────────────

    #[test]
    fn config_defaults() {
        let config = OrchestratorConfig::default();
        assert_eq!(config.opponent_delay, Duration::from_secs(1));
        assert_eq!(config.auto_reset_delay, Duration::from_secs(2));
        assert!(config.auto_reset);
        assert_eq!(config.event_channel_capacity, 256);
    }

    #[test]
    fn event_channel_capacity_is_clamped_to_one() {
        let config = OrchestratorConfig::default().with_event_channel_capacity(0);
        assert_eq!(config.event_channel_capacity, 1);
    }

    #[test]
    fn in_flight_statuses() {
        assert!(TurnStatus::PlayerMoveInFlight.is_in_flight());
        assert!(TurnStatus::OpponentMoveInFlight.is_in_flight());
        assert!(!TurnStatus::OpponentThinking.is_in_flight());
        assert!(TurnStatus::AwaitingPlayer.accepts_moves());
        assert!(!TurnStatus::GameOver.accepts_moves());
    }

    #[test]
    fn status_messages() {
        let mut snap = GameSnapshot::new_game();
        assert_eq!(
            status_message(&snap, TurnStatus::OpponentThinking),
            "AI is thinking..."
        );
        assert_eq!(
            status_message(&snap, TurnStatus::AwaitingPlayer),
            "Your turn - drop a piece!"
        );
        snap.is_over = true;
        assert_eq!(status_message(&snap, TurnStatus::GameOver), "It's a draw!");
        snap.winner = Winner::PlayerOne;
        assert_eq!(status_message(&snap, TurnStatus::GameOver), "You win!");
        snap.winner = Winner::PlayerTwo;
        assert_eq!(status_message(&snap, TurnStatus::GameOver), "AI wins!");
    }

    // ── Turn cycle ──────────────────────────────────────────────────

    #[tokio::test(start_paused = true)]
    async fn full_cycle_returns_to_awaiting_player() {
        let after_move = GameSnapshot::new_game().with_piece(3, Player::One).unwrap();
        let after_ai = after_move.with_piece(3, Player::Two).unwrap();
        let (orch, _events, paths) = start(vec![ok(&after_move), ok(&after_ai)]);

        let outcome = orch.submit_move(3).await.unwrap();
        assert_eq!(outcome, MoveOutcome::Accepted(after_move));
        assert_eq!(orch.status(), TurnStatus::OpponentThinking);

        tokio::time::sleep(Duration::from_millis(1100)).await;
        assert_eq!(orch.status(), TurnStatus::AwaitingPlayer);
        assert_eq!(orch.snapshot(), after_ai);
        assert_eq!(*paths.lock().unwrap(), vec!["/move", "/ai-move"]);
    }

    #[tokio::test(start_paused = true)]
    async fn opponent_waits_for_delay() {
        let after_move = GameSnapshot::new_game().with_piece(0, Player::One).unwrap();
        let (orch, _events, paths) = start(vec![ok(&after_move)]);

        orch.submit_move(0).await.unwrap();
        tokio::time::sleep(Duration::from_millis(900)).await;
        assert_eq!(orch.status(), TurnStatus::OpponentThinking);
        assert_eq!(paths.lock().unwrap().len(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn submit_while_opponent_thinking_is_ignored() {
        let after_move = GameSnapshot::new_game().with_piece(3, Player::One).unwrap();
        let (orch, _events, paths) = start(vec![ok(&after_move)]);

        orch.submit_move(3).await.unwrap();
        let before = orch.snapshot();

        let outcome = orch.submit_move(3).await.unwrap();
        assert_eq!(outcome, MoveOutcome::Ignored);
        assert_eq!(orch.snapshot(), before);
        assert_eq!(orch.status(), TurnStatus::OpponentThinking);
        assert_eq!(paths.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn invalid_column_is_rejected_locally() {
        let (orch, _events, paths) = start(vec![]);
        let err = orch.submit_move(7).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidColumn { column: 7 }));
        assert_eq!(orch.status(), TurnStatus::AwaitingPlayer);
        assert!(paths.lock().unwrap().is_empty());
    }

    #[tokio::test(start_paused = true)]
    async fn terminal_move_arms_auto_reset() {
        let won = GameSnapshot {
            is_over: true,
            winner: Winner::PlayerOne,
            winning_cells: vec![(5, 0), (5, 1), (5, 2), (5, 3)],
            ..GameSnapshot::new_game()
        };
        let fresh = GameSnapshot::new_game();
        let (orch, _events, paths) = start(vec![
            ok(&won),
            Ok(Response {
                status: 200,
                body: encode_snapshot(&fresh),
            }),
            ok(&fresh),
        ]);

        orch.submit_move(3).await.unwrap();
        assert_eq!(orch.status(), TurnStatus::GameOver);
        assert!(orch.has_pending_reset());

        tokio::time::sleep(Duration::from_millis(2100)).await;
        assert_eq!(orch.status(), TurnStatus::AwaitingPlayer);
        assert_eq!(orch.snapshot(), fresh);
        assert!(!orch.has_pending_reset());
        assert_eq!(*paths.lock().unwrap(), vec!["/move", "/reset", "/board"]);
    }

    #[tokio::test(start_paused = true)]
    async fn auto_reset_can_be_disabled() {
        let won = GameSnapshot {
            is_over: true,
            winner: Winner::PlayerTwo,
            ..GameSnapshot::new_game()
        };
        let (transport, paths) = MockTransport::new(vec![ok(&won)]);
        let (orch, _events) = MoveOrchestrator::start(
            SyncClient::new(transport),
            OrchestratorConfig::default().with_auto_reset(false),
        );

        orch.submit_move(1).await.unwrap();
        tokio::time::sleep(Duration::from_secs(5)).await;
        assert_eq!(orch.status(), TurnStatus::GameOver);
        assert_eq!(paths.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn debug_impl_shows_status() {
        let (orch, _events, _paths) = start(vec![]);
        let text = format!("{orch:?}");
        assert!(text.contains("MoveOrchestrator"));
        assert!(text.contains("AwaitingPlayer"));
    }
}
