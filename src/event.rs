//! Notifications emitted by the [`MoveOrchestrator`](crate::orchestrator::MoveOrchestrator).
//!
//! Snapshot and status changes are also observable through `watch`
//! subscriptions; events additionally report failures that happen in
//! background work, such as an opponent turn running on a timer.

use crate::orchestrator::TurnStatus;
use crate::protocol::{GameOutcome, GameSnapshot};

/// Something the presentation layer may want to react to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameEvent {
    /// The store now holds a new snapshot (optimistic or server-confirmed).
    SnapshotReplaced(GameSnapshot),

    /// The turn status changed.
    StatusChanged(TurnStatus),

    /// A move was refused locally because the column is full.
    MoveRejected {
        /// The rejected column.
        column: usize,
    },

    /// A move round trip failed; state has been re-synchronized.
    MoveFailed {
        /// The column that was submitted.
        column: usize,
        /// Human-readable description of the failure.
        reason: String,
    },

    /// The opponent move request failed; state has been re-synchronized.
    OpponentMoveFailed {
        /// Human-readable description of the failure.
        reason: String,
    },

    /// A terminal snapshot was reached.
    GameOver {
        /// How the game ended.
        outcome: GameOutcome,
    },

    /// The auto-reset timer fired and a reset is starting.
    AutoResetFired,

    /// A reset finished; the store holds the fresh snapshot.
    ResetCompleted,

    /// A reset failed; status is back to awaiting the player regardless.
    ResetFailed {
        /// Human-readable description of the failure.
        reason: String,
    },
}
