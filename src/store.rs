//! Single source of truth for the current [`GameSnapshot`].
//!
//! [`GameStateStore`] wraps a [`tokio::sync::watch`] channel. Every write is a
//! whole-value swap, so a reader never sees a board from one response paired
//! with status fields from another. Renderers call [`subscribe`](GameStateStore::subscribe)
//! to be woken on every change.

use std::sync::Arc;

use tokio::sync::watch;

use crate::protocol::{GameSnapshot, Player};

/// Result of an optimistic placement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Placement {
    /// The piece was placed; carries the snapshot now held by the store.
    Placed(GameSnapshot),
    /// The column had no empty cell. The store is unchanged.
    Rejected,
}

/// Holds the current snapshot and hands out change notifications.
///
/// Cloning the store yields another handle to the same snapshot.
#[derive(Debug, Clone)]
pub struct GameStateStore {
    tx: Arc<watch::Sender<GameSnapshot>>,
}

impl GameStateStore {
    /// Create a store holding `initial`.
    pub fn new(initial: GameSnapshot) -> Self {
        let (tx, _rx) = watch::channel(initial);
        Self { tx: Arc::new(tx) }
    }

    /// A copy of the current snapshot.
    pub fn current(&self) -> GameSnapshot {
        self.tx.borrow().clone()
    }

    /// Swap in `next`, replacing the previous snapshot entirely.
    pub fn replace(&self, next: GameSnapshot) {
        self.tx.send_replace(next);
    }

    /// Drop a piece for `player` into `column` ahead of server confirmation.
    ///
    /// The piece lands on the lowest empty row of the column. Status fields
    /// are left untouched. A full or out-of-range column yields
    /// [`Placement::Rejected`] and leaves the store unchanged.
    pub fn apply_optimistic_placement(&self, column: usize, player: Player) -> Placement {
        let mut placed = None;
        self.tx.send_if_modified(|snapshot| match snapshot.with_piece(column, player) {
            Some(next) => {
                *snapshot = next.clone();
                placed = Some(next);
                true
            }
            None => false,
        });
        match placed {
            Some(snapshot) => Placement::Placed(snapshot),
            None => Placement::Rejected,
        }
    }

    /// Subscribe to snapshot changes.
    pub fn subscribe(&self) -> watch::Receiver<GameSnapshot> {
        self.tx.subscribe()
    }
}

impl Default for GameStateStore {
    fn default() -> Self {
        Self::new(GameSnapshot::new_game())
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::indexing_slicing
)]
mod tests {
    use super::*;
    use crate::protocol::{Cell, Winner, ROWS};

    fn column_filled(col: usize) -> GameSnapshot {
        let mut snap = GameSnapshot::new_game();
        for row in 0..ROWS {
            snap.board = snap.board.with_cell(row, col, Cell::PlayerTwo).unwrap();
        }
        snap
    }

    #[test]
    fn placement_stacks_pieces() {
        let store = GameStateStore::default();
        assert!(matches!(
            store.apply_optimistic_placement(4, Player::One),
            Placement::Placed(_)
        ));
        let Placement::Placed(snap) = store.apply_optimistic_placement(4, Player::Two) else {
            panic!("second placement rejected");
        };
        assert_eq!(snap.board.get(ROWS - 1, 4), Some(Cell::PlayerOne));
        assert_eq!(snap.board.get(ROWS - 2, 4), Some(Cell::PlayerTwo));
        assert_eq!(store.current(), snap);
    }

    #[test]
    fn full_column_is_rejected_without_mutation() {
        let full = column_filled(1);
        let store = GameStateStore::new(full.clone());
        let mut rx = store.subscribe();
        rx.mark_unchanged();

        assert_eq!(
            store.apply_optimistic_placement(1, Player::One),
            Placement::Rejected
        );
        assert_eq!(store.current(), full);
        assert!(!rx.has_changed().unwrap());
    }

    #[test]
    fn out_of_range_column_is_rejected() {
        let store = GameStateStore::default();
        assert_eq!(
            store.apply_optimistic_placement(7, Player::One),
            Placement::Rejected
        );
    }

    #[test]
    fn replace_swaps_whole_snapshot() {
        let store = GameStateStore::default();
        let mut rx = store.subscribe();
        let next = GameSnapshot {
            is_over: true,
            winner: Winner::PlayerOne,
            winning_cells: vec![(5, 0), (5, 1), (5, 2), (5, 3)],
            ..column_filled(0)
        };
        store.replace(next.clone());
        assert!(rx.has_changed().unwrap());
        assert_eq!(*rx.borrow_and_update(), next);
    }

    #[test]
    fn clones_share_state() {
        let store = GameStateStore::default();
        let other = store.clone();
        other.apply_optimistic_placement(0, Player::One);
        assert_eq!(store.current(), other.current());
    }
}
