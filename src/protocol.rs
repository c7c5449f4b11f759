//! Game data model and the pipe-and-comma wire codec spoken by the game server.
//!
//! A server response body has up to three `|`-separated segments:
//!
//! ```text
//! <42 comma-separated cells>|<is_over 0/1>,<winner 0/1/2>|<extra>
//! ```
//!
//! `<extra>` is absent, the literal `draw`, or a flat list of `row,col`
//! pairs naming the winning cells. The reference server terminates every
//! value with a comma (`0,0,...,0,|0,0|`), so empty tokens are skipped.
//!
//! Only the board segment is decoded strictly. The status and extra
//! segments fall back to defaults when missing or malformed, so a server
//! that has not yet appended them still produces a usable snapshot.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::ProtocolError;

/// Number of rows on the board.
pub const ROWS: usize = 6;

/// Number of columns on the board.
pub const COLUMNS: usize = 7;

/// Number of cells carried by the board segment.
pub const CELL_COUNT: usize = ROWS * COLUMNS;

/// Literal extra segment the server sends for a drawn game.
pub const DRAW_MARKER: &str = "draw";

const SEGMENT_SEPARATOR: char = '|';
const VALUE_SEPARATOR: char = ',';

// ── Enums ───────────────────────────────────────────────────────────

/// One of the two players. `One` is the local human, `Two` the server-driven opponent.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "snake_case")]
pub enum Player {
    One,
    Two,
}

/// Contents of a single board cell.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    PlayerOne,
    PlayerTwo,
}

impl Cell {
    /// Parse a wire value (`0`, `1` or `2`).
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::Empty),
            1 => Some(Self::PlayerOne),
            2 => Some(Self::PlayerTwo),
            _ => None,
        }
    }

    /// The wire value of this cell.
    pub fn to_wire(self) -> u8 {
        match self {
            Self::Empty => 0,
            Self::PlayerOne => 1,
            Self::PlayerTwo => 2,
        }
    }

    /// Returns `true` if no piece occupies this cell.
    pub fn is_empty(self) -> bool {
        self == Self::Empty
    }
}

impl From<Player> for Cell {
    fn from(player: Player) -> Self {
        match player {
            Player::One => Self::PlayerOne,
            Player::Two => Self::PlayerTwo,
        }
    }
}

/// Winner reported in the status segment. `None` together with a finished
/// game denotes a draw.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash, Default)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    #[default]
    None,
    PlayerOne,
    PlayerTwo,
}

impl Winner {
    /// Parse a wire value (`0`, `1` or `2`).
    pub fn from_wire(value: u8) -> Option<Self> {
        match value {
            0 => Some(Self::None),
            1 => Some(Self::PlayerOne),
            2 => Some(Self::PlayerTwo),
            _ => None,
        }
    }

    /// The wire value of this winner.
    pub fn to_wire(self) -> u8 {
        match self {
            Self::None => 0,
            Self::PlayerOne => 1,
            Self::PlayerTwo => 2,
        }
    }

    /// The winning player, if any.
    pub fn player(self) -> Option<Player> {
        match self {
            Self::None => None,
            Self::PlayerOne => Some(Player::One),
            Self::PlayerTwo => Some(Player::Two),
        }
    }
}

/// Coarse outcome of a snapshot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case", tag = "type", content = "player")]
pub enum GameOutcome {
    InProgress,
    Won(Player),
    Draw,
}

// ── Board ───────────────────────────────────────────────────────────

/// A 6×7 grid of cells. Row 0 is the top row, row 5 the bottom row.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct Board {
    cells: [[Cell; COLUMNS]; ROWS],
}

impl Board {
    /// An empty board.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a board from row-major cells. Returns `None` unless exactly
    /// [`CELL_COUNT`] cells are supplied.
    pub fn from_cells(cells: impl IntoIterator<Item = Cell>) -> Option<Self> {
        let mut board = Self::empty();
        let mut count = 0;
        for cell in cells {
            let slot = board
                .cells
                .get_mut(count / COLUMNS)
                .and_then(|row| row.get_mut(count % COLUMNS))?;
            *slot = cell;
            count += 1;
        }
        (count == CELL_COUNT).then_some(board)
    }

    /// The cell at `(row, col)`, or `None` when out of bounds.
    pub fn get(&self, row: usize, col: usize) -> Option<Cell> {
        self.cells.get(row).and_then(|r| r.get(col)).copied()
    }

    /// Returns the board with `(row, col)` set to `cell`, or `None` when out of bounds.
    pub fn with_cell(mut self, row: usize, col: usize, cell: Cell) -> Option<Self> {
        let slot = self.cells.get_mut(row).and_then(|r| r.get_mut(col))?;
        *slot = cell;
        Some(self)
    }

    /// The row a piece dropped into `col` would land on: the lowest empty
    /// cell scanning from the bottom up. `None` when the column is full or
    /// out of range.
    pub fn landing_row(&self, col: usize) -> Option<usize> {
        if col >= COLUMNS {
            return None;
        }
        (0..ROWS)
            .rev()
            .find(|&row| self.get(row, col).is_some_and(Cell::is_empty))
    }

    /// Returns `true` when `col` has no empty cell (or is out of range).
    pub fn is_column_full(&self, col: usize) -> bool {
        self.landing_row(col).is_none()
    }

    /// Columns that still accept a piece, left to right.
    pub fn playable_columns(&self) -> Vec<usize> {
        (0..COLUMNS).filter(|&c| !self.is_column_full(c)).collect()
    }

    /// Returns `true` when every cell is occupied.
    pub fn is_full(&self) -> bool {
        self.cells().all(|c| !c.is_empty())
    }

    /// All cells in row-major order.
    pub fn cells(&self) -> impl Iterator<Item = Cell> + '_ {
        self.cells.iter().flat_map(|row| row.iter().copied())
    }

    /// Rows from top to bottom.
    pub fn rows(&self) -> &[[Cell; COLUMNS]; ROWS] {
        &self.cells
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in &self.cells {
            for (i, cell) in row.iter().enumerate() {
                if i > 0 {
                    f.write_str(" ")?;
                }
                let glyph = match cell {
                    Cell::Empty => ".",
                    Cell::PlayerOne => "X",
                    Cell::PlayerTwo => "O",
                };
                f.write_str(glyph)?;
            }
            writeln!(f)?;
        }
        let labels: Vec<String> = (0..COLUMNS).map(|c| c.to_string()).collect();
        writeln!(f, "{}", labels.join(" "))
    }
}

// ── Snapshot ────────────────────────────────────────────────────────

/// One immutable decoded game state.
///
/// Snapshots are replaced wholesale; nothing mutates a snapshot in place.
/// `winning_cells` is non-empty only when `is_over` is set and `winner` is
/// not [`Winner::None`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct GameSnapshot {
    pub board: Board,
    pub is_over: bool,
    pub winner: Winner,
    /// `(row, col)` pairs of the winning line.
    pub winning_cells: Vec<(usize, usize)>,
}

impl GameSnapshot {
    /// The snapshot of a fresh game: empty board, nobody has won.
    pub fn new_game() -> Self {
        Self::default()
    }

    /// Returns `true` when the game has ended (win or draw).
    pub fn is_terminal(&self) -> bool {
        self.is_over
    }

    /// Returns `true` when the game ended without a winner.
    pub fn is_draw(&self) -> bool {
        self.is_over && self.winner == Winner::None
    }

    /// Outcome of the game as far as this snapshot knows.
    pub fn outcome(&self) -> GameOutcome {
        if !self.is_over {
            return GameOutcome::InProgress;
        }
        match self.winner.player() {
            Some(player) => GameOutcome::Won(player),
            None => GameOutcome::Draw,
        }
    }

    /// Returns `true` if `(row, col)` belongs to the winning line.
    pub fn is_winning_cell(&self, row: usize, col: usize) -> bool {
        self.winning_cells.contains(&(row, col))
    }

    /// A copy of this snapshot with a piece for `player` dropped into `col`.
    /// Status fields are carried over untouched. `None` when the column is
    /// full or out of range.
    pub fn with_piece(&self, col: usize, player: Player) -> Option<Self> {
        let row = self.board.landing_row(col)?;
        let board = self.board.with_cell(row, col, Cell::from(player))?;
        Some(Self {
            board,
            ..self.clone()
        })
    }
}

// ── Decoding ────────────────────────────────────────────────────────

/// Split a segment into trimmed, non-empty tokens.
fn tokens(segment: &str) -> impl Iterator<Item = &str> {
    segment
        .split(VALUE_SEPARATOR)
        .map(str::trim)
        .filter(|t| !t.is_empty())
}

/// Decode a server response body into a [`GameSnapshot`].
///
/// # Errors
///
/// Returns [`ProtocolError::CellCount`] if the board segment does not hold
/// exactly 42 cells, or [`ProtocolError::CellValue`] if a cell is not `0`,
/// `1` or `2`. Problems in the status or extra segments never fail.
pub fn decode(raw: &str) -> Result<GameSnapshot, ProtocolError> {
    let mut segments = raw.trim().splitn(3, SEGMENT_SEPARATOR);

    let board = decode_board(segments.next().unwrap_or_default())?;
    let (is_over, winner) = segments
        .next()
        .and_then(decode_status)
        .unwrap_or((false, Winner::None));

    let winning_cells = if is_over && winner != Winner::None {
        segments.next().map(decode_winning_cells).unwrap_or_default()
    } else {
        Vec::new()
    };

    Ok(GameSnapshot {
        board,
        is_over,
        winner,
        winning_cells,
    })
}

/// Decode the board segment strictly.
pub fn decode_board(segment: &str) -> Result<Board, ProtocolError> {
    let raw: Vec<&str> = tokens(segment).collect();
    if raw.len() != CELL_COUNT {
        return Err(ProtocolError::CellCount {
            expected: CELL_COUNT,
            found: raw.len(),
        });
    }

    let cells = raw
        .iter()
        .enumerate()
        .map(|(index, token)| {
            cell_token(token).ok_or_else(|| ProtocolError::CellValue {
                index,
                token: (*token).to_string(),
            })
        })
        .collect::<Result<Vec<Cell>, ProtocolError>>()?;

    Board::from_cells(cells).ok_or(ProtocolError::CellCount {
        expected: CELL_COUNT,
        found: raw.len(),
    })
}

/// A board token in canonical form. `+1` and `01` are rejected.
fn cell_token(token: &str) -> Option<Cell> {
    match token {
        "0" => Some(Cell::Empty),
        "1" => Some(Cell::PlayerOne),
        "2" => Some(Cell::PlayerTwo),
        _ => None,
    }
}

/// Decode the status segment. `None` when missing values or out of range.
fn decode_status(segment: &str) -> Option<(bool, Winner)> {
    let mut values = tokens(segment);
    let is_over = match values.next()?.parse::<u8>().ok()? {
        0 => false,
        1 => true,
        _ => return None,
    };
    let winner = Winner::from_wire(values.next()?.parse::<u8>().ok()?)?;
    Some((is_over, winner))
}

/// Decode the winning-cell list. Anything unparsable yields an empty list;
/// a trailing unpaired value is dropped.
fn decode_winning_cells(segment: &str) -> Vec<(usize, usize)> {
    if segment.trim() == DRAW_MARKER {
        return Vec::new();
    }

    let Some(values) = tokens(segment)
        .map(|t| t.parse::<usize>().ok())
        .collect::<Option<Vec<usize>>>()
    else {
        tracing::warn!(segment, "ignoring unparsable winning-cell list");
        return Vec::new();
    };

    let pairs: Vec<(usize, usize)> = values
        .chunks_exact(2)
        .filter_map(|pair| match pair {
            [row, col] => Some((*row, *col)),
            _ => None,
        })
        .collect();

    if pairs.iter().any(|&(row, col)| row >= ROWS || col >= COLUMNS) {
        tracing::warn!(segment, "ignoring winning-cell list outside the board");
        return Vec::new();
    }
    pairs
}

// ── Encoding ────────────────────────────────────────────────────────

/// Form-encode a move request body: `column=<n>`.
///
/// The column is not range-checked here; callers reject bad columns first.
pub fn encode_move_request(column: usize) -> String {
    format!("column={column}")
}

/// Render only the board segment, one trailing comma per cell.
pub fn encode_board(board: &Board) -> String {
    board
        .cells()
        .map(|c| format!("{}{VALUE_SEPARATOR}", c.to_wire()))
        .collect()
}

/// Render a snapshot the way the game server does.
///
/// Used by in-process fake servers; [`decode`] accepts the output.
pub fn encode_snapshot(snapshot: &GameSnapshot) -> String {
    let mut out = encode_board(&snapshot.board);
    out.push(SEGMENT_SEPARATOR);
    out.push_str(&format!(
        "{}{VALUE_SEPARATOR}{}",
        u8::from(snapshot.is_over),
        snapshot.winner.to_wire()
    ));
    out.push(SEGMENT_SEPARATOR);
    if snapshot.is_draw() {
        out.push_str(DRAW_MARKER);
    } else if snapshot.is_over {
        for (row, col) in &snapshot.winning_cells {
            out.push_str(&format!("{row}{VALUE_SEPARATOR}{col}{VALUE_SEPARATOR}"));
        }
    }
    out
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

    fn zeros() -> String {
        vec!["0"; CELL_COUNT].join(",")
    }

    #[test]
    fn landing_row_scans_from_bottom() {
        let board = Board::empty();
        assert_eq!(board.landing_row(3), Some(ROWS - 1));

        let board = board.with_cell(ROWS - 1, 3, Cell::PlayerOne).unwrap();
        assert_eq!(board.landing_row(3), Some(ROWS - 2));
        assert_eq!(board.landing_row(COLUMNS), None);
    }

    #[test]
    fn full_column_has_no_landing_row() {
        let mut board = Board::empty();
        for row in 0..ROWS {
            board = board.with_cell(row, 0, Cell::PlayerTwo).unwrap();
        }
        assert!(board.is_column_full(0));
        assert_eq!(board.playable_columns(), vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn from_cells_rejects_wrong_count() {
        assert!(Board::from_cells(vec![Cell::Empty; CELL_COUNT - 1]).is_none());
        assert!(Board::from_cells(vec![Cell::Empty; CELL_COUNT + 1]).is_none());
        assert!(Board::from_cells(vec![Cell::Empty; CELL_COUNT]).is_some());
    }

    #[test]
    fn decode_tolerates_trailing_commas_and_whitespace() {
        let raw = format!(" {},|0,0|\n", zeros());
        let snap = decode(&raw).unwrap();
        assert_eq!(snap, GameSnapshot::new_game());
    }

    #[test]
    fn decode_status_out_of_range_defaults() {
        let snap = decode(&format!("{}|1,7", zeros())).unwrap();
        assert!(!snap.is_over);
        assert_eq!(snap.winner, Winner::None);
    }

    #[test]
    fn winning_cells_dropped_when_not_won() {
        let snap = decode(&format!("{}|0,0|1,2,3,4", zeros())).unwrap();
        assert!(snap.winning_cells.is_empty());
    }

    #[test]
    fn winning_cells_outside_board_are_ignored() {
        let snap = decode(&format!("{}|1,1|5,0,9,9", zeros())).unwrap();
        assert_eq!(snap.winner, Winner::PlayerOne);
        assert!(snap.winning_cells.is_empty());
    }

    #[test]
    fn with_piece_keeps_status_fields() {
        let snap = GameSnapshot {
            is_over: true,
            winner: Winner::PlayerTwo,
            winning_cells: vec![(0, 0)],
            ..GameSnapshot::default()
        };
        let next = snap.with_piece(2, Player::One).unwrap();
        assert_eq!(next.board.get(ROWS - 1, 2), Some(Cell::PlayerOne));
        assert!(next.is_over);
        assert_eq!(next.winner, Winner::PlayerTwo);
        assert_eq!(next.winning_cells, vec![(0, 0)]);
    }

    #[test]
    fn display_draws_one_line_per_row() {
        let board = Board::empty()
            .with_cell(ROWS - 1, 0, Cell::PlayerOne)
            .unwrap();
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), ROWS + 1);
        assert_eq!(lines[ROWS - 1], "X . . . . . .");
        assert_eq!(lines[ROWS], "0 1 2 3 4 5 6");
    }

    #[test]
    fn outcome_reflects_status() {
        let mut snap = GameSnapshot::new_game();
        assert_eq!(snap.outcome(), GameOutcome::InProgress);
        snap.is_over = true;
        assert_eq!(snap.outcome(), GameOutcome::Draw);
        snap.winner = Winner::PlayerTwo;
        assert_eq!(snap.outcome(), GameOutcome::Won(Player::Two));
    }
}
