#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::panic,
    clippy::todo,
    clippy::unimplemented,
    clippy::indexing_slicing
)]
//! Wire-format tests for the Connect Four client.
//!
//! Covers decoding of real server bodies (including the trailing commas the
//! server emits), strict board validation, tolerant status and winning-cell
//! decoding, the encoders used by fake servers, and the JSON shape of the
//! snapshot types.

use connect_four_client::protocol::{
    decode, decode_board, encode_board, encode_move_request, encode_snapshot, CELL_COUNT, COLUMNS,
    DRAW_MARKER, ROWS,
};
use connect_four_client::{Board, Cell, GameOutcome, GameSnapshot, Player, ProtocolError, Winner};

// ════════════════════════════════════════════════════════════════════
// Helpers
// ════════════════════════════════════════════════════════════════════

/// A board segment of `n` copies of `value`, each followed by a comma.
fn cells(n: usize, value: &str) -> String {
    (0..n).map(|_| format!("{value},")).collect()
}

/// A board segment from 42 wire digits, row-major from the top.
fn board_segment(digits: &[u8; CELL_COUNT]) -> String {
    digits.iter().map(|d| format!("{d},")).collect()
}

// ════════════════════════════════════════════════════════════════════
// Server bodies
// ════════════════════════════════════════════════════════════════════

#[test]
fn fresh_game_body() {
    let raw = format!("{}|0,0", cells(42, "0"));
    let snap = decode(&raw).unwrap();

    assert_eq!(snap.board, Board::empty());
    assert!(!snap.is_over);
    assert_eq!(snap.winner, Winner::None);
    assert!(snap.winning_cells.is_empty());
    assert_eq!(snap.outcome(), GameOutcome::InProgress);
}

#[test]
fn body_with_trailing_separators_and_newline() {
    let raw = format!("{}|0,0,|\n", cells(42, "0"));
    let snap = decode(&raw).unwrap();
    assert!(!snap.is_over);
    assert_eq!(snap.winner, Winner::None);
}

#[test]
fn winning_body_decodes_line() {
    let mut digits = [0u8; CELL_COUNT];
    for col in 0..4 {
        digits[(ROWS - 1) * COLUMNS + col] = 1;
    }
    digits[(ROWS - 2) * COLUMNS] = 2;
    let raw = format!("{}|1,1|5,0,5,1,5,2,5,3,", board_segment(&digits));

    let snap = decode(&raw).unwrap();
    assert!(snap.is_terminal());
    assert_eq!(snap.winner, Winner::PlayerOne);
    assert_eq!(snap.outcome(), GameOutcome::Won(Player::One));
    assert_eq!(snap.winning_cells, vec![(5, 0), (5, 1), (5, 2), (5, 3)]);
    assert!(snap.is_winning_cell(5, 2));
    assert!(!snap.is_winning_cell(4, 0));
    assert_eq!(snap.board.get(4, 0), Some(Cell::PlayerTwo));
}

#[test]
fn draw_marker_yields_draw() {
    let raw = format!("{}|1,0|{DRAW_MARKER}", cells(42, "1"));
    let snap = decode(&raw).unwrap();

    assert!(snap.is_over);
    assert_eq!(snap.winner, Winner::None);
    assert!(snap.winning_cells.is_empty());
    assert!(snap.is_draw());
    assert_eq!(snap.outcome(), GameOutcome::Draw);
}

#[test]
fn winning_cells_ignored_unless_someone_won() {
    let in_progress = format!("{}|0,0|5,0,5,1,5,2,5,3", cells(42, "0"));
    assert!(decode(&in_progress).unwrap().winning_cells.is_empty());

    let drawn = format!("{}|1,0|5,0,5,1,5,2,5,3", cells(42, "0"));
    assert!(decode(&drawn).unwrap().winning_cells.is_empty());
}

// ════════════════════════════════════════════════════════════════════
// Strict board validation
// ════════════════════════════════════════════════════════════════════

#[test]
fn wrong_cell_count_is_rejected() {
    for n in [0, 41, 43] {
        let raw = format!("{}|0,0", cells(n, "0"));
        assert_eq!(
            decode(&raw).unwrap_err(),
            ProtocolError::CellCount {
                expected: CELL_COUNT,
                found: n
            },
            "cell count {n}"
        );
    }
}

#[test]
fn bad_cell_values_are_rejected_with_position() {
    for bad in ["3", "x", "-1", "1.5"] {
        let mut raw = cells(10, "0");
        raw.push_str(&format!("{bad},"));
        raw.push_str(&cells(31, "0"));
        raw.push_str("|0,0");

        match decode(&raw).unwrap_err() {
            ProtocolError::CellValue { index, token } => {
                assert_eq!(index, 10);
                assert_eq!(token, bad);
            }
            other => panic!("expected CellValue for {bad:?}, got {other:?}"),
        }
    }
}

#[test]
fn non_canonical_cell_tokens_are_rejected() {
    for bad in ["+1", "01", "00", "+0", "2 2"] {
        let mut raw = cells(41, "0");
        raw.push_str(&format!("{bad},|0,0"));

        match decode(&raw).unwrap_err() {
            ProtocolError::CellValue { index, token } => {
                assert_eq!(index, 41);
                assert_eq!(token, bad);
            }
            other => panic!("expected CellValue for {bad:?}, got {other:?}"),
        }
    }
}

#[test]
fn empty_body_is_rejected() {
    assert!(matches!(
        decode("").unwrap_err(),
        ProtocolError::CellCount { found: 0, .. }
    ));
}

#[test]
fn board_round_trips_through_encoder() {
    let mut snap = GameSnapshot::new_game();
    for (col, player) in [(3, Player::One), (3, Player::Two), (4, Player::One), (0, Player::Two)] {
        snap = snap.with_piece(col, player).unwrap();
    }
    let segment = encode_board(&snap.board);

    assert!(segment.ends_with(','));
    assert_eq!(segment.matches(',').count(), CELL_COUNT);
    assert_eq!(decode_board(&segment).unwrap(), snap.board);
}

#[test]
fn board_rows_are_top_down() {
    let mut digits = [0u8; CELL_COUNT];
    digits[0] = 2;
    digits[CELL_COUNT - 1] = 1;
    let board = decode_board(&board_segment(&digits)).unwrap();

    assert_eq!(board.get(0, 0), Some(Cell::PlayerTwo));
    assert_eq!(board.get(ROWS - 1, COLUMNS - 1), Some(Cell::PlayerOne));
    assert_eq!(board.get(ROWS, 0), None);
    assert_eq!(board.get(0, COLUMNS), None);
}

// ════════════════════════════════════════════════════════════════════
// Tolerant status decoding
// ════════════════════════════════════════════════════════════════════

#[test]
fn missing_status_defaults_to_in_progress() {
    let snap = decode(&cells(42, "0")).unwrap();
    assert!(!snap.is_over);
    assert_eq!(snap.winner, Winner::None);
}

#[test]
fn malformed_status_defaults_to_in_progress() {
    for status in ["", "1", "x,y", "1,9", "7,1"] {
        let raw = format!("{}|{status}|5,0,5,1,5,2,5,3", cells(42, "0"));
        let snap = decode(&raw).unwrap();
        assert!(!snap.is_over, "status {status:?}");
        assert_eq!(snap.winner, Winner::None, "status {status:?}");
        assert!(snap.winning_cells.is_empty(), "status {status:?}");
    }
}

#[test]
fn odd_winning_list_drops_trailing_value() {
    let raw = format!("{}|1,2|0,6,1,6,2,6,3,6,4", cells(42, "2"));
    let snap = decode(&raw).unwrap();
    assert_eq!(snap.winning_cells, vec![(0, 6), (1, 6), (2, 6), (3, 6)]);
    assert_eq!(snap.outcome(), GameOutcome::Won(Player::Two));
}

#[test]
fn unusable_winning_list_is_emptied() {
    for extra in ["a,b", "5,0,9,9", "", "5,0,5,x"] {
        let raw = format!("{}|1,1|{extra}", cells(42, "1"));
        let snap = decode(&raw).unwrap();
        assert!(snap.is_over);
        assert!(snap.winning_cells.is_empty(), "extra {extra:?}");
    }
}

// ════════════════════════════════════════════════════════════════════
// Encoders
// ════════════════════════════════════════════════════════════════════

#[test]
fn move_request_is_form_encoded() {
    assert_eq!(encode_move_request(0), "column=0");
    assert_eq!(encode_move_request(6), "column=6");
}

#[test]
fn encoded_snapshots_decode_to_the_same_value() {
    let won = GameSnapshot {
        is_over: true,
        winner: Winner::PlayerTwo,
        winning_cells: vec![(2, 0), (3, 1), (4, 2), (5, 3)],
        ..GameSnapshot::new_game()
    };
    let drawn = GameSnapshot {
        is_over: true,
        ..GameSnapshot::new_game()
    };

    for snap in [GameSnapshot::new_game(), won, drawn] {
        let wire = encode_snapshot(&snap);
        assert_eq!(decode(&wire).unwrap(), snap, "wire {wire:?}");
    }
}

#[test]
fn draw_encodes_marker() {
    let drawn = GameSnapshot {
        is_over: true,
        ..GameSnapshot::new_game()
    };
    assert!(encode_snapshot(&drawn).ends_with(&format!("|1,0|{DRAW_MARKER}")));
}

// ════════════════════════════════════════════════════════════════════
// JSON shape
// ════════════════════════════════════════════════════════════════════

#[test]
fn enums_serialize_as_snake_case() {
    assert_eq!(serde_json::to_string(&Cell::PlayerOne).unwrap(), "\"player_one\"");
    assert_eq!(serde_json::to_string(&Winner::None).unwrap(), "\"none\"");
    assert_eq!(serde_json::to_string(&Player::Two).unwrap(), "\"two\"");
}

#[test]
fn outcome_serializes_with_tag() {
    let json = serde_json::to_value(GameOutcome::Won(Player::One)).unwrap();
    assert_eq!(json["type"], "won");
    assert_eq!(json["player"], "one");

    let json = serde_json::to_value(GameOutcome::Draw).unwrap();
    assert_eq!(json["type"], "draw");
}

#[test]
fn snapshot_json_fields() {
    let snap = GameSnapshot::new_game().with_piece(2, Player::One).unwrap();
    let json = serde_json::to_value(&snap).unwrap();

    assert_eq!(json["is_over"], false);
    assert_eq!(json["winner"], "none");
    assert_eq!(json["winning_cells"].as_array().unwrap().len(), 0);
    assert_eq!(json["board"]["cells"][5][2], "player_one");

    let back: GameSnapshot = serde_json::from_value(json).unwrap();
    assert_eq!(back, snap);
}
