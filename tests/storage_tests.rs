//! File round trips for game saves and the high score table.
//!
//! Every test works in its own scratch directory.

use std::fs;
use std::path::PathBuf;

use ringmatch::board::{Board, End};
use ringmatch::error::{PieceError, StorageError};
use ringmatch::piece::{Color, Shape};
use ringmatch::storage::{load_game, read_game, save_game, HighScores};

// =============================================================================
// Helper functions
// =============================================================================

fn scratch(name: &str) -> (tempfile::TempDir, PathBuf) {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(name);
    (dir, path)
}

fn sample_board() -> Board {
    let mut board = Board::new();
    // Three blues score 30 first, then build a board with no runs.
    for shape in [Shape::Square, Shape::Diamond, Shape::Circle] {
        board.insert(Color::Blue, shape, End::Tail);
    }
    board.insert(Color::Red, Shape::Square, End::Tail);
    board.insert(Color::Yellow, Shape::Triangle, End::Tail);
    board.insert(Color::Green, Shape::Circle, End::Head);
    board
}

// =============================================================================
// Game files
// =============================================================================

#[test]
fn test_save_then_load_restores_board() {
    let (_dir, path) = scratch("game.txt");
    let board = sample_board();
    save_game(&path, &board).unwrap();

    assert_eq!(
        fs::read_to_string(&path).unwrap(),
        "30\n3\n3 2\n2 0\n1 3\n"
    );

    let mut restored = Board::new();
    let outcome = load_game(&path, &mut restored).unwrap();
    assert!(outcome.is_empty());
    assert_eq!(restored.snapshot(), board.snapshot());
}

#[test]
fn test_save_then_load_keeps_head_built_board() {
    let (_dir, path) = scratch("head.txt");
    let mut board = Board::new();
    board.insert(Color::Yellow, Shape::Triangle, End::Head);
    board.insert(Color::Red, Shape::Circle, End::Head);
    board.insert(Color::Blue, Shape::Circle, End::Head);
    board.insert(Color::Red, Shape::Square, End::Head);
    assert_eq!(board.len(), 4);
    save_game(&path, &board).unwrap();

    let mut restored = Board::new();
    let outcome = load_game(&path, &mut restored).unwrap();
    assert!(outcome.is_empty());
    assert_eq!(restored.snapshot().pieces, vec![(2, 0), (0, 2), (2, 2), (1, 3)]);
    assert_eq!(restored.snapshot(), board.snapshot());
}

#[test]
fn test_load_missing_file_leaves_board() {
    let (_dir, path) = scratch("absent.txt");
    let mut board = sample_board();
    let before = board.snapshot();

    let err = load_game(&path, &mut board).unwrap_err();
    assert!(matches!(err, StorageError::Io { .. }));
    assert_eq!(board.snapshot(), before);
}

#[test]
fn test_load_bad_shape_leaves_board() {
    let (_dir, path) = scratch("bad.txt");
    fs::write(&path, "90\n2\n0 0\n1 7\n").unwrap();
    let mut board = sample_board();
    let before = board.snapshot();

    let err = load_game(&path, &mut board).unwrap_err();
    assert!(matches!(err, StorageError::Piece(PieceError::InvalidShape(7))));
    assert_eq!(board.snapshot(), before);
}

#[test]
fn test_load_wrong_count_leaves_board() {
    let (_dir, path) = scratch("short.txt");
    fs::write(&path, "90\n5\n0 0\n1 1\n").unwrap();
    let mut board = sample_board();
    let before = board.snapshot();

    assert!(matches!(
        load_game(&path, &mut board),
        Err(StorageError::Malformed { line: 2, .. })
    ));
    assert_eq!(board.snapshot(), before);
}

#[test]
fn test_load_resolves_stored_runs_but_keeps_score() {
    let (_dir, path) = scratch("runs.txt");
    // A hand-edited file holding three greens in a row.
    fs::write(&path, "5\n4\n3 0\n3 1\n3 2\n0 3\n").unwrap();
    assert_eq!(read_game(&path).unwrap().1.len(), 4);

    let mut board = Board::new();
    let outcome = load_game(&path, &mut board).unwrap();
    assert_eq!(outcome.removed, 3);
    assert_eq!(board.score(), 5);
    assert_eq!(board.snapshot().pieces, vec![(0, 3)]);
}

#[test]
fn test_save_to_unwritable_path_reports_error() {
    let (_dir, path) = scratch("missing-dir/game.txt");
    let board = sample_board();
    let before = board.snapshot();
    assert!(matches!(save_game(&path, &board), Err(StorageError::Io { .. })));
    assert_eq!(board.snapshot(), before);
}

// =============================================================================
// High scores
// =============================================================================

#[test]
fn test_high_scores_missing_file_is_empty() {
    let (_dir, path) = scratch("scores.txt");
    let table = HighScores::load(&path).unwrap();
    assert!(table.is_empty());
}

#[test]
fn test_high_scores_round_trip() {
    let (_dir, path) = scratch("scores.txt");
    let mut table = HighScores::new();
    table.record("ann", 120);
    table.record("bob", 300);
    table.record("cy", 40);
    table.save(&path).unwrap();

    assert_eq!(fs::read_to_string(&path).unwrap(), "bob 300\nann 120\ncy 40\n");

    let mut loaded = HighScores::load(&path).unwrap();
    assert_eq!(loaded, table);
    assert_eq!(loaded.record("dee", 200), Some(2));
}

#[test]
fn test_high_scores_normalize_file_order_and_length() {
    let (_dir, path) = scratch("scores.txt");
    let mut text = String::from("low 5\n");
    for i in 0..12 {
        text.push_str(&format!("p{i} {}\n", 100 + i));
    }
    fs::write(&path, text).unwrap();

    let table = HighScores::load(&path).unwrap();
    assert_eq!(table.entries().len(), 10);
    assert_eq!(table.entries()[0].name, "p11");
    assert_eq!(table.entries().last().map(|e| e.score), Some(102));
}

#[test]
fn test_high_scores_reject_malformed_file() {
    let (_dir, path) = scratch("scores.txt");
    fs::write(&path, "ann lots\n").unwrap();
    assert!(matches!(
        HighScores::load(&path),
        Err(StorageError::Malformed { line: 1, .. })
    ));
}
