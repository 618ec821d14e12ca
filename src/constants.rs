//! Game rule constants and default file locations.
//!
//! The rules are fixed at compile time; only file locations can be changed
//! at runtime (see the `play` subcommand).

// =============================================================================
// Piece Attributes
// =============================================================================

/// Number of distinct piece colors.
pub const NUM_COLORS: usize = 4;

/// Number of distinct piece shapes.
pub const NUM_SHAPES: usize = 4;

// =============================================================================
// Matching and Scoring
// =============================================================================

/// Shortest run of matching pieces that gets removed.
pub const MIN_RUN: usize = 3;

/// Points awarded for every piece in a removed run.
pub const POINTS_PER_PIECE: u32 = 10;

/// A board needs at least this many pieces before a shift can move anything.
pub const MIN_SHIFT_SIZE: usize = 2;

// =============================================================================
// Persistence
// =============================================================================

/// Game file used by `save` / `load` when no path is given.
pub const DEFAULT_SAVE_FILE: &str = "savegame.txt";

/// High score table file.
pub const DEFAULT_SCORES_FILE: &str = "highscores.txt";

/// Number of records kept in the high score table.
pub const MAX_HIGH_SCORES: usize = 10;
