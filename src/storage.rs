//! Plain-text persistence for games and the high score table.
//!
//! ## Game file
//!
//! ```text
//! 120        <- score
//! 3          <- piece count
//! 2 0        <- color index, shape index (anchor first)
//! 0 3
//! 1 1
//! ```
//!
//! ## High score file
//!
//! One `name score` record per line, best first. Names may contain spaces;
//! the last token on the line is the score. Loading normalizes the table:
//! records are re-ranked best first and only the best `MAX_HIGH_SCORES`
//! are kept, so the next save rewrites the file in that form.

use std::fmt;
use std::fs;
use std::path::Path;

use log::{info, warn};

use crate::board::{Board, Resolution};
use crate::constants::MAX_HIGH_SCORES;
use crate::error::StorageError;
use crate::piece::Piece;

fn read_file(path: &Path) -> Result<String, StorageError> {
    fs::read_to_string(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn write_file(path: &Path, contents: &str) -> Result<(), StorageError> {
    fs::write(path, contents).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })
}

fn malformed(path: &Path, line: usize, reason: impl Into<String>) -> StorageError {
    StorageError::Malformed {
        path: path.to_path_buf(),
        line,
        reason: reason.into(),
    }
}

// =============================================================================
// Game Files
// =============================================================================

/// Render a board in the game file format.
pub fn format_game(board: &Board) -> String {
    let snapshot = board.snapshot();
    let mut out = format!("{}\n{}\n", snapshot.score, snapshot.len);
    for (color, shape) in snapshot.pieces {
        out.push_str(&format!("{color} {shape}\n"));
    }
    out
}

/// Parse game file text into `(score, pairs)`, checking the piece count and
/// every index. `path` is only used in error messages.
pub fn parse_game(path: &Path, text: &str) -> Result<(u32, Vec<(usize, usize)>), StorageError> {
    let mut lines = text
        .lines()
        .enumerate()
        .map(|(i, l)| (i + 1, l.trim()))
        .filter(|(_, l)| !l.is_empty());

    let (line, raw) = lines.next().ok_or_else(|| malformed(path, 1, "missing score"))?;
    let score = raw
        .parse::<u32>()
        .map_err(|_| malformed(path, line, format!("invalid score: {raw}")))?;

    let (count_line, raw) = lines
        .next()
        .ok_or_else(|| malformed(path, line + 1, "missing piece count"))?;
    let count = raw
        .parse::<usize>()
        .map_err(|_| malformed(path, count_line, format!("invalid piece count: {raw}")))?;

    let mut pairs = Vec::new();
    for (line, raw) in lines {
        let fields: Vec<&str> = raw.split_whitespace().collect();
        let [color, shape] = fields.as_slice() else {
            return Err(malformed(path, line, "expected `color shape`"));
        };
        let color = color
            .parse::<usize>()
            .map_err(|_| malformed(path, line, format!("invalid color index: {color}")))?;
        let shape = shape
            .parse::<usize>()
            .map_err(|_| malformed(path, line, format!("invalid shape index: {shape}")))?;
        Piece::from_indices(color, shape)?;
        pairs.push((color, shape));
    }

    if pairs.len() != count {
        return Err(malformed(
            path,
            count_line,
            format!("piece count {count} does not match {} records", pairs.len()),
        ));
    }
    Ok((score, pairs))
}

/// Write the board to `path`.
pub fn save_game(path: &Path, board: &Board) -> Result<(), StorageError> {
    write_file(path, &format_game(board))?;
    info!("saved {} pieces to {}", board.len(), path.display());
    Ok(())
}

/// Read and validate a game file without touching any board.
pub fn read_game(path: &Path) -> Result<(u32, Vec<(usize, usize)>), StorageError> {
    parse_game(path, &read_file(path)?)
}

/// Replace `board` with the game stored at `path`.
///
/// The file is read and validated in full before the board changes, so any
/// error leaves the board as it was.
pub fn load_game(path: &Path, board: &mut Board) -> Result<Resolution, StorageError> {
    let (score, pairs) = read_game(path).inspect_err(|e| warn!("rejected game file: {e}"))?;
    let outcome = board.load(score, &pairs)?;
    info!(
        "loaded {} pieces from {} (score {score})",
        pairs.len(),
        path.display()
    );
    Ok(outcome)
}

// =============================================================================
// High Scores
// =============================================================================

/// A high score table record.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ScoreEntry {
    pub name: String,
    pub score: u32,
}

/// Best scores first, at most `MAX_HIGH_SCORES` entries.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HighScores {
    entries: Vec<ScoreEntry>,
}

impl HighScores {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Whether `score` would earn a place in the table.
    pub fn qualifies(&self, score: u32) -> bool {
        self.entries.len() < MAX_HIGH_SCORES
            || self.entries.last().is_some_and(|e| score > e.score)
    }

    /// Add a record, returning its 1-based rank, or `None` if it did not
    /// make the table. Ties rank below existing records.
    pub fn record(&mut self, name: &str, score: u32) -> Option<usize> {
        if !self.qualifies(score) {
            return None;
        }
        let pos = self.entries.partition_point(|e| e.score >= score);
        self.entries.insert(
            pos,
            ScoreEntry {
                name: name.to_string(),
                score,
            },
        );
        self.entries.truncate(MAX_HIGH_SCORES);
        Some(pos + 1)
    }

    /// Parse a score file. Records are ranked as they are read, so the
    /// result is sorted best first and capped at `MAX_HIGH_SCORES` whatever
    /// the order or length of the file.
    pub fn parse(path: &Path, text: &str) -> Result<Self, StorageError> {
        let mut table = Self::new();
        for (i, raw) in text.lines().enumerate() {
            let raw = raw.trim();
            if raw.is_empty() {
                continue;
            }
            let (name, score) = raw
                .rsplit_once(char::is_whitespace)
                .ok_or_else(|| malformed(path, i + 1, "expected `name score`"))?;
            let score = score
                .parse::<u32>()
                .map_err(|_| malformed(path, i + 1, format!("invalid score: {score}")))?;
            table.record(name.trim(), score);
        }
        Ok(table)
    }

    /// Load the table at `path`. A missing file is an empty table.
    pub fn load(path: &Path) -> Result<Self, StorageError> {
        if !path.exists() {
            return Ok(Self::new());
        }
        Self::parse(path, &read_file(path)?)
    }

    pub fn save(&self, path: &Path) -> Result<(), StorageError> {
        write_file(path, &self.to_string())
    }
}

impl fmt::Display for HighScores {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for entry in &self.entries {
            writeln!(f, "{} {}", entry.name, entry.score)?;
        }
        Ok(())
    }
}
