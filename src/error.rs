use std::path::PathBuf;

/// Errors raised when a piece attribute index is outside its enumeration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PieceError {
    #[error("color index {0} out of range (expected 0-3)")]
    InvalidColor(usize),

    #[error("shape index {0} out of range (expected 0-3)")]
    InvalidShape(usize),
}

/// Errors that can occur while reading or writing game and score files.
#[derive(Debug, thiserror::Error)]
pub enum StorageError {
    #[error("failed to access {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("malformed {path} at line {line}: {reason}")]
    Malformed {
        path: PathBuf,
        line: usize,
        reason: String,
    },

    #[error("invalid piece: {0}")]
    Piece(#[from] PieceError),
}
