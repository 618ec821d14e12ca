//! Ringmatch: a circular match-three board engine.
//!
//! Pieces carry a color and a shape and sit on a ring. Inserting a piece at
//! either end resolves every run of three or more consecutive pieces that
//! share the color or the shape of the run's first piece, awarding
//! 10 points per removed piece.
//!
//! ## Modules
//!
//! - [`constants`] - Game rules and default file locations
//! - [`piece`] - Colors, shapes and the piece value type
//! - [`board`] - The ring itself: insertion, resolution, shifts
//! - [`storage`] - Game files and the high score table
//! - [`protocol`] - Text command loop for driving a game
//! - [`error`] - Error types
//!
//! ## Example
//!
//! ```
//! use ringmatch::board::{Board, End};
//! use ringmatch::piece::{Color, Shape};
//!
//! let mut board = Board::new();
//! board.insert(Color::Green, Shape::Square, End::Tail);
//! board.insert(Color::Green, Shape::Diamond, End::Tail);
//! let outcome = board.insert(Color::Green, Shape::Square, End::Tail);
//! assert_eq!(outcome.points, 30);
//! assert!(board.is_empty());
//! ```

pub mod board;
pub mod constants;
pub mod error;
pub mod piece;
pub mod protocol;
pub mod storage;
