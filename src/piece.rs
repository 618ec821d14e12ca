//! Piece attributes and the piece value type.
//!
//! Colors and shapes are closed four-valued enumerations. Their persisted
//! and displayed form is the 0-based declaration index.

use std::fmt;
use std::str::FromStr;

use crate::constants::{NUM_COLORS, NUM_SHAPES};
use crate::error::PieceError;

/// Piece color.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Color {
    Blue,
    Yellow,
    Red,
    Green,
}

/// Piece shape.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum Shape {
    Square,
    Diamond,
    Circle,
    Triangle,
}

impl Color {
    /// All colors in index order.
    pub const ALL: [Color; NUM_COLORS] = [Color::Blue, Color::Yellow, Color::Red, Color::Green];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Color::Blue => "blue",
            Color::Yellow => "yellow",
            Color::Red => "red",
            Color::Green => "green",
        }
    }
}

impl Shape {
    /// All shapes in index order.
    pub const ALL: [Shape; NUM_SHAPES] =
        [Shape::Square, Shape::Diamond, Shape::Circle, Shape::Triangle];

    pub fn index(self) -> usize {
        self as usize
    }

    pub fn name(self) -> &'static str {
        match self {
            Shape::Square => "square",
            Shape::Diamond => "diamond",
            Shape::Circle => "circle",
            Shape::Triangle => "triangle",
        }
    }
}

impl TryFrom<usize> for Color {
    type Error = PieceError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Color::ALL
            .get(index)
            .copied()
            .ok_or(PieceError::InvalidColor(index))
    }
}

impl TryFrom<usize> for Shape {
    type Error = PieceError;

    fn try_from(index: usize) -> Result<Self, Self::Error> {
        Shape::ALL
            .get(index)
            .copied()
            .ok_or(PieceError::InvalidShape(index))
    }
}

/// Accepts a case-insensitive name (`red`) or an index (`2`).
impl FromStr for Color {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Ok(index) = s.parse::<usize>() {
            return Color::try_from(index).map_err(|e| e.to_string());
        }
        Color::ALL
            .into_iter()
            .find(|c| c.name() == s)
            .ok_or_else(|| format!("unknown color: {s}"))
    }
}

/// Accepts a case-insensitive name (`circle`) or an index (`2`).
impl FromStr for Shape {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_lowercase();
        if let Ok(index) = s.parse::<usize>() {
            return Shape::try_from(index).map_err(|e| e.to_string());
        }
        Shape::ALL
            .into_iter()
            .find(|sh| sh.name() == s)
            .ok_or_else(|| format!("unknown shape: {s}"))
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A colored, shaped token occupying one board slot.
///
/// Equality is by value: two slots may hold equal pieces.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Piece {
    pub color: Color,
    pub shape: Shape,
}

impl Piece {
    pub fn new(color: Color, shape: Shape) -> Self {
        Self { color, shape }
    }

    /// Build a piece from its persisted `(color_index, shape_index)` pair.
    pub fn from_indices(color: usize, shape: usize) -> Result<Self, PieceError> {
        Ok(Self::new(Color::try_from(color)?, Shape::try_from(shape)?))
    }

    pub fn indices(self) -> (usize, usize) {
        (self.color.index(), self.shape.index())
    }

    /// True when `other` shares this piece's color or its shape.
    #[inline]
    pub fn matches(self, other: Piece) -> bool {
        self.color == other.color || self.shape == other.shape
    }
}

impl fmt::Display for Piece {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.color, self.shape)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_indices_follow_declaration_order() {
        assert_eq!(Color::Blue.index(), 0);
        assert_eq!(Color::Green.index(), 3);
        assert_eq!(Shape::Square.index(), 0);
        assert_eq!(Shape::Triangle.index(), 3);
    }

    #[test]
    fn test_try_from_rejects_out_of_range() {
        assert_eq!(Color::try_from(2), Ok(Color::Red));
        assert_eq!(Color::try_from(4), Err(PieceError::InvalidColor(4)));
        assert_eq!(Shape::try_from(1), Ok(Shape::Diamond));
        assert_eq!(Shape::try_from(7), Err(PieceError::InvalidShape(7)));
    }

    #[test]
    fn test_parse_names_and_indices() {
        assert_eq!("GREEN".parse::<Color>(), Ok(Color::Green));
        assert_eq!("1".parse::<Color>(), Ok(Color::Yellow));
        assert_eq!("Circle".parse::<Shape>(), Ok(Shape::Circle));
        assert_eq!("3".parse::<Shape>(), Ok(Shape::Triangle));
        assert!("purple".parse::<Color>().is_err());
        assert!("9".parse::<Shape>().is_err());
    }

    #[test]
    fn test_matches_on_color_or_shape() {
        let a = Piece::new(Color::Green, Shape::Square);
        let same_color = Piece::new(Color::Green, Shape::Triangle);
        let same_shape = Piece::new(Color::Blue, a.shape);
        let neither = Piece::new(Color::Red, Shape::Triangle);
        assert!(a.matches(same_color));
        assert!(a.matches(same_shape));
        assert!(!a.matches(neither));
    }

    #[test]
    fn test_from_indices() {
        let p = Piece::from_indices(3, 0).unwrap();
        assert_eq!(p, Piece::new(Color::Green, Shape::Square));
        assert_eq!(p.indices(), (3, 0));
        assert_eq!(p.to_string(), "green/square");
        assert!(Piece::from_indices(0, 4).is_err());
    }
}
