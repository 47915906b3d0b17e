//! Core domain types for checkers.

use serde::{Deserialize, Serialize};
use tracing::instrument;

/// Number of rows and columns on the board.
pub const BOARD_SIZE: i8 = 8;

/// Number of pieces each side starts with.
pub const PIECES_PER_SIDE: usize = 12;

/// Side in the game.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, strum::Display, strum::EnumIter,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Color {
    /// Starts on rows 5-7 and moves toward row 0.
    White,
    /// Starts on rows 0-2 and moves toward row 7.
    Black,
}

impl Color {
    /// Returns the opposing color.
    pub fn opponent(self) -> Self {
        match self {
            Color::White => Color::Black,
            Color::Black => Color::White,
        }
    }

    /// Row delta of a forward step for this color.
    pub fn forward(self) -> i8 {
        match self {
            Color::White => -1,
            Color::Black => 1,
        }
    }
}

/// A piece on the board.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Piece {
    /// Owner of the piece.
    pub color: Color,
}

impl Piece {
    /// Creates a piece of the given color.
    pub fn new(color: Color) -> Self {
        Self { color }
    }

    /// Single-character symbol used by text projections.
    pub fn symbol(self) -> char {
        match self.color {
            Color::White => 'w',
            Color::Black => 'b',
        }
    }
}

/// A board coordinate.
///
/// Coordinates are not range-checked on construction. Untrusted input
/// reaches the engine as-is and is rejected there with
/// [`OutOfBoundsError`](crate::OutOfBoundsError).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "(i8, i8)", into = "(i8, i8)")]
pub struct Square {
    /// Row, 0 at the top (Black's home side).
    pub row: i8,
    /// Column, 0 at the left.
    pub col: i8,
}

impl Square {
    /// Creates a square without checking bounds.
    pub const fn new(row: i8, col: i8) -> Self {
        Self { row, col }
    }

    /// True if both coordinates lie in `[0, 7]`.
    pub fn is_on_board(self) -> bool {
        (0..BOARD_SIZE).contains(&self.row) && (0..BOARD_SIZE).contains(&self.col)
    }

    /// True iff `(row + col)` is odd.
    ///
    /// Only meaningful for on-board squares.
    pub fn is_playable(self) -> bool {
        (i16::from(self.row) + i16::from(self.col)).rem_euclid(2) == 1
    }

    /// Returns the square offset by the given deltas.
    pub fn offset(self, d_row: i8, d_col: i8) -> Self {
        Self::new(self.row.saturating_add(d_row), self.col.saturating_add(d_col))
    }

    /// Square halfway between two squares (exact only for even distances).
    pub fn midpoint(self, other: Square) -> Self {
        // The mean of two i8 values always fits back into an i8.
        let mean = |a: i8, b: i8| ((i16::from(a) + i16::from(b)) / 2) as i8;
        Self::new(mean(self.row, other.row), mean(self.col, other.col))
    }

    /// Iterates all 64 squares in row-major order.
    pub fn all() -> impl Iterator<Item = Square> {
        (0..BOARD_SIZE).flat_map(|row| (0..BOARD_SIZE).map(move |col| Square::new(row, col)))
    }
}

impl From<(i8, i8)> for Square {
    fn from((row, col): (i8, i8)) -> Self {
        Self::new(row, col)
    }
}

impl From<Square> for (i8, i8) {
    fn from(square: Square) -> Self {
        (square.row, square.col)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// A proposed relocation of one piece.
///
/// Moves are plain data: they carry intent only and say nothing about
/// legality until run through [`evaluate_move`](crate::evaluate_move).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Move {
    /// Square the piece leaves.
    pub from: Square,
    /// Square the piece lands on.
    pub to: Square,
}

impl Move {
    /// Creates a new move.
    #[instrument]
    pub fn new(from: Square, to: Square) -> Self {
        Self { from, to }
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} -> {}", self.from, self.to)
    }
}

/// Number of pieces of each color removed by captures.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CapturedCounts {
    /// White pieces captured so far.
    pub white: u32,
    /// Black pieces captured so far.
    pub black: u32,
}

impl CapturedCounts {
    /// Captured count for a color.
    pub fn of(&self, color: Color) -> u32 {
        match color {
            Color::White => self.white,
            Color::Black => self.black,
        }
    }

    /// Records one more captured piece of `color`.
    pub(crate) fn increment(&mut self, color: Color) {
        match color {
            Color::White => self.white += 1,
            Color::Black => self.black += 1,
        }
    }

    /// Sum over both colors.
    pub fn total(&self) -> u32 {
        self.white + self.black
    }
}

/// Whether the engine enforces alternating turns.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TurnPolicy {
    /// Only the side to move may move; the turn flips after each move.
    #[default]
    Strict,
    /// Either side may move at any time.
    Free,
}

/// Rule options fixed when a game starts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RulesConfig {
    /// Turn enforcement policy.
    #[serde(default)]
    pub turn_policy: TurnPolicy,
    /// Side to move first under [`TurnPolicy::Strict`].
    #[serde(default = "default_first_to_move")]
    pub first_to_move: Color,
}

fn default_first_to_move() -> Color {
    Color::White
}

impl Default for RulesConfig {
    fn default() -> Self {
        Self {
            turn_policy: TurnPolicy::default(),
            first_to_move: default_first_to_move(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_playable_parity() {
        assert!(Square::new(0, 1).is_playable());
        assert!(Square::new(5, 0).is_playable());
        assert!(!Square::new(0, 0).is_playable());
        assert!(!Square::new(7, 7).is_playable());
    }

    #[test]
    fn test_on_board() {
        assert!(Square::new(0, 0).is_on_board());
        assert!(Square::new(7, 7).is_on_board());
        assert!(!Square::new(-1, 3).is_on_board());
        assert!(!Square::new(3, 8).is_on_board());
    }

    #[test]
    fn test_forward_directions_oppose() {
        assert_eq!(Color::White.forward(), -Color::Black.forward());
        assert_eq!(Color::White.opponent(), Color::Black);
    }

    #[test]
    fn test_midpoint() {
        assert_eq!(Square::new(3, 2).midpoint(Square::new(1, 0)), Square::new(2, 1));
    }

    #[test]
    fn test_all_squares_count() {
        assert_eq!(Square::all().count(), 64);
        assert_eq!(Square::all().filter(|s| s.is_playable()).count(), 32);
    }

    #[test]
    fn test_extreme_coordinates_do_not_overflow() {
        let far = Square::new(i8::MAX, i8::MAX);
        assert!(!far.is_playable());
        assert!(Square::new(i8::MAX, i8::MIN).is_playable());
        assert_eq!(far.midpoint(far), far);
        assert_eq!(
            Square::new(i8::MIN, i8::MIN).midpoint(Square::new(i8::MIN, i8::MIN)),
            Square::new(i8::MIN, i8::MIN)
        );
        assert_eq!(far.midpoint(Square::new(i8::MIN, 1)), Square::new(0, 64));
    }
}
